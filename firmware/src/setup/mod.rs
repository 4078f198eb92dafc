pub mod barometer;
pub mod i2c;
pub mod spi;
pub mod uart;
