pub mod fifo_drain;
pub mod sensor_read;
pub mod telemetry_link;
