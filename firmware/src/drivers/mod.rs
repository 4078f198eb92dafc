pub mod barometer;
#[cfg(feature = "rp2350")]
pub mod bmp390_barometer;
pub mod fc_log;
pub mod lsm6dso32;
pub mod recorder;
pub mod simulation;
