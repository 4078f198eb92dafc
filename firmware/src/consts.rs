// the control loop the sensor data feeds, the sampling task runs at twice this rate
pub const CONTROL_SAMPLING_FREQ: u32 = 100;
// scheduler time base (1 ms ticks)
pub const TICK_HZ: u32 = 1000;

pub const NUM_IMU: usize = 1;
pub const NUM_BARO: usize = 1;

// in samples, 1 = flag as soon as anything is batched
pub const FIFO_WATERMARK: u16 = 1;
// wait after the first barometer request before touching the IMU
pub const IMU_SETTLE_TICKS: u32 = 5;

pub const RECORD_CHANNEL_DEPTH: usize = 64;
pub const LOG_CHANNEL_DEPTH: usize = 128;

pub const TELEMETRY_RATE: f32 = 50.0;
pub const TELEMETRY_BAUDRATE: u32 = 115200;
