use core::sync::atomic::AtomicU32;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use fc_interface::{LogData, RecordEntry};

use crate::{
    consts::{LOG_CHANNEL_DEPTH, NUM_BARO, NUM_IMU, RECORD_CHANNEL_DEPTH},
    drivers::simulation::SharedSimulation,
};

pub static LOG_CHANNEL: Channel<CriticalSectionRawMutex, LogData, LOG_CHANNEL_DEPTH> =
    Channel::new();

// sensor records on their way to the telemetry link
pub static RECORD_CHANNEL: Channel<CriticalSectionRawMutex, RecordEntry, RECORD_CHANNEL_DEPTH> =
    Channel::new();
pub static RECORDS_DROPPED: AtomicU32 = AtomicU32::new(0);

pub static SIMULATION: SharedSimulation<CriticalSectionRawMutex, NUM_IMU, NUM_BARO> =
    SharedSimulation::new();
