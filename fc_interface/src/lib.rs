#![cfg_attr(not(test), no_std)]

use heapless::String;
use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};

pub const LOG_SEGMENT_SIZE: usize = 54;

//----------------------------------------------------------//
//---------------------- Sensor Records ----------------------//
//----------------------------------------------------------//

/// Composite IMU record: the latest accelerometer and gyroscope triples (raw LSB).
#[derive(Serialize, Deserialize, MaxSize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImuData {
    pub acc: [i16; 3],
    pub gyro: [i16; 3],
}

/// Compensated barometer reading.
#[derive(Serialize, Deserialize, MaxSize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaroData {
    // in Pa
    pub pressure: i32,
    // in hundredths of a degree celsius
    pub temperature: i32,
}

#[derive(Serialize, Deserialize, MaxSize, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    Imu = 0x10,
    Baro = 0x20,
}

impl RecordType {
    /// Attaches a sensor index to the record type, giving the typed channel a record is filed under.
    pub const fn with_index(self, index: u8) -> ChannelId {
        ChannelId { kind: self, index }
    }
}

/// Typed channel id: which kind of record, from which sensor instance.
#[derive(Serialize, Deserialize, MaxSize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelId {
    pub kind: RecordType,
    pub index: u8,
}

impl ChannelId {
    /// Packs the channel into one byte (type in the high nibble, index in the low nibble).
    pub const fn as_byte(&self) -> u8 {
        (self.kind as u8) | (self.index & 0x0F)
    }

    pub const fn from_byte(byte: u8) -> Option<Self> {
        let kind = match byte & 0xF0 {
            0x10 => RecordType::Imu,
            0x20 => RecordType::Baro,
            _ => return None,
        };
        Some(Self {
            kind,
            index: byte & 0x0F,
        })
    }
}

#[derive(Serialize, Deserialize, MaxSize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordPayload {
    Imu(ImuData),
    Baro(BaroData),
}

/// One record handed to the recording sink.
#[derive(Serialize, Deserialize, MaxSize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordEntry {
    // scheduler tick (ms) the record is stamped with
    pub tick: u32,
    pub channel: ChannelId,
    pub payload: RecordPayload,
}

//----------------------------------------------------------//
//--------------- Flight Computer Messages ---------------//
//----------------------------------------------------------//

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LogData {
    pub log_id: u16,
    pub log_part_index: u8,
    pub log_level: log::Level,
    pub text: String<LOG_SEGMENT_SIZE>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum FcMessage {
    Record(RecordEntry),
    Log(LogData),
    // number of records the sink had to drop since the last report
    RecordsDropped(u32),
}
