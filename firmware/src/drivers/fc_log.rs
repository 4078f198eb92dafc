use core::{
    str::FromStr,
    sync::atomic::{AtomicU16, Ordering},
};

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use fc_interface::{LogData, LOG_SEGMENT_SIZE};
use format_no_std::show;
use heapless::String;
use log::{Level, SetLoggerError};

use crate::global::LOG_CHANNEL;

const MAX_LOG_LEN: usize = 1024;

/// `log` backend that ships messages to the telemetry link in `LOG_SEGMENT_SIZE` pieces.
pub struct FcLogger;

static LOGGER: FcLogger = FcLogger;
static LOG_ID: AtomicU16 = AtomicU16::new(0);

impl FcLogger {
    pub fn init() -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Info))
    }
}

/// Splits `text` on char boundaries and queues the pieces under one log id. Pieces that do
/// not fit in the channel are dropped, logging never waits.
pub fn send_log<M: RawMutex, const N: usize>(
    channel: &Channel<M, LogData, N>,
    log_id: u16,
    level: Level,
    text: &str,
) {
    let mut start = 0;
    let mut part_index: u8 = 0;

    while start < text.len() {
        let mut end = core::cmp::min(start + LOG_SEGMENT_SIZE, text.len());
        // move end back until it points at a char boundary
        while !text.is_char_boundary(end) && end > start {
            end -= 1;
        }

        if let Ok(part) = String::<LOG_SEGMENT_SIZE>::from_str(&text[start..end]) {
            let _ = channel.try_send(LogData {
                log_id,
                log_part_index: part_index,
                log_level: level,
                text: part,
            });
        }

        start = end;
        part_index = part_index.wrapping_add(1);
    }
}

impl log::Log for FcLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let log_id = LOG_ID.fetch_add(1, Ordering::SeqCst);
        let mut log_buf = [0_u8; MAX_LOG_LEN];
        match show(&mut log_buf, *record.args()) {
            Ok(text) => send_log(&LOG_CHANNEL, log_id, record.level(), text),
            Err(_) => send_log(
                &LOG_CHANNEL,
                log_id,
                Level::Error,
                "Failure to send log: likely larger than 1024 character limit",
            ),
        }
    }

    fn flush(&self) {}
}
