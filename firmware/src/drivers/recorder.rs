use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use fc_interface::{ChannelId, RecordEntry, RecordPayload};
use log::warn;

/// Destination for sensor records (flash log, telemetry, ...).
///
/// Ordering and consistency past this point are the sink's business.
pub trait Recorder {
    async fn record(&mut self, tick: u32, channel: ChannelId, payload: RecordPayload);
}

impl<T: Recorder> Recorder for &mut T {
    async fn record(&mut self, tick: u32, channel: ChannelId, payload: RecordPayload) {
        (**self).record(tick, channel, payload).await
    }
}

/// Hands records to another task through an embassy channel.
///
/// Never waits for room: a full channel drops the record and counts it, the sampling loop
/// keeps its schedule.
pub struct ChannelRecorder<'a, M: RawMutex, const N: usize> {
    channel: &'a Channel<M, RecordEntry, N>,
    dropped: &'a AtomicU32,
}

impl<'a, M: RawMutex, const N: usize> ChannelRecorder<'a, M, N> {
    pub fn new(channel: &'a Channel<M, RecordEntry, N>, dropped: &'a AtomicU32) -> Self {
        Self { channel, dropped }
    }
}

impl<M: RawMutex, const N: usize> Recorder for ChannelRecorder<'_, M, N> {
    async fn record(&mut self, tick: u32, channel: ChannelId, payload: RecordPayload) {
        let entry = RecordEntry {
            tick,
            channel,
            payload,
        };
        if self.channel.try_send(entry).is_err() {
            // only warn on the first drop of a streak, the count carries the rest
            if self.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                warn!("Record channel full, dropping records");
            }
        }
    }
}

/// Takes the number of records dropped since the last call.
pub fn take_dropped(dropped: &AtomicU32) -> u32 {
    dropped.swap(0, Ordering::Relaxed)
}
