use core::sync::atomic::AtomicU32;

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use embedded_io_async::Write;
use fc_interface::{FcMessage, LogData, RecordEntry};

use crate::drivers::recorder::take_dropped;

// largest encoded FcMessage plus COBS overhead and the frame delimiter
pub const MAX_FRAME_SIZE: usize = 128;

#[derive(Debug)]
pub enum LinkError<E> {
    Encode(postcard::Error),
    Io(E),
}

/// Writes one COBS framed (zero terminated) message.
pub async fn send_message<W: Write>(
    writer: &mut W,
    message: &FcMessage,
) -> Result<(), LinkError<W::Error>> {
    let mut buffer = [0u8; MAX_FRAME_SIZE];
    let frame = postcard::to_slice_cobs(message, &mut buffer).map_err(LinkError::Encode)?;
    writer.write_all(frame).await.map_err(LinkError::Io)
}

/// Forwards everything queued so far: the drop count (if any), then records, then log
/// segments. Returns how many frames were written.
pub async fn forward_pending<W, M, const RECORDS: usize, const LOGS: usize>(
    writer: &mut W,
    records: &Channel<M, RecordEntry, RECORDS>,
    logs: &Channel<M, LogData, LOGS>,
    dropped: &AtomicU32,
) -> Result<usize, LinkError<W::Error>>
where
    W: Write,
    M: RawMutex,
{
    let mut frames = 0;

    let lost = take_dropped(dropped);
    if lost > 0 {
        send_message(writer, &FcMessage::RecordsDropped(lost)).await?;
        frames += 1;
    }

    while let Ok(entry) = records.try_receive() {
        send_message(writer, &FcMessage::Record(entry)).await?;
        frames += 1;
    }

    while let Ok(log) = logs.try_receive() {
        send_message(writer, &FcMessage::Log(log)).await?;
        frames += 1;
    }

    writer.flush().await.map_err(LinkError::Io)?;
    Ok(frames)
}
