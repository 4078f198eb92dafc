use embedded_hal_async::spi::SpiDevice;
use fc_interface::{ImuData, RecordPayload, RecordType};
use log::warn;

use crate::drivers::{
    lsm6dso32::{registers::SAMPLE_PERIOD_US, FifoTag, Lsm6dso32, SensorFault},
    recorder::Recorder,
};

/// What one drain pass found in the FIFO.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub popped: u16,
    pub accel_samples: u16,
    pub gyro_samples: u16,
    pub unknown_samples: u16,
    pub overrun: bool,
    /// A pop failed and the rest of the batch was left for the next pass.
    pub truncated: bool,
}

/// Tick at which a sample was taken, given how many samples (itself included) were still
/// queued when it was popped at `base_tick`.
pub fn sample_tick(base_tick: u32, remaining: u16) -> u32 {
    base_tick.wrapping_sub(remaining as u32 * SAMPLE_PERIOD_US / 1000)
}

/// Empties the FIFO of `imu` into `record`, emitting the record once per accelerometer sample.
///
/// Gyroscope samples only update `record.gyro` and ride along with the next accelerometer
/// emission.
pub async fn drain_fifo<SPI: SpiDevice, R: Recorder>(
    imu: &mut Lsm6dso32<SPI>,
    record: &mut ImuData,
    index: u8,
    base_tick: u32,
    recorder: &mut R,
) -> Result<DrainReport, SensorFault> {
    let mut report = DrainReport::default();

    if imu.is_fifo_overrun().await? {
        report.overrun = true;
        warn!("IMU {}: {}", index, SensorFault::FifoOverrun);
    }

    let mut remaining = imu.fifo_sample_count().await?;
    while remaining > 0 {
        let sample = match imu.pop_fifo_sample().await {
            Ok(sample) => sample,
            Err(e) => {
                report.truncated = true;
                warn!(
                    "IMU {}: {} after {} samples ({})",
                    index,
                    SensorFault::DrainTruncated,
                    report.popped,
                    e
                );
                break;
            }
        };
        report.popped += 1;

        match sample.kind() {
            Some(FifoTag::Accelerometer) => {
                record.acc = sample.axes();
                report.accel_samples += 1;
                recorder
                    .record(
                        sample_tick(base_tick, remaining),
                        RecordType::Imu.with_index(index),
                        RecordPayload::Imu(*record),
                    )
                    .await;
            }
            Some(FifoTag::Gyroscope) => {
                record.gyro = sample.axes();
                report.gyro_samples += 1;
            }
            None => report.unknown_samples += 1,
        }

        remaining -= 1;
    }

    Ok(report)
}
