use embedded_hal_async::spi::SpiDevice;
use fc_interface::{BaroData, ImuData, RecordPayload, RecordType};
use log::{error, info, warn};

use crate::{
    consts::{CONTROL_SAMPLING_FREQ, FIFO_WATERMARK, IMU_SETTLE_TICKS, TICK_HZ},
    drivers::{
        barometer::{BaroRequest, Barometer},
        lsm6dso32::Lsm6dso32,
        recorder::Recorder,
        simulation::SimulationInput,
    },
    tasks::fifo_drain::drain_fifo,
    tools::tick_clock::TickClock,
};

/// Timing and FIFO settings for the sampling task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorTaskConfig {
    pub control_hz: u32,
    pub tick_hz: u32,
    pub fifo_watermark: u16,
    /// Wait after the first barometer request before touching the IMUs.
    pub settle_ticks: u32,
}

impl SensorTaskConfig {
    /// Ticks between two loop iterations. The loop runs at twice the control frequency so
    /// pressure and temperature each get one conversion per control period.
    pub const fn tick_increment(&self) -> u32 {
        self.tick_hz / (2 * self.control_hz)
    }
}

impl Default for SensorTaskConfig {
    fn default() -> Self {
        Self {
            control_hz: CONTROL_SAMPLING_FREQ,
            tick_hz: TICK_HZ,
            fifo_watermark: FIFO_WATERMARK,
            settle_ticks: IMU_SETTLE_TICKS,
        }
    }
}

/// Which barometer conversion is running while the task sleeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadoutPhase {
    AwaitingTemperatureConversion,
    AwaitingPressureConversion,
}

struct ImuSlot<SPI> {
    device: Option<Lsm6dso32<SPI>>,
    initialized: bool,
    fifo_enabled: bool,
    record: ImuData,
    fifo_accel_samples: u32,
}

impl<SPI> ImuSlot<SPI> {
    fn new(device: Option<Lsm6dso32<SPI>>) -> Self {
        Self {
            device,
            initialized: false,
            fifo_enabled: false,
            record: ImuData::default(),
            fifo_accel_samples: 0,
        }
    }
}

/// Periodic IMU and barometer sampling.
///
/// Runs at twice the control frequency. Every iteration collects the running barometer
/// conversion, drains the IMU FIFOs and starts the next conversion, alternating pressure and
/// temperature. A full barometer cycle therefore spans two iterations and ends on the
/// temperature request, which is also when barometer records (and IMU records of slots
/// without FIFO) are emitted.
pub struct SensorRead<SPI, B, R, S, const IMUS: usize, const BAROS: usize> {
    config: SensorTaskConfig,
    imus: [ImuSlot<SPI>; IMUS],
    barometer: B,
    recorder: R,
    simulation: S,
    baro_records: [BaroData; BAROS],
    phase: ReadoutPhase,
    deadline: u32,
}

impl<SPI, B, R, S, const IMUS: usize, const BAROS: usize> SensorRead<SPI, B, R, S, IMUS, BAROS>
where
    SPI: SpiDevice,
    B: Barometer,
    R: Recorder,
    S: SimulationInput,
{
    /// `None` IMU slots are not fitted; they keep emitting their (unchanged) record in
    /// fallback mode.
    pub fn new(
        config: SensorTaskConfig,
        imus: [Option<Lsm6dso32<SPI>>; IMUS],
        barometer: B,
        recorder: R,
        simulation: S,
    ) -> Self {
        Self {
            config,
            imus: imus.map(ImuSlot::new),
            barometer,
            recorder,
            simulation,
            baro_records: [BaroData::default(); BAROS],
            phase: ReadoutPhase::AwaitingTemperatureConversion,
            deadline: 0,
        }
    }

    pub async fn startup<C: TickClock>(&mut self, clock: &mut C) {
        if let Err(e) = self.barometer.prepare(BaroRequest::Temperature).await {
            warn!("Barometer temperature request failed: {}", e);
        }
        self.phase = ReadoutPhase::AwaitingTemperatureConversion;
        clock.delay(self.config.settle_ticks).await;

        for (index, slot) in self.imus.iter_mut().enumerate() {
            let Some(imu) = slot.device.as_mut() else {
                continue;
            };

            if let Err(e) = imu.init().await {
                error!("IMU {} init failed: {}", index, e);
                continue;
            }
            slot.initialized = true;

            match imu.configure_fifo(self.config.fifo_watermark).await {
                Ok(fifo) => {
                    slot.fifo_enabled = true;
                    info!(
                        "IMU {} FIFO enabled for 104Hz sampling (watermark {})",
                        index,
                        fifo.watermark()
                    );
                }
                Err(e) => error!(
                    "IMU {} FIFO configuration failed, falling back to direct reads: {}",
                    index, e
                ),
            }
        }

        self.deadline = clock.now();
    }

    /// One loop iteration, stamped with `now`.
    pub async fn tick(&mut self, now: u32) {
        if let Err(e) = self.barometer.read().await {
            warn!("Barometer read failed: {}", e);
        }

        for (index, slot) in self.imus.iter_mut().enumerate() {
            if !slot.fifo_enabled {
                continue;
            }
            let Some(imu) = slot.device.as_mut() else {
                continue;
            };
            match drain_fifo(imu, &mut slot.record, index as u8, now, &mut self.recorder).await {
                Ok(report) => {
                    slot.fifo_accel_samples = slot
                        .fifo_accel_samples
                        .wrapping_add(report.accel_samples as u32)
                }
                Err(e) => warn!("IMU {} FIFO status read failed: {}", index, e),
            }
        }

        match self.phase {
            ReadoutPhase::AwaitingPressureConversion => {
                self.request_conversion(BaroRequest::Pressure).await;
                self.phase = ReadoutPhase::AwaitingTemperatureConversion;
            }
            ReadoutPhase::AwaitingTemperatureConversion => {
                self.request_conversion(BaroRequest::Temperature).await;
                self.phase = ReadoutPhase::AwaitingPressureConversion;
                self.sample_barometers(now).await;
                self.sample_imus_directly(now).await;
            }
        }
    }

    /// Runs one iteration and sleeps until the next absolute deadline.
    pub async fn step<C: TickClock>(&mut self, clock: &mut C) {
        self.tick(self.deadline).await;
        self.deadline = self.deadline.wrapping_add(self.config.tick_increment());
        clock.wait_until(self.deadline).await;
    }

    pub async fn run<C: TickClock>(&mut self, clock: &mut C) -> ! {
        self.startup(clock).await;
        loop {
            self.step(clock).await;
        }
    }

    pub fn imu_record(&self, index: usize) -> Option<ImuData> {
        self.imus.get(index).map(|slot| slot.record)
    }

    pub fn baro_record(&self, index: usize) -> Option<BaroData> {
        self.baro_records.get(index).copied()
    }

    pub fn phase(&self) -> ReadoutPhase {
        self.phase
    }

    pub fn fifo_enabled(&self, index: usize) -> bool {
        self.imus.get(index).is_some_and(|slot| slot.fifo_enabled)
    }

    /// Accelerometer samples drained from IMU `index` since startup.
    pub fn fifo_accel_samples(&self, index: usize) -> u32 {
        self.imus
            .get(index)
            .map_or(0, |slot| slot.fifo_accel_samples)
    }

    async fn request_conversion(&mut self, request: BaroRequest) {
        if let Err(e) = self.barometer.prepare(request).await {
            warn!("Barometer {:?} request failed: {}", request, e);
        }
    }

    async fn sample_barometers(&mut self, now: u32) {
        if self.simulation.is_active() {
            for (index, record) in self.baro_records.iter_mut().enumerate() {
                if let Some(pressure) = self.simulation.baro_pressure(index) {
                    record.pressure = pressure;
                }
            }
        } else {
            match self.barometer.get_measurement().await {
                Ok((pressure, temperature)) => {
                    if let Some(record) = self.baro_records.first_mut() {
                        *record = BaroData {
                            pressure,
                            temperature,
                        };
                    }
                }
                Err(e) => warn!("Barometer measurement failed: {}", e),
            }
        }

        for (index, record) in self.baro_records.iter().enumerate() {
            self.recorder
                .record(
                    now,
                    RecordType::Baro.with_index(index as u8),
                    RecordPayload::Baro(*record),
                )
                .await;
        }
    }

    // fallback for slots running without FIFO
    async fn sample_imus_directly(&mut self, now: u32) {
        let simulating = self.simulation.is_active();

        for (index, slot) in self.imus.iter_mut().enumerate() {
            if slot.fifo_enabled {
                continue;
            }

            if simulating {
                if let Some(acc) = self.simulation.imu_accel(index) {
                    slot.record.acc = acc;
                }
            } else if slot.initialized {
                if let Some(imu) = slot.device.as_mut() {
                    match imu.read_gyro_raw().await {
                        Ok(gyro) => slot.record.gyro = gyro,
                        Err(e) => warn!("IMU {} gyro read failed: {}", index, e),
                    }
                    match imu.read_accel_raw().await {
                        Ok(acc) => slot.record.acc = acc,
                        Err(e) => warn!("IMU {} accel read failed: {}", index, e),
                    }
                }
            }

            self.recorder
                .record(
                    now,
                    RecordType::Imu.with_index(index as u8),
                    RecordPayload::Imu(slot.record),
                )
                .await;
        }
    }
}

/// Entry point for the sampling loop. Never returns.
pub async fn sensor_read_task<SPI, B, R, S, C, const IMUS: usize, const BAROS: usize>(
    config: SensorTaskConfig,
    imus: [Option<Lsm6dso32<SPI>>; IMUS],
    barometer: B,
    recorder: R,
    simulation: S,
    mut clock: C,
) -> !
where
    SPI: SpiDevice,
    B: Barometer,
    R: Recorder,
    S: SimulationInput,
    C: TickClock,
{
    let mut task: SensorRead<SPI, B, R, S, IMUS, BAROS> =
        SensorRead::new(config, imus, barometer, recorder, simulation);
    task.run(&mut clock).await
}
