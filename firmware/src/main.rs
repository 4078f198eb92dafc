#![no_std]
#![no_main]

mod setup;

use embassy_executor::Spawner;
use embassy_rp::{
    block::ImageDef,
    gpio::{Level, Output},
    uart::BufferedUartTx,
};
use embassy_time::{Duration, Timer};
use fc_firmware::{
    consts::{NUM_BARO, NUM_IMU, TELEMETRY_RATE},
    drivers::{
        bmp390_barometer::Bmp390Barometer, fc_log::FcLogger, lsm6dso32::Lsm6dso32,
        recorder::ChannelRecorder,
    },
    global::{LOG_CHANNEL, RECORDS_DROPPED, RECORD_CHANNEL, SIMULATION},
    tasks::{
        sensor_read::{sensor_read_task, SensorTaskConfig},
        telemetry_link::forward_pending,
    },
    tools::tick_clock::EmbassyTickClock,
};
use log::info;

use crate::setup::{
    barometer::{setup_barometer, BaroI2c},
    i2c::setup_i2c_bus,
    spi::{setup_imu_spi, ImuSpiDevice, ImuSpiPins},
    uart::setup_telemetry_uart,
};

use {defmt_rtt as _, panic_probe as _};

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    if FcLogger::init().is_err() {
        defmt::error!("Logger was already installed");
    }

    // turn on the onboard LED to make it clear the device is on
    let mut status_led = Output::new(p.PIN_25, Level::Low);
    status_led.set_high();

    let i2c0_bus = setup_i2c_bus(p.I2C0, p.PIN_21, p.PIN_20);
    let barometer = setup_barometer(i2c0_bus).await;

    let imu_spi = setup_imu_spi(ImuSpiPins {
        spi: p.SPI0,
        clk: p.PIN_18,
        mosi: p.PIN_19,
        miso: p.PIN_16,
        cs: p.PIN_17,
        tx_dma: p.DMA_CH0,
        rx_dma: p.DMA_CH1,
    });

    let telemetry_tx = setup_telemetry_uart(p.PIN_8, p.PIN_9, p.UART1);

    spawner.spawn(sensor_task(imu_spi, barometer)).unwrap();
    spawner.spawn(telemetry_task(telemetry_tx)).unwrap();
    info!("Sensor and telemetry tasks started");

    loop {
        // if the LED stops blinking the FC crashed, if it blinks unevenly it is overloaded
        blink_led(&mut status_led, 3.0).await;
    }
}

#[embassy_executor::task]
async fn sensor_task(imu: ImuSpiDevice, barometer: Bmp390Barometer<BaroI2c>) {
    sensor_read_task::<_, _, _, _, _, NUM_IMU, NUM_BARO>(
        SensorTaskConfig::default(),
        [Some(Lsm6dso32::new(imu))],
        barometer,
        ChannelRecorder::new(&RECORD_CHANNEL, &RECORDS_DROPPED),
        &SIMULATION,
        EmbassyTickClock,
    )
    .await
}

#[embassy_executor::task]
async fn telemetry_task(mut uart_tx: BufferedUartTx) {
    let time_between = Duration::from_millis((1000.0 / TELEMETRY_RATE) as u64);
    loop {
        if let Err(e) =
            forward_pending(&mut uart_tx, &RECORD_CHANNEL, &LOG_CHANNEL, &RECORDS_DROPPED).await
        {
            // not through `log`, that would queue more for the link that just failed
            defmt::warn!("Telemetry link error: {}", defmt::Debug2Format(&e));
        }
        Timer::after(time_between).await;
    }
}

async fn blink_led(led: &mut Output<'static>, freq: f32) {
    led.set_low();
    Timer::after_millis((500.0 / freq) as u64).await;
    led.set_high();
    Timer::after_millis((500.0 / freq) as u64).await;
}
