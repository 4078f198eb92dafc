use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice;
use embassy_rp::{
    gpio::{Level, Output},
    peripherals::{DMA_CH0, DMA_CH1, PIN_16, PIN_17, PIN_18, PIN_19, SPI0},
    spi::{self, Async, Spi},
    Peri,
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use static_cell::StaticCell;

// LSM6DSO32 tops out at 10MHz
const IMU_SPI_FREQUENCY: u32 = 8_000_000;

pub type Spi0Bus = Mutex<CriticalSectionRawMutex, Spi<'static, SPI0, Async>>;
pub type ImuSpiDevice =
    SpiDevice<'static, CriticalSectionRawMutex, Spi<'static, SPI0, Async>, Output<'static>>;

pub struct ImuSpiPins {
    pub spi: Peri<'static, SPI0>,
    pub clk: Peri<'static, PIN_18>,
    pub mosi: Peri<'static, PIN_19>,
    pub miso: Peri<'static, PIN_16>,
    pub cs: Peri<'static, PIN_17>,
    pub tx_dma: Peri<'static, DMA_CH0>,
    pub rx_dma: Peri<'static, DMA_CH1>,
}

/// SPI0 bus with the IMU's chip select. The bus is owned by the sensor task alone, the mutex
/// only satisfies the shared bus device.
pub fn setup_imu_spi(p: ImuSpiPins) -> ImuSpiDevice {
    static SPI0_BUS: StaticCell<Spi0Bus> = StaticCell::new();

    let mut config = spi::Config::default();
    config.frequency = IMU_SPI_FREQUENCY;
    // mode 3
    config.polarity = spi::Polarity::IdleHigh;
    config.phase = spi::Phase::CaptureOnSecondTransition;

    let spi = Spi::new(
        p.spi, p.clk, p.mosi, p.miso, p.tx_dma, p.rx_dma, config,
    );
    let bus = SPI0_BUS.init(Mutex::new(spi));

    let cs = Output::new(p.cs, Level::High);
    SpiDevice::new(bus, cs)
}
