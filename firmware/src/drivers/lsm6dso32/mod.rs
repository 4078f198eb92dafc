//! SPI driver for the LSM6DSO32 accelerometer + gyroscope.
//!
//! Every register access is one `SpiDevice` transaction, so chip select is held only for that
//! access and is released by the transport on every exit path, including bus errors.

use core::fmt;

use embedded_hal_1::spi::ErrorKind;
use embedded_hal_async::spi::{Error as _, Operation, SpiDevice};

pub mod registers;

use registers::{
    AccelFullScale, FifoBatchRate, FifoMode, GyroFullScale, ImuOdr, Register, DEVICE_ID,
    FIFO_COUNT_HIGH_MASK, FIFO_OVERRUN_BIT, FIFO_WORD_LEN,
};

pub const MIN_WATERMARK: u16 = 1;
pub const MAX_WATERMARK: u16 = 511;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFault {
    /// The byte transport failed; the access was not retried.
    TransportError(ErrorKind),
    /// `WHO_AM_I` answered with something other than the LSM6DSO32 id.
    UnexpectedIdentity(u8),
    /// The FIFO overwrote samples before they were read.
    FifoOverrun,
    /// A FIFO pop failed part way through a batch.
    DrainTruncated,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorFault::TransportError(kind) => write!(f, "IMU transport error: {:?}", kind),
            SensorFault::UnexpectedIdentity(id) => {
                write!(f, "IMU answered WHO_AM_I with {:#04x}, expected {:#04x}", id, DEVICE_ID)
            }
            SensorFault::FifoOverrun => write!(f, "IMU FIFO overrun, samples were lost"),
            SensorFault::DrainTruncated => write!(f, "IMU FIFO drain stopped early"),
        }
    }
}

/// Source channel of a FIFO word, from TAG_SENSOR[4:0].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FifoTag {
    Gyroscope = 0x01,
    Accelerometer = 0x02,
}

impl FifoTag {
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(FifoTag::Gyroscope),
            0x02 => Some(FifoTag::Accelerometer),
            _ => None,
        }
    }

    /// Decodes the tag byte of a FIFO word (tag lives in bits [7:3]).
    pub const fn from_tag_byte(byte: u8) -> Option<Self> {
        Self::from_tag(tag_bits(byte))
    }
}

const fn tag_bits(byte: u8) -> u8 {
    (byte >> 3) & 0x1F
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub tag: u8,
}

impl FifoSample {
    pub fn from_word(word: &[u8; FIFO_WORD_LEN]) -> Self {
        let [x, y, z] = decode_axes(&word[1..]);
        Self {
            x,
            y,
            z,
            tag: tag_bits(word[0]),
        }
    }

    pub fn kind(&self) -> Option<FifoTag> {
        FifoTag::from_tag(self.tag)
    }

    pub fn axes(&self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }
}

/// Decodes three consecutive little-endian signed 16 bit values (X, Y, Z).
pub fn decode_axes(bytes: &[u8]) -> [i16; 3] {
    [
        i16::from_le_bytes([bytes[0], bytes[1]]),
        i16::from_le_bytes([bytes[2], bytes[3]]),
        i16::from_le_bytes([bytes[4], bytes[5]]),
    ]
}

/// DIFF_FIFO[9:0] from FIFO_STATUS1 and FIFO_STATUS2.
pub const fn fifo_count_from_status(status: [u8; 2]) -> u16 {
    (((status[1] & FIFO_COUNT_HIGH_MASK) as u16) << 8) | status[0] as u16
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoConfig {
    watermark: u16,
    mode: FifoMode,
}

impl FifoConfig {
    /// Continuous mode with the watermark clamped into [1, 511].
    pub fn new(watermark: u16) -> Self {
        Self {
            watermark: watermark.clamp(MIN_WATERMARK, MAX_WATERMARK),
            mode: FifoMode::Continuous,
        }
    }

    pub fn watermark(&self) -> u16 {
        self.watermark
    }

    pub fn mode(&self) -> FifoMode {
        self.mode
    }

    /// Register writes that apply this configuration, in the order they must be issued.
    pub fn register_bytes(&self) -> [(Register, u8); 4] {
        [
            (Register::FifoCtrl1, (self.watermark & 0xFF) as u8),
            // WTM8 in bit 0, STOP_ON_WTM left disabled
            (Register::FifoCtrl2, ((self.watermark >> 8) & 0x01) as u8),
            (
                Register::FifoCtrl3,
                FifoBatchRate::ctrl3(FifoBatchRate::Bdr104Hz, FifoBatchRate::Bdr104Hz),
            ),
            (Register::FifoCtrl4, self.mode as u8),
        ]
    }
}

pub struct Lsm6dso32<SPI> {
    spi: SPI,
    fifo_config: Option<FifoConfig>,
}

impl<SPI: SpiDevice> Lsm6dso32<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            fifo_config: None,
        }
    }

    /// Checks the device identity, then sets both sensors to 104 Hz (±32 g, ±2000 dps).
    ///
    /// Nothing is written if the identity check fails.
    pub async fn init(&mut self) -> Result<(), SensorFault> {
        let mut who_am_i = [0u8; 1];
        self.read_register(Register::WhoAmI, &mut who_am_i).await?;
        if who_am_i[0] != DEVICE_ID {
            return Err(SensorFault::UnexpectedIdentity(who_am_i[0]));
        }

        self.write_register(
            Register::Ctrl1Xl,
            ImuOdr::Odr104Hz as u8 | AccelFullScale::G32 as u8,
        )
        .await?;
        self.write_register(
            Register::Ctrl2G,
            ImuOdr::Odr104Hz as u8 | GyroFullScale::Dps2000 as u8,
        )
        .await?;

        Ok(())
    }

    /// Puts the FIFO into continuous mode with both sensors batched at 104 Hz.
    ///
    /// Safe to repeat. Returns the configuration that was actually applied.
    pub async fn configure_fifo(&mut self, watermark: u16) -> Result<FifoConfig, SensorFault> {
        let config = FifoConfig::new(watermark);
        self.fifo_config = None;
        for (register, value) in config.register_bytes() {
            self.write_register(register, value).await?;
        }
        self.fifo_config = Some(config);
        Ok(config)
    }

    pub async fn disable_fifo(&mut self) -> Result<(), SensorFault> {
        self.fifo_config = None;
        self.write_register(Register::FifoCtrl4, FifoMode::Bypass as u8)
            .await
    }

    pub fn fifo_config(&self) -> Option<FifoConfig> {
        self.fifo_config
    }

    /// Number of unread FIFO words (0..=1023).
    pub async fn fifo_sample_count(&mut self) -> Result<u16, SensorFault> {
        let mut status = [0u8; 2];
        self.read_register(Register::FifoStatus1, &mut status).await?;
        Ok(fifo_count_from_status(status))
    }

    pub async fn is_fifo_overrun(&mut self) -> Result<bool, SensorFault> {
        let mut status2 = [0u8; 1];
        self.read_register(Register::FifoStatus2, &mut status2)
            .await?;
        Ok(status2[0] & FIFO_OVERRUN_BIT != 0)
    }

    pub async fn pop_fifo_sample(&mut self) -> Result<FifoSample, SensorFault> {
        let mut word = [0u8; FIFO_WORD_LEN];
        self.read_register(Register::FifoDataOutTag, &mut word)
            .await?;
        Ok(FifoSample::from_word(&word))
    }

    /// Direct read of the gyroscope output registers, bypassing the FIFO.
    pub async fn read_gyro_raw(&mut self) -> Result<[i16; 3], SensorFault> {
        let mut buffer = [0u8; 6];
        self.read_register(Register::OutXLG, &mut buffer).await?;
        Ok(decode_axes(&buffer))
    }

    /// Direct read of the accelerometer output registers, bypassing the FIFO.
    pub async fn read_accel_raw(&mut self) -> Result<[i16; 3], SensorFault> {
        let mut buffer = [0u8; 6];
        self.read_register(Register::OutXLA, &mut buffer).await?;
        Ok(decode_axes(&buffer))
    }

    pub fn release(self) -> SPI {
        self.spi
    }

    async fn read_register(&mut self, register: Register, data: &mut [u8]) -> Result<(), SensorFault> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[register.read_addr()]),
                Operation::Read(data),
            ])
            .await
            .map_err(|e| SensorFault::TransportError(e.kind()))
    }

    async fn write_register(&mut self, register: Register, value: u8) -> Result<(), SensorFault> {
        self.spi
            .write(&[register.addr(), value])
            .await
            .map_err(|e| SensorFault::TransportError(e.kind()))
    }
}
