//! LSM6DSO32 register map and the field codes written into it.

/// Expected contents of `WHO_AM_I`.
pub const DEVICE_ID: u8 = 0x6C;

/// Set on the address byte to turn an SPI access into a read.
pub const READ_FLAG: u8 = 0x80;

/// Inter-sample interval at the 104 Hz output/batch rate, in microseconds.
pub const SAMPLE_PERIOD_US: u32 = 9615;

/// Length of one FIFO word: tag byte followed by three little-endian axes.
pub const FIFO_WORD_LEN: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    FifoCtrl1 = 0x07,
    FifoCtrl2 = 0x08,
    FifoCtrl3 = 0x09,
    FifoCtrl4 = 0x0A,
    WhoAmI = 0x0F,
    Ctrl1Xl = 0x10,
    Ctrl2G = 0x11,
    OutXLG = 0x22,
    OutXLA = 0x28,
    FifoStatus1 = 0x3A,
    FifoStatus2 = 0x3B,
    FifoDataOutTag = 0x78,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }

    pub const fn read_addr(self) -> u8 {
        self as u8 | READ_FLAG
    }
}

/// Output data rate, bits [7:4] of CTRL1_XL / CTRL2_G.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ImuOdr {
    Odr1Hz6 = 0xB0,
    Odr12Hz5 = 0x10,
    Odr26Hz = 0x20,
    Odr52Hz = 0x30,
    Odr104Hz = 0x40,
    Odr208Hz = 0x50,
    Odr416Hz = 0x60,
    Odr833Hz = 0x70,
    Odr1kHz66 = 0x80,
    Odr3kHz33 = 0x90,
    Odr6kHz66 = 0xA0,
}

/// Accelerometer full scale, bits [3:2] of CTRL1_XL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelFullScale {
    G4 = 0x00,
    G32 = 0x04,
    G8 = 0x08,
    G16 = 0x0C,
}

/// Gyroscope full scale, bits [3:2] of CTRL2_G.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroFullScale {
    Dps250 = 0x00,
    Dps500 = 0x04,
    Dps1000 = 0x08,
    Dps2000 = 0x0C,
}

/// FIFO batch data rate, one nibble per sensor in FIFO_CTRL3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FifoBatchRate {
    NotBatched = 0x00,
    Bdr12Hz5 = 0x01,
    Bdr26Hz = 0x02,
    Bdr52Hz = 0x03,
    Bdr104Hz = 0x04,
    Bdr208Hz = 0x05,
    Bdr416Hz = 0x06,
    Bdr833Hz = 0x07,
}

impl FifoBatchRate {
    /// FIFO_CTRL3 value: gyroscope rate in the high nibble, accelerometer rate in the low nibble.
    pub const fn ctrl3(gyro: FifoBatchRate, accel: FifoBatchRate) -> u8 {
        ((gyro as u8) << 4) | accel as u8
    }
}

/// FIFO_MODE[2:0] of FIFO_CTRL4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FifoMode {
    Bypass = 0x00,
    Fifo = 0x01,
    ContinuousToFifo = 0x03,
    BypassToContinuous = 0x04,
    Continuous = 0x06,
    BypassToFifo = 0x07,
}

/// FIFO_STATUS2 bit set when unread samples were overwritten.
pub const FIFO_OVERRUN_BIT: u8 = 0x40;
/// FIFO_STATUS2 bits carrying DIFF_FIFO[9:8].
pub const FIFO_COUNT_HIGH_MASK: u8 = 0x03;
