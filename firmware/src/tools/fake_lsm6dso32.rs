//! Register-level stand-in for an LSM6DSO32 on an SPI bus, for host tests.

use std::{
    cell::{RefCell, RefMut},
    collections::VecDeque,
    rc::Rc,
};

use embedded_hal_1::spi::{Error, ErrorKind};
use embedded_hal_async::spi::{ErrorType, Operation, SpiDevice};

use crate::drivers::lsm6dso32::registers::{Register, DEVICE_ID, FIFO_WORD_LEN, READ_FLAG};

#[derive(Debug)]
pub struct FakeSpiError;

impl Error for FakeSpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct FakeState {
    pub who_am_i: u8,
    pub registers: [u8; 0x80],
    // every write frame (address byte + payload)
    pub writes: Vec<Vec<u8>>,
    // address byte sent for every read
    pub read_addrs: Vec<u8>,
    pub fifo: VecDeque<[u8; FIFO_WORD_LEN]>,
    pub overrun: bool,
    pub status_override: Option<[u8; 2]>,
    pub gyro_raw: [u8; 6],
    pub accel_raw: [u8; 6],
    pub transactions: usize,
    pub fail_all: bool,
    // number of FIFO pops that succeed before the next one fails (once)
    pub fail_pop_after: Option<usize>,
    // writes to this register address fail
    pub fail_write_to: Option<u8>,
}

impl FakeState {
    fn status(&self) -> [u8; 2] {
        if let Some(status) = self.status_override {
            return status;
        }
        let count = self.fifo.len() as u16;
        let mut status2 = ((count >> 8) & 0x03) as u8;
        if self.overrun {
            status2 |= 0x40;
        }
        [(count & 0xFF) as u8, status2]
    }

    fn write(&mut self, frame: &[u8]) {
        let addr = (frame[0] & !READ_FLAG) as usize;
        for (offset, value) in frame[1..].iter().enumerate() {
            self.registers[(addr + offset) & 0x7F] = *value;
        }
        self.writes.push(frame.to_vec());
    }

    fn read(&mut self, addr: u8, data: &mut [u8]) -> Result<(), FakeSpiError> {
        self.read_addrs.push(addr);
        let register = addr & !READ_FLAG;
        let source: Vec<u8> = match register {
            r if r == Register::WhoAmI.addr() => vec![self.who_am_i],
            r if r == Register::FifoStatus1.addr() => self.status().to_vec(),
            r if r == Register::FifoStatus2.addr() => vec![self.status()[1]],
            r if r == Register::OutXLG.addr() => self.gyro_raw.to_vec(),
            r if r == Register::OutXLA.addr() => self.accel_raw.to_vec(),
            r if r == Register::FifoDataOutTag.addr() => {
                if let Some(remaining) = self.fail_pop_after {
                    if remaining == 0 {
                        self.fail_pop_after = None;
                        return Err(FakeSpiError);
                    }
                    self.fail_pop_after = Some(remaining - 1);
                }
                self.fifo
                    .pop_front()
                    .unwrap_or([0; FIFO_WORD_LEN])
                    .to_vec()
            }
            r => self.registers[r as usize..].to_vec(),
        };
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = source.get(i).copied().unwrap_or(0);
        }
        Ok(())
    }
}

/// Cloneable handle: give one clone to the driver and inspect through another.
#[derive(Clone)]
pub struct FakeLsm6dso32 {
    state: Rc<RefCell<FakeState>>,
}

impl FakeLsm6dso32 {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                who_am_i: DEVICE_ID,
                registers: [0; 0x80],
                writes: Vec::new(),
                read_addrs: Vec::new(),
                fifo: VecDeque::new(),
                overrun: false,
                status_override: None,
                gyro_raw: [0; 6],
                accel_raw: [0; 6],
                transactions: 0,
                fail_all: false,
                fail_pop_after: None,
                fail_write_to: None,
            })),
        }
    }

    pub fn state(&self) -> RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    pub fn read_addrs(&self) -> Vec<u8> {
        self.state.borrow().read_addrs.clone()
    }

    pub fn clear_log(&self) {
        let mut state = self.state.borrow_mut();
        state.writes.clear();
        state.read_addrs.clear();
    }

    pub fn push_word(&self, word: [u8; FIFO_WORD_LEN]) {
        self.state.borrow_mut().fifo.push_back(word);
    }

    pub fn push_sample(&self, tag: u8, axes: [i16; 3]) {
        let mut word = [0u8; FIFO_WORD_LEN];
        word[0] = tag << 3;
        for (i, axis) in axes.iter().enumerate() {
            word[1 + i * 2..3 + i * 2].copy_from_slice(&axis.to_le_bytes());
        }
        self.push_word(word);
    }

    pub fn push_accel(&self, axes: [i16; 3]) {
        self.push_sample(0x02, axes);
    }

    pub fn push_gyro(&self, axes: [i16; 3]) {
        self.push_sample(0x01, axes);
    }

    pub fn fifo_len(&self) -> usize {
        self.state.borrow().fifo.len()
    }

    pub fn set_gyro_raw(&self, axes: [i16; 3]) {
        self.state.borrow_mut().gyro_raw = encode_axes(axes);
    }

    pub fn set_accel_raw(&self, axes: [i16; 3]) {
        self.state.borrow_mut().accel_raw = encode_axes(axes);
    }
}

fn encode_axes(axes: [i16; 3]) -> [u8; 6] {
    let mut bytes = [0u8; 6];
    for (i, axis) in axes.iter().enumerate() {
        bytes[i * 2..i * 2 + 2].copy_from_slice(&axis.to_le_bytes());
    }
    bytes
}

impl ErrorType for FakeLsm6dso32 {
    type Error = FakeSpiError;
}

impl SpiDevice for FakeLsm6dso32 {
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.transactions += 1;
        if state.fail_all {
            return Err(FakeSpiError);
        }

        let mut read_addr = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    if bytes[0] & READ_FLAG != 0 {
                        read_addr = Some(bytes[0]);
                    } else if state.fail_write_to == Some(bytes[0]) {
                        return Err(FakeSpiError);
                    } else {
                        state.write(bytes);
                    }
                }
                Operation::Read(data) => {
                    let addr = read_addr.ok_or(FakeSpiError)?;
                    state.read(addr, data)?;
                }
                _ => return Err(FakeSpiError),
            }
        }
        Ok(())
    }
}
