//! Host-side stand-ins for the board peripherals.
//!
//! - `MockI2c` records every transaction and replays scripted read data or failures.
//! - `MockSpi` + `MockCs` share one event log so chip-select edges and writes can be checked in
//!   order.
//! - `VirtualClock` records delays instead of sleeping.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::{delay::DelayNs, digital, i2c, spi};

/// One recorded I2C transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cOp {
    Write { addr: u8, data: Vec<u8> },
    Read { addr: u8, len: usize },
    WriteRead { addr: u8, write: Vec<u8>, read_len: usize },
}

enum Step {
    Data(Vec<u8>),
    Fail(i2c::ErrorKind),
}

/// Scripted I2C bus.
///
/// Scripted failures apply to the next transaction of any kind. Scripted data is consumed by the
/// next transaction that reads; reads with nothing scripted return zeros.
#[derive(Default)]
pub struct MockI2c {
    ops: Vec<I2cOp>,
    script: VecDeque<Step>,
    always: Option<i2c::ErrorKind>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<I2cOp> {
        self.ops.clone()
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Data returned by a later read, in queue order.
    pub fn queue_read(&mut self, data: &[u8]) {
        self.script.push_back(Step::Data(data.to_vec()));
    }

    /// Failure of a later transaction, in queue order.
    pub fn queue_failure(&mut self, kind: i2c::ErrorKind) {
        self.script.push_back(Step::Fail(kind));
    }

    /// Fail the very next transaction.
    pub fn fail_next(&mut self, kind: i2c::ErrorKind) {
        self.script.push_front(Step::Fail(kind));
    }

    /// Fail every transaction from now on.
    pub fn fail_always(&mut self, kind: i2c::ErrorKind) {
        self.always = Some(kind);
    }

    pub fn heal(&mut self) {
        self.always = None;
    }

    fn take_failure(&mut self) -> Result<(), i2c::ErrorKind> {
        if let Some(kind) = self.always {
            return Err(kind);
        }
        if let Some(Step::Fail(kind)) = self.script.front() {
            let kind = *kind;
            self.script.pop_front();
            return Err(kind);
        }
        Ok(())
    }

    fn fill(&mut self, buf: &mut [u8]) {
        buf.fill(0);
        if let Some(Step::Data(_)) = self.script.front() {
            if let Some(Step::Data(data)) = self.script.pop_front() {
                let n = buf.len().min(data.len());
                buf[..n].copy_from_slice(&data[..n]);
            }
        }
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = i2c::ErrorKind;
}

impl i2c::I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        let op = match &*operations {
            [i2c::Operation::Write(w)] => I2cOp::Write {
                addr: address,
                data: w.to_vec(),
            },
            [i2c::Operation::Read(r)] => I2cOp::Read {
                addr: address,
                len: r.len(),
            },
            [i2c::Operation::Write(w), i2c::Operation::Read(r)] => I2cOp::WriteRead {
                addr: address,
                write: w.to_vec(),
                read_len: r.len(),
            },
            _ => panic!("unexpected I2C transaction shape"),
        };
        self.ops.push(op);
        self.take_failure()?;

        if let Some(i2c::Operation::Read(buf)) = operations.last_mut() {
            self.fill(buf);
        }
        Ok(())
    }
}

/// Event on the shared SPI + chip-select log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpiEvent {
    Select,
    Deselect,
    Write(Vec<u8>),
    Flush,
}

pub type SpiLog = Rc<RefCell<Vec<SpiEvent>>>;

/// SPI bus that logs writes.
pub struct MockSpi {
    log: SpiLog,
    fail_writes: VecDeque<spi::ErrorKind>,
}

impl MockSpi {
    pub fn fail_next_write(&mut self, kind: spi::ErrorKind) {
        self.fail_writes.push_back(kind);
    }
}

/// Active-low chip-select pin on the same log.
pub struct MockCs {
    log: SpiLog,
    fail: bool,
}

impl MockCs {
    pub fn fail_edges(&mut self, fail: bool) {
        self.fail = fail;
    }
}

/// Build a bus + chip-select pair and the log they share.
pub fn spi_pair() -> (MockSpi, MockCs, SpiLog) {
    let log: SpiLog = Rc::new(RefCell::new(Vec::new()));
    (
        MockSpi {
            log: log.clone(),
            fail_writes: VecDeque::new(),
        },
        MockCs {
            log: log.clone(),
            fail: false,
        },
        log,
    )
}

/// Frames written while chip-select was asserted.
pub fn written_frames(log: &SpiLog) -> Vec<Vec<u8>> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            SpiEvent::Write(bytes) => Some(bytes.clone()),
            _ => None,
        })
        .collect()
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl spi::SpiBus<u8> for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        if let Some(kind) = self.fail_writes.pop_front() {
            return Err(kind);
        }
        self.log.borrow_mut().push(SpiEvent::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.write(write)?;
        read.fill(0);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(words)?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(SpiEvent::Flush);
        Ok(())
    }
}

impl digital::ErrorType for MockCs {
    type Error = digital::ErrorKind;
}

impl digital::OutputPin for MockCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(digital::ErrorKind::Other);
        }
        self.log.borrow_mut().push(SpiEvent::Select);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(digital::ErrorKind::Other);
        }
        self.log.borrow_mut().push(SpiEvent::Deselect);
        Ok(())
    }
}

/// Delay provider that advances virtual time.
#[derive(Default)]
pub struct VirtualClock {
    elapsed_ns: u64,
    delays_ms: Vec<u32>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `delay_ms` call, in order.
    pub fn delays_ms(&self) -> Vec<u32> {
        self.delays_ms.clone()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for VirtualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += ns as u64;
    }

    fn delay_us(&mut self, us: u32) {
        self.elapsed_ns += us as u64 * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.elapsed_ns += ms as u64 * 1_000_000;
    }
}
