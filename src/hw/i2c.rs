// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Inter-Integrated Circuit (I2C) abstraction layer.
//!
//! `I2cBus` wraps the HAL's blocking I2C1 master (IMU bus pins from [`super::pins`]) and exposes it
//! through the `embedded-hal` 1.0 [`I2c`](embedded_hal::i2c::I2c) trait. Only the transaction shapes the IMU driver issues are
//! supported natively (write, read, write-then-read); longer transactions are run one operation at
//! a time.

use embedded_hal::i2c as ehal_i2c;
use stm32f7xx_hal::{
    i2c::{self, BlockingI2c},
    pac,
    prelude::*,
};

use super::pins::{ImuScl, ImuSda};

/// The HAL master on the IMU pins.
pub type ImuI2c = BlockingI2c<pac::I2C1, ImuScl, ImuSda>;

/// HAL I2C error, kept for diagnostics.
#[derive(Debug)]
pub struct I2cFault(pub i2c::Error);

impl ehal_i2c::Error for I2cFault {
    fn kind(&self) -> ehal_i2c::ErrorKind {
        use ehal_i2c::{ErrorKind, NoAcknowledgeSource};

        match self.0 {
            i2c::Error::Bus => ErrorKind::Bus,
            i2c::Error::Arbitration => ErrorKind::ArbitrationLoss,
            i2c::Error::Acknowledge => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            i2c::Error::Overrun => ErrorKind::Overrun,
            _ => ErrorKind::Other,
        }
    }
}

pub struct I2cBus {
    i2c: ImuI2c,
}

impl I2cBus {
    pub fn new(i2c: ImuI2c) -> Self {
        Self { i2c }
    }

    pub fn free(self) -> ImuI2c {
        self.i2c
    }
}

impl ehal_i2c::ErrorType for I2cBus {
    type Error = I2cFault;
}

impl ehal_i2c::I2c for I2cBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [ehal_i2c::Operation<'_>],
    ) -> Result<(), I2cFault> {
        use ehal_i2c::Operation;

        match operations {
            [Operation::Write(w), Operation::Read(r)] => {
                self.i2c.write_read(address, w, r).map_err(I2cFault)
            }
            ops => {
                for op in ops.iter_mut() {
                    match op {
                        Operation::Write(w) => self.i2c.write(address, w).map_err(I2cFault)?,
                        Operation::Read(r) => self.i2c.read(address, r).map_err(I2cFault)?,
                    }
                }
                Ok(())
            }
        }
    }
}
