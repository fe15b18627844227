// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error taxonomy for the stabilizer pipeline.
//!
//! HAL-specific errors are erased to the `embedded-hal` error kinds at the driver boundary so the
//! pipeline does not have to be generic over every bus error type.
//!
//! - [`Error::Initialization`] is fatal: the firmware cannot proceed.
//! - [`Error::Bus`], [`Error::Transport`] and [`Error::Frame`] are recoverable: the current cycle
//!   is dropped and the next one retries after a fixed delay.

use core::fmt;

use embedded_hal::{i2c, spi};

use crate::protocol::FrameError;

/// Reason the bring-up sequence failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitFault {
    /// A register access during the IMU init protocol failed.
    Bus(i2c::ErrorKind),
    /// `WHO_AM_I` returned an id that is not a supported LSM6DS part.
    UnknownDevice(u8),
    /// The FPGA did not report a successful configuration.
    Logic,
    /// A cycle was requested before bring-up completed.
    NotReady,
}

/// Top-level pipeline error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Initialization(InitFault),
    Bus(i2c::ErrorKind),
    Transport(spi::ErrorKind),
    Frame(FrameError),
}

impl Error {
    /// Only initialization failures stop the firmware.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Initialization(_))
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

impl fmt::Display for InitFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitFault::Bus(kind) => write!(f, "imu bus error during init ({:?})", kind),
            InitFault::UnknownDevice(id) => write!(f, "unknown imu (WHO_AM_I = 0x{:02X})", id),
            InitFault::Logic => f.write_str("fpga not configured"),
            InitFault::NotReady => f.write_str("pipeline not brought up"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Initialization(fault) => write!(f, "init failure: {}", fault),
            Error::Bus(kind) => write!(f, "imu bus error ({:?})", kind),
            Error::Transport(kind) => write!(f, "servo link error ({:?})", kind),
            Error::Frame(e) => write!(f, "frame error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_initialization_is_fatal() {
        assert!(Error::Initialization(InitFault::Logic).is_fatal());
        assert!(!Error::Bus(i2c::ErrorKind::Bus).is_fatal());
        assert!(!Error::Transport(spi::ErrorKind::Overrun).is_fatal());
        assert!(!Error::Frame(FrameError::CommandCount {
            expected: 2,
            got: 1
        })
        .is_fatal());
    }

    #[test]
    fn display_names_the_device() {
        let msg = std::format!("{}", Error::Initialization(InitFault::UnknownDevice(0x33)));
        assert_eq!(msg, "init failure: unknown imu (WHO_AM_I = 0x33)");
    }
}
