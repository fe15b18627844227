// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo command frame sent to the FPGA.
//!
//! The FPGA decodes frames by fixed offset and width, so there is no header, checksum, or version
//! field. The shape is chosen once per deployment through [`FrameFormat`]:
//!
//! | Format | Width | Layout |
//! | ------ | ----- | ------ |
//! | `Single8` | 1 byte | `[angle0]` |
//! | `Dual8` | 2 bytes | `[angle0, angle1]` |
//! | `Dual16` | 4 bytes | `[ticks0_hi, ticks0_lo, ticks1_hi, ticks1_lo]` |

use core::fmt;

use crate::control::mapping::ServoCommand;

/// Largest frame any format produces.
pub const MAX_FRAME_LEN: usize = 4;

/// Pulse width for 0° in FPGA clock ticks (0.5 ms at 28.8 MHz).
pub const DEFAULT_MIN_TICKS: u16 = 14_400;
/// Pulse width for 180° in FPGA clock ticks (2.0 ms at 28.8 MHz).
pub const DEFAULT_MAX_TICKS: u16 = 57_600;

/// Wire shape agreed with the FPGA bitstream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameFormat {
    /// One servo, angle byte.
    Single8,
    /// Two servos, one angle byte each.
    Dual8,
    /// Two servos, big-endian 16-bit pulse width in FPGA clock ticks.
    Dual16 { min_ticks: u16, max_ticks: u16 },
}

impl FrameFormat {
    /// `Dual16` with the default 0.5 ms - 2.0 ms pulse range.
    pub const fn dual16() -> Self {
        FrameFormat::Dual16 {
            min_ticks: DEFAULT_MIN_TICKS,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    /// Number of servo commands one frame carries.
    #[inline]
    pub fn axes(&self) -> usize {
        match self {
            FrameFormat::Single8 => 1,
            FrameFormat::Dual8 | FrameFormat::Dual16 { .. } => 2,
        }
    }

    /// Number of bytes on the wire.
    #[inline]
    pub fn width(&self) -> usize {
        match self {
            FrameFormat::Single8 => 1,
            FrameFormat::Dual8 => 2,
            FrameFormat::Dual16 { .. } => 4,
        }
    }

    /// Serialize `commands` in order. The slice length must equal [`axes`](Self::axes).
    pub fn encode(&self, commands: &[ServoCommand]) -> Result<Frame, FrameError> {
        if commands.len() != self.axes() {
            return Err(FrameError::CommandCount {
                expected: self.axes(),
                got: commands.len(),
            });
        }

        match *self {
            FrameFormat::Single8 | FrameFormat::Dual8 => {
                let mut frame = Frame::empty();
                for cmd in commands {
                    frame.push(cmd.degrees());
                }
                Ok(frame)
            }
            FrameFormat::Dual16 {
                min_ticks,
                max_ticks,
            } => Ok(Frame::from_words(&[
                command_to_ticks(commands[0], min_ticks, max_ticks),
                command_to_ticks(commands[1], min_ticks, max_ticks),
            ])),
        }
    }
}

/// Convert a servo angle into a pulse width in ticks, linear between `min_ticks` (0°) and
/// `max_ticks` (180°).
pub fn command_to_ticks(cmd: ServoCommand, min_ticks: u16, max_ticks: u16) -> u16 {
    let span = max_ticks as i32 - min_ticks as i32;
    let ticks = min_ticks as i32 + span * cmd.degrees() as i32 / ServoCommand::MAX as i32;
    ticks.clamp(0, u16::MAX as i32) as u16
}

/// Fixed-capacity, fixed-width frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl Frame {
    const fn empty() -> Self {
        Self {
            buf: [0; MAX_FRAME_LEN],
            len: 0,
        }
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        self.buf[self.len] = byte;
        self.len += 1;
    }

    /// Pack up to two 16-bit words, high byte first.
    pub fn from_words(words: &[u16]) -> Self {
        let mut frame = Self::empty();
        for w in words.iter().take(MAX_FRAME_LEN / 2) {
            let [hi, lo] = w.to_be_bytes();
            frame.push(hi);
            frame.push(lo);
        }
        frame
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Frame could not be built from the given commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Number of commands does not match the configured format.
    CommandCount { expected: usize, got: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::CommandCount { expected, got } => {
                write!(f, "expected {} commands, got {}", expected, got)
            }
        }
    }
}
