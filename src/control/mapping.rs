// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Orientation angle → servo command mapping.
//!
//! An angle is clamped to the axis input window and then rescaled linearly onto `[0, 180]`.
//! Clamping happens first, so the output is always a valid servo angle regardless of input.

use crate::control::complementary::Orientation;

/// Servo angle command in whole degrees, always within `[0, 180]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ServoCommand(u8);

impl ServoCommand {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 180;
    pub const CENTER: ServoCommand = ServoCommand(90);

    /// Build a command, saturating at 180°.
    #[inline]
    pub fn new(degrees: u8) -> Self {
        Self(degrees.min(Self::MAX))
    }

    #[inline]
    pub fn degrees(&self) -> u8 {
        self.0
    }

    /// Mirror the command for a servo mounted with reversed polarity.
    #[inline]
    pub fn invert(self) -> Self {
        Self(Self::MAX - self.0)
    }
}

/// Map `angle_deg` from `[input_min, input_max]` onto a servo command.
///
/// Out-of-window angles saturate at 0 or 180. A NaN angle maps to 0 and a degenerate window
/// (`input_max <= input_min` or NaN bounds) maps to the centre.
pub fn map_angle(angle_deg: f32, input_min: f32, input_max: f32) -> ServoCommand {
    if !(input_max > input_min) {
        return ServoCommand::CENTER;
    }

    let clamped = angle_deg.clamp(input_min, input_max);
    let scaled = (clamped - input_min) * ServoCommand::MAX as f32 / (input_max - input_min);

    // `as` truncates toward zero and saturates NaN to 0.
    ServoCommand::new(scaled as u8)
}

/// Which orientation angle drives an axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AngleSource {
    Roll,
    Pitch,
}

/// Per-axis mapping configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AxisMap {
    pub source: AngleSource,
    /// Angle (deg) that maps to 0.
    pub input_min: f32,
    /// Angle (deg) that maps to 180.
    pub input_max: f32,
    /// Apply `180 - x` after scaling.
    pub inverted: bool,
}

impl AxisMap {
    /// Default ±45° window, not inverted.
    pub const fn new(source: AngleSource) -> Self {
        Self {
            source,
            input_min: -45.0,
            input_max: 45.0,
            inverted: false,
        }
    }

    pub fn with_range(mut self, input_min: f32, input_max: f32) -> Self {
        self.input_min = input_min;
        self.input_max = input_max;
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Produce this axis' command for the current orientation.
    pub fn command(&self, orientation: &Orientation) -> ServoCommand {
        let angle = match self.source {
            AngleSource::Roll => orientation.roll,
            AngleSource::Pitch => orientation.pitch,
        };

        let cmd = map_angle(angle, self.input_min, self.input_max);
        if self.inverted {
            cmd.invert()
        } else {
            cmd
        }
    }
}
