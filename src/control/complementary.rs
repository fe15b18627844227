// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Roll/pitch estimation with a first-order complementary filter.
//!
//! Each cycle the gravity vector gives an instantaneous roll/pitch, which is blended into the
//! previous estimate:
//!
//! ```text
//! angle = alpha * angle_prev + (1 - alpha) * accel_angle
//! ```
//!
//! Only the accelerometer path is used. The gyro rate is carried in [`ImuSample`] but not
//! integrated, so the filter attenuates accelerometer noise rather than tracking fast rotation.
//! The gravity angles are only meaningful while the board is not accelerating.

#[cfg_attr(test, allow(unused_imports))]
use micromath::F32Ext;

use crate::drivers::lsm6ds::ImuSample;

/// Smoothing constant used by the stabilizer.
pub const DEFAULT_ALPHA: f32 = 0.9;

/// Estimated attitude in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Orientation {
    pub roll: f32,
    pub pitch: f32,
}

impl Orientation {
    pub const LEVEL: Orientation = Orientation {
        roll: 0.0,
        pitch: 0.0,
    };

    /// Roll/pitch implied by an accelerometer vector (any consistent unit).
    pub fn from_accel(accel: [f32; 3]) -> Self {
        let [ax, ay, az] = accel;
        Self {
            roll: ay.atan2(az).to_degrees(),
            pitch: (-ax).atan2((ay * ay + az * az).sqrt()).to_degrees(),
        }
    }
}

/// Accelerometer-only complementary filter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplementaryFilter {
    alpha: f32,
}

impl ComplementaryFilter {
    /// `alpha` is the weight of the previous estimate, clamped to `[0, 1]`.
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Blend a measured orientation into the previous estimate.
    #[inline]
    pub fn blend(&self, prev: &Orientation, measured: &Orientation) -> Orientation {
        let a = self.alpha;
        Orientation {
            roll: a * prev.roll + (1.0 - a) * measured.roll,
            pitch: a * prev.pitch + (1.0 - a) * measured.pitch,
        }
    }

    /// Estimate that would follow `prev` after observing `sample`. Does not modify `prev`.
    pub fn next(&self, prev: &Orientation, sample: &ImuSample) -> Orientation {
        self.blend(prev, &Orientation::from_accel(sample.accel))
    }

    /// Advance `state` in place by one sample.
    pub fn update(&self, state: &mut Orientation, sample: &ImuSample) {
        *state = self.next(state, sample);
    }
}

impl Default for ComplementaryFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
