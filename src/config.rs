// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pipeline configuration.
//!
//! Everything is fixed at build time. `PipelineConfig::default()` is the stock stabilizer: two
//! servos driven by roll and pitch over a ±45° window, 2-byte frames, 50 Hz loop. Override with the
//! `with_*` builders:
//!
//! ```
//! use tiltservo::{protocol::FrameFormat, PipelineConfig};
//!
//! let cfg = PipelineConfig::default()
//!     .with_frame_format(FrameFormat::dual16())
//!     .with_period_ms(10);
//! ```

use crate::control::calibration::{DEFAULT_INTERVAL_MS, DEFAULT_SAMPLES};
use crate::control::complementary::DEFAULT_ALPHA;
use crate::control::mapping::{AngleSource, AxisMap};
use crate::drivers::lsm6ds::ImuConfig;
use crate::protocol::FrameFormat;

/// Delay after a successful cycle.
pub const DEFAULT_PERIOD_MS: u32 = 20;
/// Delay after a failed cycle.
pub const DEFAULT_FAULT_DELAY_MS: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub imu: ImuConfig,
    /// Complementary filter weight of the previous estimate.
    pub alpha: f32,
    /// Servo axes in frame order. Only the first `frame_format.axes()` are used.
    pub axes: [AxisMap; 2],
    pub frame_format: FrameFormat,
    pub period_ms: u32,
    pub fault_delay_ms: u32,
    pub calibration_samples: u16,
    pub calibration_interval_ms: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            imu: ImuConfig::default(),
            alpha: DEFAULT_ALPHA,
            axes: [
                AxisMap::new(AngleSource::Roll),
                AxisMap::new(AngleSource::Pitch),
            ],
            frame_format: FrameFormat::Dual8,
            period_ms: DEFAULT_PERIOD_MS,
            fault_delay_ms: DEFAULT_FAULT_DELAY_MS,
            calibration_samples: DEFAULT_SAMPLES,
            calibration_interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl PipelineConfig {
    pub fn with_imu(mut self, imu: ImuConfig) -> Self {
        self.imu = imu;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_axes(mut self, axes: [AxisMap; 2]) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_frame_format(mut self, frame_format: FrameFormat) -> Self {
        self.frame_format = frame_format;
        self
    }

    pub fn with_period_ms(mut self, period_ms: u32) -> Self {
        self.period_ms = period_ms;
        self
    }

    pub fn with_fault_delay_ms(mut self, fault_delay_ms: u32) -> Self {
        self.fault_delay_ms = fault_delay_ms;
        self
    }

    /// Number of stationary samples and their spacing for gyro calibration.
    pub fn with_calibration(mut self, samples: u16, interval_ms: u32) -> Self {
        self.calibration_samples = samples;
        self.calibration_interval_ms = interval_ms;
        self
    }

    /// Axes actually carried by the configured frame format.
    pub fn active_axes(&self) -> &[AxisMap] {
        &self.axes[..self.frame_format.axes()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_frames_use_first_axis_only() {
        let cfg = PipelineConfig::default().with_frame_format(FrameFormat::Single8);
        assert_eq!(cfg.active_axes().len(), 1);
        assert_eq!(cfg.active_axes()[0].source, AngleSource::Roll);
    }

    #[test]
    fn defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.active_axes().len(), 2);
        assert_eq!(cfg.period_ms, 20);
        assert_eq!(cfg.calibration_samples, 60);
        assert_eq!(cfg.alpha, 0.9);
    }
}
