// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Gyroscope zero-rate bias calibration.
//!
//! The board must be held still while this runs; nothing here checks that it is.
//!
//! The stage always performs exactly `samples` read attempts, each followed by one interval wait.
//! A failed read is skipped rather than retried, so the run time is bounded even with a faulty
//! bus. The sums are divided by the requested sample count, which pulls the bias toward zero when
//! reads fail.

use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::drivers::lsm6ds::Lsm6ds;

/// Samples averaged by a default calibration run.
pub const DEFAULT_SAMPLES: u16 = 60;
/// Wait between calibration samples.
pub const DEFAULT_INTERVAL_MS: u32 = 10;

/// Per-axis gyro offset in dps.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GyroBias {
    offset: [f32; 3],
}

impl GyroBias {
    /// No correction.
    pub const ZERO: GyroBias = GyroBias { offset: [0.0; 3] };

    pub fn new(offset: [f32; 3]) -> Self {
        Self { offset }
    }

    #[inline]
    pub fn offset(&self) -> [f32; 3] {
        self.offset
    }

    /// Subtract the bias from a rate reading.
    #[inline]
    pub fn correct(&self, rate: [f32; 3]) -> [f32; 3] {
        [
            rate[0] - self.offset[0],
            rate[1] - self.offset[1],
            rate[2] - self.offset[2],
        ]
    }
}

/// Result of a calibration run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Calibration {
    pub bias: GyroBias,
    /// Reads that succeeded and were accumulated.
    pub accepted: u16,
    /// Reads attempted (always the requested sample count).
    pub attempted: u16,
}

/// Estimate gyro bias from `samples` stationary reads spaced `interval_ms` apart.
///
/// A zero sample count yields [`GyroBias::ZERO`] without touching the bus.
pub fn calibrate_gyro<B, D>(
    imu: &mut Lsm6ds,
    bus: &mut B,
    delay: &mut D,
    samples: u16,
    interval_ms: u32,
) -> Calibration
where
    B: I2c,
    D: DelayNs,
{
    let mut sum = [0.0f32; 3];
    let mut accepted = 0u16;

    for _ in 0..samples {
        if let Ok(rate) = imu.read_gyro_dps(bus) {
            sum[0] += rate[0];
            sum[1] += rate[1];
            sum[2] += rate[2];
            accepted += 1;
        }
        delay.delay_ms(interval_ms);
    }

    let bias = if samples == 0 {
        GyroBias::ZERO
    } else {
        let n = samples as f32;
        GyroBias::new([sum[0] / n, sum[1] / n, sum[2] / n])
    };

    Calibration {
        bias,
        accepted,
        attempted: samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::lsm6ds::ImuConfig;
    use crate::mock::{MockI2c, VirtualClock};
    use embedded_hal::i2c::ErrorKind;

    /// Raw LSB for a rate at ±250 dps.
    fn lsb(dps: f32) -> i16 {
        (dps / 8.75e-3).round() as i16
    }

    fn queue_gyro(bus: &mut MockI2c, dps: [f32; 3]) {
        let [x, y, z] = dps.map(lsb);
        let (x, y, z) = (x.to_le_bytes(), y.to_le_bytes(), z.to_le_bytes());
        bus.queue_read(&[x[0], x[1], y[0], y[1], z[0], z[1]]);
    }

    #[test]
    fn recovers_known_bias_from_noisy_samples() {
        let truth = [1.5f32, -0.8, 0.25];
        // Deterministic zero-mean noise, ±0.3 dps.
        let noise = [0.3f32, -0.3, 0.1, -0.1, 0.2, -0.2];

        let mut bus = MockI2c::new();
        for i in 0..60 {
            let n = noise[i % noise.len()];
            queue_gyro(&mut bus, [truth[0] + n, truth[1] - n, truth[2] + n]);
        }
        let mut clock = VirtualClock::new();
        let mut imu = Lsm6ds::new(ImuConfig::default());

        let cal = calibrate_gyro(&mut imu, &mut bus, &mut clock, 60, 10);

        assert_eq!(cal.accepted, 60);
        assert_eq!(cal.attempted, 60);
        // One LSB of quantization plus noise residue.
        for (est, b) in cal.bias.offset().iter().zip(truth) {
            assert!((est - b).abs() < 0.01, "estimated {} for {}", est, b);
        }
        assert_eq!(clock.elapsed_ms(), 600);
    }

    #[test]
    fn failed_reads_are_skipped_but_still_waited() {
        let mut bus = MockI2c::new();
        for i in 0..60 {
            if i % 3 == 0 {
                bus.queue_failure(ErrorKind::Bus);
            } else {
                queue_gyro(&mut bus, [3.0, 3.0, 3.0]);
            }
        }
        let mut clock = VirtualClock::new();
        let mut imu = Lsm6ds::new(ImuConfig::default());

        let cal = calibrate_gyro(&mut imu, &mut bus, &mut clock, 60, 10);

        assert_eq!(cal.accepted, 40);
        assert_eq!(clock.delays_ms().len(), 60);
        // Sum of 40 good reads over 60 attempts.
        let expected = lsb(3.0) as f32 * 8.75e-3 * 40.0 / 60.0;
        assert!((cal.bias.offset()[0] - expected).abs() < 1e-4);
    }

    #[test]
    fn dead_bus_yields_zero_bias_in_bounded_time() {
        let mut bus = MockI2c::new();
        bus.fail_always(ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Address,
        ));
        let mut clock = VirtualClock::new();
        let mut imu = Lsm6ds::new(ImuConfig::default());

        let cal = calibrate_gyro(&mut imu, &mut bus, &mut clock, 60, 10);

        assert_eq!(cal.bias, GyroBias::ZERO);
        assert_eq!(cal.accepted, 0);
        assert_eq!(clock.elapsed_ms(), 600);
    }

    #[test]
    fn zero_samples_is_a_no_op() {
        let mut bus = MockI2c::new();
        let mut clock = VirtualClock::new();
        let mut imu = Lsm6ds::new(ImuConfig::default());

        let cal = calibrate_gyro(&mut imu, &mut bus, &mut clock, 0, 10);

        assert_eq!(cal.bias, GyroBias::ZERO);
        assert!(bus.ops().is_empty());
        assert_eq!(clock.elapsed_ms(), 0);
    }

    #[test]
    fn correction_subtracts_offset() {
        let bias = GyroBias::new([1.0, -2.0, 0.5]);
        assert_eq!(bias.correct([1.0, 1.0, 1.0]), [0.0, 3.0, 0.5]);
        assert_eq!(GyroBias::ZERO.correct([4.0, 5.0, 6.0]), [4.0, 5.0, 6.0]);
    }
}
