// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Estimation and Mapping
//!
//! Reusable building blocks between the IMU driver and the servo link. Nothing here touches a
//! bus directly except the calibration stage, which borrows one for its sampling loop.
//!
//! ## Modules
//!
//! - [`calibration`] - Gyroscope zero-rate bias estimation.
//! - [`complementary`] - Roll/pitch complementary filter.
//! - [`mapping`] - Angle to servo command mapping with per-axis inversion.

pub mod calibration;
pub mod complementary;
pub mod mapping;

pub use calibration::{calibrate_gyro, Calibration, GyroBias};
pub use complementary::{ComplementaryFilter, Orientation};
pub use mapping::{map_angle, AngleSource, AxisMap, ServoCommand};
