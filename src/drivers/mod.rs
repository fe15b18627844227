// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the bus layer (`embedded-hal`
//! traits, implemented for the board in `hw/`) and below the pipeline.
//!
//! ## Existing drivers
//!
//! - [`lsm6ds`] – ST LSM6DS3-family 6-axis IMU over I2C
//! - [`servo_link`] – chip-select framed SPI link to the FPGA servo controller
//! - [`logic`] – bring-up interface of the FPGA

pub mod logic;
pub mod lsm6ds;
pub mod servo_link;

pub use logic::LogicDevice;
pub use lsm6ds::Lsm6ds;
pub use servo_link::ServoLink;
