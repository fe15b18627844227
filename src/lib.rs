// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # TiltServo Firmware
//!
//! This crate contains the firmware for the TiltServo stabilizer: an STM32F777 samples a 6-axis
//! IMU over I2C, fuses the readings into roll/pitch, maps them onto servo angles, and streams
//! fixed-width command frames over SPI to a companion FPGA that generates the servo pulses.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around USART, SPI, I2C, delays (target builds only) |
//! | [`drivers`] | Device-level drivers (LSM6DS IMU, FPGA servo link) |
//! | [`control`]   | Estimation and mapping (calibration, complementary filter, servo mapping) |
//! | [`protocol`] | Wire format of the FPGA command frame |
//! | [`pipeline`] | The sample → fuse → map → frame cycle and its state machine |
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Run the host-side tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pipeline;
pub mod protocol;

#[cfg(target_os = "none")]
pub mod hw;

#[cfg(test)]
pub(crate) mod mock;

pub use config::PipelineConfig;
pub use error::Error;
pub use pipeline::{Phase, Pipeline, Quiet};
