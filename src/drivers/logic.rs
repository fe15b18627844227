// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bring-up interface of the companion FPGA.
//!
//! How the bitstream reaches the device is board-specific. The pipeline only needs to know that
//! configuration finished and the fabric is running before the first servo frame is sent.

/// An FPGA (or CPLD) that must be configured before it accepts servo frames.
pub trait LogicDevice {
    type Error;

    /// Load `image` and start the fabric. Returns once the device reports it is running.
    fn configure(&mut self, image: &[u8]) -> Result<(), Self::Error>;
}
