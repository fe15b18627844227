//! FPGA bring-up on this board.
//!
//! The FPGA boots from its own configuration flash, so the MCU never streams a bitstream. Bring-up
//! reduces to checking that CDONE is high before the first servo frame goes out.

use stm32f7xx_hal::gpio::{self, Floating, Input};

use crate::drivers::LogicDevice;

/// CDONE stayed low.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NotConfigured;

pub struct DonePin<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Input<Floating>>,
}

impl<const P: char, const N: u8> DonePin<P, N> {
    pub fn new(pin: gpio::Pin<P, N, Input<Floating>>) -> Self {
        Self { pin }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.pin.is_high()
    }
}

impl<const P: char, const N: u8> LogicDevice for DonePin<P, N> {
    type Error = NotConfigured;

    /// `image` is unused; the fabric loads from flash.
    fn configure(&mut self, _image: &[u8]) -> Result<(), NotConfigured> {
        if self.is_done() {
            Ok(())
        } else {
            Err(NotConfigured)
        }
    }
}
