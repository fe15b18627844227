// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) abstraction layer.
//!
//! - `SpiBus` wraps a configured HAL SPI instance with 8-bit words and exposes it through the
//!   `embedded-hal` 1.0 [`SpiBus`](embedded_hal::spi::SpiBus) trait used by the drivers.
//! - `ChipSelect` is an active-low GPIO output wrapper for manual CS control.

use core::convert::Infallible;

use embedded_hal::{digital, spi as ehal_spi};
use stm32f7xx_hal::{
    gpio::{self, Output, PinState, PushPull},
    prelude::*,
    spi::{self, Enabled, Spi},
};

/// HAL SPI error, kept for diagnostics.
#[derive(Debug)]
pub struct SpiFault(pub spi::Error);

impl ehal_spi::Error for SpiFault {
    fn kind(&self) -> ehal_spi::ErrorKind {
        use ehal_spi::ErrorKind;

        match self.0 {
            spi::Error::Overrun => ErrorKind::Overrun,
            spi::Error::ModeFault => ErrorKind::ModeFault,
            spi::Error::FrameFormat => ErrorKind::FrameFormat,
            _ => ErrorKind::Other,
        }
    }
}

/// Wrapper around an enabled HAL SPI instance (8-bit words).
pub struct SpiBus<I, P> {
    spi: Spi<I, P, Enabled<u8>>,
}

impl<I, P> SpiBus<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    pub fn new(spi: Spi<I, P, Enabled<u8>>) -> Self {
        Self { spi }
    }

    /// Perform a blocking, full-duplex transfer of one byte.
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8, SpiFault> {
        let mut tmp = [byte];
        self.spi.transfer(&mut tmp).map_err(SpiFault)?;
        Ok(tmp[0])
    }

    pub fn free(self) -> Spi<I, P, Enabled<u8>> {
        self.spi
    }
}

impl<I, P> ehal_spi::ErrorType for SpiBus<I, P> {
    type Error = SpiFault;
}

impl<I, P> ehal_spi::SpiBus<u8> for SpiBus<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    fn read(&mut self, words: &mut [u8]) -> Result<(), SpiFault> {
        for w in words.iter_mut() {
            *w = self.transfer_byte(0x00)?;
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), SpiFault> {
        for &w in words {
            self.transfer_byte(w)?;
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), SpiFault> {
        let n = read.len().max(write.len());
        for i in 0..n {
            let out = write.get(i).copied().unwrap_or(0x00);
            let rx = self.transfer_byte(out)?;
            if let Some(slot) = read.get_mut(i) {
                *slot = rx;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), SpiFault> {
        for w in words.iter_mut() {
            *w = self.transfer_byte(*w)?;
        }
        Ok(())
    }

    /// Every byte is clocked out synchronously by `transfer_byte`.
    fn flush(&mut self) -> Result<(), SpiFault> {
        Ok(())
    }
}

/// Manual chip-select line, active-low, generic over any GPIO pin.
pub struct ChipSelect<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> ChipSelect<P, N> {
    /// Create an active-low chip select and set to the inactive state (i.e., high).
    pub fn active_low<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_state(PinState::High);
        Self { pin }
    }

    /// Assert the chip select.
    #[inline]
    pub fn select(&mut self) {
        self.pin.set_low();
    }

    /// Deassert the chip select.
    #[inline]
    pub fn deselect(&mut self) {
        self.pin.set_high();
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> digital::ErrorType for ChipSelect<P, N> {
    type Error = Infallible;
}

/// Logical levels: low selects the FPGA.
impl<const P: char, const N: u8> digital::OutputPin for ChipSelect<P, N> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.select();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.deselect();
        Ok(())
    }
}
