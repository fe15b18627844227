// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 stabilizer board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpioe, Alternate, Floating, Input, OpenDrain},
    pac,
    prelude::*,
};

pub type ImuScl = gpiob::PB8<Alternate<4, OpenDrain>>;
pub type ImuSda = gpiob::PB9<Alternate<4, OpenDrain>>;

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub i2c1: I2c1Pins,
    pub spi4: Spi4Pins,
    pub fpga: FpgaPins,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// I2C1 to the LSM6DS (SA0 tied low)
pub struct I2c1Pins {
    pub scl: ImuScl,
    pub sda: ImuSda,
}

/// SPI4 SCK/MISO/MOSI to the FPGA
pub struct Spi4Pins {
    pub sck: gpioe::PE12<Alternate<5>>,
    pub miso: gpioe::PE13<Alternate<5>>,
    pub mosi: gpioe::PE14<Alternate<5>>,
}

/// FPGA sideband
pub struct FpgaPins {
    /// Chip select of the servo command port. Left unconfigured; `ChipSelect` drives it.
    pub cs: gpioe::PE4<Input<Floating>>,
    /// CDONE, high once the fabric has loaded its image.
    pub cdone: gpioe::PE5<Input<Floating>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioe = gpioe.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            spi4: Spi4Pins {
                sck: gpioe.pe12.into_alternate::<5>(),
                miso: gpioe.pe13.into_alternate::<5>(),
                mosi: gpioe.pe14.into_alternate::<5>(),
            },

            fpga: FpgaPins {
                cs: gpioe.pe4.into_floating_input(),
                cdone: gpioe.pe5.into_floating_input(),
            },
        }
    }
}
