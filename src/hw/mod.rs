//! # Board Support
//!
//! MCU-level wrappers around the STM32F7 HAL, each exposing the `embedded-hal` 1.0 trait the
//! drivers are written against.

pub mod delay;
pub mod i2c;
pub mod logic;
pub mod pins;
pub mod spi;
pub mod usart;

pub use delay::SysDelay;
pub use i2c::I2cBus;
pub use logic::DonePin;
pub use pins::BoardPins;
pub use spi::{ChipSelect, SpiBus};
pub use usart::Usart;
