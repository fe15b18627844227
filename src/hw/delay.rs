//! SysTick busy-wait delay behind the `embedded-hal` 1.0 [`DelayNs`] trait.

use embedded_hal::delay::DelayNs;

pub struct SysDelay {
    delay: cortex_m::delay::Delay,
}

impl SysDelay {
    /// `ahb_hz` is the core clock feeding SysTick.
    pub fn new(syst: cortex_m::peripheral::SYST, ahb_hz: u32) -> Self {
        Self {
            delay: cortex_m::delay::Delay::new(syst, ahb_hz),
        }
    }

    pub fn free(self) -> cortex_m::peripheral::SYST {
        self.delay.free()
    }
}

impl DelayNs for SysDelay {
    /// Rounded up to whole microseconds.
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
