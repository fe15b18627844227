//! Firmware entry point.
//!
//! Brings up clocks and peripherals, hands them to the [`Pipeline`](tiltservo::Pipeline), and lets
//! it run. A fatal bring-up fault is reported on the debug USART and the core parks.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::convert::Infallible;
    use core::fmt::Write;

    use cortex_m_rt::entry;
    use embedded_hal::{delay::DelayNs, digital::OutputPin, i2c::I2c};
    use panic_halt as _;

    use hal::{
        i2c::{BlockingI2c, Mode as I2cMode},
        pac,
        prelude::*,
        serial::{Config, Serial},
        spi::{Mode, Phase, Polarity, Spi},
    };
    use stm32f7xx_hal as hal;

    use tiltservo::{
        drivers::{LogicDevice, ServoLink},
        hw::{BoardPins, ChipSelect, DonePin, I2cBus, SpiBus, SysDelay, Usart},
        Error, Pipeline, PipelineConfig,
    };

    /// The FPGA boots from its own flash.
    const BITSTREAM: &[u8] = &[];

    fn halt() -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }

    fn stabilize<I, S, CS, D, L, F>(
        pipeline: &mut Pipeline<I, S, CS, D, L>,
        fpga: &mut F,
    ) -> Result<Infallible, Error>
    where
        I: I2c,
        S: embedded_hal::spi::SpiBus<u8>,
        CS: OutputPin,
        D: DelayNs,
        L: Write,
        F: LogicDevice,
    {
        pipeline.bring_up(fpga, BITSTREAM)?;
        pipeline.calibrate()?;
        pipeline.run()
    }

    #[entry]
    fn main() -> ! {
        // Peripherals
        let Some(dp) = pac::Peripherals::take() else {
            halt()
        };
        let Some(cp) = cortex_m::Peripherals::take() else {
            halt()
        };

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();
        let mut apb1 = rcc.apb1;
        let mut apb2 = rcc.apb2;

        let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOE);

        // USART1 (DBG)
        let usart_cfg = Config {
            baud_rate: 115_200.bps(),
            ..Default::default()
        };
        let serial = Serial::new(
            dp.USART1,
            (pins.usart1.tx, pins.usart1.rx),
            &clocks,
            usart_cfg,
        );
        let mut usart = Usart::new(serial);
        usart.println("tiltservo: boot");

        // I2C1 (IMU)
        let i2c = BlockingI2c::i2c1(
            dp.I2C1,
            (pins.i2c1.scl, pins.i2c1.sda),
            I2cMode::fast(400.kHz()),
            &clocks,
            &mut apb1,
            10_000,
        );
        let i2c = I2cBus::new(i2c);

        // SPI4 (FPGA)
        let spi_mode = Mode {
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
        };
        let spi4 = Spi::new(dp.SPI4, (pins.spi4.sck, pins.spi4.miso, pins.spi4.mosi))
            .enable::<u8>(spi_mode, 1.MHz(), &clocks, &mut apb2);
        let spi = SpiBus::new(spi4);

        let Ok(link) = ServoLink::new(ChipSelect::active_low(pins.fpga.cs)) else {
            halt()
        };
        let mut fpga = DonePin::new(pins.fpga.cdone);

        let delay = SysDelay::new(cp.SYST, clocks.hclk().raw());

        let mut pipeline = Pipeline::new(PipelineConfig::default(), i2c, spi, link, delay, usart);

        // Only fatal errors come back.
        let _ = stabilize(&mut pipeline, &mut fpga);
        halt()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
