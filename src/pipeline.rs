//! Fixed-period stabilizer loop: sample → fuse → map → frame.
//!
//! The pipeline owns both buses, the delay provider, and the diagnostic sink, and lends the buses
//! to the drivers one transaction at a time. All bus traffic is therefore strictly sequential.
//!
//! ```text
//! Init ──bring_up()──▶ Calibrating ──calibrate() / skip_calibration()──▶ Running ──tick()──┐
//!                                                                          ▲              │
//!                                                                          └──────────────┘
//! ```
//!
//! Typical usage pattern:
//!
//! ```ignore
//! pipeline.bring_up(&mut fpga, BITSTREAM)?;
//! pipeline.calibrate()?;
//!
//! loop {
//!     let _ = pipeline.tick();
//! }
//! ```
//!
//! A cycle that fails on the IMU read or on the servo link is dropped: no frame goes out, the
//! orientation estimate keeps its previous value, and the next cycle starts after the fault delay.
//! The new estimate is committed only once its frame has been sent.

use core::convert::Infallible;
use core::fmt::Write;

use embedded_hal::{delay::DelayNs, digital::OutputPin, i2c::I2c, spi::SpiBus};

use crate::config::PipelineConfig;
use crate::control::calibration::{calibrate_gyro, Calibration, GyroBias};
use crate::control::complementary::{ComplementaryFilter, Orientation};
use crate::control::mapping::ServoCommand;
use crate::drivers::{lsm6ds::ImuSample, LogicDevice, Lsm6ds, ServoLink};
use crate::error::{Error, InitFault};
use crate::protocol::Frame;

/// Lifecycle of the pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Buses handed over, nothing configured yet.
    Init,
    /// FPGA and IMU configured; gyro bias not decided yet.
    Calibrating,
    /// Cycling.
    Running,
}

/// Outcome of one successful cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub sample: ImuSample,
    pub orientation: Orientation,
    /// Commands in frame order; entries past the format's axis count are unused.
    pub commands: [ServoCommand; 2],
    pub frame: Frame,
}

/// Running counters for diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u32,
    pub bus_faults: u32,
    pub transport_faults: u32,
}

/// Diagnostic sink that drops everything.
pub struct Quiet;

impl Write for Quiet {
    fn write_str(&mut self, _s: &str) -> core::fmt::Result {
        Ok(())
    }
}

/// The stabilizer.
///
/// - `I`: I2C bus to the IMU
/// - `S`: SPI bus to the FPGA
/// - `CS`: FPGA chip-select line
/// - `D`: delay provider (SysTick on the board, a virtual clock in tests)
/// - `L`: diagnostic sink, e.g. the debug USART
pub struct Pipeline<I, S, CS, D, L> {
    i2c: I,
    spi: S,
    link: ServoLink<CS>,
    delay: D,
    log: L,

    config: PipelineConfig,
    imu: Lsm6ds,
    filter: ComplementaryFilter,
    phase: Phase,
    bias: GyroBias,

    /// The only state carried from one cycle to the next.
    orientation: Orientation,
    stats: CycleStats,
}

impl<I, S, CS, D, L> Pipeline<I, S, CS, D, L>
where
    I: I2c,
    S: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
    L: Write,
{
    pub fn new(
        config: PipelineConfig,
        i2c: I,
        spi: S,
        link: ServoLink<CS>,
        delay: D,
        log: L,
    ) -> Self {
        Self {
            i2c,
            spi,
            link,
            delay,
            log,
            imu: Lsm6ds::new(config.imu),
            filter: ComplementaryFilter::new(config.alpha),
            config,
            phase: Phase::Init,
            bias: GyroBias::ZERO,
            orientation: Orientation::LEVEL,
            stats: CycleStats::default(),
        }
    }

    /// Configure the FPGA with `image`, then run the IMU init protocol.
    ///
    /// Any failure here is fatal.
    pub fn bring_up<F>(&mut self, logic: &mut F, image: &[u8]) -> Result<(), Error>
    where
        F: LogicDevice,
    {
        if logic.configure(image).is_err() {
            let _ = writeln!(self.log, "fpga: configuration failed\r");
            return Err(Error::Initialization(InitFault::Logic));
        }
        let _ = writeln!(self.log, "fpga: configured ({} bytes)\r", image.len());

        match self.imu.init(&mut self.i2c, &mut self.delay) {
            Ok(id) => {
                let _ = writeln!(self.log, "imu: ready (WHO_AM_I = 0x{:02X})\r", id);
            }
            Err(fault) => {
                let _ = writeln!(self.log, "imu: {}\r", fault);
                return Err(Error::Initialization(fault));
            }
        }

        self.phase = Phase::Calibrating;
        Ok(())
    }

    /// Estimate the gyro bias. The board must be still. Always ends in [`Phase::Running`].
    ///
    /// Only valid right after bring-up; the bias is fixed once cycling starts.
    pub fn calibrate(&mut self) -> Result<Calibration, Error> {
        if self.phase != Phase::Calibrating {
            return Err(Error::Initialization(InitFault::NotReady));
        }

        let cal = calibrate_gyro(
            &mut self.imu,
            &mut self.i2c,
            &mut self.delay,
            self.config.calibration_samples,
            self.config.calibration_interval_ms,
        );
        let [x, y, z] = cal.bias.offset();
        let _ = writeln!(
            self.log,
            "calibration: {}/{} samples, bias = ({:.3}, {:.3}, {:.3}) dps\r",
            cal.accepted, cal.attempted, x, y, z
        );

        self.bias = cal.bias;
        self.phase = Phase::Running;
        Ok(cal)
    }

    /// Start cycling with zero gyro bias.
    pub fn skip_calibration(&mut self) -> Result<(), Error> {
        if self.phase != Phase::Calibrating {
            return Err(Error::Initialization(InitFault::NotReady));
        }
        self.bias = GyroBias::ZERO;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Run one cycle without the trailing delay.
    ///
    /// On error nothing is transmitted (or the frame failed on the wire) and the orientation is
    /// unchanged.
    pub fn step(&mut self) -> Result<CycleReport, Error> {
        if self.phase != Phase::Running {
            return Err(Error::Initialization(InitFault::NotReady));
        }

        let sample = self
            .imu
            .read_sample(&mut self.i2c, &self.bias)
            .map_err(Error::Bus)?;

        let next = self.filter.next(&self.orientation, &sample);

        let axes = self.config.active_axes();
        let mut commands = [ServoCommand::CENTER; 2];
        for (cmd, axis) in commands.iter_mut().zip(axes) {
            *cmd = axis.command(&next);
        }

        let frame = self.config.frame_format.encode(&commands[..axes.len()])?;
        self.link
            .send(&mut self.spi, &frame)
            .map_err(Error::Transport)?;

        self.orientation = next;
        self.stats.cycles = self.stats.cycles.wrapping_add(1);

        Ok(CycleReport {
            sample,
            orientation: next,
            commands,
            frame,
        })
    }

    /// Run one cycle, report any failure, and wait out the period (or the fault delay).
    pub fn tick(&mut self) -> Result<CycleReport, Error> {
        let result = self.step();

        match &result {
            Ok(_) => self.delay.delay_ms(self.config.period_ms),
            Err(e) if e.is_fatal() => {}
            Err(e) => {
                match e {
                    Error::Bus(_) => self.stats.bus_faults = self.stats.bus_faults.wrapping_add(1),
                    _ => {
                        self.stats.transport_faults = self.stats.transport_faults.wrapping_add(1)
                    }
                }
                let _ = writeln!(self.log, "cycle dropped: {}\r", e);
                self.delay.delay_ms(self.config.fault_delay_ms);
            }
        }

        result
    }

    /// Cycle until a fatal error. Recoverable errors never end the loop.
    pub fn run(&mut self) -> Result<Infallible, Error> {
        loop {
            if let Err(e) = self.tick() {
                if e.is_fatal() {
                    return Err(e);
                }
            }
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn bias(&self) -> GyroBias {
        self.bias
    }

    #[inline]
    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Access the diagnostic sink.
    #[inline]
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Mutable access to the IMU bus, e.g. for fault injection in bench tests.
    #[inline]
    pub fn i2c_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    /// Mutable access to the FPGA bus.
    #[inline]
    pub fn spi_mut(&mut self) -> &mut S {
        &mut self.spi
    }

    /// Access the delay provider.
    #[inline]
    pub fn delay(&self) -> &D {
        &self.delay
    }
}
