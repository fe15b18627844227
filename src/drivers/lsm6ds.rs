//! ST LSM6DS3-family 6-axis IMU (accelerometer + gyroscope) over I2C.
//!
//! This module handles register access, the init protocol, and raw → physical conversion. The I2C
//! bus is not owned here and must be passed in as `&mut` so that the caller controls every
//! transaction on the bus.
//!
//! Each axis triple is read as one register-address write followed by a 6-byte read with a
//! repeated start (`I2c::write_read`), so nothing can interleave between the two phases. With
//! block data update enabled, the output registers are frozen until both bytes of every axis have
//! been read, which prevents torn samples.

use embedded_hal::{
    delay::DelayNs,
    i2c::{Error as _, ErrorKind, I2c},
};

use crate::control::calibration::GyroBias;
use crate::error::InitFault;

/// I2C address with SDO/SA0 tied low.
pub const ADDR_SA0_LOW: u8 = 0x6A;
/// I2C address with SDO/SA0 tied high.
pub const ADDR_SA0_HIGH: u8 = 0x6B;

/// `WHO_AM_I` values of the parts this driver supports.
pub const KNOWN_IDS: [u8; 3] = [
    0x69, // LSM6DS3
    0x6A, // LSM6DS3TR-C / LSM6DSL
    0x6C, // LSM6DSO
];

/// Reset latency before the part accepts configuration again.
pub const RESET_DELAY_MS: u32 = 20;
/// Settling time after each configuration write.
pub const SETTLE_DELAY_MS: u32 = 10;

// Register addresses
pub mod reg {
    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL1_XL: u8 = 0x10;
    pub const CTRL2_G: u8 = 0x11;
    pub const CTRL3_C: u8 = 0x12;
    pub const OUTX_L_G: u8 = 0x22;
    pub const OUTX_L_XL: u8 = 0x28;
}

/// CTRL3_C bits
pub mod ctrl3 {
    /// Block data update.
    pub const BDU: u8 = 1 << 6;
    /// Register address auto-increment on multi-byte access.
    pub const IF_INC: u8 = 1 << 2;
    /// Software reset, self-clearing.
    pub const SW_RESET: u8 = 1 << 0;
}

/// Output data rate, shared by both sub-sensors. Encoded in bits 7:4 of CTRL1_XL / CTRL2_G.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputDataRate {
    Hz12_5 = 0b0001,
    Hz26 = 0b0010,
    Hz52 = 0b0011,
    Hz104 = 0b0100,
    Hz208 = 0b0101,
    Hz416 = 0b0110,
}

/// Accelerometer full scale. Encoded in bits 3:2 of CTRL1_XL.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccelRange {
    G2,
    G4,
    G8,
    G16,
}

impl AccelRange {
    fn bits(self) -> u8 {
        match self {
            AccelRange::G2 => 0b00,
            AccelRange::G16 => 0b01,
            AccelRange::G4 => 0b10,
            AccelRange::G8 => 0b11,
        }
    }

    /// Sensitivity in g/LSB.
    pub fn sensitivity(self) -> f32 {
        match self {
            AccelRange::G2 => 0.061e-3,
            AccelRange::G4 => 0.122e-3,
            AccelRange::G8 => 0.244e-3,
            AccelRange::G16 => 0.488e-3,
        }
    }
}

/// Gyroscope full scale. Encoded in bits 3:1 of CTRL2_G (bit 1 selects ±125 dps).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GyroRange {
    Dps125,
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    fn bits(self) -> u8 {
        match self {
            GyroRange::Dps125 => 0b001,
            GyroRange::Dps250 => 0b000,
            GyroRange::Dps500 => 0b010,
            GyroRange::Dps1000 => 0b100,
            GyroRange::Dps2000 => 0b110,
        }
    }

    /// Sensitivity in dps/LSB.
    pub fn sensitivity(self) -> f32 {
        match self {
            GyroRange::Dps125 => 4.375e-3,
            GyroRange::Dps250 => 8.75e-3,
            GyroRange::Dps500 => 17.5e-3,
            GyroRange::Dps1000 => 35.0e-3,
            GyroRange::Dps2000 => 70.0e-3,
        }
    }
}

/// Sensor operating mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImuConfig {
    pub address: u8,
    pub odr: OutputDataRate,
    pub accel_range: AccelRange,
    pub gyro_range: GyroRange,
}

impl Default for ImuConfig {
    fn default() -> Self {
        Self {
            address: ADDR_SA0_LOW,
            odr: OutputDataRate::Hz104,
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps250,
        }
    }
}

impl ImuConfig {
    /// CTRL1_XL value: ODR + accel full scale.
    pub fn ctrl1_xl(&self) -> u8 {
        ((self.odr as u8) << 4) | (self.accel_range.bits() << 2)
    }

    /// CTRL2_G value: ODR + gyro full scale.
    pub fn ctrl2_g(&self) -> u8 {
        ((self.odr as u8) << 4) | (self.gyro_range.bits() << 1)
    }
}

/// One raw axis triple as read from the output registers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawAxes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawAxes {
    /// Decode `[x_l, x_h, y_l, y_h, z_l, z_h]`.
    #[inline]
    pub fn from_le_bytes(buf: [u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([buf[0], buf[1]]),
            y: i16::from_le_bytes([buf[2], buf[3]]),
            z: i16::from_le_bytes([buf[4], buf[5]]),
        }
    }

    /// Scale each axis by `sensitivity`.
    #[inline]
    pub fn scaled(&self, sensitivity: f32) -> [f32; 3] {
        [
            self.x as f32 * sensitivity,
            self.y as f32 * sensitivity,
            self.z as f32 * sensitivity,
        ]
    }
}

/// Accelerometer (g) and bias-corrected gyroscope (dps) reading.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ImuSample {
    pub accel: [f32; 3],
    pub gyro: [f32; 3],
}

/// LSM6DS driver bound to an I2C address and operating mode.
pub struct Lsm6ds {
    config: ImuConfig,
}

impl Lsm6ds {
    pub fn new(config: ImuConfig) -> Self {
        Self { config }
    }

    /// Run the init protocol: reset, identity check, then BDU + auto-increment, gyro, and accel
    /// configuration, each followed by a settling delay. Returns the `WHO_AM_I` value.
    pub fn init<B, D>(&mut self, bus: &mut B, delay: &mut D) -> Result<u8, InitFault>
    where
        B: I2c,
        D: DelayNs,
    {
        self.write_register(bus, reg::CTRL3_C, ctrl3::SW_RESET)
            .map_err(InitFault::Bus)?;
        delay.delay_ms(RESET_DELAY_MS);

        let id = self.who_am_i(bus).map_err(InitFault::Bus)?;
        if !KNOWN_IDS.contains(&id) {
            return Err(InitFault::UnknownDevice(id));
        }

        let sequence = [
            (reg::CTRL3_C, ctrl3::BDU | ctrl3::IF_INC),
            (reg::CTRL2_G, self.config.ctrl2_g()),
            (reg::CTRL1_XL, self.config.ctrl1_xl()),
        ];
        for (addr, value) in sequence {
            self.write_register(bus, addr, value).map_err(InitFault::Bus)?;
            delay.delay_ms(SETTLE_DELAY_MS);
        }

        Ok(id)
    }

    /// Read the `WHO_AM_I` register.
    pub fn who_am_i<B: I2c>(&mut self, bus: &mut B) -> Result<u8, ErrorKind> {
        self.read_register(bus, reg::WHO_AM_I)
    }

    /// Read a single register.
    pub fn read_register<B: I2c>(&mut self, bus: &mut B, addr: u8) -> Result<u8, ErrorKind> {
        let mut buf = [0u8; 1];
        bus.write_read(self.config.address, &[addr], &mut buf)
            .map_err(|e| e.kind())?;
        Ok(buf[0])
    }

    /// Write a single register.
    pub fn write_register<B: I2c>(
        &mut self,
        bus: &mut B,
        addr: u8,
        value: u8,
    ) -> Result<(), ErrorKind> {
        bus.write(self.config.address, &[addr, value])
            .map_err(|e| e.kind())
    }

    /// Read the three axes starting at `start_register` in one transaction. No retry.
    pub fn read_axes<B: I2c>(
        &mut self,
        bus: &mut B,
        start_register: u8,
    ) -> Result<RawAxes, ErrorKind> {
        let mut buf = [0u8; 6];
        bus.write_read(self.config.address, &[start_register], &mut buf)
            .map_err(|e| e.kind())?;
        Ok(RawAxes::from_le_bytes(buf))
    }

    #[inline]
    pub fn read_accel<B: I2c>(&mut self, bus: &mut B) -> Result<RawAxes, ErrorKind> {
        self.read_axes(bus, reg::OUTX_L_XL)
    }

    #[inline]
    pub fn read_gyro<B: I2c>(&mut self, bus: &mut B) -> Result<RawAxes, ErrorKind> {
        self.read_axes(bus, reg::OUTX_L_G)
    }

    /// Gyro rate in dps, without bias correction.
    pub fn read_gyro_dps<B: I2c>(&mut self, bus: &mut B) -> Result<[f32; 3], ErrorKind> {
        let raw = self.read_gyro(bus)?;
        Ok(raw.scaled(self.config.gyro_range.sensitivity()))
    }

    /// Read accel, then gyro, and convert to physical units with `bias` removed from the gyro.
    pub fn read_sample<B: I2c>(
        &mut self,
        bus: &mut B,
        bias: &GyroBias,
    ) -> Result<ImuSample, ErrorKind> {
        let accel = self.read_accel(bus)?;
        let gyro = self.read_gyro_dps(bus)?;

        Ok(ImuSample {
            accel: accel.scaled(self.config.accel_range.sensitivity()),
            gyro: bias.correct(gyro),
        })
    }
}
