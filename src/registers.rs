//! Register map definitions for the BMP280 barometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{Filter, OutputDataRate, Oversampling};

/// Register address of the first calibration coefficient (`dig_T1` LSB).
pub const REG_CALIB_START: u8 = 0x88;
/// Register address of `CHIP_ID`.
pub const REG_CHIP_ID: u8 = 0xD0;
/// Register address of `RESET`.
pub const REG_RESET: u8 = 0xE0;
/// Register address of `STATUS`.
pub const REG_STATUS: u8 = 0xF3;
/// Register address of `CTRL_MEAS`.
pub const REG_CTRL_MEAS: u8 = 0xF4;
/// Register address of `CONFIG`.
pub const REG_CONFIG: u8 = 0xF5;
/// Register address of `PRESS_MSB`, first byte of the data burst.
pub const REG_PRESS_MSB: u8 = 0xF7;

/// Number of calibration bytes starting at [`REG_CALIB_START`].
pub const CALIB_DATA_LEN: usize = 24;
/// Pressure and temperature ADC bytes starting at [`REG_PRESS_MSB`].
pub const SENSOR_DATA_LEN: usize = 6;
/// Chip ids reported by BMP280 engineering samples and production parts.
pub const CHIP_IDS: [u8; 3] = [0x56, 0x57, 0x58];
/// Soft reset command value written to the `RESET` register.
pub const RESET_COMMAND: u8 = 0xB6;

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
}

/// Bitfield representation of the `STATUS` register (address `0xF3`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // NVM data being copied to image registers (bit 0).
    pub im_update: bool,
    #[skip]
    __: B2,
    // Conversion running (bit 3).
    pub measuring: bool,
    #[skip]
    __: B4,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CTRL_MEAS` register (address `0xF4`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlMeas {
    // Power mode bits (1:0), decoded through `PowerMode::from_bits`.
    pub mode: B2,
    // Pressure oversampling (bits 4:2).
    pub osrs_p: Oversampling,
    // Temperature oversampling (bits 7:5).
    pub osrs_t: Oversampling,
}

impl From<u8> for CtrlMeas {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlMeas> for u8 {
    fn from(value: CtrlMeas) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CONFIG` register (address `0xF5`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRegister {
    // 3-wire SPI enable (bit 0).
    pub spi3w_en: bool,
    #[skip]
    __: B1,
    // IIR filter coefficient (bits 4:2).
    pub filter: Filter,
    // Standby time (bits 7:5).
    pub t_sb: OutputDataRate,
}

impl From<u8> for ConfigRegister {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<ConfigRegister> for u8 {
    fn from(value: ConfigRegister) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for Status {
    const ADDRESS: u8 = REG_STATUS;
}

impl Register for CtrlMeas {
    const ADDRESS: u8 = REG_CTRL_MEAS;
}

impl Register for ConfigRegister {
    const ADDRESS: u8 = REG_CONFIG;
}
