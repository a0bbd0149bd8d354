//! Strongly typed parameter enumerations for the BMP2 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the driver APIs.
//!
//! # Examples
//!
//! ```rust
//! use bmp2_monitor::params::{Filter, OutputDataRate, OversamplingMode};
//!
//! let os_mode = OversamplingMode::HighResolution;
//! let filter = Filter::Coeff16;
//! let odr = OutputDataRate::Ms250;
//! let _ = (os_mode, filter, odr);
//! ```

use modular_bitfield::prelude::Specifier;

/// Per-channel oversampling encoded in `CTRL_MEAS.OSRS_T` / `CTRL_MEAS.OSRS_P`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum Oversampling {
    /// Measurement skipped.
    Skipped = 0b000,
    /// Oversampling x1.
    X1 = 0b001,
    /// Oversampling x2.
    X2 = 0b010,
    /// Oversampling x4.
    X4 = 0b011,
    /// Oversampling x8.
    X8 = 0b100,
    /// Oversampling x16.
    X16 = 0b101,
}

/// Datasheet oversampling presets covering both channels at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OversamplingMode {
    /// Temperature x1, pressure x1.
    UltraLowPower,
    /// Temperature x1, pressure x2.
    LowPower,
    /// Temperature x1, pressure x4.
    StandardResolution,
    /// Temperature x1, pressure x8.
    HighResolution,
    /// Temperature x2, pressure x16.
    UltraHighResolution,
}

impl OversamplingMode {
    /// Returns the `(temperature, pressure)` oversampling pair of the preset.
    pub const fn settings(self) -> (Oversampling, Oversampling) {
        match self {
            Self::UltraLowPower => (Oversampling::X1, Oversampling::X1),
            Self::LowPower => (Oversampling::X1, Oversampling::X2),
            Self::StandardResolution => (Oversampling::X1, Oversampling::X4),
            Self::HighResolution => (Oversampling::X1, Oversampling::X8),
            Self::UltraHighResolution => (Oversampling::X2, Oversampling::X16),
        }
    }
}

/// IIR filter coefficient encoded in `CONFIG.FILTER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum Filter {
    /// Filter disabled.
    Off = 0b000,
    /// Coefficient 2.
    Coeff2 = 0b001,
    /// Coefficient 4.
    Coeff4 = 0b010,
    /// Coefficient 8.
    Coeff8 = 0b011,
    /// Coefficient 16.
    Coeff16 = 0b100,
}

/// Standby time between normal-mode conversions (`CONFIG.T_SB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum OutputDataRate {
    /// 0.5 ms standby.
    Ms0_5 = 0b000,
    /// 62.5 ms standby.
    Ms62_5 = 0b001,
    /// 125 ms standby.
    Ms125 = 0b010,
    /// 250 ms standby.
    Ms250 = 0b011,
    /// 500 ms standby.
    Ms500 = 0b100,
    /// 1 s standby.
    Ms1000 = 0b101,
    /// 2 s standby.
    Ms2000 = 0b110,
    /// 4 s standby.
    Ms4000 = 0b111,
}

/// Power modes encoded in `CTRL_MEAS.MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerMode {
    /// No conversions; registers stay accessible.
    Sleep = 0b00,
    /// One conversion, then back to sleep.
    Forced = 0b01,
    /// Continuous conversions separated by the standby time.
    Normal = 0b11,
}

impl PowerMode {
    /// Decodes the two mode bits; `0b01` and `0b10` both select forced mode.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Sleep,
            0b11 => Self::Normal,
            _ => Self::Forced,
        }
    }

    /// Returns the register encoding of the mode.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}
