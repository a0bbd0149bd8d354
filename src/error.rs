//! Error handling primitives for the BMP2 driver and monitor.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Status reported for a successful operation.
pub const STATUS_OK: i8 = 0;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// A register burst was empty or longer than the device accepts.
    InvalidLength,
    /// The chip id read back does not belong to a BMP280.
    DeviceNotFound,
    /// The raw temperature ADC value is outside the valid conversion range.
    UncompensatedTemperature,
    /// The raw pressure ADC value is outside the valid conversion range.
    UncompensatedPressure,
    /// Both raw ADC values are outside the valid conversion range.
    UncompensatedTemperatureAndPressure,
}

impl<E> Error<E> {
    /// Flat signed status code shown to the user; never zero.
    pub const fn code(&self) -> i8 {
        match self {
            Self::Interface(_) => -2,
            Self::InvalidLength => -3,
            Self::DeviceNotFound => -4,
            Self::UncompensatedTemperature => -5,
            Self::UncompensatedPressure => -6,
            Self::UncompensatedTemperatureAndPressure => -7,
        }
    }
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}

/// Collapses a result into the flat status convention: `0` or the error code.
pub fn status<T, E>(result: &Result<T, E>) -> i8 {
    match result {
        Ok(_) => STATUS_OK,
        Err(err) => err.code(),
    }
}
