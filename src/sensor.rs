//! The sensor operations the monitor relies on.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::Config;
use crate::device::{Bmp2, Measurement};
use crate::error::Result;
use crate::interface::i2c::{I2cInterface, InterfaceError};
use crate::params::PowerMode;

/// A barometer reachable at a selectable bus address.
///
/// Every fallible operation reports through the crate [`Error`](crate::Error),
/// whose [`code`](crate::Error::code) is what ends up on the display.
pub trait Sensor {
    /// Error type of the bus underneath the sensor.
    type BusError;

    /// Points subsequent operations at another 8-bit bus address.
    fn set_bus_address(&mut self, address: u8);

    /// Identifies the device and loads its calibration.
    fn init(&mut self) -> Result<(), Self::BusError>;

    /// Resets the device.
    fn soft_reset(&mut self) -> Result<(), Self::BusError>;

    /// Applies oversampling, filter and output data rate.
    fn set_config(&mut self, config: &Config) -> Result<(), Self::BusError>;

    /// Applies `config` and enters `mode`.
    fn set_power_mode(&mut self, mode: PowerMode, config: &Config) -> Result<(), Self::BusError>;

    /// Reads back the active power mode.
    fn power_mode(&mut self) -> Result<PowerMode, Self::BusError>;

    /// Reads raw registers starting at `register`.
    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::BusError>;

    /// Fetches one compensated measurement.
    fn sensor_data(&mut self) -> Result<Measurement, Self::BusError>;
}

impl<I2C, D> Sensor for Bmp2<I2cInterface<I2C, D>>
where
    I2C: I2c,
    D: DelayNs,
{
    type BusError = InterfaceError<I2C::Error>;

    fn set_bus_address(&mut self, address: u8) {
        self.interface_mut().set_address(address);
    }

    fn init(&mut self) -> Result<(), Self::BusError> {
        Bmp2::init(self)
    }

    fn soft_reset(&mut self) -> Result<(), Self::BusError> {
        Bmp2::soft_reset(self)
    }

    fn set_config(&mut self, config: &Config) -> Result<(), Self::BusError> {
        Bmp2::set_config(self, config)
    }

    fn set_power_mode(&mut self, mode: PowerMode, config: &Config) -> Result<(), Self::BusError> {
        Bmp2::set_power_mode(self, mode, config)
    }

    fn power_mode(&mut self) -> Result<PowerMode, Self::BusError> {
        Bmp2::power_mode(self)
    }

    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::BusError> {
        Bmp2::read_registers(self, register, buf)
    }

    fn sensor_data(&mut self) -> Result<Measurement, Self::BusError> {
        Bmp2::sensor_data(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Sensor;
    use crate::device::Bmp2;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn set_bus_address_retargets_the_driver() {
        let expectations = [
            I2cTransaction::write(0x77, vec![0xD0]),
            I2cTransaction::read(0x77, vec![0x42]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), 0xEC);

        sensor.set_bus_address(0xEE);
        assert_eq!(sensor.interface().address(), 0xEE);
        assert_eq!(Sensor::init(&mut sensor).unwrap_err().code(), -4);

        i2c.done();
    }
}
