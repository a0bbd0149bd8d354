//! I2C interface implementation built on top of `embedded-hal` `I2c` and `DelayNs`.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::Bmp2Interface;

/// Largest transaction (register byte included) a single write may produce.
pub const WRITE_BUFFER_LEN: usize = 16;

/// Errors raised by [`I2cInterface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError<E> {
    /// Error reported by the I2C peripheral.
    Bus(E),
    /// The payload does not fit in the write buffer; nothing was sent.
    PayloadTooLong { len: usize },
}

/// I2C-based interface implementation for the BMP2 driver.
///
/// The address is kept in its 8-bit form (7-bit address shifted left by one,
/// direction bit clear) and converted back when talking to the HAL.
pub struct I2cInterface<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> I2cInterface<I2C, D> {
    /// Creates a new interface targeting the given 8-bit bus address.
    pub const fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self { i2c, delay, address }
    }

    /// Returns the current 8-bit bus address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Retargets the interface at another 8-bit bus address.
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// 7-bit address handed to `embedded-hal`; the direction bit is dropped.
    fn bus_address(&self) -> u8 {
        self.address >> 1
    }

    /// Provides mutable access to the wrapped I2C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> Bmp2Interface for I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = InterfaceError<I2C::Error>;

    fn read(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        let address = self.bus_address();

        // The read goes out even when the register write was not acknowledged;
        // its outcome alone decides the status.
        if self.i2c.write(address, &[register]).is_err() {
            warn!("register select {=u8:#x} at {=u8:#x} failed", register, address);
        }

        self.i2c.read(address, buf).map_err(InterfaceError::Bus)
    }

    fn write(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        let len = data.len() + 1;
        if len > WRITE_BUFFER_LEN {
            return Err(InterfaceError::PayloadTooLong { len: data.len() });
        }

        let mut package = [0u8; WRITE_BUFFER_LEN];
        package[0] = register;
        package[1..len].copy_from_slice(data);

        let address = self.bus_address();
        self.i2c
            .write(address, &package[..len])
            .map_err(InterfaceError::Bus)
    }

    fn delay_us(&mut self, period: u32) {
        self.delay.delay_us(period);
    }
}
