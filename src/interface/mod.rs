//! Bus interface abstraction for the BMP2 driver.

pub mod i2c;

/// The three callbacks the driver uses to reach the sensor.
///
/// Application code never calls these directly; they are driven by
/// [`Bmp2`](crate::device::Bmp2).
pub trait Bmp2Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads `buf.len()` consecutive registers starting at `register`.
    fn read(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes `data` to the device, addressed at `register`.
    fn write(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Blocks for `period` microseconds.
    fn delay_us(&mut self, period: u32);
}
