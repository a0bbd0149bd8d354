//! High-level BMP2 device driver implementation.

use crate::calibration::{CalibrationParams, UncompensatedData};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::i2c::I2cInterface;
use crate::interface::Bmp2Interface;
use crate::params::PowerMode;
use crate::registers::{
    CALIB_DATA_LEN,
    CHIP_IDS,
    ConfigRegister,
    CtrlMeas,
    REG_CALIB_START,
    REG_CHIP_ID,
    REG_PRESS_MSB,
    REG_RESET,
    RESET_COMMAND,
    Register,
    SENSOR_DATA_LEN,
    Status,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

// Start-up time after a soft reset (microseconds).
const SOFT_RESET_DELAY_US: u32 = 2_000;
// Most register/value pairs a single burst write may carry.
const MAX_BURST_PAIRS: usize = 4;
// Interleaved payload length of a full burst: v0, r1, v1, r2, v2, r3, v3.
const MAX_BURST_PAYLOAD: usize = 2 * MAX_BURST_PAIRS - 1;

/// One compensated reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Pressure in pascal.
    pub pressure: f64,
}

/// Synchronous register-level driver for the BMP280 barometer.
pub struct Bmp2<IFACE> {
    interface: IFACE,
    chip_id: u8,
    calibration: CalibrationParams,
}

impl<IFACE> Bmp2<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE) -> Self {
        Self {
            interface,
            chip_id: 0,
            calibration: CalibrationParams::default(),
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides shared access to the underlying interface.
    pub fn interface(&self) -> &IFACE {
        &self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Chip id latched by the last successful [`init`](Self::init), `0` before.
    pub fn chip_id(&self) -> u8 {
        self.chip_id
    }

    /// Calibration coefficients latched by the last successful init.
    pub fn calibration(&self) -> &CalibrationParams {
        &self.calibration
    }
}

impl<I2C, D> Bmp2<I2cInterface<I2C, D>>
where
    I2C: I2c,
    D: DelayNs,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I2C transports; `address` is the 8-bit form.
    pub fn new_i2c(i2c: I2C, delay: D, address: u8) -> Self {
        Self::new(I2cInterface::new(i2c, delay, address))
    }

    /// Releases the driver, returning the I2C bus and delay.
    pub fn release_i2c(self) -> (I2C, D) {
        self.release().release()
    }
}

impl<IFACE, CommE> Bmp2<IFACE>
where
    IFACE: Bmp2Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Reset ========================================
    // ==================================================================
    /// Verifies the chip id and latches the calibration coefficients.
    pub fn init(&mut self) -> Result<(), CommE> {
        let mut chip_id = [0u8; 1];
        self.read_registers(REG_CHIP_ID, &mut chip_id)?;

        if !CHIP_IDS.contains(&chip_id[0]) {
            debug!("unexpected chip id {=u8:#x}", chip_id[0]);
            return Err(Error::DeviceNotFound);
        }

        let mut raw = [0u8; CALIB_DATA_LEN];
        self.read_registers(REG_CALIB_START, &mut raw)?;

        self.chip_id = chip_id[0];
        self.calibration = CalibrationParams::from_bytes(&raw);
        Ok(())
    }

    /// Issues a soft reset and waits for the device to come back up.
    pub fn soft_reset(&mut self) -> Result<(), CommE> {
        self.write_registers(&[(REG_RESET, RESET_COMMAND)])?;
        self.interface.delay_us(SOFT_RESET_DELAY_US);
        Ok(())
    }

    // ==================================================================
    // == Power & Measurement Configuration =============================
    // ==================================================================
    /// Applies oversampling, filter and standby time, leaving the sensor asleep.
    pub fn set_config(&mut self, config: &Config) -> Result<(), CommE> {
        self.configure(PowerMode::Sleep, config)
    }

    /// Applies the configuration and then switches to `mode`.
    pub fn set_power_mode(&mut self, mode: PowerMode, config: &Config) -> Result<(), CommE> {
        self.configure(mode, config)
    }

    /// Reads the active power mode from `CTRL_MEAS`.
    pub fn power_mode(&mut self) -> Result<PowerMode, CommE> {
        let mut raw = [0u8; 1];
        self.read_registers(CtrlMeas::ADDRESS, &mut raw)?;
        Ok(PowerMode::from_bits(CtrlMeas::from(raw[0]).mode()))
    }

    /// Reads the conversion and NVM-copy flags.
    pub fn status(&mut self) -> Result<Status, CommE> {
        let mut raw = [0u8; 1];
        self.read_registers(Status::ADDRESS, &mut raw)?;
        Ok(Status::from(raw[0]))
    }

    // ==================================================================
    // == Raw Register Access ===========================================
    // ==================================================================
    /// Reads `buf.len()` consecutive registers starting at `register`.
    pub fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), CommE> {
        if buf.is_empty() {
            return Err(Error::InvalidLength);
        }

        self.interface.read(register, buf).map_err(Error::from)
    }

    /// Writes up to four register/value pairs in a single bus transaction.
    ///
    /// The device auto-increments nothing on writes, so every pair after the
    /// first is sent as `register, value` behind the first value.
    pub fn write_registers(&mut self, pairs: &[(u8, u8)]) -> Result<(), CommE> {
        let Some(((first_register, first_value), rest)) = pairs.split_first() else {
            return Err(Error::InvalidLength);
        };
        if pairs.len() > MAX_BURST_PAIRS {
            return Err(Error::InvalidLength);
        }

        let mut payload = [0u8; MAX_BURST_PAYLOAD];
        payload[0] = *first_value;
        for (index, (register, value)) in rest.iter().enumerate() {
            payload[1 + 2 * index] = *register;
            payload[2 + 2 * index] = *value;
        }

        let len = 2 * pairs.len() - 1;
        self.interface
            .write(*first_register, &payload[..len])
            .map_err(Error::from)
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads one temperature/pressure pair and compensates it.
    pub fn sensor_data(&mut self) -> Result<Measurement, CommE> {
        let mut raw = [0u8; SENSOR_DATA_LEN];
        self.read_registers(REG_PRESS_MSB, &mut raw)?;

        let uncompensated = UncompensatedData::from_bytes(&raw);
        match (uncompensated.temperature_valid(), uncompensated.pressure_valid()) {
            (true, true) => {}
            (false, true) => return Err(Error::UncompensatedTemperature),
            (true, false) => return Err(Error::UncompensatedPressure),
            (false, false) => return Err(Error::UncompensatedTemperatureAndPressure),
        }

        let (temperature, t_fine) = self
            .calibration
            .compensate_temperature(uncompensated.temperature);
        let pressure = self
            .calibration
            .compensate_pressure(uncompensated.pressure, t_fine);

        Ok(Measurement {
            temperature,
            pressure,
        })
    }

    // ==================================================================
    // == Internal Configuration Helpers =================================
    // ==================================================================
    fn configure(&mut self, mode: PowerMode, config: &Config) -> Result<(), CommE> {
        let mut current = [0u8; 2];
        self.read_registers(CtrlMeas::ADDRESS, &mut current)?;

        // A soft reset is the quickest way into sleep mode, where the
        // configuration registers accept writes.
        self.soft_reset()?;

        let (osrs_t, osrs_p) = config.os_mode.settings();
        let ctrl = CtrlMeas::new()
            .with_osrs_t(osrs_t)
            .with_osrs_p(osrs_p)
            .with_mode(PowerMode::Sleep.bits());
        let conf = ConfigRegister::from(current[1])
            .with_filter(config.filter)
            .with_t_sb(config.odr);

        self.write_registers(&[
            (CtrlMeas::ADDRESS, u8::from(ctrl)),
            (ConfigRegister::ADDRESS, u8::from(conf)),
        ])?;

        if mode != PowerMode::Sleep {
            let ctrl = ctrl.with_mode(mode.bits());
            self.write_registers(&[(CtrlMeas::ADDRESS, u8::from(ctrl))])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::i2c::InterfaceError;
    use crate::params::{Filter, OutputDataRate, OversamplingMode};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDRESS: u8 = 0x76;

    const DATASHEET_CALIB: [u8; CALIB_DATA_LEN] = [
        0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B,
        0x8C, 0x00, 0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17,
    ];

    fn init_transactions(chip_id: u8) -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(ADDRESS, vec![REG_CHIP_ID]),
            I2cTransaction::read(ADDRESS, vec![chip_id]),
            I2cTransaction::write(ADDRESS, vec![REG_CALIB_START]),
            I2cTransaction::read(ADDRESS, DATASHEET_CALIB.to_vec()),
        ]
    }

    fn demo_config() -> Config {
        Config::new()
            .os_mode(OversamplingMode::HighResolution)
            .filter(Filter::Coeff16)
            .odr(OutputDataRate::Ms250)
            .build()
    }

    #[test]
    fn init_latches_chip_id_and_calibration() {
        let expectations = init_transactions(0x58);
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        sensor.init().unwrap();
        assert_eq!(sensor.chip_id(), 0x58);
        assert_eq!(sensor.calibration().dig_t1, 27_504);

        i2c.done();
    }

    #[test]
    fn init_rejects_foreign_chip_id() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![REG_CHIP_ID]),
            I2cTransaction::read(ADDRESS, vec![0x60]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        assert_eq!(sensor.init(), Err(Error::DeviceNotFound));
        assert_eq!(sensor.chip_id(), 0);

        i2c.done();
    }

    #[test]
    fn init_reports_bus_failure() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![REG_CHIP_ID]).with_error(ErrorKind::Other),
            I2cTransaction::read(ADDRESS, vec![0x00]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        let result = sensor.init();
        assert_eq!(
            result,
            Err(Error::Interface(InterfaceError::Bus(ErrorKind::Other)))
        );
        assert_eq!(result.unwrap_err().code(), -2);

        i2c.done();
    }

    #[test]
    fn soft_reset_writes_reset_command() {
        let expectations = [I2cTransaction::write(ADDRESS, vec![REG_RESET, RESET_COMMAND])];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        sensor.soft_reset().unwrap();

        i2c.done();
    }

    #[test]
    fn set_power_mode_writes_burst_then_mode() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0xF4]),
            I2cTransaction::read(ADDRESS, vec![0x00, 0x01]),
            I2cTransaction::write(ADDRESS, vec![REG_RESET, RESET_COMMAND]),
            I2cTransaction::write(ADDRESS, vec![0xF4, 0b001_100_00, 0xF5, 0b011_100_0_1]),
            I2cTransaction::write(ADDRESS, vec![0xF4, 0b001_100_11]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        sensor
            .set_power_mode(PowerMode::Normal, &demo_config())
            .unwrap();

        i2c.done();
    }

    #[test]
    fn set_config_leaves_sensor_asleep() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0xF4]),
            I2cTransaction::read(ADDRESS, vec![0x33, 0x00]),
            I2cTransaction::write(ADDRESS, vec![REG_RESET, RESET_COMMAND]),
            I2cTransaction::write(ADDRESS, vec![0xF4, 0b001_100_00, 0xF5, 0b011_100_0_0]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        sensor.set_config(&demo_config()).unwrap();

        i2c.done();
    }

    #[test]
    fn power_mode_decodes_ctrl_meas() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0xF4]),
            I2cTransaction::read(ADDRESS, vec![0b001_100_11]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        assert_eq!(sensor.power_mode(), Ok(PowerMode::Normal));

        i2c.done();
    }

    #[test]
    fn status_reports_running_conversion() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0xF3]),
            I2cTransaction::read(ADDRESS, vec![0x08]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        assert!(sensor.status().unwrap().measuring());

        i2c.done();
    }

    #[test]
    fn write_registers_rejects_empty_and_oversized_bursts() {
        let expectations: [I2cTransaction; 0] = [];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        assert_eq!(sensor.write_registers(&[]), Err(Error::InvalidLength));
        assert_eq!(
            sensor.write_registers(&[(0xF4, 0), (0xF5, 0), (0xF4, 0), (0xF5, 0), (0xF4, 0)]),
            Err(Error::InvalidLength)
        );
        assert_eq!(sensor.read_registers(0xF4, &mut []), Err(Error::InvalidLength));

        i2c.done();
    }

    #[test]
    fn sensor_data_compensates_datasheet_example() {
        let mut expectations = init_transactions(0x58);
        expectations.extend([
            I2cTransaction::write(ADDRESS, vec![REG_PRESS_MSB]),
            I2cTransaction::read(ADDRESS, vec![0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        sensor.init().unwrap();
        let measurement = sensor.sensor_data().unwrap();
        assert!((measurement.temperature - 25.0825).abs() < 0.001);
        assert!((measurement.pressure - 100_653.26).abs() < 0.01);

        i2c.done();
    }

    #[test]
    fn sensor_data_rejects_saturated_adc_values() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![REG_PRESS_MSB]),
            I2cTransaction::read(ADDRESS, vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Bmp2::new_i2c(i2c.clone(), NoopDelay::new(), ADDRESS << 1);

        let result = sensor.sensor_data();
        assert_eq!(result, Err(Error::UncompensatedTemperatureAndPressure));
        assert_eq!(result.unwrap_err().code(), -7);

        i2c.done();
    }
}
