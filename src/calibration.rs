//! Factory trimming coefficients and the floating-point compensation formulas.

use crate::registers::{CALIB_DATA_LEN, SENSOR_DATA_LEN};

/// Lowest temperature the compensation reports, in degrees Celsius.
pub const MIN_TEMPERATURE: f64 = -40.0;
/// Highest temperature the compensation reports, in degrees Celsius.
pub const MAX_TEMPERATURE: f64 = 85.0;
/// Lowest pressure the compensation reports, in pascal.
pub const MIN_PRESSURE: f64 = 30_000.0;
/// Highest pressure the compensation reports, in pascal.
pub const MAX_PRESSURE: f64 = 110_000.0;

// Largest valid 20-bit ADC reading; anything above signals a broken conversion.
const ADC_MAX: u32 = 0xF_FFF0;

/// Trimming coefficients stored in the sensor NVM at `0x88..=0x9F`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationParams {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl CalibrationParams {
    /// Decodes the little-endian calibration burst.
    pub fn from_bytes(raw: &[u8; CALIB_DATA_LEN]) -> Self {
        let u = |i: usize| u16::from_le_bytes([raw[i], raw[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([raw[i], raw[i + 1]]);

        Self {
            dig_t1: u(0),
            dig_t2: s(2),
            dig_t3: s(4),
            dig_p1: u(6),
            dig_p2: s(8),
            dig_p3: s(10),
            dig_p4: s(12),
            dig_p5: s(14),
            dig_p6: s(16),
            dig_p7: s(18),
            dig_p8: s(20),
            dig_p9: s(22),
        }
    }

    /// Returns the temperature in °C together with the `t_fine` carry used by
    /// [`compensate_pressure`](Self::compensate_pressure).
    pub fn compensate_temperature(&self, adc_t: u32) -> (f64, i32) {
        let adc = adc_t as f64;
        let t1 = self.dig_t1 as f64;

        let var1 = (adc / 16_384.0 - t1 / 1_024.0) * self.dig_t2 as f64;
        let delta = adc / 131_072.0 - t1 / 8_192.0;
        let var2 = delta * delta * self.dig_t3 as f64;

        let t_fine = (var1 + var2) as i32;
        let mut temperature = (var1 + var2) / 5_120.0;

        if temperature < MIN_TEMPERATURE {
            warn!("temperature clamped to minimum");
            temperature = MIN_TEMPERATURE;
        } else if temperature > MAX_TEMPERATURE {
            warn!("temperature clamped to maximum");
            temperature = MAX_TEMPERATURE;
        }

        (temperature, t_fine)
    }

    /// Returns the pressure in Pa; a degenerate `dig_p1` yields `0.0`.
    pub fn compensate_pressure(&self, adc_p: u32, t_fine: i32) -> f64 {
        let mut var1 = t_fine as f64 / 2.0 - 64_000.0;
        let mut var2 = var1 * var1 * self.dig_p6 as f64 / 32_768.0;
        var2 += var1 * self.dig_p5 as f64 * 2.0;
        var2 = var2 / 4.0 + self.dig_p4 as f64 * 65_536.0;
        var1 = (self.dig_p3 as f64 * var1 * var1 / 524_288.0 + self.dig_p2 as f64 * var1)
            / 524_288.0;
        var1 = (1.0 + var1 / 32_768.0) * self.dig_p1 as f64;

        if var1 == 0.0 {
            warn!("pressure compensation divisor is zero");
            return 0.0;
        }

        let mut pressure = 1_048_576.0 - adc_p as f64;
        pressure = (pressure - var2 / 4_096.0) * 6_250.0 / var1;
        var1 = self.dig_p9 as f64 * pressure * pressure / 2_147_483_648.0;
        var2 = pressure * self.dig_p8 as f64 / 32_768.0;
        pressure += (var1 + var2 + self.dig_p7 as f64) / 16.0;

        if pressure < MIN_PRESSURE {
            warn!("pressure clamped to minimum");
            MIN_PRESSURE
        } else if pressure > MAX_PRESSURE {
            warn!("pressure clamped to maximum");
            MAX_PRESSURE
        } else {
            pressure
        }
    }
}

/// Raw 20-bit ADC readings taken from the data burst at `0xF7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UncompensatedData {
    pub temperature: u32,
    pub pressure: u32,
}

impl UncompensatedData {
    /// Unpacks `press_msb, press_lsb, press_xlsb, temp_msb, temp_lsb, temp_xlsb`.
    pub fn from_bytes(raw: &[u8; SENSOR_DATA_LEN]) -> Self {
        let unpack = |msb: u8, lsb: u8, xlsb: u8| {
            ((msb as u32) << 12) | ((lsb as u32) << 4) | ((xlsb as u32) >> 4)
        };

        Self {
            pressure: unpack(raw[0], raw[1], raw[2]),
            temperature: unpack(raw[3], raw[4], raw[5]),
        }
    }

    /// Whether the temperature reading is inside the convertible range.
    pub fn temperature_valid(&self) -> bool {
        self.temperature <= ADC_MAX
    }

    /// Whether the pressure reading is inside the convertible range.
    pub fn pressure_valid(&self) -> bool {
        self.pressure <= ADC_MAX
    }
}
