//! Bring-up sequence: address sweep, configuration and the sampling loop.
//!
//! [`Monitor`] owns the sensor, the display and a delay for the whole life of
//! the program. [`Monitor::run`] strings the phases together and never
//! returns; the individual phases are public so they can be driven one step
//! at a time.

use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::device::Measurement;
use crate::display::{self, CharacterDisplay};
use crate::error::{Result, status};
use crate::params::{Filter, OutputDataRate, OversamplingMode, PowerMode};
use crate::registers::REG_CTRL_MEAS;
use crate::sensor::Sensor;

/// First candidate address: 7-bit `0x76` in its 8-bit read/write form.
pub const BASE_ADDRESS: u8 = 0x76 << 1;
/// Settling time before the display is initialised.
pub const STARTUP_DELAY_MS: u32 = 500;
/// Pause after each probe so the result stays readable.
pub const PROBE_DELAY_MS: u32 = 50;
/// How long "Address found..." stays up.
pub const FOUND_DELAY_MS: u32 = 1_000;
/// How long the configuration outcome stays up.
pub const MODE_DELAY_MS: u32 = 2_000;
/// Period of the sampling loop.
pub const SAMPLE_PERIOD_MS: u32 = 250;

/// Measurement settings applied by [`Monitor::run`].
pub const DEFAULT_CONFIG: Config = Config {
    os_mode: OversamplingMode::HighResolution,
    filter: Filter::Coeff16,
    odr: OutputDataRate::Ms250,
};

/// Context object tying a sensor to a display.
pub struct Monitor<S, LCD, D> {
    sensor: S,
    display: LCD,
    delay: D,
    config: Config,
    address: u8,
    last: Measurement,
}

impl<S, LCD, D> Monitor<S, LCD, D>
where
    S: Sensor,
    LCD: CharacterDisplay,
    D: DelayNs,
{
    /// Creates a monitor that will start probing at [`BASE_ADDRESS`].
    pub fn new(sensor: S, display: LCD, delay: D, config: Config) -> Self {
        Self {
            sensor,
            display,
            delay,
            config,
            address: BASE_ADDRESS,
            last: Measurement::default(),
        }
    }

    /// Current candidate (or, after discovery, found) 8-bit bus address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Last successfully fetched measurement.
    pub fn last_measurement(&self) -> Measurement {
        self.last
    }

    /// Consumes the monitor and returns its parts.
    pub fn release(self) -> (S, LCD, D) {
        (self.sensor, self.display, self.delay)
    }

    /// Runs the whole program: start-up, discovery, configuration, sampling.
    pub fn run(mut self) -> ! {
        self.start();
        self.discover();
        // Sampling proceeds with whatever configuration made it to the sensor.
        let _ = self.configure();
        loop {
            self.sample();
        }
    }

    /// Lets the supply settle and brings up the display.
    pub fn start(&mut self) {
        self.delay.delay_ms(STARTUP_DELAY_MS);
        self.display.initialize();
    }

    // ==================================================================
    // == Bus Discovery =================================================
    // ==================================================================
    /// Probes successive addresses until one initialises and returns it.
    ///
    /// There is no upper bound: the candidate wraps around after `0xFF` and
    /// the sweep continues for as long as no sensor answers.
    pub fn discover(&mut self) -> u8 {
        while !self.probe() {}
        info!("sensor found at {=u8:#x}", self.address);
        self.address
    }

    /// Attempts initialisation at the current candidate address once.
    ///
    /// On success the sensor is soft-reset and the candidate is kept; on
    /// failure the candidate advances by one.
    pub fn probe(&mut self) -> bool {
        self.sensor.set_bus_address(self.address);
        let result = self.sensor.init();
        let code = status(&result);

        self.show(
            display::line(format_args!("Result: {}  ", code)),
            display::line(format_args!("I2C Add: {}  ", self.address)),
        );
        self.delay.delay_ms(PROBE_DELAY_MS);

        if result.is_err() {
            trace!("no sensor at {=u8:#x}: {}", self.address, code);
            self.address = self.address.wrapping_add(1);
            return false;
        }

        if let Err(err) = self.sensor.soft_reset() {
            warn!("soft reset after discovery failed: {}", err.code());
        }

        self.display.first_line();
        self.display.write_text("Address found...");
        self.delay.delay_ms(FOUND_DELAY_MS);
        self.display.clear();
        true
    }

    // ==================================================================
    // == Configuration =================================================
    // ==================================================================
    /// Applies the configuration, enters normal mode and shows the outcome.
    ///
    /// The power-mode switch only runs after the configuration succeeded, and
    /// the readback only after both did.
    pub fn configure(&mut self) -> Result<(), S::BusError> {
        let result = self
            .sensor
            .set_config(&self.config)
            .and_then(|()| self.sensor.set_power_mode(PowerMode::Normal, &self.config));

        match &result {
            Ok(()) => {
                let mode = match self.sensor.power_mode() {
                    Ok(mode) => display::line(format_args!("Power mode:{}", mode.bits())),
                    Err(err) => display::line(format_args!("Power mode:err {}", err.code())),
                };

                let mut raw = [0u8; 1];
                let ctrl = match self.sensor.read_registers(REG_CTRL_MEAS, &mut raw) {
                    Ok(()) => display::line(format_args!("Ctrl: {}", raw[0])),
                    Err(err) => display::line(format_args!("Ctrl: err {}", err.code())),
                };

                self.show(mode, ctrl);
            }
            Err(err) => {
                warn!("sensor configuration failed: {}", err.code());
                self.show(
                    display::line(format_args!("Sensor mode:")),
                    display::line(format_args!("Error")),
                );
            }
        }

        self.delay.delay_ms(MODE_DELAY_MS);
        self.display.clear();
        result
    }

    // ==================================================================
    // == Sampling ======================================================
    // ==================================================================
    /// Fetches, renders and paces one sample.
    ///
    /// A failed fetch leaves the previous measurement on screen.
    pub fn sample(&mut self) -> Measurement {
        match self.sensor.sensor_data() {
            Ok(measurement) => self.last = measurement,
            Err(err) => debug!("sample dropped: {}", err.code()),
        }

        self.show(
            display::temperature_line(self.last.temperature),
            display::pressure_line(self.last.pressure),
        );
        self.delay.delay_ms(SAMPLE_PERIOD_MS);
        self.last
    }

    fn show(&mut self, first: display::Line, second: display::Line) {
        self.display.first_line();
        self.display.write_text(&first);
        self.display.second_line();
        self.display.write_text(&second);
    }
}
