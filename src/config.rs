//! Configuration primitives for the BMP2 driver.

use crate::params::{Filter, OutputDataRate, OversamplingMode};

/// User-facing measurement configuration for the BMP280.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Temperature/pressure oversampling preset.
    pub os_mode: OversamplingMode,
    /// IIR filter coefficient.
    pub filter: Filter,
    /// Standby time between normal-mode conversions.
    pub odr: OutputDataRate,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the oversampling preset.
    pub fn os_mode(mut self, os_mode: OversamplingMode) -> Self {
        self.config.os_mode = os_mode;
        self
    }

    /// Overrides the IIR filter coefficient.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.config.filter = filter;
        self
    }

    /// Overrides the output data rate.
    pub fn odr(mut self, odr: OutputDataRate) -> Self {
        self.config.odr = odr;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            os_mode: OversamplingMode::StandardResolution,
            filter: Filter::Off,
            odr: OutputDataRate::Ms0_5,
        }
    }
}
