//! BMP280 bring-up on an ESP32-C3: SDA on GPIO4, SCL on GPIO5.
//!
//! The two display lines are mirrored to the RTT log, so no character LCD is
//! needed to follow the address sweep and the readings.
#![no_std]
#![no_main]

use bmp2_monitor::display::{CharacterDisplay, Line};
use bmp2_monitor::monitor::{BASE_ADDRESS, DEFAULT_CONFIG};
use bmp2_monitor::{Bmp2, Monitor};
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::main;
use panic_rtt_target as _;

esp_bootloader_esp_idf::esp_app_desc!();

/// Two-line "display" that logs each line once the cursor leaves it.
struct RttDisplay {
    lines: [Line; 2],
    cursor: usize,
}

impl RttDisplay {
    fn new() -> Self {
        Self {
            lines: [Line::new(), Line::new()],
            cursor: 0,
        }
    }

    fn flush(&mut self) {
        let line = &mut self.lines[self.cursor];
        if !line.is_empty() {
            defmt::info!("lcd[{}]: {=str}", self.cursor, line.as_str());
            line.clear();
        }
    }
}

impl CharacterDisplay for RttDisplay {
    fn initialize(&mut self) {
        defmt::info!("lcd ready");
    }

    fn first_line(&mut self) {
        self.flush();
        self.cursor = 0;
    }

    fn second_line(&mut self) {
        self.flush();
        self.cursor = 1;
    }

    fn write_text(&mut self, text: &str) {
        let _ = self.lines[self.cursor].push_str(text);
        if self.cursor == 1 {
            self.flush();
        }
    }

    fn clear(&mut self) {
        self.flush();
        defmt::info!("lcd cleared");
    }
}

#[main]
fn main() -> ! {
    rtt_target::rtt_init_defmt!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .unwrap()
        .with_sda(peripherals.GPIO4)
        .with_scl(peripherals.GPIO5);

    let sensor = Bmp2::new_i2c(i2c, Delay::new(), BASE_ADDRESS);
    Monitor::new(sensor, RttDisplay::new(), Delay::new(), DEFAULT_CONFIG).run()
}
