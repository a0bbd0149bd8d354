#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod calibration;
pub mod config;
pub mod device;
pub mod display;
pub mod interface;
pub mod monitor;
pub mod params;
pub mod registers;
pub mod sensor;

pub use crate::device::Bmp2;
pub use crate::error::{Error, Result};
pub use crate::monitor::Monitor;
