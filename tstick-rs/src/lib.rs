#![no_std]
#![deny(missing_docs)]
//! # tstick
//!
//! A no-std data model and driver for temperature probe sticks: DS28EA00 sensors
//! sharing one 1-Wire bus per microcontroller pin.
//!
//! - [`consts`] names every protocol byte exchanged with the sensors.
//! - [`Ds28ea00`] is the last known state of one sensor.
//! - [`Ds28ea00Driver`] discovers, configures and reads the sensors on any bus
//!   implementing [`OneWire`].
//! - [`TStick`] owns one bus, its driver and up to [`SENSOR_CAPACITY`] sensor records.
//! - [`export`] turns readings into CSV rows for an external logger.

pub mod consts;
mod driver;
mod error;
pub mod export;
mod sensor;
mod stick;

pub use driver::{Ds28ea00Driver, PIO_OFF, PIO_ON};
pub use embedded_onewire::{OneWire, OneWireError, OneWireResult, RomCode};
pub use error::TStickError;
pub use export::LogRow;
pub use sensor::{Ds28ea00, ReadoutResolution, Scratchpad, Temperature};
pub use stick::{REGISTRATION_CAPACITY, SENSOR_CAPACITY, TStick, TStickBuilder};
