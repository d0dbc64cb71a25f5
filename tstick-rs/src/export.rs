//! Sensor readings as CSV rows for an external logger.
//!
//! This crate does no file I/O. A logger appends the [`Display`](core::fmt::Display)
//! output of each [`LogRow`] to [`LOG_FILE_NAME`].

use core::fmt;

use crate::Ds28ea00;

/// File readings are appended to.
pub const LOG_FILE_NAME: &str = "tsticks.log";

/// Separator between CSV fields.
pub const CSV_SEPARATOR: &str = ", ";

/// One reading of one sensor on one stick.
#[derive(Debug, Clone, Copy)]
pub struct LogRow<'a> {
    registration: &'a str,
    pin: u8,
    sensor: &'a Ds28ea00,
}

impl<'a> LogRow<'a> {
    /// Column names, in the order [`LogRow`] prints its fields.
    pub const HEADER: &'static str = "registration, pin, rom, temperature, pio";

    /// Row for `sensor` on the stick `registration` driven by `pin`.
    pub fn new(registration: &'a str, pin: u8, sensor: &'a Ds28ea00) -> Self {
        Self {
            registration,
            pin,
            sensor,
        }
    }
}

impl fmt::Display for LogRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{CSV_SEPARATOR}{}{CSV_SEPARATOR}{:x}{CSV_SEPARATOR}{:.4}{CSV_SEPARATOR}{:#04x}",
            self.registration,
            self.pin,
            self.sensor.rom_code(),
            self.sensor.celsius(),
            self.sensor.pio_state,
        )
    }
}
