use embedded_hal::delay::DelayNs;
use embedded_onewire::{OneWire, RomCode};
use heapless::{String, Vec};
use log::debug;

use crate::{Ds28ea00, Ds28ea00Driver, LogRow, TStickError};

/// Number of sensor slots on one probe stick.
pub const SENSOR_CAPACITY: usize = 10;

/// Maximum length of a registration number in bytes.
pub const REGISTRATION_CAPACITY: usize = 16;

/// One probe stick: a 1-Wire bus on a microcontroller pin and the DS28EA00 sensors on it.
///
/// The stick owns its bus and its driver. Both are released together, either by
/// dropping the stick or through [`release`](TStick::release).
#[derive(Debug)]
pub struct TStick<O> {
    pin: u8,
    bus: O,
    driver: Ds28ea00Driver,
    registration_number: String<REGISTRATION_CAPACITY>,
    sensors: Vec<Ds28ea00, SENSOR_CAPACITY>,
}

/// Builder for a [`TStick`].
#[derive(Debug, Clone)]
pub struct TStickBuilder<'a> {
    pin: u8,
    registration: &'a str,
    driver: Ds28ea00Driver,
}

impl<'a> TStickBuilder<'a> {
    /// Start building a stick driven by `pin`.
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            registration: "",
            driver: Ds28ea00Driver::default(),
        }
    }

    /// Sets the registration number (serial or asset tag) of the stick.
    pub fn with_registration(mut self, registration: &'a str) -> Self {
        self.registration = registration;
        self
    }

    /// Sets the driver configuration applied to the sensors.
    pub fn with_driver(mut self, driver: Ds28ea00Driver) -> Self {
        self.driver = driver;
        self
    }

    /// Takes ownership of `bus` and builds the stick. No sensors are known until
    /// [`scan`](TStick::scan) runs.
    pub fn build<O: OneWire>(self, bus: O) -> Result<TStick<O>, TStickError<O::BusError>> {
        let mut registration_number = String::new();
        registration_number
            .push_str(self.registration)
            .map_err(|_| TStickError::RegistrationTooLong)?;
        Ok(TStick {
            pin: self.pin,
            bus,
            driver: self.driver,
            registration_number,
            sensors: Vec::new(),
        })
    }
}

impl<O> TStick<O> {
    /// Pin number driving the bus.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Registration number of the stick.
    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    /// The bus handle.
    pub fn bus(&self) -> &O {
        &self.bus
    }

    /// Mutable access to the bus handle.
    pub fn bus_mut(&mut self) -> &mut O {
        &mut self.bus
    }

    /// The sensor driver.
    pub fn driver(&self) -> &Ds28ea00Driver {
        &self.driver
    }

    /// Discovered sensors in discovery order.
    pub fn sensor_array(&self) -> &[Ds28ea00] {
        &self.sensors
    }

    /// Number of discovered sensors.
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Number of sensor slots, always [`SENSOR_CAPACITY`].
    pub const fn capacity(&self) -> usize {
        SENSOR_CAPACITY
    }

    /// Contents of slot `idx`.
    ///
    /// Slots past the discovered sensors hold unused placeholder records; indices at or
    /// beyond [`SENSOR_CAPACITY`] have no slot.
    pub fn slot(&self, idx: usize) -> Option<Ds28ea00> {
        match self.sensors.get(idx) {
            Some(sensor) => Some(*sensor),
            None if idx < SENSOR_CAPACITY => Some(Ds28ea00::default()),
            None => None,
        }
    }

    /// Finds a discovered sensor by ROM code.
    pub fn sensor_by_rom(&self, rom: &RomCode) -> Option<&Ds28ea00> {
        self.sensors.iter().find(|s| s.rom_code() == rom)
    }

    /// Rows for the external logger, one per discovered sensor.
    pub fn log_rows(&self) -> impl Iterator<Item = LogRow<'_>> {
        self.sensors
            .iter()
            .map(|sensor| LogRow::new(&self.registration_number, self.pin, sensor))
    }

    /// Gives the bus back, dropping the driver and all sensor records.
    pub fn release(self) -> O {
        self.bus
    }
}

impl<O: OneWire> TStick<O> {
    /// Searches the bus and refills the sensor slots in discovery order.
    ///
    /// Previous records are discarded. At most [`SENSOR_CAPACITY`] sensors are kept.
    pub fn scan(&mut self) -> Result<usize, TStickError<O::BusError>> {
        let found = self.driver.enumerate(&mut self.bus, &mut self.sensors)?;
        debug!(
            "stick {} on pin {}: {} sensors",
            self.registration_number, self.pin, found
        );
        Ok(found)
    }

    /// Runs one read cycle: converts, then refreshes temperature and PIO state of every sensor.
    ///
    /// If a sensor fails to read, the others are still refreshed and the first error is
    /// returned; PIO status is then not read back.
    pub fn refresh<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<&[Ds28ea00], TStickError<O::BusError>> {
        self.driver
            .trigger_temperature_conversion(&mut self.bus, &self.sensors, delay)?;
        self.driver
            .read_temperatures(&mut self.bus, &mut self.sensors)?;
        if !self.driver.toggle_pio() {
            // toggling already reported the PIO status
            for sensor in self.sensors.iter_mut() {
                sensor.pio_state = self.driver.read_pio(&mut self.bus, sensor.rom_code())?;
            }
        }
        Ok(self.sensors.as_slice())
    }

    /// Writes the PIO latches of the sensor in slot `idx` and records its new status.
    pub fn set_pio(&mut self, idx: usize, state: u8) -> Result<u8, TStickError<O::BusError>> {
        let sensor = self
            .sensors
            .get_mut(idx)
            .ok_or(TStickError::SlotOutOfRange(idx))?;
        sensor.pio_state = self
            .driver
            .write_pio(&mut self.bus, Some(sensor.rom_code()), state)?;
        Ok(sensor.pio_state)
    }
}
