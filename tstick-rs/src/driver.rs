use embedded_hal::delay::DelayNs;
use embedded_onewire::{
    OneWire, OneWireError, OneWireResult, OneWireSearch, OneWireSearchKind, RomCode,
};
use heapless::Vec;
use log::{debug, trace, warn};

use crate::{
    consts::{
        CONVERT_T, ControlCommand, END_OF_BUS, IS_DS28EA00_SENSOR, PIO_ACCESS_READ,
        READ_SCRATCHPAD, VALID_SEQUENCE, WRITE_SCRATCHPAD,
    },
    sensor::{Ds28ea00, ReadoutResolution, Scratchpad},
};

/// PIO latch byte that pulls PIOB low, lighting an indicator wired to it.
pub const PIO_ON: u8 = 0b1111_1101;
/// PIO latch byte that releases both PIO pins.
pub const PIO_OFF: u8 = 0b1111_1111;

/// Scratchpad bytes up to and including the configuration register.
const SCRATCHPAD_NO_CRC: usize = 5;

/// Driver for the DS28EA00 devices sharing one 1-Wire bus.
///
/// The driver holds the configuration applied to every device; the per-device
/// state lives in [`Ds28ea00`] records owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ds28ea00Driver {
    resolution: ReadoutResolution,
    low: i8,
    high: i8,
    toggle_pio: bool,
    crc: bool,
}

impl Default for Ds28ea00Driver {
    fn default() -> Self {
        Self {
            resolution: ReadoutResolution::default(),
            low: -40,
            high: 85,
            toggle_pio: false,
            crc: true,
        }
    }
}

impl Ds28ea00Driver {
    /// Returns the family code for the DS28EA00 devices.
    #[inline]
    pub const fn family() -> u8 {
        IS_DS28EA00_SENSOR
    }

    /// Sets the temperature readout resolution.
    pub fn with_resolution(mut self, resolution: ReadoutResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the low alarm threshold.
    pub fn with_t_low(mut self, temp: i8) -> Self {
        self.low = temp;
        self
    }

    /// Sets the high alarm threshold.
    pub fn with_t_high(mut self, temp: i8) -> Self {
        self.high = temp;
        self
    }

    /// Enables or disables the toggle PIO feature.
    ///
    /// When enabled, the PIO pins of all devices are turned on while the configuration
    /// is written and during temperature conversion, and each device's PIO is turned off
    /// again once its temperature has been read.
    pub fn with_toggle_pio(mut self, toggle_pio: bool) -> Self {
        self.toggle_pio = toggle_pio;
        self
    }

    /// Enables or disables CRC validation of scratchpad reads.
    pub fn with_crc(mut self, crc: bool) -> Self {
        self.crc = crc;
        self
    }

    /// Configured readout resolution.
    pub fn resolution(&self) -> ReadoutResolution {
        self.resolution
    }

    /// Whether PIO pins are toggled around conversions.
    pub fn toggle_pio(&self) -> bool {
        self.toggle_pio
    }

    /// Enumerates the DS28EA00 devices on the bus into `sensors`, then applies the
    /// configuration to them.
    ///
    /// `sensors` is replaced only once the search completes; if it fails, the previous
    /// records are left untouched. Devices beyond the capacity of `sensors` are ignored.
    ///
    /// # Returns
    /// The number of devices found.
    pub fn enumerate<O: OneWire, const N: usize>(
        &self,
        bus: &mut O,
        sensors: &mut Vec<Ds28ea00, N>,
    ) -> OneWireResult<usize, O::BusError> {
        let mut found: Vec<Ds28ea00, N> = Vec::new();
        let mut search = OneWireSearch::with_family(bus, OneWireSearchKind::Normal, Self::family());
        while let Some(rom) = search.next()? {
            trace!("found {rom:x}");
            if found.push(Ds28ea00::new(rom)).is_err() {
                warn!("more than {} DS28EA00 on the bus, ignoring {:x} and beyond", N, rom);
                break;
            }
        }
        debug!("enumerated {} DS28EA00", found.len());
        *sensors = found;
        self.configure(bus, sensors)?;
        Ok(sensors.len())
    }

    /// Writes the alarm thresholds and resolution to each of `sensors`.
    ///
    /// Every sensor is addressed by its ROM code, so other devices sharing the bus keep
    /// their own configuration.
    pub fn configure<O: OneWire>(
        &self,
        bus: &mut O,
        sensors: &[Ds28ea00],
    ) -> OneWireResult<(), O::BusError> {
        if self.toggle_pio {
            self.write_pio_each(bus, sensors, PIO_ON)?;
        }
        for sensor in sensors {
            bus.address(Some(sensor.rom_code()))?;
            bus.write_bytes(&[
                WRITE_SCRATCHPAD,
                self.high as u8,
                self.low as u8,
                self.resolution as u8,
            ])?;
        }
        debug!(
            "configured {:?}, alarms {}..{} °C",
            self.resolution, self.low, self.high
        );
        if self.toggle_pio {
            self.write_pio_each(bus, sensors, PIO_OFF)?;
        }
        Ok(())
    }

    /// Triggers a temperature conversion and waits until it is complete at the
    /// configured resolution.
    ///
    /// Convert T is broadcast with Skip ROM. With toggle PIO, only `sensors` have their
    /// PIO switched on.
    pub fn trigger_temperature_conversion<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        sensors: &[Ds28ea00],
        delay: &mut D,
    ) -> OneWireResult<(), O::BusError> {
        bus.address(None)?;
        bus.write_byte(CONVERT_T)?;
        if self.toggle_pio {
            self.write_pio_each(bus, sensors, PIO_ON)?;
        }
        delay.delay_us(self.resolution.delay_us());
        Ok(())
    }

    /// Reads the scratchpad of one device and refreshes its record.
    ///
    /// With toggle PIO the device's PIO is switched off afterwards, also when the read
    /// failed. The record keeps its previous reading on error.
    ///
    /// # Errors
    /// - [`OneWireError::NoDevicePresent`] if the device does not answer.
    /// - [`OneWireError::InvalidCrc`] if CRC validation is enabled and fails.
    pub fn read_sensor<O: OneWire>(
        &self,
        bus: &mut O,
        sensor: &mut Ds28ea00,
    ) -> OneWireResult<(), O::BusError> {
        let rom = *sensor.rom_code();
        let pad = self.read_scratchpad(bus, &rom);
        if self.toggle_pio {
            match self.write_pio(bus, Some(&rom), PIO_OFF) {
                Ok(status) => sensor.pio_state = status,
                Err(e) if pad.is_ok() => return Err(e),
                Err(_) => warn!("could not switch PIO off on {rom:x}"),
            }
        }
        sensor.update_from_scratchpad(&pad?);
        trace!("{rom:x}: {} °C", sensor.temperature);
        Ok(())
    }

    fn read_scratchpad<O: OneWire>(
        &self,
        bus: &mut O,
        rom: &RomCode,
    ) -> OneWireResult<Scratchpad, O::BusError> {
        bus.address(Some(rom))?;
        bus.write_byte(READ_SCRATCHPAD)?;
        let mut buf = [END_OF_BUS; Scratchpad::LEN];
        let len = if self.crc {
            Scratchpad::LEN
        } else {
            SCRATCHPAD_NO_CRC
        };
        bus.read_bytes(&mut buf[..len])?;
        let pad = Scratchpad::from_bytes(buf);
        if pad.is_absent() {
            return Err(OneWireError::NoDevicePresent);
        }
        if self.crc && !pad.is_valid() {
            warn!("scratchpad CRC mismatch from {rom:x}");
            return Err(OneWireError::InvalidCrc);
        }
        Ok(pad)
    }

    /// Reads the temperature of every device in `sensors`.
    ///
    /// A failing device does not stop the cycle: the others are still read and the
    /// first error is returned. Records of failed devices keep their previous reading.
    pub fn read_temperatures<O: OneWire>(
        &self,
        bus: &mut O,
        sensors: &mut [Ds28ea00],
    ) -> OneWireResult<(), O::BusError> {
        let mut result = Ok(());
        for sensor in sensors.iter_mut() {
            let read = self.read_sensor(bus, sensor);
            if read.is_err() {
                warn!("reading {:x} failed", sensor.rom_code());
            }
            result = result.and(read);
        }
        result
    }

    fn write_pio_each<O: OneWire>(
        &self,
        bus: &mut O,
        sensors: &[Ds28ea00],
        state: u8,
    ) -> OneWireResult<(), O::BusError> {
        sensors
            .iter()
            .try_for_each(|sensor| self.write_pio(bus, Some(sensor.rom_code()), state).map(|_| ()))
    }

    /// Writes the PIO output latches of one device, or of every device when `rom` is [`None`].
    ///
    /// The latch byte is sent followed by its complement. The device confirms with
    /// [`VALID_SEQUENCE`] followed by its PIO status byte, which is returned.
    ///
    /// # Errors
    /// - [`OneWireError::NoDevicePresent`] if nothing answers.
    /// - [`OneWireError::InvalidSequence`] if the confirmation byte is wrong.
    pub fn write_pio<O: OneWire>(
        &self,
        bus: &mut O,
        rom: Option<&RomCode>,
        state: u8,
    ) -> OneWireResult<u8, O::BusError> {
        bus.address(rom)?;
        bus.write_bytes(&[ControlCommand::PioAccessWrite.into(), state, !state])?;
        match bus.read_byte()? {
            VALID_SEQUENCE => {}
            END_OF_BUS => return Err(OneWireError::NoDevicePresent),
            other => {
                warn!("PIO write {state:#04x} answered with {other:#04x}");
                return Err(OneWireError::InvalidSequence);
            }
        }
        let status = bus.read_byte()?;
        trace!("PIO write {state:#04x}, status {status:#04x}");
        Ok(status)
    }

    /// Reads the PIO status byte of one device.
    ///
    /// The upper nibble of the status byte is the complement of the lower nibble.
    pub fn read_pio<O: OneWire>(
        &self,
        bus: &mut O,
        rom: &RomCode,
    ) -> OneWireResult<u8, O::BusError> {
        bus.address(Some(rom))?;
        bus.write_byte(PIO_ACCESS_READ)?;
        let status = bus.read_byte()?;
        if status == END_OF_BUS {
            return Err(OneWireError::NoDevicePresent);
        }
        if status >> 4 != !status & 0x0f {
            return Err(OneWireError::InvalidSequence);
        }
        Ok(status)
    }
}
