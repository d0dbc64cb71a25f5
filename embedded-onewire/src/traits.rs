use crate::{OneWireError, OneWireResult, RomCode, consts};

/// Status of the bus reported by a reset pulse.
pub trait OneWireStatus {
    /// Whether at least one device answered the reset with a presence pulse.
    fn presence(&self) -> bool;

    /// Whether the bus master detected a short circuit during the reset.
    fn shortcircuit(&self) -> bool;

    /// Logic level of the line, if the bus master reports it.
    fn logic_level(&self) -> Option<bool> {
        None
    }

    /// Branch direction taken by the last triplet, if the bus master reports it.
    fn direction(&self) -> Option<bool> {
        None
    }
}

/// Trait for 1-Wire communication.
/// This trait defines the basic operations required for 1-Wire communication, such as resetting the bus,
/// writing and reading bytes, and writing and reading bits.
///
/// Implementors own the bus timing. Everything built on top of this trait only sequences
/// bytes and bits.
pub trait OneWire {
    /// The status type returned by the reset operation.
    type Status: OneWireStatus;
    /// The error type returned by the underlying hardware.
    type BusError;

    /// Resets the 1-Wire bus and returns the status of the bus.
    ///
    /// # Errors
    /// This method returns an error if the reset operation fails.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError>;

    /// Writes a byte to the 1-Wire bus, least significant bit first.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError>;

    /// Reads a byte from the 1-Wire bus.
    ///
    /// A bus nobody drives reads as `0xff`.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError>;

    /// Writes a single bit to the 1-Wire bus.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError>;

    /// Reads a single bit from the 1-Wire bus.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Generates two read time slots followed by one write time slot, as used by the
    /// [search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html).
    ///
    /// If both read slots are 0 the written bit is `direction`. If they differ, the written
    /// bit is the first read bit. If both are 1 (no device responded) a 1 is written.
    ///
    /// # Returns
    /// `(id_bit, complement_bit, direction_taken)`.
    ///
    /// # Errors
    /// Returns [`OneWireError::Unimplemented`] unless the bus master supports triplets in hardware;
    /// the search then falls back to [`read_bit`](OneWire::read_bit) and [`write_bit`](OneWire::write_bit).
    fn read_triplet(&mut self, _direction: bool) -> OneWireResult<(bool, bool, bool), Self::BusError> {
        Err(OneWireError::Unimplemented)
    }

    /// Check if the 1-Wire bus is in overdrive mode.
    fn get_overdrive_mode(&mut self) -> OneWireResult<bool, Self::BusError> {
        Ok(false)
    }

    /// Set the 1-Wire bus to overdrive mode.
    fn set_overdrive_mode(&mut self, _enable: bool) -> OneWireResult<(), Self::BusError> {
        Err(OneWireError::Unimplemented)
    }

    /// Writes a sequence of bytes.
    fn write_bytes(&mut self, bytes: &[u8]) -> OneWireResult<(), Self::BusError> {
        bytes.iter().try_for_each(|&b| self.write_byte(b))
    }

    /// Fills `buf` with bytes read from the bus.
    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for b in buf.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(())
    }

    /// Addresses devices on the 1-Wire bus.
    ///
    /// Resets the bus, then issues Match ROM followed by the ROM code, or Skip ROM when
    /// `rom` is [`None`]. The overdrive variants are used when the bus runs in overdrive.
    /// A read after addressing all devices returns the wired-AND of every answer, so
    /// pass a ROM code on a multidrop bus before reading.
    ///
    /// # Errors
    /// [`OneWireError::NoDevicePresent`] if no presence pulse follows the reset,
    /// [`OneWireError::ShortCircuit`] if the bus is shorted.
    fn address(&mut self, rom: Option<&RomCode>) -> OneWireResult<(), Self::BusError> {
        let od = self.get_overdrive_mode()?;
        let cmd = match (rom.is_some(), od) {
            (true, false) => consts::ONEWIRE_MATCH_ROM_CMD,
            (true, true) => consts::ONEWIRE_MATCH_ROM_CMD_OD,
            (false, false) => consts::ONEWIRE_SKIP_ROM_CMD,
            (false, true) => consts::ONEWIRE_SKIP_ROM_CMD_OD,
        };
        let status = self.reset()?;
        if status.shortcircuit() {
            return Err(OneWireError::ShortCircuit);
        }
        if !status.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        self.write_byte(cmd)?;
        if let Some(rom) = rom {
            self.write_bytes(rom.as_bytes())?;
        }
        Ok(())
    }
}
