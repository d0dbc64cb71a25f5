use crate::{
    OneWire, OneWireStatus, RomCode,
    consts::{ONEWIRE_CONDITIONAL_SEARCH_CMD, ONEWIRE_SEARCH_CMD},
    crc::OneWireCrc,
    error::OneWireError,
};

/// Type of search performed using [`OneWireSearch`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneWireSearchKind {
    /// Normal search
    Normal = ONEWIRE_SEARCH_CMD,
    /// Search only for devices with alarm
    Alarmed = ONEWIRE_CONDITIONAL_SEARCH_CMD,
}

/// State of a ROM search over a 1-Wire bus.
///
/// Borrows the bus for the duration of the search. Devices are returned in ascending
/// order of their ROM code read least significant bit first.
pub struct OneWireSearch<'a, T> {
    onewire: &'a mut T,
    cmd: u8,
    last_device: bool,
    last_discrepancy: u8,
    family: u8,
    rom: [u8; 8],
}

impl<T> core::fmt::Debug for OneWireSearch<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OneWireSearch")
            .field("cmd", &self.cmd)
            .field("last_device", &self.last_device)
            .field("last_discrepancy", &self.last_discrepancy)
            .field("family", &self.family)
            .field("rom", &self.rom)
            .finish()
    }
}

impl<'a, T> OneWireSearch<'a, T> {
    /// Creates a new [`OneWireSearch`] over every device on the bus.
    pub fn new(onewire: &'a mut T, kind: OneWireSearchKind) -> Self {
        Self::with_family(onewire, kind, 0)
    }

    /// Creates a new [`OneWireSearch`] restricted to one family code.
    ///
    /// The search starts on the branch of `family`, and stops as soon as it leaves it.
    /// A family of `0` disables filtering.
    pub fn with_family(onewire: &'a mut T, kind: OneWireSearchKind, family: u8) -> Self {
        let mut search = Self {
            onewire,
            cmd: kind as _,
            last_device: false,
            last_discrepancy: 0,
            family,
            rom: [0; 8],
        };
        search.restart();
        search
    }

    /// Forget all progress; the next call to [`next`](OneWireSearch::next) starts over.
    pub fn restart(&mut self) {
        self.last_device = false;
        self.last_discrepancy = 0;
        self.rom = [self.family, 0, 0, 0, 0, 0, 0, 0];
        if self.family != 0 {
            // Force the first pass down the family branch.
            self.last_discrepancy = 64;
        }
    }
}

impl<T: OneWire> OneWireSearch<'_, T> {
    /// Finds the next device on the bus.
    ///
    /// Implements the [1-Wire search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html).
    /// Returns `Ok(None)` once every device has been reported, when no device
    /// answers a search pass (both the id bit and its complement read 1), or when a
    /// family-restricted search leaves its family.
    ///
    /// # Errors
    /// - [`OneWireError::BusInvalidSpeed`] if the bus runs in overdrive.
    /// - [`OneWireError::NoDevicePresent`] if the reset sees no presence pulse.
    /// - [`OneWireError::ShortCircuit`] if the bus is shorted.
    /// - [`OneWireError::InvalidCrc`] if the assembled ROM code fails its CRC.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<RomCode>, OneWireError<T::BusError>> {
        if self.onewire.get_overdrive_mode()? {
            return Err(OneWireError::BusInvalidSpeed);
        }
        if self.last_device {
            return Ok(None);
        }
        let status = self.onewire.reset()?;
        if status.shortcircuit() {
            return Err(OneWireError::ShortCircuit);
        }
        if !status.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        self.onewire.write_byte(self.cmd)?;

        let mut last_zero = 0u8;
        for bit in 1..=64u8 {
            let idx = ((bit - 1) / 8) as usize;
            let mask = 1u8 << ((bit - 1) % 8);
            let dir = match bit.cmp(&self.last_discrepancy) {
                core::cmp::Ordering::Less => self.rom[idx] & mask != 0,
                core::cmp::Ordering::Equal => true,
                core::cmp::Ordering::Greater => false,
            };
            // Prefer the hardware triplet, fall back to two reads and a write.
            let (id_bit, complement_bit, needs_write) = match self.onewire.read_triplet(dir) {
                Ok((id, cmp, _)) => (id, cmp, false),
                Err(OneWireError::Unimplemented) => {
                    let id = self.onewire.read_bit()?;
                    let cmp = self.onewire.read_bit()?;
                    (id, cmp, true)
                }
                Err(e) => return Err(e),
            };
            if id_bit && complement_bit {
                // nobody left on the bus, a failed pass starts over
                self.restart();
                return Ok(None);
            }
            let taken = if id_bit != complement_bit {
                id_bit
            } else {
                if !dir {
                    last_zero = bit;
                }
                dir
            };
            if taken {
                self.rom[idx] |= mask;
            } else {
                self.rom[idx] &= !mask;
            }
            if needs_write {
                self.onewire.write_bit(taken)?;
            }
        }
        self.last_discrepancy = last_zero;
        self.last_device = last_zero == 0;

        if self.rom[0] == 0 {
            self.restart();
            return Ok(None);
        }
        if !OneWireCrc::validate(&self.rom) {
            return Err(OneWireError::InvalidCrc);
        }
        if self.family != 0 && self.rom[0] != self.family {
            self.last_device = true;
            return Ok(None);
        }
        Ok(Some(RomCode::new(self.rom)))
    }

    /// Verifies that the device with the given ROM code is present on the bus.
    ///
    /// Resets the search state; calling [next](OneWireSearch::next) afterwards starts a new search.
    pub fn verify(&mut self, rom: &RomCode) -> Result<bool, OneWireError<T::BusError>> {
        self.restart();
        let family = core::mem::replace(&mut self.family, 0);
        self.rom = *rom.as_bytes();
        self.last_discrepancy = 64;
        let res = self.next();
        self.family = family;
        self.restart();
        Ok(res? == Some(*rom))
    }
}
