use core::fmt;

use crate::OneWireCrc;

/// 64-bit registration number burned into every 1-Wire device.
///
/// | Byte | Description |
/// |------|-------------|
/// | 0    | Family code (e.g., `0x42` for DS28EA00) |
/// | 1-6  | Serial number, least significant byte first |
/// | 7    | CRC-8 of bytes 0 to 6 |
///
/// Bytes are stored in the order they travel on the wire. Converting to and
/// from [`u64`] uses little-endian order, so the family code is the least
/// significant byte of the integer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RomCode([u8; 8]);

impl RomCode {
    /// Length of a ROM code in bytes.
    pub const LEN: usize = 8;

    /// The all-zero ROM code, which no real device carries.
    pub const ZERO: Self = Self([0; 8]);

    /// Wrap the raw bytes of a ROM code.
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Build a ROM code from a family code and a 48-bit serial number,
    /// appending the matching CRC.
    pub fn from_parts(family: u8, serial: [u8; 6]) -> Self {
        let mut bytes = [0; 8];
        bytes[0] = family;
        bytes[1..7].copy_from_slice(&serial);
        bytes[7] = OneWireCrc::checksum(&bytes[..7]);
        Self(bytes)
    }

    /// Raw bytes in wire order.
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Family code of the device.
    pub const fn family(&self) -> u8 {
        self.0[0]
    }

    /// The 48-bit serial number.
    pub fn serial(&self) -> [u8; 6] {
        let mut serial = [0; 6];
        serial.copy_from_slice(&self.0[1..7]);
        serial
    }

    /// CRC byte stored in the ROM code.
    pub const fn crc(&self) -> u8 {
        self.0[7]
    }

    /// Check the stored CRC against the family code and serial number.
    pub fn is_valid(&self) -> bool {
        OneWireCrc::validate(&self.0)
    }

    /// An all-zero ROM code marks an unused record.
    pub fn is_unused(&self) -> bool {
        self.0 == [0; 8]
    }
}

impl From<[u8; 8]> for RomCode {
    fn from(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl From<u64> for RomCode {
    fn from(value: u64) -> Self {
        Self(value.to_le_bytes())
    }
}

impl From<RomCode> for u64 {
    fn from(rom: RomCode) -> Self {
        u64::from_le_bytes(rom.0)
    }
}

impl fmt::LowerHex for RomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

impl fmt::Display for RomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}
