/// Reflected form of the Dallas/Maxim polynomial x^8 + x^5 + x^4 + 1.
const POLY: u8 = 0x8c;

#[cfg(feature = "crc-table")]
static TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = bitwise(i as u8);
        i += 1;
    }
    table
};

const fn bitwise(byte: u8) -> u8 {
    let mut crc = byte;
    let mut bit = 0;
    while bit < 8 {
        crc = if crc & 0x1 == 0x1 {
            (crc >> 1) ^ POLY
        } else {
            crc >> 1
        };
        bit += 1;
    }
    crc
}

#[derive(Debug, Default, Clone, Copy)]
/// Calculate CRC-8 used in 1-Wire communications.
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        #[cfg(feature = "crc-table")]
        {
            self.0 = TABLE[(self.0 ^ byte) as usize];
        }
        #[cfg(not(feature = "crc-table"))]
        {
            self.0 = bitwise(self.0 ^ byte);
        }
    }

    /// Compute the CRC of a sequence of bytes.
    pub fn checksum(sequence: &[u8]) -> u8 {
        let mut crc = OneWireCrc::default();
        sequence.iter().for_each(|&b| crc.update(b));
        crc.value()
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    ///
    /// Running the CRC over data followed by its own CRC yields zero.
    pub fn validate(sequence: &[u8]) -> bool {
        !sequence.is_empty() && Self::checksum(sequence) == 0
    }
}
