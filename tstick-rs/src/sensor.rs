use embedded_onewire::{OneWireCrc, RomCode};
use fixed::types::I12F4;

use crate::consts::{END_OF_BUS, IS_DS28EA00_SENSOR};

/// Temperature data type used by the DS28EA00 devices.
///
/// The temperature register is a two's complement value in units of 1/16 °C,
/// i.e. 12 integer bits and 4 fractional bits.
pub type Temperature = I12F4;

/// Last known state of one DS28EA00 on the bus.
///
/// A default record has an all-zero ROM code and marks an unused slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Ds28ea00 {
    rom_code: RomCode,
    /// Raw temperature register, LSB = 1/16 °C, undefined low bits cleared.
    pub raw_temp: i16,
    /// Configuration register (resolution) as last read from the scratchpad.
    pub config_register: u8,
    /// Temperature derived from [`raw_temp`](Ds28ea00::raw_temp).
    pub temperature: Temperature,
    /// Last PIO status byte reported by the device.
    pub pio_state: u8,
}

impl Ds28ea00 {
    /// Record for a freshly discovered device.
    pub fn new(rom_code: RomCode) -> Self {
        Self {
            rom_code,
            ..Default::default()
        }
    }

    /// ROM code of the device. Fixed at discovery.
    pub fn rom_code(&self) -> &RomCode {
        &self.rom_code
    }

    /// Whether this record is a placeholder rather than a discovered device.
    pub fn is_unused(&self) -> bool {
        self.rom_code.is_unused()
    }

    /// Whether the ROM code carries the DS28EA00 family code.
    pub fn is_ds28ea00(&self) -> bool {
        self.rom_code.family() == IS_DS28EA00_SENSOR
    }

    /// Temperature in degrees Celsius.
    pub fn celsius(&self) -> f32 {
        self.temperature.to_num()
    }

    /// Resolution encoded in the last read configuration register, if valid.
    pub fn resolution(&self) -> Option<ReadoutResolution> {
        ReadoutResolution::try_from(self.config_register).ok()
    }

    /// Refresh temperature and configuration from a scratchpad read.
    ///
    /// The configuration byte in the scratchpad decides how many low bits of the
    /// temperature register are defined; the rest are cleared.
    pub fn update_from_scratchpad(&mut self, scratchpad: &Scratchpad) {
        self.config_register = scratchpad.config_register();
        let resolution = self.resolution().unwrap_or_default();
        self.raw_temp = scratchpad.raw_temperature(resolution);
        self.temperature = Temperature::from_bits(self.raw_temp);
    }
}

/// The 9-byte scratchpad of a DS28EA00.
///
/// | Byte | Content |
/// |------|---------|
/// | 0    | Temperature LSB |
/// | 1    | Temperature MSB |
/// | 2    | T<sub>H</sub> alarm register |
/// | 3    | T<sub>L</sub> alarm register |
/// | 4    | Configuration register |
/// | 5-7  | Reserved |
/// | 8    | CRC-8 of bytes 0 to 7 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scratchpad([u8; 9]);

impl Scratchpad {
    /// Number of bytes in the scratchpad.
    pub const LEN: usize = 9;

    /// Wrap raw scratchpad bytes.
    pub fn from_bytes(bytes: [u8; 9]) -> Self {
        Self(bytes)
    }

    /// Raw scratchpad bytes.
    pub fn as_bytes(&self) -> &[u8; 9] {
        &self.0
    }

    /// CRC check over the whole scratchpad.
    pub fn is_valid(&self) -> bool {
        OneWireCrc::validate(&self.0)
    }

    /// Every byte read as an undriven bus: the addressed device never answered.
    pub fn is_absent(&self) -> bool {
        self.0.iter().all(|&b| b == END_OF_BUS)
    }

    /// Temperature register with bits undefined at `resolution` cleared.
    pub fn raw_temperature(&self, resolution: ReadoutResolution) -> i16 {
        i16::from_le_bytes([self.0[0] & resolution.bitmask(), self.0[1]])
    }

    /// High alarm threshold in °C.
    pub fn t_high(&self) -> i8 {
        self.0[2] as i8
    }

    /// Low alarm threshold in °C.
    pub fn t_low(&self) -> i8 {
        self.0[3] as i8
    }

    /// Configuration register.
    pub fn config_register(&self) -> u8 {
        self.0[4]
    }
}

/// Represents the readout resolution of the DS28EA00 devices.
/// The resolution determines the time required for the temperature conversion and the precision of the temperature readings.
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ReadoutResolution {
    /// 9-bit resolution, with a conversion time of 93.75 ms.
    Resolution9bit = 0x1f,
    /// 10-bit resolution, with a conversion time of 187.5 ms.
    Resolution10bit = 0x3f,
    /// 11-bit resolution, with a conversion time of 375 ms.
    Resolution11bit = 0x5f,
    /// 12-bit resolution, with a conversion time of 750 ms.
    #[default]
    Resolution12bit = 0x7f,
}

impl ReadoutResolution {
    /// Conversion time in microseconds.
    pub fn delay_us(&self) -> u32 {
        use ReadoutResolution::*;
        match self {
            Resolution9bit => 93750,
            Resolution10bit => 187500,
            Resolution11bit => 375000,
            Resolution12bit => 750000,
        }
    }

    #[inline]
    pub(crate) fn bitmask(&self) -> u8 {
        use ReadoutResolution::*;
        match self {
            Resolution9bit => 0xf8,
            Resolution10bit => 0xfc,
            Resolution11bit => 0xfe,
            Resolution12bit => 0xff,
        }
    }
}

impl TryFrom<u8> for ReadoutResolution {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ReadoutResolution::*;
        match value {
            0x1f => Ok(Resolution9bit),
            0x3f => Ok(Resolution10bit),
            0x5f => Ok(Resolution11bit),
            0x7f => Ok(Resolution12bit),
            _ => Err("Invalid readout resolution"),
        }
    }
}
