//! ROM function command constants for 1-Wire communication.
//!
//! ROM function commands are the first byte sent after a reset pulse. They select which
//! device(s) the following control function command applies to.

/// Command to match a specific ROM address in 1-Wire communication (non-overdrive mode).
///
/// Followed by the 8 bytes of the [RomCode](crate::RomCode), least significant (family) byte first.
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to skip ROM address in 1-Wire communication (non-overdrive mode).
///
/// Addresses every device on the bus at once.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Conditional Read ROM.
///
/// Only devices whose chain state is `ON` respond by returning their ROM code. Once the
/// chain sequence has passed the last device, nothing drives the bus and the
/// master reads `0xff` bytes.
pub const ONEWIRE_CONDITIONAL_READ_ROM_CMD: u8 = 0x0f;

/// The Overdrive-Match ROM command followed by a 64-bit
/// ROM sequence transmitted at overdrive speed addresses a
/// specific device on a multidrop bus and simultaneously sets
/// it in overdrive mode. Devices already in overdrive mode remain
/// there until the next reset pulse of minimum 480μs duration.
pub const ONEWIRE_MATCH_ROM_CMD_OD: u8 = 0x69;

/// On a single-drop bus this command accesses the control
/// functions without providing the 64-bit ROM code and sets the
/// device in overdrive mode. All communication following this
/// command has to occur at overdrive speed until a reset pulse of
/// minimum 480μs duration returns all devices to standard speed.
pub const ONEWIRE_SKIP_ROM_CMD_OD: u8 = 0x3c;

/// Command to search for devices on the 1-Wire bus.
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;

/// Command to search for devices in alarm state on the 1-Wire bus.
pub const ONEWIRE_CONDITIONAL_SEARCH_CMD: u8 = 0xec;
