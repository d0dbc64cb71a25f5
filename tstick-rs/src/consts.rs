//! Protocol bytes exchanged with DS28EA00 devices.
//!
//! Every value is compared bit-exactly against bytes read off the bus, so values
//! within one category never collide. Values in different categories may coincide
//! (`CHAIN_OFF` shares `0x3c` with the Overdrive-Skip ROM command) because they are
//! only ever interpreted in their own protocol phase.

use embedded_onewire::{ONEWIRE_CONDITIONAL_READ_ROM_CMD, ONEWIRE_MATCH_ROM_CMD};

/// Control function command: enter or leave chain mode.
pub const CHAIN: u8 = 0x99;
/// Control function command: write the PIO output latches.
pub const PIO_ACCESS_WRITE: u8 = 0xa5;

/// ROM function command: Conditional Read ROM.
pub const CONDITIONAL_READ_ROM: u8 = ONEWIRE_CONDITIONAL_READ_ROM_CMD;
/// ROM function command: address one device by its ROM code.
pub const MATCH_ROM: u8 = ONEWIRE_MATCH_ROM_CMD;

/// Chain state: chain mode off.
pub const CHAIN_OFF: u8 = 0x3c;
/// Chain state: device selected in the chain.
pub const CHAIN_ON: u8 = 0x5a;
/// Chain state: device done, passes selection downstream.
pub const CHAIN_DONE: u8 = 0x96;

/// Confirmation byte a device sends after a valid control sequence.
pub const VALID_SEQUENCE: u8 = 0xaa;
/// Level of an undriven bus; nothing left to enumerate.
pub const END_OF_BUS: u8 = 0xff;
/// Family code of DS28EA00 devices.
pub const IS_DS28EA00_SENSOR: u8 = 0x42;

// Function commands of the DS28EA00 not named above.
pub(crate) const WRITE_SCRATCHPAD: u8 = 0x4e;
pub(crate) const READ_SCRATCHPAD: u8 = 0xbe;
pub(crate) const CONVERT_T: u8 = 0x44;
pub(crate) const PIO_ACCESS_READ: u8 = 0xf5;

macro_rules! byte_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            /// Classify a byte read off the bus; unknown bytes are handed back.
            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $(v if v == $value => Ok(Self::$variant),)+
                    other => Err(other),
                }
            }
        }
    };
}

byte_enum! {
    /// Control function commands.
    ControlCommand {
        /// [`CHAIN`]
        Chain = CHAIN,
        /// [`PIO_ACCESS_WRITE`]
        PioAccessWrite = PIO_ACCESS_WRITE,
    }
}

byte_enum! {
    /// ROM function commands.
    RomCommand {
        /// [`CONDITIONAL_READ_ROM`]
        ConditionalReadRom = CONDITIONAL_READ_ROM,
        /// [`MATCH_ROM`]
        MatchRom = MATCH_ROM,
    }
}

byte_enum! {
    /// States of the DS28EA00 chain function.
    ChainState {
        /// [`CHAIN_OFF`]
        Off = CHAIN_OFF,
        /// [`CHAIN_ON`]
        On = CHAIN_ON,
        /// [`CHAIN_DONE`]
        Done = CHAIN_DONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distinct(values: &[u8]) -> bool {
        values
            .iter()
            .enumerate()
            .all(|(i, a)| values[i + 1..].iter().all(|b| a != b))
    }

    #[test]
    fn datasheet_values() {
        assert_eq!(CHAIN, 0x99);
        assert_eq!(PIO_ACCESS_WRITE, 0xa5);
        assert_eq!(CONDITIONAL_READ_ROM, 0x0f);
        assert_eq!(MATCH_ROM, 0x55);
        assert_eq!(CHAIN_OFF, 0x3c);
        assert_eq!(CHAIN_ON, 0x5a);
        assert_eq!(CHAIN_DONE, 0x96);
        assert_eq!(VALID_SEQUENCE, 0xaa);
        assert_eq!(END_OF_BUS, 0xff);
        assert_eq!(IS_DS28EA00_SENSOR, 0x42);
    }

    #[test]
    fn categories_do_not_collide() {
        let control: [u8; 2] = [ControlCommand::Chain.into(), ControlCommand::PioAccessWrite.into()];
        assert!(distinct(&control));
        let chain: heapless::Vec<u8, 3> = ChainState::ALL.iter().map(|&s| s.into()).collect();
        assert_eq!(&chain[..], &[0x3c, 0x5a, 0x96]);
        assert!(distinct(&chain));
        let rom: heapless::Vec<u8, 2> = RomCommand::ALL.iter().map(|&s| s.into()).collect();
        assert!(distinct(&rom));
        let function = [WRITE_SCRATCHPAD, READ_SCRATCHPAD, CONVERT_T, PIO_ACCESS_READ, PIO_ACCESS_WRITE, CHAIN];
        assert!(distinct(&function));
    }

    #[test]
    fn classify_bytes() {
        assert_eq!(ChainState::try_from(0x5a), Ok(ChainState::On));
        assert_eq!(ChainState::try_from(0x00), Err(0x00));
        assert_eq!(ControlCommand::try_from(0x99), Ok(ControlCommand::Chain));
        assert_eq!(RomCommand::try_from(0x0f), Ok(RomCommand::ConditionalReadRom));
        assert_eq!(RomCommand::try_from(CHAIN_OFF), Err(CHAIN_OFF));
    }
}
