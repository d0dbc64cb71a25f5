#![no_std]
#![deny(missing_docs)]
//! # embedded-onewire
//! A no-std abstraction of the 1-Wire bus.
//!
//! The [OneWire] trait defines the primitive operations a bus master offers (reset with presence
//! detection, byte and bit transfers, optional triplet and overdrive support). Bus timing lives
//! entirely behind the trait: a bit-banged GPIO pin and an I2C bridge chip implement it alike.
//!
//! On top of the trait the crate provides:
//! - [RomCode], the 64-bit registration number every device carries,
//! - [OneWireCrc], the Dallas/Maxim CRC-8 used for ROM codes and scratchpads,
//! - [OneWireSearch], the [search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html)
//!   used to enumerate devices on a bus.

pub mod consts;
mod crc;
mod error;
mod rom;
mod search;
mod traits;

pub use consts::*;
pub use crc::OneWireCrc;
pub use error::OneWireError;
pub use rom::RomCode;
pub use search::{OneWireSearch, OneWireSearchKind};
pub use traits::{OneWire, OneWireStatus};

/// Result of a 1-Wire operation.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
