use core::fmt;

use embedded_onewire::OneWireError;

/// Errors raised by a [`TStick`](crate::TStick).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TStickError<E> {
    /// Communication on the 1-Wire bus failed.
    OneWire(OneWireError<E>),
    /// The registration number does not fit in
    /// [`REGISTRATION_CAPACITY`](crate::REGISTRATION_CAPACITY) bytes.
    RegistrationTooLong,
    /// No discovered sensor occupies the slot.
    SlotOutOfRange(usize),
}

impl<E> From<OneWireError<E>> for TStickError<E> {
    fn from(value: OneWireError<E>) -> Self {
        Self::OneWire(value)
    }
}

impl<E: fmt::Debug> fmt::Display for TStickError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneWire(e) => e.fmt(f),
            Self::RegistrationTooLong => f.write_str("registration number too long"),
            Self::SlotOutOfRange(idx) => write!(f, "no sensor in slot {idx}"),
        }
    }
}
