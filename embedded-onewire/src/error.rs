use core::fmt;

/// One wire communication error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying hardware.
    Other(E),
    /// Indicates that no device is present on the bus, or that an addressed
    /// device did not drive the bus when it was expected to answer.
    NoDevicePresent,
    /// Indicates that the bus is busy, which may happen if a device is already communicating.
    BusInUse,
    /// Indicates that a short circuit was detected on the bus.
    ShortCircuit,
    /// Indicates that the operation is not implemented, such as reading a triplet when not supported.
    Unimplemented,
    /// Computed CRC of a ROM code or scratchpad is invalid.
    InvalidCrc,
    /// The operation requires the bus to run at standard speed.
    BusInvalidSpeed,
    /// A device answered a control function with something other than the
    /// expected confirmation byte.
    InvalidSequence,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E: fmt::Debug> fmt::Display for OneWireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(e) => write!(f, "bus error: {e:?}"),
            Self::NoDevicePresent => f.write_str("no device present"),
            Self::BusInUse => f.write_str("bus in use"),
            Self::ShortCircuit => f.write_str("short circuit detected on the bus"),
            Self::Unimplemented => f.write_str("operation not implemented by the bus"),
            Self::InvalidCrc => f.write_str("CRC mismatch"),
            Self::BusInvalidSpeed => f.write_str("bus is in overdrive mode"),
            Self::InvalidSequence => f.write_str("device did not confirm the command sequence"),
        }
    }
}
