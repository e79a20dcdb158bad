//! Error types for encoding, decoding and line framing.

use core::fmt;

/// Errors that can occur while building an outbound line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// A module or command name does not fit its fixed capacity.
    IdentifierTooLong,
    /// The encoded record does not fit in one line buffer.
    BufferFull,
    /// A `value` payload is NaN or infinite.
    NonFiniteValue,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodeError::IdentifierTooLong => write!(f, "identifier exceeds capacity"),
            EncodeError::BufferFull => write!(f, "encoded record exceeds line capacity"),
            EncodeError::NonFiniteValue => write!(f, "value is not finite"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EncodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncodeError::IdentifierTooLong => defmt::write!(f, "identifier exceeds capacity"),
            EncodeError::BufferFull => defmt::write!(f, "encoded record exceeds line capacity"),
            EncodeError::NonFiniteValue => defmt::write!(f, "value is not finite"),
        }
    }
}

/// Errors that can occur while decoding one received line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The line holds nothing but whitespace.
    Empty,
    /// The line is not a well-formed JSON object of the expected shape.
    Syntax,
    /// Non-whitespace bytes follow the JSON object.
    TrailingData,
    /// A required field is absent.
    MissingField(&'static str),
    /// Both `increase` and `value` are present.
    ConflictingPayload,
    /// A diagnostic record also carries command fields.
    MixedRecord,
    /// A string field exceeds its fixed capacity.
    FieldTooLong(&'static str),
    /// A diagnostic arrived where a parameter update was required.
    NotAnUpdate,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "empty line"),
            DecodeError::Syntax => write!(f, "malformed record"),
            DecodeError::TrailingData => write!(f, "trailing data after record"),
            DecodeError::MissingField(name) => write!(f, "missing field '{}'", name),
            DecodeError::ConflictingPayload => write!(f, "both 'increase' and 'value' present"),
            DecodeError::MixedRecord => write!(f, "log message mixed with command fields"),
            DecodeError::FieldTooLong(name) => write!(f, "field '{}' too long", name),
            DecodeError::NotAnUpdate => write!(f, "record is not a parameter update"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DecodeError::Empty => defmt::write!(f, "empty line"),
            DecodeError::Syntax => defmt::write!(f, "malformed record"),
            DecodeError::TrailingData => defmt::write!(f, "trailing data after record"),
            DecodeError::MissingField(name) => defmt::write!(f, "missing field '{=str}'", name),
            DecodeError::ConflictingPayload => {
                defmt::write!(f, "both 'increase' and 'value' present")
            }
            DecodeError::MixedRecord => defmt::write!(f, "log message mixed with command fields"),
            DecodeError::FieldTooLong(name) => defmt::write!(f, "field '{=str}' too long", name),
            DecodeError::NotAnUpdate => defmt::write!(f, "record is not a parameter update"),
        }
    }
}

/// Errors reported by [`LineBuffer`](crate::LineBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// The line outgrew the buffer and was discarded.
    Overflow,
    /// The completed line is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LineError::Overflow => write!(f, "line too long, discarded"),
            LineError::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LineError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            LineError::Overflow => defmt::write!(f, "line too long, discarded"),
            LineError::InvalidUtf8 => defmt::write!(f, "line is not valid UTF-8"),
        }
    }
}
