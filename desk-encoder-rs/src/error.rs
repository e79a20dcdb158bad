//! Error types for the encoder decoder.

use core::fmt;

/// Errors that can occur while sampling the encoder leads.
#[derive(Debug)]
pub enum EncoderError<E> {
    /// Reading a lead level failed.
    Pin(E),
}

// Allow ergonomic `?` propagation from raw pin errors.
impl<E> From<E> for EncoderError<E> {
    fn from(error: E) -> Self {
        EncoderError::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for EncoderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::Pin(e) => write!(f, "encoder pin error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for EncoderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::Pin(e) => defmt::write!(f, "encoder pin error: {}", e),
        }
    }
}
