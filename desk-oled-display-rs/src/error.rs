//! Error types for the OLED display driver.

use core::fmt;

use display_interface::DisplayError;

/// Errors that can occur during OLED display operations.
///
/// The `ssd1306` crate wraps all underlying I2C bus errors into
/// [`DisplayError`], so this enum is non-generic.
#[derive(Debug)]
pub enum OledError {
    /// Display interface error (wraps I2C and other bus-level failures).
    Display(DisplayError),
    /// Display hardware did not respond to initialisation.
    InitializationFailed,
    /// A flush was attempted before [`OledDriver::init()`](crate::OledDriver::init)
    /// succeeded.
    NotInitialized,
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Display(e) => write!(f, "display interface error: {:?}", e),
            OledError::InitializationFailed => write!(f, "display initialisation failed"),
            OledError::NotInitialized => write!(f, "display not initialised"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(_e) => defmt::write!(f, "Display interface error"),
            OledError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            OledError::NotInitialized => defmt::write!(f, "Not initialized"),
        }
    }
}
