//! Core OLED driver wrapping the `ssd1306` crate in async buffered graphics mode.
//!
//! [`OledDriver`] manages the SSD1306 display lifecycle: construction without
//! I2C traffic, explicit async initialisation, and frame buffer flush.

use display_interface_i2c::I2CInterface;
use embedded_hal_async::i2c::I2c;
use ssd1306::{
    mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async,
};

use crate::error::OledError;
use crate::surface::Surface;

/// Concrete frame buffer type drawn into by tabs.
pub type Display<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Async driver for an SSD1306 128×64 OLED display over I2C.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`] constructs the driver without any I2C traffic.
/// 2. [`OledDriver::init()`] sends the SSD1306 initialisation sequence.
/// 3. Draw into the frame buffer via [`Surface::target()`].
/// 4. [`OledDriver::flush()`] transfers the frame buffer to hardware.
///
/// The frame buffer can be drawn into before `init()`; only `flush()`
/// requires an initialised panel.
pub struct OledDriver<I2C> {
    display: Display<I2C>,
    initialized: bool,
}

impl<I2C> OledDriver<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised driver.
    ///
    /// # Arguments
    /// * `i2c`: I2C peripheral (takes ownership for exclusive access).
    /// * `address`: 7-bit I2C device address (typically `0x3C` or `0x3D`).
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
        }
    }

    /// Initialise the SSD1306 hardware.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::InitializationFailed`] if the display does not
    /// respond.
    pub async fn init(&mut self) -> Result<(), OledError> {
        self.display
            .init()
            .await
            .map_err(|_| OledError::InitializationFailed)?;
        self.initialized = true;

        #[cfg(feature = "defmt")]
        defmt::info!("OLED initialised");

        Ok(())
    }

    /// Clear the in-memory frame buffer. No I2C traffic.
    pub fn clear_buffer(&mut self) {
        self.display.clear_buffer();
    }

    /// Transfer the frame buffer to the display via I2C.
    ///
    /// At 400 kHz I2C this takes approximately 20 ms for a full 1024-byte
    /// frame.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::NotInitialized`] if [`init()`](Self::init) has
    /// not been called, or [`OledError::Display`] on a bus-level failure.
    pub async fn flush(&mut self) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.flush().await?;
        Ok(())
    }

    /// Direct access to the underlying `ssd1306` frame buffer.
    pub fn display_mut(&mut self) -> &mut Display<I2C> {
        &mut self.display
    }

    /// Check whether the display has been successfully initialised.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl<I2C> Surface for OledDriver<I2C>
where
    I2C: I2c,
{
    type Target = Display<I2C>;
    type Error = OledError;

    fn clear(&mut self) {
        self.clear_buffer();
    }

    fn target(&mut self) -> &mut Self::Target {
        self.display_mut()
    }

    async fn present(&mut self) -> Result<(), OledError> {
        self.flush().await
    }
}
