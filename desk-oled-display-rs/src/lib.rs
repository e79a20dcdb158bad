//! Async OLED display driver and dial layout for the desk-8080 panel.
//!
//! This crate provides [`OledDriver`], a wrapper around the [`ssd1306`]
//! crate in async buffered-graphics mode, the [`Surface`] trait the tab
//! dispatcher draws through, and the shared dial geometry in [`layout`].
//!
//! # Quick Start
//!
//! ```ignore
//! use desk_oled_display::{layout, OledDriver, ScreenLayout, Surface};
//!
//! let mut oled = OledDriver::new(i2c_oled, 0x3C);
//! oled.init().await?;
//!
//! let screen = ScreenLayout::default();
//! oled.clear();
//! layout::draw_header(oled.target(), &screen, "LowPass").ok();
//! layout::draw_dial(oled.target(), screen.left_dial, screen.dial_radius, 0.5).ok();
//! oled.present().await?;
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`].

#![no_std]

pub mod driver;
pub mod error;
pub mod layout;
pub mod surface;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use driver::OledDriver;
pub use error::OledError;
pub use layout::ScreenLayout;
pub use surface::Surface;
