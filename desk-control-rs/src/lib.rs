//! Control plane of the desk-8080 panel.
//!
//! [`ControlLoop`] owns the engine link, the display surface, the tab
//! registry and the panel inputs, and runs them as one cooperative loop:
//!
//! - **[`connection`]**: heartbeat on the indicator while no engine is
//!   attached, liveness tracking afterwards. Every (re)connect requests the
//!   active tab's state.
//! - **[`button`]**: debounced click / double-click / long-press detection.
//!   The side buttons switch tabs; the main button is reserved.
//! - **[`envelope`]**: the attack/decay/sustain sliders, sent when they move
//!   past a threshold.
//! - **[`link`]**: the byte stream to the engine and line sending.
//!
//! Hardware is reached only through traits ([`Link`], [`ControlInputs`],
//! [`Surface`](desk_oled_display::Surface) and the `embedded-hal` pin and
//! delay traits), so the loop runs unchanged against host mocks.
//!
//! # Features
//!
//! - **`defmt`**: logging and [`defmt::Format`] implementations.

#![no_std]

pub mod button;
pub mod config;
pub mod connection;
mod control_loop;
pub mod envelope;
pub mod inputs;
pub mod link;

pub use button::{ButtonDetector, ButtonEvent};
pub use config::{ButtonTiming, ControlConfig};
pub use connection::{ConnectionState, ConnectionSupervisor, LinkEvent};
pub use control_loop::ControlLoop;
pub use envelope::{EnvelopeInputs, EnvelopeStage};
pub use inputs::{ButtonLevels, ControlInputs};
pub use link::{send_line, Link, LinkError};
