//! Parameter tabs for the desk-8080 control surface.
//!
//! See [`tabs`] for the registry and the concrete tabs.

#![no_std]

pub mod tabs;

pub use tabs::{AnyTab, TabError, TabHandler, TabRegistry, N_TABS};
