//! Quadrature decoding for the two rotary encoders of the desk-8080 panel.
//!
//! The crate is split into three layers:
//!
//! - **[`latch`]** — the pure latch state machine. [`EncoderState`] packs the
//!   pin levels, the sub-detent step count, the last direction and the detent
//!   counter into a single 32-bit word.
//! - **[`SharedEncoder`]** — an `AtomicU32` holding that word. The edge
//!   handler is the only writer; the control loop reads it without locks and
//!   always observes a whole word.
//! - **[`EncoderPins`]** — owns the two encoder leads, waits for an edge on
//!   either one and publishes the new state.
//!
//! On the reader side, [`EncoderPoller`] compares the detent counter against
//! the value seen on the previous tick and reports a [`Turn`].
//!
//! # Quick start
//!
//! ```no_run
//! use desk_encoder::{EncoderPoller, LatchMode, SharedEncoder};
//!
//! static LEFT: SharedEncoder = SharedEncoder::new();
//!
//! // interrupt side, on every edge of either lead:
//! LEFT.on_edge(true, false, LatchMode::Four0);
//!
//! // control loop:
//! let mut poller = EncoderPoller::new(&LEFT);
//! if let Some(turn) = poller.poll() {
//!     // dispatch turn.direction
//! }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — [`defmt::Format`] implementations on the public types.

#![no_std]

pub use error::EncoderError;
pub use latch::{Direction, EncoderState, LatchMode};
pub use pins::EncoderPins;
pub use shared::{EncoderPoller, SharedEncoder, Turn};

mod error;
pub mod latch;
mod pins;
mod shared;
