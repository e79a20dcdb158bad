//! Audio plane of the desk-8080 panel.
//!
//! The engine streams mono samples as raw big-endian `i32`s over a
//! dedicated serial channel. [`AudioStreamer`] relays them to a stereo
//! [`SampleSink`] one frame at a time:
//!
//! ```text
//! read_frame ─▶ (output opened) ─▶ loop { write(s, s); s = read_frame }
//! ```
//!
//! A read error replays the last frame. Bytes of a half-received frame are
//! kept by [`FrameReader`], so the stream never slips out of alignment.
//!
//! On the panel the channel is a USB CDC-ACM endpoint; [`PacketReader`]
//! turns its packets into a byte stream.
//!
//! Nothing here is shared with the control plane; on the panel the loop
//! owns core 1.
//!
//! # Features
//!
//! - **`defmt`**: logging and [`defmt::Format`] implementations.

#![no_std]

pub use config::{AudioConfig, I2sPins};
pub use error::{AudioConfigError, AudioError};
pub use frame::{AudioFrame, FrameReader};
pub use packet::{PacketReader, PacketSource};
pub use stream::{AudioStreamer, SampleSink};

mod config;
mod error;
mod frame;
mod packet;
mod stream;
