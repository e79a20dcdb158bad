//! Line protocol spoken between the control surface and the synth engine.
//!
//! Every record is one JSON object terminated by `\n`:
//!
//! ```text
//! {"mod":"filter","index":0,"cmd":"cutoff","increase":true}   knob turned
//! {"mod":"filter","index":0,"cmd":"cutoff","value":0.42}      value set
//! {"mod":"filter","index":0,"cmd":"get_data"}                 state request
//! {"log-message":"[ERROR] ..."}                               diagnostic
//! ```
//!
//! A record carries at most one of `increase` or `value`. A record with only
//! `mod` and `index` is also read as a state request. Diagnostics are never
//! turned into a [`ParameterUpdate`].
//!
//! # `no_std` Compatibility
//!
//! No heap allocation: records are encoded into fixed-capacity
//! [`heapless::String`]s and received bytes are framed by [`LineBuffer`].

#![no_std]

mod codec;
mod error;
mod line;
mod record;

pub use codec::{decode, decode_update, encode_command, Codec, Line, Record};
pub use error::{DecodeError, EncodeError, LineError};
pub use line::{LineBuffer, LineStatus};
pub use record::{
    CommandName, ModuleName, ParameterUpdate, Payload, COMMAND_CAPACITY, DEFAULT_MODULE, GET_DATA,
    MODULE_CAPACITY,
};

/// Maximum encoded line length in bytes, newline included.
pub const LINE_CAPACITY: usize = 256;
