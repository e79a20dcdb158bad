//! The serial link to the synth engine.

use core::fmt;

use desk_protocol::EncodeError;
use embedded_io::ReadReady;
use embedded_io_async::{Read, Write};

/// A byte stream to the engine that can tell whether a peer is attached.
///
/// Reads are only issued after [`ReadReady::read_ready`] reported data, so
/// the control loop never blocks on an idle link.
pub trait Link: Read + Write + ReadReady {
    /// Returns `true` while a peer is attached.
    fn is_live(&mut self) -> bool;
}

/// Errors that can occur while talking to the engine.
#[derive(Debug)]
pub enum LinkError<E> {
    /// The transport failed.
    Io(E),
    /// The record could not be encoded.
    Encode(EncodeError),
}

impl<E> From<EncodeError> for LinkError<E> {
    fn from(error: EncodeError) -> Self {
        LinkError::Encode(error)
    }
}

impl<E: fmt::Debug> fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinkError::Io(e) => write!(f, "link I/O error: {:?}", e),
            LinkError::Encode(e) => write!(f, "encode error: {}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for LinkError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            LinkError::Io(e) => defmt::write!(f, "link I/O error: {}", e),
            LinkError::Encode(e) => defmt::write!(f, "encode error: {}", e),
        }
    }
}

/// Write one encoded line.
pub async fn send_line<L: Link>(link: &mut L, line: &str) -> Result<(), LinkError<L::Error>> {
    link.write_all(line.as_bytes())
        .await
        .map_err(LinkError::Io)
}
