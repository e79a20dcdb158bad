use core::fmt;

/// Errors of the audio streaming loop.
///
/// `R` is the error type of the sample source, `S` that of the sink.
#[derive(Debug)]
pub enum AudioError<R, S> {
    /// The source failed (overrun, framing, break).
    Source(R),
    /// The source ended in the middle of a frame.
    Truncated,
    /// The output rejected a frame.
    Sink(S),
}

impl<R, S> From<embedded_io::ReadExactError<R>> for AudioError<R, S> {
    fn from(error: embedded_io::ReadExactError<R>) -> Self {
        match error {
            embedded_io::ReadExactError::UnexpectedEof => AudioError::Truncated,
            embedded_io::ReadExactError::Other(e) => AudioError::Source(e),
        }
    }
}

impl<R: fmt::Debug, S: fmt::Debug> fmt::Display for AudioError<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AudioError::Source(e) => write!(f, "audio source error: {:?}", e),
            AudioError::Truncated => write!(f, "audio source ended mid-frame"),
            AudioError::Sink(e) => write!(f, "audio sink error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<R: defmt::Format, S: defmt::Format> defmt::Format for AudioError<R, S> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            AudioError::Source(e) => defmt::write!(f, "audio source error: {}", e),
            AudioError::Truncated => defmt::write!(f, "audio source ended mid-frame"),
            AudioError::Sink(e) => defmt::write!(f, "audio sink error: {}", e),
        }
    }
}

/// An [`AudioConfig`](crate::AudioConfig) the hardware cannot honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioConfigError {
    ZeroSampleRate,
    /// Not a legal full-speed bulk packet size.
    PacketSize(u16),
    /// The channel carries fewer bytes per second than the output consumes.
    LinkTooSlow { required: u32, available: u32 },
}

impl fmt::Display for AudioConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AudioConfigError::ZeroSampleRate => write!(f, "sample rate is zero"),
            AudioConfigError::PacketSize(n) => write!(f, "invalid packet size {}", n),
            AudioConfigError::LinkTooSlow {
                required,
                available,
            } => write!(
                f,
                "link carries {} B/s, output needs {} B/s",
                available, required
            ),
        }
    }
}
