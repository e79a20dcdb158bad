use embedded_io::ReadExactError;
use embedded_io_async::Read;

/// One signed 32-bit sample as carried on the audio channel.
///
/// On the wire a frame is four big-endian bytes with no framing markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioFrame(pub i32);

impl AudioFrame {
    /// Bytes per frame on the wire.
    pub const SIZE: usize = 4;

    pub const SILENCE: AudioFrame = AudioFrame(0);

    pub const fn from_be_bytes(bytes: [u8; Self::SIZE]) -> Self {
        AudioFrame(i32::from_be_bytes(bytes))
    }

    pub const fn sample(self) -> i32 {
        self.0
    }

    /// The sample on both channels of a stereo frame.
    pub const fn stereo(self) -> (i32, i32) {
        (self.0, self.0)
    }
}

/// Assembles frames from a byte source, one frame at a time.
///
/// Bytes of a frame survive a failed read: the next call resumes filling
/// the same frame, so the stream stays aligned after an error.
pub struct FrameReader<R> {
    source: R,
    partial: [u8; AudioFrame::SIZE],
    filled: usize,
}

impl<R: Read> FrameReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            partial: [0; AudioFrame::SIZE],
            filled: 0,
        }
    }

    /// Bytes of the next frame already received.
    pub fn pending(&self) -> usize {
        self.filled
    }

    /// Block until the current frame is complete.
    ///
    /// An error leaves the bytes received so far in place for the next call.
    /// A source that reports end of stream yields
    /// [`ReadExactError::UnexpectedEof`].
    pub async fn read_frame(&mut self) -> Result<AudioFrame, ReadExactError<R::Error>> {
        while self.filled < AudioFrame::SIZE {
            match self.source.read(&mut self.partial[self.filled..]).await {
                Ok(0) => return Err(ReadExactError::UnexpectedEof),
                Ok(n) => self.filled += n,
                Err(e) => return Err(ReadExactError::Other(e)),
            }
        }
        self.filled = 0;
        Ok(AudioFrame::from_be_bytes(self.partial))
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}
