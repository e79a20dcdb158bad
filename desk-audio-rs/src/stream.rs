use embedded_io_async::Read;

use crate::error::AudioError;
use crate::frame::{AudioFrame, FrameReader};

/// A synchronous stereo output, e.g. an I2S transmitter.
#[allow(async_fn_in_trait)]
pub trait SampleSink {
    type Error;

    /// Queue one stereo frame, waiting until the output accepts it.
    async fn write_stereo(&mut self, left: i32, right: i32) -> Result<(), Self::Error>;
}

/// Relays frames from a byte source to a [`SampleSink`] in lock-step.
///
/// Each [`step`](Self::step) writes the current frame, then blocks until
/// the next one has been read. There is no buffering beyond one frame: a
/// starved source stalls the output.
pub struct AudioStreamer<R, S> {
    reader: FrameReader<R>,
    sink: S,
    frame: AudioFrame,
    frames: u32,
    source_errors: u32,
    split_frames: u32,
}

impl<R: Read, S: SampleSink> AudioStreamer<R, S> {
    /// `first` is the frame `reader` produced before the output was opened.
    pub fn new(reader: FrameReader<R>, sink: S, first: AudioFrame) -> Self {
        Self {
            reader,
            sink,
            frame: first,
            frames: 0,
            source_errors: 0,
            split_frames: 0,
        }
    }

    /// The frame written on the next step.
    pub fn frame(&self) -> AudioFrame {
        self.frame
    }

    /// Frames written so far (wrapping).
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Failed reads so far (wrapping).
    pub fn source_errors(&self) -> u32 {
        self.source_errors
    }

    /// Failed reads that arrived in the middle of a frame (wrapping). The
    /// bytes already received are kept and the frame is completed later.
    pub fn split_frames(&self) -> u32 {
        self.split_frames
    }

    /// Write the current frame on both channels, then read the next one.
    ///
    /// On a read error the current frame is kept, so the next step replays
    /// it. A partly received frame is resumed, not dropped.
    pub async fn step(&mut self) -> Result<(), AudioError<R::Error, S::Error>> {
        let (left, right) = self.frame.stereo();
        self.sink
            .write_stereo(left, right)
            .await
            .map_err(AudioError::Sink)?;
        self.frames = self.frames.wrapping_add(1);

        match self.reader.read_frame().await {
            Ok(frame) => {
                self.frame = frame;
                Ok(())
            }
            Err(e) => {
                self.source_errors = self.source_errors.wrapping_add(1);
                if self.reader.pending() > 0 {
                    self.split_frames = self.split_frames.wrapping_add(1);
                }
                Err(e.into())
            }
        }
    }

    /// Stream forever. Errors are logged and the loop carries on.
    pub async fn run(&mut self) -> ! {
        #[cfg(feature = "defmt")]
        defmt::info!("audio streaming, first sample {}", self.frame.sample());

        loop {
            match self.step().await {
                Ok(()) => {}
                Err(AudioError::Sink(_)) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("audio sink rejected frame {}", self.frames);
                }
                Err(_) => {
                    // Overruns come in bursts.
                    #[cfg(feature = "defmt")]
                    if self.source_errors.is_power_of_two() {
                        defmt::warn!("audio source error, {} so far", self.source_errors);
                    }
                }
            }
        }
    }
}
