use crate::error::AudioConfigError;
use crate::frame::AudioFrame;

/// Bulk packets a full-speed USB bus schedules per 1 ms frame at 64 bytes
/// each.
const BULK_PACKETS_PER_FRAME: u32 = 19;

/// GPIO numbers of the I2S output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sPins {
    pub bit_clock: u8,
    /// Word select; always the pin after `bit_clock`.
    pub lr_clock: u8,
    pub data: u8,
}

impl Default for I2sPins {
    fn default() -> Self {
        Self {
            bit_clock: 21,
            lr_clock: 22,
            data: 20,
        }
    }
}

/// Configuration of the audio plane.
///
/// [`AudioConfig::default()`] matches the engine's stream: 24 kHz mono
/// samples of 32 bits, carried by a full-speed USB CDC-ACM endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioConfig {
    /// Output sample rate in Hz. Default: 24 000.
    pub sample_rate_hz: u32,
    /// Bits per output sample. Default: 32.
    pub bits_per_sample: u8,
    /// Maximum packet size of the bulk OUT endpoint. Default: 64.
    pub max_packet_size: u16,
    pub pins: I2sPins,
}

impl AudioConfig {
    /// Bytes per second the channel has to carry.
    pub fn required_byte_rate(&self) -> u32 {
        self.sample_rate_hz * AudioFrame::SIZE as u32
    }

    /// Bytes per second a full-speed bulk endpoint can carry.
    pub fn link_byte_rate(&self) -> u32 {
        self.max_packet_size as u32 * BULK_PACKETS_PER_FRAME * 1000
    }

    /// Check that the channel can keep up with the output.
    pub fn validate(&self) -> Result<(), AudioConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(AudioConfigError::ZeroSampleRate);
        }
        if !matches!(self.max_packet_size, 8 | 16 | 32 | 64) {
            return Err(AudioConfigError::PacketSize(self.max_packet_size));
        }
        let (required, available) = (self.required_byte_rate(), self.link_byte_rate());
        if available < required {
            return Err(AudioConfigError::LinkTooSlow {
                required,
                available,
            });
        }
        Ok(())
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 24_000,
            bits_per_sample: 32,
            max_packet_size: 64,
            pins: I2sPins::default(),
        }
    }
}
