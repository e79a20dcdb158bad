//! The three envelope sliders (attack, decay, sustain).

use desk_protocol::{ParameterUpdate, Payload};

use crate::config::ControlConfig;

/// One envelope slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnvelopeStage {
    Attack = 0,
    Decay = 1,
    Sustain = 2,
}

impl EnvelopeStage {
    pub const ALL: [EnvelopeStage; 3] = [
        EnvelopeStage::Attack,
        EnvelopeStage::Decay,
        EnvelopeStage::Sustain,
    ];

    /// Command that sets this stage on the engine.
    pub fn command(self) -> &'static str {
        match self {
            EnvelopeStage::Attack => "set-attack",
            EnvelopeStage::Decay => "set-decay",
            EnvelopeStage::Sustain => "set-sustain",
        }
    }
}

/// Normalise a raw ADC reading: full scale reads `0.0`, zero reads `1.0`.
pub fn normalize(raw: u16, max_raw: u16) -> f32 {
    if max_raw == 0 {
        return 0.0;
    }
    1.0 - raw.min(max_raw) as f32 / max_raw as f32
}

/// Tracks the last value sent for each slider.
///
/// A slider is reported again only once it has moved more than the
/// threshold away from the value last sent.
#[derive(Debug, Clone)]
pub struct EnvelopeInputs {
    sent: [f32; 3],
    threshold: f32,
    max_raw: u16,
    module: &'static str,
    slot: u8,
}

impl EnvelopeInputs {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            sent: [0.0; 3],
            threshold: config.envelope_threshold,
            max_raw: config.envelope_adc_max,
            module: config.envelope_module,
            slot: config.envelope_slot,
        }
    }

    /// Value last sent for `stage`.
    pub fn sent(&self, stage: EnvelopeStage) -> f32 {
        self.sent[stage as usize]
    }

    /// Normalised readings that moved past the threshold, per stage.
    pub fn moved(&self, raw: [u16; 3]) -> [Option<f32>; 3] {
        let mut out = [None; 3];
        for stage in EnvelopeStage::ALL {
            let i = stage as usize;
            let value = normalize(raw[i], self.max_raw);
            let diff = value - self.sent[i];
            if diff > self.threshold || diff < -self.threshold {
                out[i] = Some(value);
            }
        }
        out
    }

    /// The `set-*` record for a stage.
    pub fn update_for(&self, stage: EnvelopeStage, value: f32) -> Option<ParameterUpdate> {
        ParameterUpdate::new(self.module, self.slot, stage.command(), Payload::Value(value)).ok()
    }

    /// Remember `value` as sent for `stage`.
    pub fn mark_sent(&mut self, stage: EnvelopeStage, value: f32) {
        self.sent[stage as usize] = value;
    }
}
