use desk_encoder::Direction;
use desk_protocol::{ParameterUpdate, Payload};

/// One knob-controlled engine parameter.
///
/// Holds the last value reported by the engine, always within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Knob {
    /// Name drawn under the dial.
    pub label: &'static str,
    /// Command name on the wire.
    pub command: &'static str,
    value: f32,
}

impl Knob {
    /// Value shown before the engine reports anything.
    pub const INITIAL_VALUE: f32 = 0.5;

    pub const fn new(label: &'static str, command: &'static str) -> Self {
        Self {
            label,
            command,
            value: Self::INITIAL_VALUE,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Store a value reported by the engine, clamped to `0.0..=1.0`.
    ///
    /// NaN is ignored.
    pub fn set_value(&mut self, v: f32) {
        if !v.is_nan() {
            self.value = v.clamp(0.0, 1.0);
        }
    }

    /// The step request for turning this knob.
    pub fn step(&self, module: &str, slot: u8, direction: Direction) -> Option<ParameterUpdate> {
        step_request(module, slot, self.command, direction)
    }
}

/// `increase: true` for clockwise, `false` for counter-clockwise.
pub(crate) fn step_request(
    module: &str,
    slot: u8,
    command: &str,
    direction: Direction,
) -> Option<ParameterUpdate> {
    let up = match direction {
        Direction::Clockwise => true,
        Direction::CounterClockwise => false,
        Direction::NoRotation => return None,
    };
    ParameterUpdate::new(module, slot, command, Payload::Increase(up)).ok()
}

/// A payload-less action request (`wave-form-next`, `overtones-toggle`, ...).
pub(crate) fn action_request(module: &str, slot: u8, command: &str) -> Option<ParameterUpdate> {
    ParameterUpdate::new(module, slot, command, Payload::None).ok()
}
