//! Quadrature latch state machine.
//!
//! The two encoder leads form a 2-bit Gray code (`pins = a | b << 1`). Every
//! valid transition moves one quarter step forwards or backwards; a detent is
//! only counted once the leads come back to the latch position with a full
//! detent's worth of quarter steps accumulated in one direction. Bounce inside
//! a detent adds and removes quarter steps and therefore never reaches the
//! count.
//!
//! The whole state fits in one `u32`:
//!
//! ```text
//!  31                         8 7      4 3   2 1   0
//! ┌────────────────────────────┬────────┬─────┬─────┐
//! │ position (i24, wrapping)   │ steps  │ dir │ b a │
//! └────────────────────────────┴────────┴─────┴─────┘
//! ```

/// Quarter-step direction for `(previous_pins << 2) | pins`.
///
/// Invalid transitions (both leads changing at once) contribute 0.
pub const DIRECTION_TABLE: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Pin state with both leads low.
pub const LATCH_LOW: u8 = 0b00;

/// Pin state with both leads high.
pub const LATCH_HIGH: u8 = 0b11;

/// Sub-detent steps are clamped to this magnitude so that a long run of
/// invalid transitions cannot overflow the 4-bit field.
const STEP_LIMIT: i8 = 7;

const PINS_MASK: u32 = 0b11;
const DIR_SHIFT: u32 = 2;
const DIR_MASK: u32 = 0b11;
const STEPS_SHIFT: u32 = 4;
const STEPS_MASK: u32 = 0b1111;
const POSITION_SHIFT: u32 = 8;

/// Direction of the most recently completed detent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// No detent completed yet.
    #[default]
    NoRotation,
    /// Detent counter increased.
    Clockwise,
    /// Detent counter decreased.
    CounterClockwise,
}

impl Direction {
    /// Direction implied by the sign of a counter delta.
    pub fn from_delta(delta: i32) -> Self {
        match delta {
            d if d > 0 => Direction::Clockwise,
            d if d < 0 => Direction::CounterClockwise,
            _ => Direction::NoRotation,
        }
    }

    fn to_bits(self) -> u32 {
        match self {
            Direction::NoRotation => 0,
            Direction::Clockwise => 1,
            Direction::CounterClockwise => 2,
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => Direction::Clockwise,
            2 => Direction::CounterClockwise,
            _ => Direction::NoRotation,
        }
    }
}

/// Where the mechanical detent sits in the Gray sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LatchMode {
    /// Four quarter steps per detent, latched with both leads low.
    #[default]
    Four0,
    /// Four quarter steps per detent, latched with both leads high.
    Four3,
    /// Two quarter steps per detent, latched at both-low and both-high.
    Two03,
}

impl LatchMode {
    /// Quarter steps that make up one detent.
    pub fn steps_per_detent(self) -> i8 {
        match self {
            LatchMode::Four0 | LatchMode::Four3 => 4,
            LatchMode::Two03 => 2,
        }
    }

    /// Returns `true` if `pins` is a resting position for this mode.
    pub fn is_latch(self, pins: u8) -> bool {
        match self {
            LatchMode::Four0 => pins == LATCH_LOW,
            LatchMode::Four3 => pins == LATCH_HIGH,
            LatchMode::Two03 => pins == LATCH_LOW || pins == LATCH_HIGH,
        }
    }
}

/// Decoded state of one encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderState {
    pins: u8,
    steps: i8,
    direction: Direction,
    position: i32,
}

impl EncoderState {
    /// State at rest with the given lead levels and a zero counter.
    pub fn at_rest(a: bool, b: bool) -> Self {
        Self {
            pins: pin_bits(a, b),
            ..Self::default()
        }
    }

    /// Level of lead A.
    pub fn pin_a(&self) -> bool {
        self.pins & 0b01 != 0
    }

    /// Level of lead B.
    pub fn pin_b(&self) -> bool {
        self.pins & 0b10 != 0
    }

    /// Quarter steps accumulated since the last latch position.
    pub fn steps(&self) -> i8 {
        self.steps
    }

    /// Detent counter. Wraps at ±2^23.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Direction of the most recently completed detent.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advance the state machine with freshly sampled lead levels.
    ///
    /// Returns the new state and, if this edge completed a detent, its
    /// direction. Sampling the same levels twice is a no-op.
    pub fn step(self, a: bool, b: bool, mode: LatchMode) -> (Self, Option<Direction>) {
        let pins = pin_bits(a, b);
        if pins == self.pins {
            return (self, None);
        }

        let delta = DIRECTION_TABLE[usize::from((self.pins << 2) | pins)];
        let steps = (self.steps + delta).clamp(-STEP_LIMIT, STEP_LIMIT);
        let mut next = Self { pins, steps, ..self };

        if !mode.is_latch(pins) {
            return (next, None);
        }

        let detent = mode.steps_per_detent();
        let direction = if steps >= detent {
            Direction::Clockwise
        } else if steps <= -detent {
            Direction::CounterClockwise
        } else {
            // Back at rest without a full detent: bounce, or a skipped edge.
            next.steps = 0;
            return (next, None);
        };

        next.steps = 0;
        next.direction = direction;
        next.position = match direction {
            Direction::Clockwise => wrap_position(self.position.wrapping_add(1)),
            _ => wrap_position(self.position.wrapping_sub(1)),
        };
        (next, Some(direction))
    }

    /// Pack into the shared word.
    pub fn pack(&self) -> u32 {
        let steps = (self.steps as u32) & STEPS_MASK;
        (u32::from(self.pins) & PINS_MASK)
            | (self.direction.to_bits() << DIR_SHIFT)
            | (steps << STEPS_SHIFT)
            | ((self.position as u32) << POSITION_SHIFT)
    }

    /// Inverse of [`pack`](Self::pack).
    pub fn unpack(word: u32) -> Self {
        // Shift the 4-bit field to the top of an i8 and back to sign-extend it.
        let steps = ((((word >> STEPS_SHIFT) & STEPS_MASK) as u8) << 4) as i8 >> 4;
        Self {
            pins: (word & PINS_MASK) as u8,
            steps,
            direction: Direction::from_bits((word >> DIR_SHIFT) & DIR_MASK),
            position: (word as i32) >> POSITION_SHIFT,
        }
    }
}

/// Signed difference between two detent counters, accounting for the 24-bit
/// wrap of the packed position.
pub fn position_delta(current: i32, previous: i32) -> i32 {
    wrap_position(current.wrapping_sub(previous))
}

fn wrap_position(position: i32) -> i32 {
    (position << POSITION_SHIFT) >> POSITION_SHIFT
}

fn pin_bits(a: bool, b: bool) -> u8 {
    u8::from(a) | (u8::from(b) << 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Gray sequence for one clockwise detent starting and ending at 00.
    const CW: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];
    /// Gray sequence for one counter-clockwise detent starting and ending at 00.
    const CCW: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];

    fn feed(mut state: EncoderState, edges: &[(bool, bool)], mode: LatchMode) -> (EncoderState, usize, Option<Direction>) {
        let mut events = 0;
        let mut last = None;
        for &(a, b) in edges {
            let (next, event) = state.step(a, b, mode);
            state = next;
            if event.is_some() {
                events += 1;
                last = event;
            }
        }
        (state, events, last)
    }

    #[test]
    fn one_clockwise_detent_counts_once() {
        let (state, events, dir) = feed(EncoderState::default(), &CW, LatchMode::Four0);
        assert_eq!(events, 1);
        assert_eq!(dir, Some(Direction::Clockwise));
        assert_eq!(state.position(), 1);
        assert_eq!(state.direction(), Direction::Clockwise);
        assert_eq!(state.steps(), 0);
    }

    #[test]
    fn bounce_at_latch_after_detent_counts_once() {
        let edges = [
            (false, true),
            (true, true),
            (true, false),
            (false, false),
            // Contacts chatter around the rest position just reached.
            (false, true),
            (false, false),
            (false, true),
            (false, false),
            (true, false),
            (false, false),
        ];
        let (state, events, dir) = feed(EncoderState::default(), &edges, LatchMode::Four0);
        assert_eq!(events, 1);
        assert_eq!(dir, Some(Direction::Clockwise));
        assert_eq!(state.position(), 1);
        assert_eq!(state.steps(), 0);
        assert_eq!(state.direction(), Direction::Clockwise);
    }

    #[test]
    fn one_counter_clockwise_detent_counts_once() {
        let (state, events, dir) = feed(EncoderState::default(), &CCW, LatchMode::Four0);
        assert_eq!(events, 1);
        assert_eq!(dir, Some(Direction::CounterClockwise));
        assert_eq!(state.position(), -1);
    }

    #[test]
    fn bounce_inside_detent_does_not_double_count() {
        // Lead B chatters at the start, lead A chatters in the middle.
        let edges = [
            (false, true),
            (false, false),
            (false, true),
            (true, true),
            (false, true),
            (true, true),
            (true, false),
            (false, false),
        ];
        let (state, events, dir) = feed(EncoderState::default(), &edges, LatchMode::Four0);
        assert_eq!(events, 1);
        assert_eq!(dir, Some(Direction::Clockwise));
        assert_eq!(state.position(), 1);
    }

    #[test]
    fn bounce_at_rest_never_counts() {
        let edges = [(false, true), (false, false), (true, false), (false, false)];
        let (state, events, _) = feed(EncoderState::default(), &edges, LatchMode::Four0);
        assert_eq!(events, 0);
        assert_eq!(state.position(), 0);
        assert_eq!(state.steps(), 0);
    }

    #[test]
    fn half_turn_and_back_does_not_count() {
        let edges = [(false, true), (true, true), (false, true), (false, false)];
        let (state, events, _) = feed(EncoderState::default(), &edges, LatchMode::Four0);
        assert_eq!(events, 0);
        assert_eq!(state.position(), 0);
    }

    #[test]
    fn repeated_sample_is_ignored() {
        let state = EncoderState::default();
        let (next, event) = state.step(false, false, LatchMode::Four0);
        assert_eq!(next, state);
        assert!(event.is_none());
    }

    #[test]
    fn skipped_edge_resyncs_without_event() {
        // 00 -> 11 is invalid (both leads flip), then back through 10 to 00.
        let edges = [(true, true), (true, false), (false, false)];
        let (state, events, _) = feed(EncoderState::default(), &edges, LatchMode::Four0);
        assert_eq!(events, 0);
        assert_eq!(state.steps(), 0);
    }

    #[test]
    fn four3_latches_at_both_high() {
        let start = EncoderState::at_rest(true, true);
        let edges = [(true, false), (false, false), (false, true), (true, true)];
        let (state, events, dir) = feed(start, &edges, LatchMode::Four3);
        assert_eq!(events, 1);
        assert_eq!(dir, Some(Direction::Clockwise));
        assert_eq!(state.position(), 1);
    }

    #[test]
    fn two03_counts_two_detents_per_cycle() {
        let (state, events, _) = feed(EncoderState::default(), &CW, LatchMode::Two03);
        assert_eq!(events, 2);
        assert_eq!(state.position(), 2);
    }

    #[test]
    fn many_detents_accumulate() {
        let mut state = EncoderState::default();
        for _ in 0..10 {
            state = feed(state, &CW, LatchMode::Four0).0;
        }
        for _ in 0..3 {
            state = feed(state, &CCW, LatchMode::Four0).0;
        }
        assert_eq!(state.position(), 7);
        assert_eq!(state.direction(), Direction::CounterClockwise);
    }

    #[test]
    fn pack_unpack_preserves_fields() {
        let mut state = EncoderState::default();
        for _ in 0..3 {
            state = feed(state, &CCW, LatchMode::Four0).0;
        }
        // Leave it mid-detent with negative steps.
        let (state, _) = state.step(true, false, LatchMode::Four0);
        let restored = EncoderState::unpack(state.pack());
        assert_eq!(restored, state);
        assert_eq!(restored.position(), -3);
        assert_eq!(restored.steps(), -1);
        assert!(restored.pin_a());
        assert!(!restored.pin_b());
    }

    #[test]
    fn position_delta_handles_wrap() {
        let max = (1 << 23) - 1;
        let min = -(1 << 23);
        assert_eq!(position_delta(min, max), 1);
        assert_eq!(position_delta(max, min), -1);
        assert_eq!(position_delta(5, 2), 3);
    }

    #[test]
    fn direction_from_delta() {
        assert_eq!(Direction::from_delta(3), Direction::Clockwise);
        assert_eq!(Direction::from_delta(-1), Direction::CounterClockwise);
        assert_eq!(Direction::from_delta(0), Direction::NoRotation);
    }
}
