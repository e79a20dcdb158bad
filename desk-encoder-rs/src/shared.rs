//! Lock-free encoder state shared between the edge handler and the control loop.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::latch::{position_delta, Direction, EncoderState, LatchMode};

/// Encoder state published as a single atomic word.
///
/// The edge handler is the only writer: [`on_edge`](Self::on_edge) loads,
/// steps and stores, which needs no compare-and-swap as long as one context
/// owns the writes. Readers use [`snapshot`](Self::snapshot) and always see
/// either the state before or after an edge, never a mix of both.
///
/// `const`-constructible so it can live in a `static` next to the interrupt
/// executor that drives it.
pub struct SharedEncoder {
    word: AtomicU32,
}

impl Default for SharedEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedEncoder {
    /// Both leads low, counter at zero.
    pub const fn new() -> Self {
        Self {
            word: AtomicU32::new(0),
        }
    }

    /// Record the resting lead levels before edges start arriving.
    pub fn seed(&self, a: bool, b: bool) {
        self.publish(EncoderState::at_rest(a, b));
    }

    /// Feed one sampled edge into the latch state machine.
    ///
    /// Must only be called from a single execution context (the edge
    /// handler bound to this encoder's pins).
    pub fn on_edge(&self, a: bool, b: bool, mode: LatchMode) -> Option<Direction> {
        let current = self.snapshot();
        let (next, detent) = current.step(a, b, mode);
        if next != current {
            self.publish(next);
        }
        detent
    }

    /// Overwrite the published state.
    pub fn publish(&self, state: EncoderState) {
        self.word.store(state.pack(), Ordering::Release);
    }

    /// Tear-free read of the current state.
    pub fn snapshot(&self) -> EncoderState {
        EncoderState::unpack(self.word.load(Ordering::Acquire))
    }

    /// Current detent counter.
    pub fn position(&self) -> i32 {
        self.snapshot().position()
    }

    /// Direction of the most recently completed detent.
    pub fn direction(&self) -> Direction {
        self.snapshot().direction()
    }
}

/// A change of the detent counter observed between two polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Turn {
    /// Detents moved since the previous poll (signed).
    pub delta: i32,
    /// Direction implied by `delta`.
    pub direction: Direction,
}

/// Reader-side tracker for one [`SharedEncoder`].
///
/// Holds the counter value seen on the previous tick; a poll that finds the
/// same value reports nothing.
pub struct EncoderPoller<'a> {
    shared: &'a SharedEncoder,
    last_position: i32,
}

impl<'a> EncoderPoller<'a> {
    /// Start tracking from the encoder's current position.
    pub fn new(shared: &'a SharedEncoder) -> Self {
        Self {
            shared,
            last_position: shared.position(),
        }
    }

    /// Compare against the previous tick and return the movement, if any.
    pub fn poll(&mut self) -> Option<Turn> {
        let position = self.shared.position();
        let delta = position_delta(position, self.last_position);
        self.last_position = position;

        if delta == 0 {
            return None;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("encoder turn: delta={}, position={}", delta, position);

        Some(Turn {
            delta,
            direction: Direction::from_delta(delta),
        })
    }

    /// Counter value seen on the previous poll.
    pub fn last_position(&self) -> i32 {
        self.last_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clockwise(encoder: &SharedEncoder) {
        for (a, b) in [(false, true), (true, true), (true, false), (false, false)] {
            encoder.on_edge(a, b, LatchMode::Four0);
        }
    }

    fn counter_clockwise(encoder: &SharedEncoder) {
        for (a, b) in [(true, false), (true, true), (false, true), (false, false)] {
            encoder.on_edge(a, b, LatchMode::Four0);
        }
    }

    #[test]
    fn new_encoder_is_at_rest() {
        let encoder = SharedEncoder::new();
        assert_eq!(encoder.position(), 0);
        assert_eq!(encoder.direction(), Direction::NoRotation);
    }

    #[test]
    fn on_edge_reports_completed_detent() {
        let encoder = SharedEncoder::new();
        assert_eq!(encoder.on_edge(false, true, LatchMode::Four0), None);
        assert_eq!(encoder.on_edge(true, true, LatchMode::Four0), None);
        assert_eq!(encoder.on_edge(true, false, LatchMode::Four0), None);
        assert_eq!(
            encoder.on_edge(false, false, LatchMode::Four0),
            Some(Direction::Clockwise)
        );
        assert_eq!(encoder.position(), 1);
    }

    #[test]
    fn snapshot_matches_published_state() {
        let encoder = SharedEncoder::new();
        encoder.on_edge(false, true, LatchMode::Four0);
        let state = encoder.snapshot();
        assert!(!state.pin_a());
        assert!(state.pin_b());
        assert_eq!(state.steps(), 1);
    }

    #[test]
    fn seed_sets_resting_levels() {
        let encoder = SharedEncoder::new();
        encoder.seed(true, true);
        let state = encoder.snapshot();
        assert!(state.pin_a() && state.pin_b());
        assert_eq!(state.position(), 0);
    }

    #[test]
    fn poller_reports_nothing_without_movement() {
        let encoder = SharedEncoder::new();
        let mut poller = EncoderPoller::new(&encoder);
        assert_eq!(poller.poll(), None);
        assert_eq!(poller.poll(), None);
    }

    #[test]
    fn poller_reports_delta_once() {
        let encoder = SharedEncoder::new();
        let mut poller = EncoderPoller::new(&encoder);

        clockwise(&encoder);
        clockwise(&encoder);
        assert_eq!(
            poller.poll(),
            Some(Turn {
                delta: 2,
                direction: Direction::Clockwise
            })
        );
        assert_eq!(poller.poll(), None);

        counter_clockwise(&encoder);
        assert_eq!(
            poller.poll(),
            Some(Turn {
                delta: -1,
                direction: Direction::CounterClockwise
            })
        );
    }

    #[test]
    fn poller_starts_from_current_position() {
        let encoder = SharedEncoder::new();
        clockwise(&encoder);
        let mut poller = EncoderPoller::new(&encoder);
        assert_eq!(poller.last_position(), 1);
        assert_eq!(poller.poll(), None);
    }

    #[test]
    fn back_and_forth_between_polls_cancels_out() {
        let encoder = SharedEncoder::new();
        let mut poller = EncoderPoller::new(&encoder);
        clockwise(&encoder);
        counter_clockwise(&encoder);
        assert_eq!(poller.poll(), None);
        assert_eq!(encoder.direction(), Direction::CounterClockwise);
    }
}
