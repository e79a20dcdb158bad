//! Edge-driven sampling of the two encoder leads.
//!
//! [`EncoderPins`] owns the A/B inputs of one encoder. On the firmware it is
//! driven from a task on the interrupt executor: every edge on either lead
//! wakes it, it samples both levels and publishes the stepped state to the
//! [`SharedEncoder`] the control loop reads.

use core::convert::Infallible;

use embassy_futures::select::{select, Either};
use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal_async::digital::Wait;

use crate::error::EncoderError;
use crate::latch::{Direction, LatchMode};
use crate::shared::SharedEncoder;

/// Owner of one encoder's lead pins.
pub struct EncoderPins<'a, A, B> {
    a: A,
    b: B,
    mode: LatchMode,
    shared: &'a SharedEncoder,
}

impl<'a, A, B> EncoderPins<'a, A, B>
where
    A: InputPin,
    B: InputPin + ErrorType<Error = A::Error>,
{
    /// Bind the leads to the shared state they publish into.
    ///
    /// No pins are read until [`seed`](Self::seed) or
    /// [`sample`](Self::sample) is called.
    pub fn new(a: A, b: B, shared: &'a SharedEncoder, mode: LatchMode) -> Self {
        Self { a, b, mode, shared }
    }

    /// Publish the current lead levels as the resting state.
    pub fn seed(&mut self) -> Result<(), EncoderError<A::Error>> {
        let a = self.a.is_high()?;
        let b = self.b.is_high()?;
        self.shared.seed(a, b);
        Ok(())
    }

    /// Sample both leads once and step the latch state machine.
    ///
    /// Returns the direction if this sample completed a detent.
    pub fn sample(&mut self) -> Result<Option<Direction>, EncoderError<A::Error>> {
        let a = self.a.is_high()?;
        let b = self.b.is_high()?;
        Ok(self.shared.on_edge(a, b, self.mode))
    }
}

impl<'a, A, B> EncoderPins<'a, A, B>
where
    A: InputPin + Wait,
    B: InputPin + Wait + ErrorType<Error = A::Error>,
{
    /// Seed, then sample on every edge of either lead, forever.
    ///
    /// Only returns if a pin reports an error.
    pub async fn run(&mut self) -> Result<Infallible, EncoderError<A::Error>> {
        self.seed()?;

        loop {
            match select(self.a.wait_for_any_edge(), self.b.wait_for_any_edge()).await {
                Either::First(edge) | Either::Second(edge) => edge?,
            }

            if let Some(_direction) = self.sample()? {
                #[cfg(feature = "defmt")]
                defmt::trace!("detent: {}", _direction);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    struct MockPin<'a> {
        level: &'a Cell<bool>,
    }

    impl ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.level.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.level.get())
        }
    }

    #[test]
    fn sample_publishes_detent() {
        let a = Cell::new(false);
        let b = Cell::new(false);
        let shared = SharedEncoder::new();
        let mut pins = EncoderPins::new(
            MockPin { level: &a },
            MockPin { level: &b },
            &shared,
            LatchMode::Four0,
        );
        pins.seed().unwrap();

        let mut detents = 0;
        for (la, lb) in [(false, true), (true, true), (true, false), (false, false)] {
            a.set(la);
            b.set(lb);
            if pins.sample().unwrap().is_some() {
                detents += 1;
            }
        }

        assert_eq!(detents, 1);
        assert_eq!(shared.position(), 1);
        assert_eq!(shared.direction(), Direction::Clockwise);
    }

    #[test]
    fn seed_reads_resting_levels() {
        let a = Cell::new(true);
        let b = Cell::new(true);
        let shared = SharedEncoder::new();
        let mut pins = EncoderPins::new(
            MockPin { level: &a },
            MockPin { level: &b },
            &shared,
            LatchMode::Four3,
        );
        pins.seed().unwrap();

        let state = shared.snapshot();
        assert!(state.pin_a());
        assert!(state.pin_b());
    }
}
