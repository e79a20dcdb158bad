//! Panel inputs sampled by the control loop once per iteration.

/// Debounce-free levels of the three push buttons, `true` = pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonLevels {
    pub main: bool,
    pub left: bool,
    pub right: bool,
}

/// Source of the non-encoder panel inputs and of time.
#[allow(async_fn_in_trait)]
pub trait ControlInputs {
    type Error;

    /// Raw readings of the attack, decay and sustain sliders.
    async fn envelope(&mut self) -> Result<[u16; 3], Self::Error>;

    /// Current button levels.
    fn buttons(&mut self) -> Result<ButtonLevels, Self::Error>;

    /// Monotonic milliseconds.
    fn now_ms(&mut self) -> u64;
}
