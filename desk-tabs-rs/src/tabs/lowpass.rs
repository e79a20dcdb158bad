use desk_encoder::Direction;
use desk_oled_display::layout::{self, Side};
use desk_oled_display::ScreenLayout;
use desk_protocol::ParameterUpdate;
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::BinaryColor};

use super::error::TabError;
use super::knob::Knob;
use super::modules;
use super::tab::{check_address, TabHandler};

/// Low-pass filter: cutoff on the left knob, resonance on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct LowPassTab {
    cutoff: Knob,
    resonance: Knob,
}

impl Default for LowPassTab {
    fn default() -> Self {
        Self::new()
    }
}

impl LowPassTab {
    pub const fn new() -> Self {
        Self {
            cutoff: Knob::new("cutoff", "cutoff"),
            resonance: Knob::new("res", "resonance"),
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff.value()
    }

    pub fn resonance(&self) -> f32 {
        self.resonance.value()
    }
}

impl TabHandler for LowPassTab {
    fn name(&self) -> &str {
        "LowPass"
    }

    fn module(&self) -> &str {
        modules::FILTER
    }

    fn slot(&self) -> u8 {
        0
    }

    fn display<D>(&self, target: &mut D, layout: &ScreenLayout) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        layout::draw_header(target, layout, self.name())?;
        layout::draw_knob(target, layout, Side::Left, self.cutoff.label, self.cutoff.value())?;
        layout::draw_knob(
            target,
            layout,
            Side::Right,
            self.resonance.label,
            self.resonance.value(),
        )
    }

    fn apply_update(&mut self, update: &ParameterUpdate) -> Result<(), TabError> {
        check_address(self, update)?;
        let knob = match update.command.as_str() {
            c if c == self.cutoff.command => &mut self.cutoff,
            c if c == self.resonance.command => &mut self.resonance,
            _ => return Err(TabError::UnknownCommand),
        };
        let value = update.value().ok_or(TabError::MissingValue)?;
        knob.set_value(value);
        Ok(())
    }

    fn on_left_rotate(&self, direction: Direction) -> Option<ParameterUpdate> {
        self.cutoff.step(self.module(), self.slot(), direction)
    }

    fn on_right_rotate(&self, direction: Direction) -> Option<ParameterUpdate> {
        self.resonance.step(self.module(), self.slot(), direction)
    }
}

#[cfg(test)]
mod tests {
    use desk_protocol::Payload;

    use super::*;

    #[test]
    fn knobs_address_filter_module() {
        let tab = LowPassTab::new();
        let left = tab.on_left_rotate(Direction::Clockwise).unwrap();
        assert_eq!(left.module.as_str(), "filter");
        assert_eq!(left.command.as_str(), "cutoff");
        assert_eq!(left.payload, Payload::Increase(true));

        let right = tab.on_right_rotate(Direction::CounterClockwise).unwrap();
        assert_eq!(right.command.as_str(), "resonance");
        assert_eq!(right.payload, Payload::Increase(false));
    }

    #[test]
    fn holds_do_nothing() {
        let tab = LowPassTab::new();
        assert!(tab.on_left_hold().is_none());
        assert!(tab.on_right_hold().is_none());
    }

    #[test]
    fn apply_sets_and_clamps() {
        let mut tab = LowPassTab::new();
        let cutoff = ParameterUpdate::new("filter", 0, "cutoff", Payload::Value(0.42)).unwrap();
        let res = ParameterUpdate::new("filter", 0, "resonance", Payload::Value(3.0)).unwrap();
        tab.apply_update(&cutoff).unwrap();
        tab.apply_update(&res).unwrap();
        assert_eq!(tab.cutoff(), 0.42);
        assert_eq!(tab.resonance(), 1.0);
    }

    #[test]
    fn apply_rejects_wrong_slot() {
        let mut tab = LowPassTab::new();
        let update = ParameterUpdate::new("filter", 1, "cutoff", Payload::Value(0.1)).unwrap();
        assert_eq!(tab.apply_update(&update), Err(TabError::ForeignModule));
        assert_eq!(tab.cutoff(), 0.5);
    }

    #[test]
    fn state_request_targets_filter() {
        let request = LowPassTab::new().state_request().unwrap();
        assert!(request.is_state_request());
        assert_eq!(request.module.as_str(), "filter");
    }
}
