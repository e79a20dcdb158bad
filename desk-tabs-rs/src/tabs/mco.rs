use desk_encoder::Direction;
use desk_oled_display::layout::{self, Side};
use desk_oled_display::ScreenLayout;
use desk_protocol::ParameterUpdate;
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::BinaryColor};

use super::error::TabError;
use super::knob::{action_request, Knob};
use super::modules;
use super::tab::{check_address, TabHandler};

/// Oscillator waveform, in the engine's index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    SawTooth,
}

impl Waveform {
    /// Map an engine waveform index.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Waveform::Sine),
            1 => Some(Waveform::Square),
            2 => Some(Waveform::Triangle),
            3 => Some(Waveform::SawTooth),
            _ => None,
        }
    }

    /// Three-letter screen label.
    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "Sin",
            Waveform::Square => "Sqr",
            Waveform::Triangle => "Tri",
            Waveform::SawTooth => "Saw",
        }
    }
}

/// Main oscillator: output volume on the left knob, waveform on the right.
///
/// Holding either knob toggles the overtones.
#[derive(Debug, Clone, PartialEq)]
pub struct McoTab {
    volume: Knob,
    waveform: Waveform,
}

impl Default for McoTab {
    fn default() -> Self {
        Self::new()
    }
}

impl McoTab {
    pub const WAVE_FORM: &'static str = "wave-form";
    pub const WAVE_FORM_NEXT: &'static str = "wave-form-next";
    pub const WAVE_FORM_PREV: &'static str = "wave-form-prev";
    pub const OVERTONES_TOGGLE: &'static str = "overtones-toggle";

    pub const fn new() -> Self {
        Self {
            volume: Knob::new("vol.", "vol"),
            waveform: Waveform::Sine,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume.value()
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    fn overtones_toggle(&self) -> Option<ParameterUpdate> {
        action_request(self.module(), self.slot(), Self::OVERTONES_TOGGLE)
    }
}

impl TabHandler for McoTab {
    fn name(&self) -> &str {
        "VCO"
    }

    fn module(&self) -> &str {
        modules::MCO
    }

    fn slot(&self) -> u8 {
        0
    }

    fn display<D>(&self, target: &mut D, layout: &ScreenLayout) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        layout::draw_header(target, layout, self.name())?;
        layout::draw_knob(target, layout, Side::Left, self.volume.label, self.volume.value())?;
        layout::draw_text(target, layout.centre_text, self.waveform.label())
    }

    fn apply_update(&mut self, update: &ParameterUpdate) -> Result<(), TabError> {
        check_address(self, update)?;
        let command = update.command.as_str();

        if command == self.volume.command {
            let value = update.value().ok_or(TabError::MissingValue)?;
            self.volume.set_value(value);
            Ok(())
        } else if command == Self::WAVE_FORM {
            let value = update.value().ok_or(TabError::MissingValue)?;
            if !(-0.5..3.5).contains(&value) {
                return Err(TabError::InvalidWaveform);
            }
            self.waveform =
                Waveform::from_index((value + 0.5) as u8).ok_or(TabError::InvalidWaveform)?;
            Ok(())
        } else {
            Err(TabError::UnknownCommand)
        }
    }

    fn on_left_rotate(&self, direction: Direction) -> Option<ParameterUpdate> {
        self.volume.step(self.module(), self.slot(), direction)
    }

    fn on_right_rotate(&self, direction: Direction) -> Option<ParameterUpdate> {
        let command = match direction {
            Direction::Clockwise => Self::WAVE_FORM_NEXT,
            Direction::CounterClockwise => Self::WAVE_FORM_PREV,
            Direction::NoRotation => return None,
        };
        action_request(self.module(), self.slot(), command)
    }

    fn on_left_hold(&self) -> Option<ParameterUpdate> {
        self.overtones_toggle()
    }

    fn on_right_hold(&self) -> Option<ParameterUpdate> {
        self.overtones_toggle()
    }
}
