use desk_encoder::Direction;
use desk_oled_display::layout::{self, Side};
use desk_oled_display::ScreenLayout;
use desk_protocol::ParameterUpdate;
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::BinaryColor};

use super::error::TabError;
use super::knob::Knob;
use super::modules;
use super::tab::{check_address, TabHandler};
use super::N_LFOS;

const LFO_NAMES: [&str; N_LFOS as usize] = ["LFO 1", "LFO 2", "LFO 3", "LFO 4"];

/// A module with one or two plain knobs and no hold actions.
///
/// Covers the effect and LFO modules, which differ only in names.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobPairTab {
    name: &'static str,
    module: &'static str,
    slot: u8,
    left: Knob,
    right: Option<Knob>,
}

impl KnobPairTab {
    pub const fn new(
        name: &'static str,
        module: &'static str,
        slot: u8,
        left: Knob,
        right: Option<Knob>,
    ) -> Self {
        Self {
            name,
            module,
            slot,
            left,
            right,
        }
    }

    pub const fn chorus() -> Self {
        Self::new(
            "Chorus",
            modules::CHORUS,
            0,
            Knob::new("speed", "speed"),
            Some(Knob::new("decay", "decay")),
        )
    }

    pub const fn overdrive() -> Self {
        Self::new(
            "OverDrive",
            modules::OVERDRIVE,
            0,
            Knob::new("gain", "gain"),
            None,
        )
    }

    pub const fn reverb() -> Self {
        Self::new(
            "Reverb",
            modules::REVERB,
            0,
            Knob::new("gain", "gain"),
            Some(Knob::new("decay", "decay")),
        )
    }

    pub const fn echo() -> Self {
        Self::new(
            "Echo",
            modules::ECHO,
            0,
            Knob::new("speed", "speed"),
            Some(Knob::new("decay", "decay")),
        )
    }

    /// LFO instance `index`, clamped to the available LFOs.
    pub const fn lfo(index: u8) -> Self {
        let index = if index < N_LFOS { index } else { N_LFOS - 1 };
        Self::new(
            LFO_NAMES[index as usize],
            modules::LFO,
            index,
            Knob::new("speed", "speed"),
            Some(Knob::new("depth", "depth")),
        )
    }

    pub fn left(&self) -> &Knob {
        &self.left
    }

    pub fn right(&self) -> Option<&Knob> {
        self.right.as_ref()
    }
}

impl TabHandler for KnobPairTab {
    fn name(&self) -> &str {
        self.name
    }

    fn module(&self) -> &str {
        self.module
    }

    fn slot(&self) -> u8 {
        self.slot
    }

    fn display<D>(&self, target: &mut D, layout: &ScreenLayout) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        layout::draw_header(target, layout, self.name)?;
        layout::draw_knob(target, layout, Side::Left, self.left.label, self.left.value())?;
        if let Some(right) = &self.right {
            layout::draw_knob(target, layout, Side::Right, right.label, right.value())?;
        }
        Ok(())
    }

    fn apply_update(&mut self, update: &ParameterUpdate) -> Result<(), TabError> {
        check_address(self, update)?;
        let command = update.command.as_str();
        let knob = if command == self.left.command {
            &mut self.left
        } else {
            match self.right.as_mut() {
                Some(right) if command == right.command => right,
                _ => return Err(TabError::UnknownCommand),
            }
        };
        let value = update.value().ok_or(TabError::MissingValue)?;
        knob.set_value(value);
        Ok(())
    }

    fn on_left_rotate(&self, direction: Direction) -> Option<ParameterUpdate> {
        self.left.step(self.module, self.slot, direction)
    }

    fn on_right_rotate(&self, direction: Direction) -> Option<ParameterUpdate> {
        self.right
            .as_ref()
            .and_then(|right| right.step(self.module, self.slot, direction))
    }
}
