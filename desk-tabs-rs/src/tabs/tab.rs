use desk_encoder::Direction;
use desk_oled_display::ScreenLayout;
use desk_protocol::ParameterUpdate;
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::BinaryColor};

use super::error::TabError;
use super::knobs::KnobPairTab;
use super::lowpass::LowPassTab;
use super::mco::McoTab;

/// The capabilities every tab provides.
///
/// Input handlers return the request to send, if any; a tab with nothing to
/// do for an input returns `None`.
pub trait TabHandler {
    /// Name drawn in the header.
    fn name(&self) -> &str;

    /// Engine module this tab controls.
    fn module(&self) -> &str;

    /// Module instance this tab controls.
    fn slot(&self) -> u8;

    /// Draw the tab's glyphs into an already cleared frame.
    fn display<D>(&self, target: &mut D, layout: &ScreenLayout) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>;

    /// Store a value reported by the engine.
    fn apply_update(&mut self, update: &ParameterUpdate) -> Result<(), TabError>;

    fn on_left_rotate(&self, direction: Direction) -> Option<ParameterUpdate>;

    fn on_right_rotate(&self, direction: Direction) -> Option<ParameterUpdate>;

    fn on_left_hold(&self) -> Option<ParameterUpdate> {
        None
    }

    fn on_right_hold(&self) -> Option<ParameterUpdate> {
        None
    }

    /// A `get_data` request for this tab's module.
    fn state_request(&self) -> Option<ParameterUpdate> {
        ParameterUpdate::request_state(self.module(), self.slot()).ok()
    }
}

/// Reject updates addressed to another module or instance.
pub(crate) fn check_address<T: TabHandler + ?Sized>(
    tab: &T,
    update: &ParameterUpdate,
) -> Result<(), TabError> {
    if update.module.as_str() != tab.module() || update.slot != tab.slot() {
        return Err(TabError::ForeignModule);
    }
    Ok(())
}

/// Every tab kind the panel knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyTab {
    Mco(McoTab),
    LowPass(LowPassTab),
    Knobs(KnobPairTab),
}

macro_rules! each_tab {
    ($self:expr, $tab:ident => $body:expr) => {
        match $self {
            AnyTab::Mco($tab) => $body,
            AnyTab::LowPass($tab) => $body,
            AnyTab::Knobs($tab) => $body,
        }
    };
}

impl TabHandler for AnyTab {
    fn name(&self) -> &str {
        each_tab!(self, tab => tab.name())
    }

    fn module(&self) -> &str {
        each_tab!(self, tab => tab.module())
    }

    fn slot(&self) -> u8 {
        each_tab!(self, tab => tab.slot())
    }

    fn display<D>(&self, target: &mut D, layout: &ScreenLayout) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        each_tab!(self, tab => tab.display(target, layout))
    }

    fn apply_update(&mut self, update: &ParameterUpdate) -> Result<(), TabError> {
        each_tab!(self, tab => tab.apply_update(update))
    }

    fn on_left_rotate(&self, direction: Direction) -> Option<ParameterUpdate> {
        each_tab!(self, tab => tab.on_left_rotate(direction))
    }

    fn on_right_rotate(&self, direction: Direction) -> Option<ParameterUpdate> {
        each_tab!(self, tab => tab.on_right_rotate(direction))
    }

    fn on_left_hold(&self) -> Option<ParameterUpdate> {
        each_tab!(self, tab => tab.on_left_hold())
    }

    fn on_right_hold(&self) -> Option<ParameterUpdate> {
        each_tab!(self, tab => tab.on_right_hold())
    }
}
