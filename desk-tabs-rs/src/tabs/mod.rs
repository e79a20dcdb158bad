//! Tabbed parameter UI with one tab per synth-engine module.
//!
//! Each tab owns the last known values of its module's parameters, draws
//! them as dials, and turns knob movements into outbound
//! [`ParameterUpdate`](desk_protocol::ParameterUpdate) intents. Tabs never
//! perform I/O themselves: the control loop sends whatever a handler
//! returns.
//!
//! # Layout
//!
//! ```text
//! idx  tab        module/slot   left knob   right knob
//!  0   VCO        mco/0         vol         wave form (next/prev)
//!  1   LowPass    filter/0      cutoff      resonance
//!  2   Chorus     chorus/0      speed       decay
//!  3   OverDrive  overdrive/0   gain        ---
//!  4   Reverb     reverb/0      gain        decay
//!  5   Echo       echo/0        speed       decay
//!  6   LFO 1      lfo/0         speed       depth
//!  7   LFO 2      lfo/1         speed       depth
//!  8   LFO 3      lfo/2         speed       depth
//!  9   LFO 4      lfo/3         speed       depth
//! ```
//!
//! The registry starts on tab 0 and wraps in both directions.
//!
//! # Values
//!
//! Parameter values are normalised to `0.0..=1.0`. They change only when the
//! engine reports them (`apply_update`); turning a knob sends a step request
//! and waits for the engine to answer.

mod error;
mod knob;
mod knobs;
mod lowpass;
mod mco;
mod registry;
mod tab;

pub use desk_encoder::Direction;
pub use desk_oled_display::layout::Side;

pub use error::TabError;
pub use knob::Knob;
pub use knobs::KnobPairTab;
pub use lowpass::LowPassTab;
pub use mco::{McoTab, Waveform};
pub use registry::TabRegistry;
pub use tab::{AnyTab, TabHandler};

/// Number of tabs, one per engine module instance.
pub const N_TABS: usize = 10;

/// Number of LFO instances in the engine.
pub const N_LFOS: u8 = 4;

/// Engine module identifiers used by the tabs.
pub mod modules {
    pub const MCO: &str = "mco";
    pub const FILTER: &str = "filter";
    pub const CHORUS: &str = "chorus";
    pub const OVERDRIVE: &str = "overdrive";
    pub const REVERB: &str = "reverb";
    pub const ECHO: &str = "echo";
    pub const LFO: &str = "lfo";
}

/// The standard tab set in registry order.
pub fn standard_tabs() -> [AnyTab; N_TABS] {
    [
        AnyTab::Mco(McoTab::new()),
        AnyTab::LowPass(LowPassTab::new()),
        AnyTab::Knobs(KnobPairTab::chorus()),
        AnyTab::Knobs(KnobPairTab::overdrive()),
        AnyTab::Knobs(KnobPairTab::reverb()),
        AnyTab::Knobs(KnobPairTab::echo()),
        AnyTab::Knobs(KnobPairTab::lfo(0)),
        AnyTab::Knobs(KnobPairTab::lfo(1)),
        AnyTab::Knobs(KnobPairTab::lfo(2)),
        AnyTab::Knobs(KnobPairTab::lfo(3)),
    ]
}
