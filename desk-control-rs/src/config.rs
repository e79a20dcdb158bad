//! Tunables of the control plane.

use desk_oled_display::ScreenLayout;
use desk_protocol::DEFAULT_MODULE;

/// Timing of the button click/double-click/long-press detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonTiming {
    /// A level must hold this long before it is accepted. Default: 50.
    pub debounce_ms: u64,
    /// Longest gap between the clicks of a double click. Default: 400.
    pub click_window_ms: u64,
    /// Shortest hold that counts as a long press. Default: 800.
    pub long_press_ms: u64,
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            click_window_ms: 400,
            long_press_ms: 800,
        }
    }
}

/// Configuration for the control loop.
///
/// [`ControlConfig::default()`] reproduces the panel as built: 750 ms
/// heartbeat, 12-bit envelope ADCs feeding the filter envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlConfig {
    /// Indicator half-period while waiting for the peer. Default: 750.
    pub heartbeat_half_period_ms: u32,
    /// Pause between control-loop iterations. Default: 5.
    pub tick_ms: u32,
    /// Minimum change (fraction of full scale) before an envelope input is
    /// sent again. Default: 0.01.
    pub envelope_threshold: f32,
    /// Full-scale raw ADC reading. Default: 4095.
    pub envelope_adc_max: u16,
    /// Module the envelope inputs address. Default: `"filter"`.
    pub envelope_module: &'static str,
    /// Module instance the envelope inputs address. Default: 0.
    pub envelope_slot: u8,
    /// Module targeted by a state request that names none. Default: `"filter"`.
    pub default_module: &'static str,
    /// Button detector timing.
    pub buttons: ButtonTiming,
    /// Screen geometry.
    pub screen: ScreenLayout,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            heartbeat_half_period_ms: 750,
            tick_ms: 5,
            envelope_threshold: 0.01,
            envelope_adc_max: 4095,
            envelope_module: "filter",
            envelope_slot: 0,
            default_module: DEFAULT_MODULE,
            buttons: ButtonTiming::default(),
            screen: ScreenLayout::default(),
        }
    }
}
