use desk_encoder::Direction;
use desk_oled_display::layout::Side;
use desk_oled_display::{ScreenLayout, Surface};
use desk_protocol::ParameterUpdate;
use embedded_graphics::draw_target::DrawTarget;

use super::error::TabError;
use super::tab::{AnyTab, TabHandler};
use super::{standard_tabs, N_TABS};

/// Fixed, ordered set of tabs with one active at a time.
///
/// The active index is always in `0..N`; navigation wraps in both
/// directions. Only the active tab receives input and updates.
pub struct TabRegistry<T, const N: usize> {
    tabs: [T; N],
    active: usize,
}

impl TabRegistry<AnyTab, N_TABS> {
    /// The panel's ten tabs, starting on the oscillator.
    pub fn standard() -> Self {
        Self::new(standard_tabs())
    }
}

impl<T: TabHandler, const N: usize> TabRegistry<T, N> {
    const NOT_EMPTY: () = assert!(N > 0, "a tab registry needs at least one tab");

    pub fn new(tabs: [T; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NOT_EMPTY;
        Self { tabs, active: 0 }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn active(&self) -> &T {
        &self.tabs[self.active]
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.tabs.get(index)
    }

    /// Activate the following tab and return its state request.
    pub fn next_tab(&mut self) -> Option<ParameterUpdate> {
        self.active = (self.active + 1) % N;
        self.on_switch()
    }

    /// Activate the preceding tab and return its state request.
    pub fn prev_tab(&mut self) -> Option<ParameterUpdate> {
        self.active = (self.active + N - 1) % N;
        self.on_switch()
    }

    /// State request for the active tab (used after (re)connecting).
    pub fn request_active_state(&self) -> Option<ParameterUpdate> {
        self.active().state_request()
    }

    fn on_switch(&self) -> Option<ParameterUpdate> {
        #[cfg(feature = "defmt")]
        defmt::debug!("tab {} active: {=str}", self.active, self.active().name());

        self.request_active_state()
    }

    /// Clear `surface` and draw the active tab into it.
    ///
    /// Presenting the frame is left to the caller.
    pub fn dispatch_display<S: Surface>(
        &self,
        surface: &mut S,
        layout: &ScreenLayout,
    ) -> Result<(), <S::Target as DrawTarget>::Error> {
        surface.clear();
        self.active().display(surface.target(), layout)
    }

    /// Forward a knob turn to the active tab.
    pub fn dispatch_encoder(&self, side: Side, direction: Direction) -> Option<ParameterUpdate> {
        let tab = self.active();
        match side {
            Side::Left => tab.on_left_rotate(direction),
            Side::Right => tab.on_right_rotate(direction),
        }
    }

    /// Forward a knob hold to the active tab.
    pub fn dispatch_hold(&self, side: Side) -> Option<ParameterUpdate> {
        let tab = self.active();
        match side {
            Side::Left => tab.on_left_hold(),
            Side::Right => tab.on_right_hold(),
        }
    }

    /// Route an inbound update to the active tab.
    pub fn dispatch_update(&mut self, update: &ParameterUpdate) -> Result<(), TabError> {
        self.tabs[self.active].apply_update(update)
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use desk_protocol::Payload;

    use super::*;
    use crate::tabs::test_support::PixelCounter;
    use crate::tabs::{KnobPairTab, LowPassTab, McoTab};

    struct CountingSurface {
        frame: PixelCounter,
        clears: usize,
    }

    impl Surface for CountingSurface {
        type Target = PixelCounter;
        type Error = Infallible;

        fn clear(&mut self) {
            self.frame.lit = 0;
            self.clears += 1;
        }

        fn target(&mut self) -> &mut PixelCounter {
            &mut self.frame
        }

        async fn present(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    fn single() -> TabRegistry<AnyTab, 1> {
        TabRegistry::new([AnyTab::LowPass(LowPassTab::new())])
    }

    #[test]
    fn starts_on_first_tab() {
        let registry = TabRegistry::standard();
        assert_eq!(registry.active_index(), 0);
        assert_eq!(registry.len(), N_TABS);
        assert_eq!(registry.active().module(), "mco");
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut registry = TabRegistry::standard();
        registry.prev_tab();
        assert_eq!(registry.active_index(), N_TABS - 1);
        registry.next_tab();
        assert_eq!(registry.active_index(), 0);
    }

    #[test]
    fn next_then_prev_returns_to_start() {
        let mut registry = TabRegistry::standard();
        for start in 0..N_TABS {
            while registry.active_index() != start {
                registry.next_tab();
            }
            registry.next_tab();
            registry.prev_tab();
            assert_eq!(registry.active_index(), start);
        }
    }

    #[test]
    fn index_stays_in_bounds_for_any_size() {
        fn walk<const N: usize>() {
            let tabs: [KnobPairTab; N] = core::array::from_fn(|_| KnobPairTab::chorus());
            let mut registry = TabRegistry::new(tabs);
            // Deterministic pseudo-random walk.
            let mut seed: u32 = 0x1234_5678;
            for _ in 0..500 {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                if seed & 0x100 == 0 {
                    registry.next_tab();
                } else {
                    registry.prev_tab();
                }
                assert!(registry.active_index() < N);
            }
        }
        walk::<1>();
        walk::<2>();
        walk::<3>();
        walk::<7>();
        walk::<10>();
    }

    #[test]
    fn single_tab_registry_stays_put() {
        let mut registry = single();
        assert!(registry.next_tab().is_some());
        assert_eq!(registry.active_index(), 0);
        registry.prev_tab();
        assert_eq!(registry.active_index(), 0);
    }

    #[test]
    fn switching_requests_new_tab_state() {
        let mut registry = TabRegistry::standard();
        let request = registry.next_tab().unwrap();
        assert!(request.is_state_request());
        assert_eq!(request.module.as_str(), "filter");

        let request = registry.prev_tab().unwrap();
        assert_eq!(request.module.as_str(), "mco");

        let request = registry.prev_tab().unwrap();
        assert_eq!(request.module.as_str(), "lfo");
        assert_eq!(request.slot, 3);
    }

    #[test]
    fn encoder_dispatch_goes_to_active_tab() {
        let mut registry = TabRegistry::standard();
        registry.next_tab();
        let update = registry
            .dispatch_encoder(Side::Left, Direction::Clockwise)
            .unwrap();
        assert_eq!(update.module.as_str(), "filter");
        assert_eq!(update.command.as_str(), "cutoff");
        assert!(registry
            .dispatch_encoder(Side::Right, Direction::NoRotation)
            .is_none());
    }

    #[test]
    fn hold_dispatch() {
        let mut registry = TabRegistry::standard();
        let hold = registry.dispatch_hold(Side::Right).unwrap();
        assert_eq!(hold.command.as_str(), "overtones-toggle");
        registry.next_tab();
        assert!(registry.dispatch_hold(Side::Left).is_none());
    }

    #[test]
    fn updates_only_touch_active_tab() {
        let mut registry = TabRegistry::standard();
        registry.next_tab();

        let cutoff = ParameterUpdate::new("filter", 0, "cutoff", Payload::Value(0.9)).unwrap();
        registry.dispatch_update(&cutoff).unwrap();

        let vol = ParameterUpdate::new("mco", 0, "vol", Payload::Value(0.1)).unwrap();
        assert_eq!(registry.dispatch_update(&vol), Err(TabError::ForeignModule));

        assert_eq!(registry.get(0), Some(&AnyTab::Mco(McoTab::new())));
        match registry.get(1) {
            Some(AnyTab::LowPass(tab)) => assert_eq!(tab.cutoff(), 0.9),
            _ => panic!("tab 1 is not the low-pass tab"),
        }
    }

    #[test]
    fn switching_tabs_keeps_state() {
        let mut registry = TabRegistry::standard();
        registry.next_tab();
        let cutoff = ParameterUpdate::new("filter", 0, "cutoff", Payload::Value(0.2)).unwrap();
        registry.dispatch_update(&cutoff).unwrap();

        registry.next_tab();
        registry.prev_tab();
        match registry.active() {
            AnyTab::LowPass(tab) => assert_eq!(tab.cutoff(), 0.2),
            _ => panic!("active tab is not the low-pass tab"),
        }
    }

    #[test]
    fn display_clears_then_draws() {
        let registry = TabRegistry::standard();
        let mut surface = CountingSurface {
            frame: PixelCounter { lit: 12345 },
            clears: 0,
        };
        registry
            .dispatch_display(&mut surface, &ScreenLayout::default())
            .unwrap();
        assert_eq!(surface.clears, 1);
        assert!(surface.frame.lit > 0);
        assert!(surface.frame.lit < 12345);
    }
}
