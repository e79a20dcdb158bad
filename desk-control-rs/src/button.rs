//! Debounced click, double-click and long-press detection.

use crate::config::ButtonTiming;

/// A completed button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Click,
    DoubleClick,
    /// Reported when a long press is released.
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pressed { since: u64, clicks: u8, long: bool },
    Released { since: u64 },
}

/// Turns sampled button levels into [`ButtonEvent`]s.
///
/// Feed it `(pressed, now_ms)` once per control-loop iteration. A level is
/// accepted only after it has been stable for the debounce time. Without
/// double-click detection a click is reported on release; with it, the
/// click is held back until the double-click window has passed.
#[derive(Debug, Clone)]
pub struct ButtonDetector {
    timing: ButtonTiming,
    double_click: bool,
    raw: bool,
    raw_since: u64,
    pressed: bool,
    phase: Phase,
}

impl ButtonDetector {
    /// Clicks and long presses only.
    pub fn new(timing: ButtonTiming) -> Self {
        Self {
            timing,
            double_click: false,
            raw: false,
            raw_since: 0,
            pressed: false,
            phase: Phase::Idle,
        }
    }

    /// Clicks, double clicks and long presses.
    pub fn with_double_click(timing: ButtonTiming) -> Self {
        Self {
            double_click: true,
            ..Self::new(timing)
        }
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feed one sample.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        if pressed != self.raw {
            self.raw = pressed;
            self.raw_since = now_ms;
        }

        let stable = now_ms.saturating_sub(self.raw_since) >= self.timing.debounce_ms;
        let edge = stable && self.raw != self.pressed;
        if edge {
            self.pressed = self.raw;
        }

        match self.phase {
            Phase::Idle => {
                if edge && self.pressed {
                    self.phase = Phase::Pressed {
                        since: now_ms,
                        clicks: 1,
                        long: false,
                    };
                }
                None
            }
            Phase::Pressed {
                since,
                clicks,
                long,
            } => {
                if !edge {
                    if !long && now_ms.saturating_sub(since) >= self.timing.long_press_ms {
                        self.phase = Phase::Pressed {
                            since,
                            clicks,
                            long: true,
                        };
                    }
                    return None;
                }

                if long {
                    self.phase = Phase::Idle;
                    Some(ButtonEvent::LongPress)
                } else if clicks >= 2 {
                    self.phase = Phase::Idle;
                    Some(ButtonEvent::DoubleClick)
                } else if !self.double_click {
                    self.phase = Phase::Idle;
                    Some(ButtonEvent::Click)
                } else {
                    self.phase = Phase::Released { since: now_ms };
                    None
                }
            }
            Phase::Released { since } => {
                if edge && self.pressed {
                    self.phase = Phase::Pressed {
                        since: now_ms,
                        clicks: 2,
                        long: false,
                    };
                    None
                } else if now_ms.saturating_sub(since) > self.timing.click_window_ms {
                    self.phase = Phase::Idle;
                    Some(ButtonEvent::Click)
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Samples a detector every 10 ms.
    struct Sampler {
        button: ButtonDetector,
        now: u64,
        events: usize,
        last: Option<ButtonEvent>,
    }

    impl Sampler {
        fn new(button: ButtonDetector) -> Self {
            Self {
                button,
                now: 0,
                events: 0,
                last: None,
            }
        }

        fn hold(&mut self, level: bool, duration: u64) -> &mut Self {
            let end = self.now + duration;
            while self.now < end {
                if let Some(event) = self.button.update(level, self.now) {
                    self.events += 1;
                    self.last = Some(event);
                }
                self.now += 10;
            }
            self
        }
    }

    #[test]
    fn click_without_double_click_fires_on_release() {
        let mut s = Sampler::new(ButtonDetector::new(ButtonTiming::default()));
        s.hold(false, 100).hold(true, 150).hold(false, 100);
        assert_eq!(s.events, 1);
        assert_eq!(s.last, Some(ButtonEvent::Click));
    }

    #[test]
    fn bounce_is_ignored() {
        let mut s = Sampler::new(ButtonDetector::new(ButtonTiming::default()));
        s.hold(false, 100)
            .hold(true, 20)
            .hold(false, 20)
            .hold(true, 20)
            .hold(false, 200);
        assert_eq!(s.events, 0);
        assert!(!s.button.is_pressed());
    }

    #[test]
    fn click_waits_for_double_click_window() {
        let mut s = Sampler::new(ButtonDetector::with_double_click(ButtonTiming::default()));
        s.hold(false, 100).hold(true, 150).hold(false, 300);
        assert_eq!(s.events, 0);
        s.hold(false, 200);
        assert_eq!(s.events, 1);
        assert_eq!(s.last, Some(ButtonEvent::Click));
    }

    #[test]
    fn double_click() {
        let mut s = Sampler::new(ButtonDetector::with_double_click(ButtonTiming::default()));
        s.hold(false, 100)
            .hold(true, 100)
            .hold(false, 150)
            .hold(true, 100)
            .hold(false, 600);
        assert_eq!(s.events, 1);
        assert_eq!(s.last, Some(ButtonEvent::DoubleClick));
    }

    #[test]
    fn long_press_reports_on_release() {
        let mut s = Sampler::new(ButtonDetector::with_double_click(ButtonTiming::default()));
        s.hold(false, 100).hold(true, 1000);
        assert_eq!(s.events, 0);
        assert!(s.button.is_pressed());
        s.hold(false, 600);
        assert_eq!(s.events, 1);
        assert_eq!(s.last, Some(ButtonEvent::LongPress));
    }
}
