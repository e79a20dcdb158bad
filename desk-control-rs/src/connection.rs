//! Heartbeat while waiting for the engine, and liveness tracking afterwards.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::link::Link;

/// Whether the engine is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// A change of [`ConnectionState`] seen by [`ConnectionSupervisor::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    Established,
    Lost,
}

/// Drives the indicator and tracks the link state.
///
/// While disconnected the indicator blinks with a fixed half-period; once
/// the peer appears it stays on.
pub struct ConnectionSupervisor<P> {
    indicator: P,
    half_period_ms: u32,
    state: ConnectionState,
}

impl<P: OutputPin> ConnectionSupervisor<P> {
    pub fn new(indicator: P, half_period_ms: u32) -> Self {
        Self {
            indicator,
            half_period_ms,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Blink until `link` reports a peer, then light the indicator and
    /// mark the link connected.
    ///
    /// Liveness is checked before every half-period, so an already attached
    /// peer returns without delay.
    pub async fn await_connection<L, D>(&mut self, link: &mut L, delay: &mut D) -> Result<(), P::Error>
    where
        L: Link,
        D: DelayNs,
    {
        #[cfg(feature = "defmt")]
        defmt::info!("waiting for engine");

        let mut lit = true;
        while !link.is_live() {
            if lit {
                self.indicator.set_low()?;
            } else {
                self.indicator.set_high()?;
            }
            lit = !lit;
            delay.delay_ms(self.half_period_ms).await;
        }

        self.indicator.set_high()?;
        self.state = ConnectionState::Connected;

        #[cfg(feature = "defmt")]
        defmt::info!("engine connected");

        Ok(())
    }

    /// Record the current liveness and report a state change, if any.
    pub fn observe(&mut self, live: bool) -> Option<LinkEvent> {
        match (self.state, live) {
            (ConnectionState::Connected, false) => {
                self.state = ConnectionState::Disconnected;
                #[cfg(feature = "defmt")]
                defmt::warn!("engine link lost");
                Some(LinkEvent::Lost)
            }
            (ConnectionState::Disconnected, true) => {
                self.state = ConnectionState::Connected;
                Some(LinkEvent::Established)
            }
            _ => None,
        }
    }

    /// Give back the indicator pin.
    pub fn release(self) -> P {
        self.indicator
    }
}
