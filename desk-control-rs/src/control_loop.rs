//! The cooperative control loop of the panel.

use core::convert::Infallible;
use core::fmt::{self, Write as _};

use desk_encoder::{EncoderPoller, SharedEncoder};
use desk_oled_display::layout::Side;
use desk_oled_display::Surface;
use desk_protocol::{
    decode, Codec, DecodeError, LineBuffer, LineError, LineStatus, ParameterUpdate, Record,
    LINE_CAPACITY,
};
use desk_tabs::{AnyTab, TabError, TabRegistry, N_TABS};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use heapless::String;

use crate::button::{ButtonDetector, ButtonEvent};
use crate::config::ControlConfig;
use crate::connection::{ConnectionState, ConnectionSupervisor, LinkEvent};
use crate::envelope::{EnvelopeInputs, EnvelopeStage};
use crate::inputs::ControlInputs;
use crate::link::{send_line, Link, LinkError};

/// Longest diagnostic text sent to the engine.
const DIAGNOSTIC_CAPACITY: usize = 128;

/// What a received line turned out to be.
enum Inbound {
    Update(ParameterUpdate),
    Nothing,
    BadLine(LineError),
    BadRecord(DecodeError),
}

/// Everything the control plane owns, driven one iteration at a time.
///
/// # Iteration
///
/// While connected, [`step`](Self::step) performs, in order:
///
/// 1. draw the active tab and present the frame;
/// 2. dispatch encoder turns to the active tab;
/// 3. send envelope sliders that moved past the threshold;
/// 4. run the button detectors (side clicks switch tabs);
/// 5. read and handle at most one line from the engine.
///
/// [`run`](Self::run) wraps this in the connect / reconnect cycle.
pub struct ControlLoop<'a, L, S, I, P, D> {
    link: L,
    surface: S,
    inputs: I,
    delay: D,
    supervisor: ConnectionSupervisor<P>,
    tabs: TabRegistry<AnyTab, N_TABS>,
    left: EncoderPoller<'a>,
    right: EncoderPoller<'a>,
    envelope: EnvelopeInputs,
    main_button: ButtonDetector,
    left_button: ButtonDetector,
    right_button: ButtonDetector,
    codec: Codec,
    line: LineBuffer<LINE_CAPACITY>,
    config: ControlConfig,
}

impl<'a, L, S, I, P, D> ControlLoop<'a, L, S, I, P, D>
where
    L: Link,
    S: Surface,
    I: ControlInputs,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(
        link: L,
        surface: S,
        inputs: I,
        indicator: P,
        delay: D,
        encoders: [&'a SharedEncoder; 2],
        config: ControlConfig,
    ) -> Self {
        let [left, right] = encoders;
        Self {
            link,
            surface,
            inputs,
            delay,
            supervisor: ConnectionSupervisor::new(indicator, config.heartbeat_half_period_ms),
            tabs: TabRegistry::standard(),
            left: EncoderPoller::new(left),
            right: EncoderPoller::new(right),
            envelope: EnvelopeInputs::new(&config),
            main_button: ButtonDetector::with_double_click(config.buttons),
            left_button: ButtonDetector::new(config.buttons),
            right_button: ButtonDetector::new(config.buttons),
            codec: Codec::new(config.default_module),
            line: LineBuffer::new(),
            config,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.supervisor.state()
    }

    pub fn tabs(&self) -> &TabRegistry<AnyTab, N_TABS> {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabRegistry<AnyTab, N_TABS> {
        &mut self.tabs
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn inputs_mut(&mut self) -> &mut I {
        &mut self.inputs
    }

    /// Connect, iterate until the link drops, repeat.
    ///
    /// Only returns if the indicator pin fails.
    pub async fn run(&mut self) -> Result<Infallible, P::Error> {
        loop {
            self.connect().await?;
            while self.step().await == ConnectionState::Connected {
                self.delay.delay_ms(self.config.tick_ms).await;
            }
        }
    }

    /// Blank the screen, blink until the engine appears, then request the
    /// active tab's state.
    pub async fn connect(&mut self) -> Result<(), P::Error> {
        self.surface.clear();
        if self.surface.present().await.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("failed to blank display");
        }

        self.supervisor
            .await_connection(&mut self.link, &mut self.delay)
            .await?;

        self.line.clear();
        self.request_active_state().await;
        Ok(())
    }

    /// One iteration of the connected loop.
    ///
    /// Returns the connection state afterwards; nothing is done once the
    /// link has gone.
    pub async fn step(&mut self) -> ConnectionState {
        let live = self.link.is_live();
        match self.supervisor.observe(live) {
            Some(LinkEvent::Lost) => return ConnectionState::Disconnected,
            Some(LinkEvent::Established) => self.request_active_state().await,
            None if !live => return ConnectionState::Disconnected,
            None => {}
        }

        self.render().await;
        self.poll_encoders().await;
        self.poll_envelope().await;
        self.poll_buttons().await;
        self.drain_line().await;

        self.supervisor.state()
    }

    async fn render(&mut self) {
        if self
            .tabs
            .dispatch_display(&mut self.surface, &self.config.screen)
            .is_err()
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("failed to draw tab");
        }
        if self.surface.present().await.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("failed to present frame");
        }
    }

    async fn poll_encoders(&mut self) {
        for side in [Side::Left, Side::Right] {
            let poller = match side {
                Side::Left => &mut self.left,
                Side::Right => &mut self.right,
            };
            let Some(turn) = poller.poll() else {
                continue;
            };
            if let Some(update) = self.tabs.dispatch_encoder(side, turn.direction) {
                self.send(&update).await.ok();
            }
        }
    }

    async fn poll_envelope(&mut self) {
        let raw = match self.inputs.envelope().await {
            Ok(raw) => raw,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("failed to read envelope inputs");
                return;
            }
        };

        let moved = self.envelope.moved(raw);
        for stage in EnvelopeStage::ALL {
            let Some(value) = moved[stage as usize] else {
                continue;
            };
            let Some(update) = self.envelope.update_for(stage, value) else {
                continue;
            };
            if self.send(&update).await.is_ok() {
                self.envelope.mark_sent(stage, value);
            }
        }
    }

    async fn poll_buttons(&mut self) {
        let now = self.inputs.now_ms();
        let levels = match self.inputs.buttons() {
            Ok(levels) => levels,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("failed to read buttons");
                return;
            }
        };

        if let Some(_event) = self.main_button.update(levels.main, now) {
            #[cfg(feature = "defmt")]
            defmt::debug!("main button: {}", _event);
        }

        let request = match self.left_button.update(levels.left, now) {
            Some(ButtonEvent::Click) => self.tabs.prev_tab(),
            Some(ButtonEvent::LongPress) => self.tabs.dispatch_hold(Side::Left),
            _ => None,
        };
        if let Some(request) = request {
            self.send(&request).await.ok();
        }

        let request = match self.right_button.update(levels.right, now) {
            Some(ButtonEvent::Click) => self.tabs.next_tab(),
            Some(ButtonEvent::LongPress) => self.tabs.dispatch_hold(Side::Right),
            _ => None,
        };
        if let Some(request) = request {
            self.send(&request).await.ok();
        }
    }

    async fn drain_line(&mut self) {
        let mut budget = 2 * LINE_CAPACITY;
        let mut byte = [0u8; 1];

        while budget > 0 {
            match self.link.read_ready() {
                Ok(true) => {}
                Ok(false) => return,
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("link read_ready failed");
                    return;
                }
            }
            match self.link.read(&mut byte).await {
                Ok(0) => return,
                Ok(_) => {}
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("link read failed");
                    return;
                }
            }
            budget -= 1;

            match self.line.push(byte[0]) {
                LineStatus::Pending => {}
                LineStatus::Ready => {
                    self.handle_line().await;
                    return;
                }
                LineStatus::Overflowed => {
                    self.report(format_args!("[ERROR] {}", LineError::Overflow))
                        .await;
                    return;
                }
            }
        }
    }

    async fn handle_line(&mut self) {
        let inbound = match self.line.line() {
            Err(e) => Inbound::BadLine(e),
            Ok(text) => match decode(text) {
                Ok(Record::Update(update)) => Inbound::Update(update),
                Ok(Record::Diagnostic(_message)) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("engine: {=str}", _message.as_str());
                    Inbound::Nothing
                }
                Err(e) => Inbound::BadRecord(e),
            },
        };
        self.line.clear();

        match inbound {
            Inbound::Update(update) => {
                if let Err(e) = self.tabs.dispatch_update(&update) {
                    self.reject(&update, e).await;
                }
            }
            Inbound::Nothing => {}
            Inbound::BadLine(e) => {
                self.report(format_args!("[ERROR] {}", e)).await;
            }
            Inbound::BadRecord(e) => {
                self.report(format_args!(
                    "[ERROR] failed to deserialize the received JSON data: {}",
                    e
                ))
                .await;
            }
        }
    }

    async fn reject(&mut self, update: &ParameterUpdate, error: TabError) {
        #[cfg(feature = "defmt")]
        defmt::warn!("update for {} rejected: {}", update.module, error);

        self.report(format_args!(
            "[ERROR] {}/{} {}: {}",
            update.module, update.slot, update.command, error
        ))
        .await;
    }

    async fn request_active_state(&mut self) {
        let line = match self.tabs.request_active_state() {
            Some(request) => self.codec.encode(&request),
            None => self.codec.encode_request(None, 0),
        };
        match line {
            Ok(line) => {
                self.write(&line).await.ok();
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("failed to encode state request: {}", _e);
            }
        }
    }

    async fn send(&mut self, update: &ParameterUpdate) -> Result<(), LinkError<L::Error>> {
        let line = self.codec.encode(update)?;
        self.write(&line).await
    }

    /// Send a `log-message` diagnostic to the engine.
    async fn report(&mut self, args: fmt::Arguments<'_>) {
        let text: String<DIAGNOSTIC_CAPACITY> = truncated(args);

        #[cfg(feature = "defmt")]
        defmt::warn!("{=str}", text.as_str());

        match self.codec.encode_log(&text) {
            Ok(line) => {
                self.write(&line).await.ok();
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("failed to encode diagnostic: {}", _e);
            }
        }
    }

    async fn write(&mut self, line: &str) -> Result<(), LinkError<L::Error>> {
        let result = send_line(&mut self.link, line).await;
        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("failed to write to engine link");
        }
        result
    }
}

/// Format `args`, keeping as much of the text as fits in `N` bytes.
fn truncated<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut text = String::new();
    // An error here only means the text was cut at capacity.
    let _ = Truncate(&mut text).write_fmt(args);
    text
}

/// Writer that fills a [`String`] up to capacity, then stops at a char
/// boundary.
struct Truncate<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> fmt::Write for Truncate<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut end = s.len().min(N - self.0.len());
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.0.push_str(&s[..end]).map_err(|_| fmt::Error)?;
        if end < s.len() {
            return Err(fmt::Error);
        }
        Ok(())
    }
}
