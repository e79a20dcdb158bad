//! Screen geometry and the drawing helpers shared by every tab.
//!
//! Each tab screen is a header in the top-left corner and up to two dials,
//! one per knob, with the knob name underneath:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ LowPass                                          │  ← header
//! │      ╭───╮                    ╭───╮              │
//! │      │ ╲ │                    │ │ │              │  ← dials
//! │      ╰───╯                    ╰───╯              │
//! │ cutoff                  res                      │  ← labels
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! A dial value of `0.0` points the needle straight down; the needle sweeps
//! clockwise through left, up and right as the value rises to `1.0`.

use core::f32::consts::PI;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
    text::Text,
};

// ── Side ─────────────────────────────────────────────────────────────────

/// Which of the two knobs (and dials) a control belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

// ── ScreenLayout ─────────────────────────────────────────────────────────

/// Geometry of the tab screen.
///
/// [`ScreenLayout::default()`] reproduces the panel's design for a 128×64
/// display: dials centred in each half, radius `64 / 4 - 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    /// Total display width in pixels. Default: 128.
    pub width: u32,
    /// Total display height in pixels. Default: 64.
    pub height: u32,
    /// Baseline origin of the tab name. Default: (0, 12).
    pub header: Point,
    /// Centre of the left dial. Default: (32, 32).
    pub left_dial: Point,
    /// Centre of the right dial. Default: (96, 32).
    pub right_dial: Point,
    /// Dial radius in pixels. Default: 15.
    pub dial_radius: i32,
    /// Baseline origin of the left knob name. Default: (0, 63).
    pub left_label: Point,
    /// Baseline origin of the right knob name. Default: (64, 63).
    pub right_label: Point,
    /// Baseline origin of free text shown in place of the right dial.
    /// Default: (64, 32).
    pub centre_text: Point,
    /// Screen refresh rate in Hz. Default: 30.
    pub frame_rate_hz: u32,
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            header: Point::new(0, 12),
            left_dial: Point::new(32, 32),
            right_dial: Point::new(96, 32),
            dial_radius: 64 / 4 - 1,
            left_label: Point::new(0, 63),
            right_label: Point::new(64, 63),
            centre_text: Point::new(64, 32),
            frame_rate_hz: 30,
        }
    }
}

impl ScreenLayout {
    /// Convert the configured frame rate to a period in milliseconds.
    pub fn frame_period_ms(&self) -> u64 {
        1000 / self.frame_rate_hz.max(1) as u64
    }

    /// Centre of the dial on `side`.
    pub fn dial(&self, side: Side) -> Point {
        match side {
            Side::Left => self.left_dial,
            Side::Right => self.right_dial,
        }
    }

    /// Label origin under the dial on `side`.
    pub fn label(&self, side: Side) -> Point {
        match side {
            Side::Left => self.left_label,
            Side::Right => self.right_label,
        }
    }
}

// ── Dial geometry ────────────────────────────────────────────────────────

/// Needle angle in radians for a normalised value.
///
/// `value` is clamped to `0.0..=1.0`; non-finite values read as `0.0`.
pub fn needle_angle(value: f32) -> f32 {
    let value = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    };
    -(value * 360.0 + 270.0) * (PI / 180.0)
}

/// End point of the needle of a dial centred at `center`.
pub fn needle_endpoint(center: Point, radius: i32, value: f32) -> Point {
    let theta = needle_angle(value);
    let r = radius as f32;
    let dx = libm::roundf(libm::cosf(theta) * r) as i32;
    let dy = libm::roundf(libm::sinf(theta) * r) as i32;
    Point::new(center.x - dx, center.y + dy)
}

// ── Drawing ──────────────────────────────────────────────────────────────

/// Draw a dial outline with its needle at `value`.
pub fn draw_dial<D>(target: &mut D, center: Point, radius: i32, value: f32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let diameter = (radius.max(0) as u32) * 2 + 1;

    Circle::with_center(center, diameter)
        .into_styled(stroke)
        .draw(target)?;
    Line::new(center, needle_endpoint(center, radius, value))
        .into_styled(stroke)
        .draw(target)?;
    Ok(())
}

/// Draw text with its baseline starting at `origin`.
pub fn draw_text<D>(target: &mut D, origin: Point, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::new(text, origin, style).draw(target)?;
    Ok(())
}

/// Draw the tab name.
pub fn draw_header<D>(target: &mut D, layout: &ScreenLayout, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_text(target, layout.header, text)
}

/// Draw the dial and name of one knob.
pub fn draw_knob<D>(
    target: &mut D,
    layout: &ScreenLayout,
    side: Side,
    name: &str,
    value: f32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_dial(target, layout.dial(side), layout.dial_radius, value)?;
    draw_text(target, layout.label(side), name)
}

// ── Tests ────────────────────────────────────────────────────────────────
