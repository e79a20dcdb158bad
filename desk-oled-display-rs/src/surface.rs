//! The drawing surface the control loop renders the active tab onto.

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::BinaryColor};

/// A monochrome frame buffer that is cleared, drawn into, then presented.
///
/// Drawing only touches memory; [`present`](Self::present) is the one
/// operation that talks to the hardware.
#[allow(async_fn_in_trait)]
pub trait Surface {
    /// Frame buffer type handed to draw routines.
    type Target: DrawTarget<Color = BinaryColor>;
    /// Error reported when presenting fails.
    type Error;

    /// Blank the frame buffer.
    fn clear(&mut self);

    /// The frame buffer to draw into.
    fn target(&mut self) -> &mut Self::Target;

    /// Push the frame buffer to the panel.
    async fn present(&mut self) -> Result<(), Self::Error>;
}
