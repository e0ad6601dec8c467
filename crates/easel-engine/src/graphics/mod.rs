//! Per-frame drawing contexts handed out by `back_buffer`.
//!
//! A context belongs to one frame. Callers fetch it again after every flip;
//! [`Graphics::frame`] identifies which frame a context draws into.

mod pixels;
mod recording;

pub use pixels::PixelGraphics;
pub use recording::SceneGraphics;

use crate::coords::{Rect, Size};
use crate::paint::Color;

/// Drawing surface for the frame being composed.
pub trait Graphics {
    /// Drawable size in pixels (equals the window's client area).
    fn size(&self) -> Size;

    /// Serial of the frame this context draws into.
    fn frame(&self) -> u64;

    /// Fills the whole surface, ignoring the clip.
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Restricts subsequent drawing to `rect` (intersected with the current clip).
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);

    /// CPU pixel access, available on the software surface only.
    fn pixels_mut(&mut self) -> Option<&mut PixelGraphics> {
        None
    }
}
