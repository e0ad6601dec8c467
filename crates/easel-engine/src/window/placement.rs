use crate::config::WindowKind;
use crate::coords::{Point, Rect, Size};

/// Where a frame of `frame` size goes on `screen`: centered, and for kinds
/// that clamp, never left of or above the screen's origin.
pub(crate) fn place(kind: WindowKind, screen: Rect, frame: Size) -> Point {
    let centered = screen.centered(frame);
    if kind.clamps_to_screen() {
        centered.clamped_min(screen.origin)
    } else {
        centered
    }
}
