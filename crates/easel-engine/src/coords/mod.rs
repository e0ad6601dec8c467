//! Window-system geometry shared by the window container, surfaces and renderers.
//!
//! Canonical space:
//! - Physical pixels
//! - Origin top-left, +X right, +Y down
//! - Screen positions are signed (a frame may sit partly off-screen)
//!
//! The GPU renderer converts to NDC in its shader using [`Viewport`].

mod insets;
mod point;
mod rect;
mod size;
mod viewport;

pub use insets::Insets;
pub use point::Point;
pub use rect::Rect;
pub use size::Size;
pub use viewport::Viewport;
