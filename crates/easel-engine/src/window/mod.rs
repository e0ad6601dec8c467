//! Top-level window container.
//!
//! One container type serves both window kinds; the embedded rendering
//! surface is injected as a [`crate::surface::RenderSurface`] variant.

mod container;
mod placement;

pub use container::WindowContainer;
