//! Paint model shared by the software rasteriser and the GPU renderer.
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
