//! GPU rendering of recorded scenes.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers).
//!
//! Convention:
//! - CPU geometry is in physical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod common;
mod ctx;
mod rect;

pub use ctx::{RenderCtx, RenderTarget};
pub use rect::RectRenderer;
