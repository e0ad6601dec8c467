//! Rendering surfaces embedded in a window container.
//!
//! [`RenderSurface`] is the tagged variant the container is parameterised by:
//! a CPU [`SoftwareSurface`] or a GPU [`AcceleratedSurface`]. Both share the
//! same two-step life: `attach` while the window is hidden, `activate` once it
//! is shown for good.

mod accelerated;
mod affinity;
mod fence;
mod renderer;
mod software;

pub use accelerated::AcceleratedSurface;
pub use affinity::ThreadAffinity;
pub use fence::{FrameFence, FrameToken};
pub use renderer::{GpuRenderer, RendererState};
pub use software::SoftwareSurface;

use anyhow::Result;

use crate::config::SurfaceKind;
use crate::coords::Size;
use crate::error::GraphicsError;
use crate::graphics::Graphics;
use crate::platform::NativeWindow;

/// How finished frames reach the screen.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferingMode {
    /// Secondary image copied onto the window on every flip.
    Blit,
    /// Toolkit-managed page flipping.
    DoubleBuffer,
    /// GPU swap chain.
    Accelerated,
}

pub enum RenderSurface {
    Software(SoftwareSurface),
    Accelerated(AcceleratedSurface),
}

impl RenderSurface {
    /// Creates the surface for a hidden window whose client area is `size`.
    pub fn attach(kind: SurfaceKind, native: &mut dyn NativeWindow, size: Size) -> Result<Self> {
        Ok(match kind {
            SurfaceKind::Software { buffer_strategy } => {
                Self::Software(SoftwareSurface::new(size, buffer_strategy))
            }
            SurfaceKind::Accelerated { vsync } => {
                Self::Accelerated(AcceleratedSurface::attach(native, size, vsync)?)
            }
        })
    }

    /// Finishes setup once the window is visible.
    pub fn activate(&mut self, native: &mut dyn NativeWindow, fence: &FrameFence) -> Result<()> {
        match self {
            Self::Software(s) => {
                s.activate(native);
                Ok(())
            }
            Self::Accelerated(s) => s.activate(fence),
        }
    }

    /// Drawing context for the next frame.
    pub fn back_buffer(&mut self) -> Result<&mut dyn Graphics, GraphicsError> {
        match self {
            Self::Software(s) => Ok(s.canvas()),
            Self::Accelerated(s) => Ok(s.graphics()?),
        }
    }

    pub fn flip(&mut self, native: &mut dyn NativeWindow, fence: &FrameFence) -> Result<bool, GraphicsError> {
        match self {
            Self::Software(s) => Ok(s.flip(native, fence)?),
            Self::Accelerated(s) => s.flip(fence),
        }
    }

    pub fn is_vsync(&self) -> bool {
        match self {
            Self::Software(_) => false,
            Self::Accelerated(s) => s.is_vsync(),
        }
    }

    pub fn buffering_mode(&self) -> BufferingMode {
        match self {
            Self::Software(s) => s.mode(),
            Self::Accelerated(_) => BufferingMode::Accelerated,
        }
    }

    pub fn renderer_state(&self) -> Option<RendererState> {
        match self {
            Self::Software(_) => None,
            Self::Accelerated(s) => Some(s.renderer_state()),
        }
    }

    /// Lets the backend run completion callbacks of submitted frames.
    pub fn poll_completion(&mut self) {
        if let Self::Accelerated(s) = self {
            s.poll();
        }
    }

    pub fn dispose(&mut self) {
        match self {
            Self::Software(s) => s.dispose(),
            Self::Accelerated(s) => s.dispose(),
        }
    }
}
