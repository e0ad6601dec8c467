use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use softbuffer::{Context, Surface};
use winit::window::Window;

use crate::coords::Size;
use crate::error::PresentError;
use crate::platform::BufferStrategy;

/// Pages softbuffer keeps per surface: the one on screen and the one being filled.
const PAGES: u32 = 2;

/// Software presentation through softbuffer.
///
/// Serves both as the negotiated buffer strategy and as the target of direct
/// blits. Field order matters: the surface drops before its context.
pub(super) struct SoftbufferPresenter {
    surface: Surface<Arc<Window>, Arc<Window>>,
    _context: Context<Arc<Window>>,
    window: Arc<Window>,
    size: Option<Size>,
}

impl SoftbufferPresenter {
    pub(super) fn new(window: Arc<Window>) -> Result<Self> {
        // softbuffer errors are not `Send`, so they are flattened into messages.
        let context = Context::new(window.clone()).map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface =
            Surface::new(&context, window.clone()).map_err(|e| anyhow!("softbuffer surface: {e}"))?;
        Ok(Self {
            surface,
            _context: context,
            window,
            size: None,
        })
    }

    fn resize(&mut self, size: Size) -> Result<(), PresentError> {
        if self.size == Some(size) {
            return Ok(());
        }

        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Err(PresentError::Transient(format!("cannot present a {size} frame")));
        };
        self.surface
            .resize(w, h)
            .map_err(|e| PresentError::Transient(format!("softbuffer resize: {e}")))?;
        self.size = Some(size);
        Ok(())
    }

    /// Copies `pixels` into the next page and puts it on screen.
    pub(super) fn present(&mut self, pixels: &[u32], size: Size) -> Result<(), PresentError> {
        self.resize(size)?;

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| PresentError::Transient(format!("softbuffer buffer: {e}")))?;
        if buffer.len() != pixels.len() {
            return Err(PresentError::Transient(format!(
                "page holds {} pixels, frame has {}",
                buffer.len(),
                pixels.len()
            )));
        }
        buffer.copy_from_slice(pixels);

        self.window.pre_present_notify();
        buffer
            .present()
            .map_err(|e| PresentError::Transient(format!("softbuffer present: {e}")))
    }
}

impl BufferStrategy for SoftbufferPresenter {
    fn buffer_count(&self) -> u32 {
        PAGES
    }

    fn show(&mut self, pixels: &[u32], size: Size) -> Result<(), PresentError> {
        self.present(pixels, size)
    }
}
