use anyhow::{Context, Result};

use crate::coords::Size;
use crate::error::GraphicsError;
use crate::graphics::SceneGraphics;
use crate::platform::{Drawable, DrawableConfig, NativeWindow};

use super::renderer::{GpuRenderer, RendererState};
use super::{FrameFence, ThreadAffinity};

/// GPU drawable driven explicitly by `flip`, plus its renderer delegate.
pub struct AcceleratedSurface {
    drawable: Box<dyn Drawable>,
    renderer: GpuRenderer,
    affinity: Option<ThreadAffinity>,
}

impl AcceleratedSurface {
    /// Creates the drawable. Auto redraw is switched off; every frame comes from `flip`.
    pub fn attach(native: &mut dyn NativeWindow, size: Size, vsync: bool) -> Result<Self> {
        let mut drawable = native
            .create_drawable(DrawableConfig { size, vsync })
            .context("creating accelerated drawable")?;
        drawable.set_auto_redraw(false);
        drawable.set_focusable(true);

        Ok(Self {
            drawable,
            renderer: GpuRenderer::new(vsync),
            affinity: None,
        })
    }

    /// Pins rendering to the calling thread and runs the setup cycle.
    pub fn activate(&mut self, fence: &FrameFence) -> Result<()> {
        let affinity = ThreadAffinity::current();
        log::debug!("accelerated surface pinned to {:?}", affinity.pinned());
        self.affinity = Some(affinity);

        match self.drawable.display(&mut self.renderer, fence.begin()) {
            Ok(()) => {}
            // Setup already happened; the next flip presents normally.
            Err(e) if e.is_transient() && self.renderer.state() == RendererState::Ready => {
                log::debug!("priming frame skipped: {e}");
            }
            Err(e) => return Err(e).context("priming accelerated drawable"),
        }

        if self.renderer.state() != RendererState::Ready {
            anyhow::bail!("drawable never delivered its setup callback");
        }
        Ok(())
    }

    fn check_thread(&self) -> Result<(), GraphicsError> {
        match self.affinity {
            Some(affinity) => affinity.check(),
            None => Err(GraphicsError::NotReady),
        }
    }

    pub fn graphics(&mut self) -> Result<&mut SceneGraphics, GraphicsError> {
        self.check_thread()?;
        self.renderer.graphics()
    }

    /// Requests one display cycle and blocks until it has been submitted.
    pub fn flip(&mut self, fence: &FrameFence) -> Result<bool, GraphicsError> {
        self.check_thread()?;
        if self.renderer.state() == RendererState::Disposed {
            return Err(GraphicsError::Disposed);
        }

        match self.drawable.display(&mut self.renderer, fence.begin()) {
            Ok(()) => Ok(true),
            Err(e) if e.is_transient() => {
                log::debug!("accelerated flip: {e}");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[inline]
    pub fn is_vsync(&self) -> bool {
        self.renderer.is_vsync()
    }

    #[inline]
    pub fn renderer_state(&self) -> RendererState {
        self.renderer.state()
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.drawable.size()
    }

    pub fn poll(&mut self) {
        self.drawable.poll();
    }

    pub fn dispose(&mut self) {
        self.renderer.dispose();
        self.drawable.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowKind;
    use crate::graphics::Graphics;
    use crate::platform::headless::{HeadlessConfig, HeadlessWindow};

    fn surface(vsync: bool) -> (HeadlessWindow, AcceleratedSurface) {
        let mut window = HeadlessWindow::new(WindowKind::Frame, HeadlessConfig::default());
        window.set_decorated(false);
        window.set_outer_size(Size::new(32, 32));
        let surface = AcceleratedSurface::attach(&mut window, Size::new(32, 32), vsync).unwrap();
        window.set_visible(true);
        (window, surface)
    }

    #[test]
    fn not_ready_before_activation() {
        let (_, mut s) = surface(false);
        assert_eq!(s.renderer_state(), RendererState::Uninitialized);
        assert!(matches!(s.graphics(), Err(GraphicsError::NotReady)));
        assert!(matches!(s.flip(&FrameFence::new()), Err(GraphicsError::NotReady)));
    }

    #[test]
    fn activation_runs_setup_cycle() {
        let (_, mut s) = surface(true);
        s.activate(&FrameFence::new()).unwrap();
        assert_eq!(s.renderer_state(), RendererState::Ready);
        assert!(s.is_vsync());
        assert_eq!(s.graphics().unwrap().size(), Size::new(32, 32));
    }

    #[test]
    fn frames_complete_on_poll() {
        let (_, mut s) = surface(false);
        let fence = FrameFence::new();
        s.activate(&fence).unwrap();
        assert!(s.flip(&fence).unwrap());
        assert_eq!(fence.in_flight(), 2);

        s.poll();
        assert_eq!(fence.in_flight(), 0);
    }

    #[test]
    fn transient_priming_failure_still_activates() {
        let (window, mut s) = surface(false);
        window.probe().fail_next_presents(1);

        s.activate(&FrameFence::new()).unwrap();
        assert_eq!(s.renderer_state(), RendererState::Ready);
        assert!(s.flip(&FrameFence::new()).unwrap());
    }

    #[test]
    fn fatal_priming_failure_aborts_activation() {
        let (_, mut s) = surface(false);
        s.drawable.dispose();
        assert!(s.activate(&FrameFence::new()).is_err());
    }

    #[test]
    fn flip_after_dispose_fails() {
        let (_, mut s) = surface(false);
        let fence = FrameFence::new();
        s.activate(&fence).unwrap();
        s.dispose();
        assert!(matches!(s.flip(&fence), Err(GraphicsError::Disposed)));
        assert_eq!(fence.in_flight(), 0);
    }
}
