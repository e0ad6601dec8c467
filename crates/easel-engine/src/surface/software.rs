use crate::coords::Size;
use crate::error::PresentError;
use crate::graphics::PixelGraphics;
use crate::platform::{BufferStrategy, NativeWindow};

use super::{BufferingMode, FrameFence};

enum Presenter {
    /// Not negotiated yet; the window has not been shown.
    Pending,
    /// Toolkit-managed page flipping.
    Strategy(Box<dyn BufferStrategy>),
    /// Manually managed back buffer copied onto the window on every flip.
    Blit,
}

/// CPU-rasterised surface presented by toolkit page flipping or by blitting.
pub struct SoftwareSurface {
    wants_strategy: bool,
    canvas: PixelGraphics,
    presenter: Presenter,
}

impl SoftwareSurface {
    pub fn new(size: Size, wants_strategy: bool) -> Self {
        Self {
            wants_strategy,
            canvas: PixelGraphics::new(size),
            presenter: Presenter::Pending,
        }
    }

    /// Negotiates the presenter once the window is displayable.
    pub fn activate(&mut self, native: &mut dyn NativeWindow) {
        let size = self.canvas_size();

        self.presenter = if self.wants_strategy {
            match native.create_buffer_strategy(size) {
                Ok(strategy) => {
                    log::debug!("software surface: {}-page buffer strategy", strategy.buffer_count());
                    Presenter::Strategy(strategy)
                }
                Err(e) => {
                    log::debug!("buffer strategy refused ({e:#}); using blitted back buffer");
                    Presenter::Blit
                }
            }
        } else {
            log::debug!("software surface: blitted back buffer");
            Presenter::Blit
        };
    }

    #[inline]
    pub fn canvas(&mut self) -> &mut PixelGraphics {
        &mut self.canvas
    }

    pub fn canvas_size(&self) -> Size {
        crate::graphics::Graphics::size(&self.canvas)
    }

    pub fn mode(&self) -> BufferingMode {
        match self.presenter {
            Presenter::Strategy(_) => BufferingMode::DoubleBuffer,
            Presenter::Pending | Presenter::Blit => BufferingMode::Blit,
        }
    }

    /// Presents the canvas. `Ok(false)` means the frame was dropped and the
    /// next flip should simply try again.
    pub fn flip(&mut self, native: &mut dyn NativeWindow, fence: &FrameFence) -> Result<bool, PresentError> {
        let token = fence.begin();
        let size = self.canvas_size();

        let shown = match &mut self.presenter {
            Presenter::Strategy(strategy) => strategy.show(self.canvas.pixels(), size),
            Presenter::Blit | Presenter::Pending => native.blit(self.canvas.pixels(), size),
        };
        token.release();

        // Next frame starts regardless of whether this one reached the screen.
        self.canvas.advance_frame();

        match shown {
            Ok(()) => Ok(true),
            Err(e) if e.is_transient() => {
                log::debug!("software flip: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn dispose(&mut self) {
        self.presenter = Presenter::Pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowKind;
    use crate::graphics::Graphics;
    use crate::paint::Color;
    use crate::platform::headless::{HeadlessConfig, HeadlessOp, HeadlessWindow};

    fn shown(config: HeadlessConfig) -> HeadlessWindow {
        let mut w = HeadlessWindow::new(WindowKind::Frame, config);
        w.set_visible(true);
        w
    }

    #[test]
    fn negotiates_strategy_when_offered() {
        let mut window = shown(HeadlessConfig::default());
        let mut surface = SoftwareSurface::new(Size::new(4, 4), true);
        assert_eq!(surface.mode(), BufferingMode::Blit);

        surface.activate(&mut window);
        assert_eq!(surface.mode(), BufferingMode::DoubleBuffer);
    }

    #[test]
    fn blits_when_strategy_refused() {
        let mut window = shown(HeadlessConfig {
            buffer_pages: 0,
            ..HeadlessConfig::default()
        });
        let probe = window.probe();
        let fence = FrameFence::new();
        let mut surface = SoftwareSurface::new(Size::new(2, 2), true);
        surface.activate(&mut window);

        surface.canvas().clear(Color::WHITE);
        assert!(surface.flip(&mut window, &fence).unwrap());
        assert_eq!(probe.journal().last(), Some(&HeadlessOp::Blit));
        assert_eq!(fence.in_flight(), 0);
    }

    #[test]
    fn canvas_survives_flip_with_new_serial() {
        let mut window = shown(HeadlessConfig::default());
        let fence = FrameFence::new();
        let mut surface = SoftwareSurface::new(Size::new(2, 2), true);
        surface.activate(&mut window);

        surface.canvas().clear(Color::WHITE);
        let serial = surface.canvas().frame();
        surface.flip(&mut window, &fence).unwrap();

        assert_ne!(surface.canvas().frame(), serial);
        assert_eq!(surface.canvas().pixels()[0], Color::WHITE.to_xrgb());
    }

    #[test]
    fn fatal_failure_is_reported() {
        let mut window = shown(HeadlessConfig::default());
        let fence = FrameFence::new();
        let mut surface = SoftwareSurface::new(Size::new(2, 2), false);
        surface.activate(&mut window);
        window.dispose().unwrap();

        let err = surface.flip(&mut window, &fence).unwrap_err();
        assert!(!err.is_transient());
    }
}
