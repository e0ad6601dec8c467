use anyhow::Result;

use crate::config::{EngineConfig, SurfaceKind, TeardownPolicy};
use crate::coords::{Rect, Size};
use crate::error::GraphicsError;
use crate::exit::ExitSignal;
use crate::graphics::Graphics;
use crate::icon::Icon;
use crate::platform::{CloseListener, ListenerId, NativeWindow, Toolkit};
use crate::surface::{BufferingMode, FrameFence, RendererState};
use crate::window::WindowContainer;

/// Active-rendering graphics engine: one window, one rendering surface.
///
/// The owning render loop calls [`back_buffer`](Self::back_buffer), draws,
/// then calls [`flip`](Self::flip) once per frame. [`cleanup`](Self::cleanup)
/// ends the engine; afterwards drawing operations return
/// [`GraphicsError::Disposed`].
pub struct GraphicsEngine {
    container: WindowContainer,
    fence: FrameFence,
    config: EngineConfig,
    exit: &'static ExitSignal,
    disposed: bool,
}

impl GraphicsEngine {
    /// Builds the engine on an existing hidden native window.
    pub fn new(native: Box<dyn NativeWindow>, config: EngineConfig) -> Result<Self> {
        Self::with_exit_signal(native, config, ExitSignal::global())
    }

    /// Creates the native window through `toolkit`, then builds the engine.
    pub fn with_toolkit(toolkit: &dyn Toolkit, config: EngineConfig) -> Result<Self> {
        let native = toolkit.create_window(config.kind)?;
        Self::new(native, config)
    }

    /// Like [`new`](Self::new), with close requests and forced exits routed
    /// to `exit` instead of the process-wide signal.
    pub fn with_exit_signal(
        native: Box<dyn NativeWindow>,
        config: EngineConfig,
        exit: &'static ExitSignal,
    ) -> Result<Self> {
        let fence = FrameFence::new();
        let container = WindowContainer::construct(native, &config, exit, &fence)?;
        log::info!("{} ready", describe(&config));

        Ok(Self {
            container,
            fence,
            config,
            exit,
            disposed: false,
        })
    }

    /// Drawing context for the next frame. Fetch it again after every flip.
    pub fn back_buffer(&mut self) -> Result<&mut dyn Graphics, GraphicsError> {
        if self.disposed {
            return Err(GraphicsError::Disposed);
        }
        self.container.back_buffer()
    }

    /// Presents the frame drawn since the last flip.
    ///
    /// `Ok(false)` means the frame was dropped for a transient reason; render
    /// the next one as usual.
    pub fn flip(&mut self) -> Result<bool, GraphicsError> {
        if self.disposed {
            return Err(GraphicsError::Disposed);
        }
        self.container.flip(&self.fence)
    }

    /// Waits for in-flight frames (at most the configured grace period), then
    /// destroys the window and its surface.
    ///
    /// Calling it again is a no-op. A failed disposal follows the configured
    /// [`TeardownPolicy`].
    pub fn cleanup(&mut self) -> Result<(), GraphicsError> {
        if self.disposed {
            log::debug!("cleanup: already cleaned up");
            return Ok(());
        }
        self.disposed = true;

        let grace = self.config.grace;
        let container = &mut self.container;
        if !self.fence.wait_idle(grace, || container.poll_completion()) {
            log::warn!(
                "cleanup: {} frame(s) still in flight after {grace:?}; tearing down anyway",
                self.fence.in_flight()
            );
        }

        let Err(e) = self.container.teardown() else {
            log::debug!("cleanup: window disposed");
            return Ok(());
        };

        match self.config.teardown {
            TeardownPolicy::Exit => {
                log::error!("cleanup: failed to dispose window: {e:#}; exiting");
                self.exit.terminate(-1);
            }
            TeardownPolicy::Hide => {
                log::error!("cleanup: failed to dispose window: {e:#}; hiding it instead");
                self.container.hide();
            }
        }
        Err(GraphicsError::Teardown(e))
    }

    /// Client area size; always the size requested at construction.
    #[inline]
    pub fn size(&self) -> Size {
        self.container.size()
    }

    /// Frame bounds on screen, decorations included.
    pub fn frame_bounds(&self) -> Rect {
        self.container.frame_bounds()
    }

    pub fn title(&self) -> String {
        self.container.title()
    }

    pub fn set_title(&mut self, title: &str) {
        if self.disposed {
            log::debug!("set_title after cleanup ignored");
            return;
        }
        self.container.set_title(title);
    }

    pub fn icon(&self) -> Option<&Icon> {
        self.container.icon()
    }

    pub fn set_icon(&mut self, icon: Icon) {
        if self.disposed {
            log::debug!("set_icon after cleanup ignored");
            return;
        }
        self.container.set_icon(icon);
    }

    /// `true` only for an accelerated surface created with vsync.
    pub fn is_vsync(&self) -> bool {
        self.container.is_vsync()
    }

    /// e.g. `Windowed Mode [640x480]` or `Accelerated Dialog Mode [320x200] with VSync`.
    pub fn description(&self) -> String {
        describe(&self.config)
    }

    pub fn add_close_listener(&mut self, listener: CloseListener) -> ListenerId {
        self.container.add_close_listener(listener)
    }

    pub fn remove_close_listener(&mut self, id: ListenerId) -> bool {
        self.container.remove_close_listener(id)
    }

    /// The backing native window.
    pub fn native(&self) -> &dyn NativeWindow {
        self.container.native()
    }

    /// Renderer delegate state; `None` for software surfaces.
    pub fn renderer_state(&self) -> Option<RendererState> {
        self.container.renderer_state()
    }

    pub fn buffering_mode(&self) -> BufferingMode {
        self.container.buffering_mode()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for GraphicsEngine {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        log::debug!("graphics engine dropped without cleanup; disposing window");
        if let Err(e) = self.container.teardown() {
            log::debug!("dispose on drop failed: {e:#}");
        }
    }
}

fn describe(config: &EngineConfig) -> String {
    let (prefix, suffix) = match config.surface {
        SurfaceKind::Software { .. } => ("", ""),
        SurfaceKind::Accelerated { vsync: false } => ("Accelerated ", ""),
        SurfaceKind::Accelerated { vsync: true } => ("Accelerated ", " with VSync"),
    };
    format!("{prefix}{} [{}]{suffix}", config.kind.label(), config.size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_names_mode_and_size() {
        let config = EngineConfig::windowed(Size::new(640, 480));
        assert_eq!(describe(&config), "Windowed Mode [640x480]");
    }

    #[test]
    fn description_marks_accelerated_vsync() {
        let config = EngineConfig::dialog(Size::new(320, 200))
            .with_surface(SurfaceKind::Accelerated { vsync: true });
        assert_eq!(describe(&config), "Accelerated Dialog Mode [320x200] with VSync");

        let config = config.with_surface(SurfaceKind::Accelerated { vsync: false });
        assert_eq!(describe(&config), "Accelerated Dialog Mode [320x200]");
    }
}
