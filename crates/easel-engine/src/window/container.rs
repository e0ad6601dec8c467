use anyhow::{Result, bail};

use crate::config::{EngineConfig, WindowKind};
use crate::coords::{Rect, Size};
use crate::error::GraphicsError;
use crate::exit::ExitSignal;
use crate::graphics::Graphics;
use crate::icon::Icon;
use crate::platform::{CloseListener, ListenerId, NativeWindow};
use crate::surface::{BufferingMode, FrameFence, RenderSurface, RendererState};

use super::placement;

/// A native top-level window whose client area is exactly the requested size,
/// with one rendering surface embedded in it.
pub struct WindowContainer {
    native: Box<dyn NativeWindow>,
    surface: RenderSurface,
    client: Size,
    icon: Option<Icon>,
    exit: &'static ExitSignal,
    exit_listener: ListenerId,
}

impl WindowContainer {
    /// Configures `native`, sizes it around the client area and shows it.
    ///
    /// On failure the window is unregistered and disposed before the error is
    /// returned.
    pub fn construct(
        mut native: Box<dyn NativeWindow>,
        config: &EngineConfig,
        exit: &'static ExitSignal,
        fence: &FrameFence,
    ) -> Result<Self> {
        if config.size.is_empty() {
            bail!("client area must not be empty, got {}", config.size);
        }
        if native.kind() != config.kind {
            bail!("native window is a {:?}, config asks for a {:?}", native.kind(), config.kind);
        }

        native.set_decorated(config.decorated);
        native.set_resizable(false);
        native.set_ignore_repaint(true);
        native.set_title(&config.title);

        let key = native.key();
        exit.register(key);
        let exit_listener = native.add_close_listener(Box::new(move |key| exit.window_closing(key)));

        match realize(native.as_mut(), config, fence) {
            Ok(surface) => Ok(Self {
                native,
                surface,
                client: config.size,
                icon: None,
                exit,
                exit_listener,
            }),
            Err(e) => {
                exit.unregister(key);
                native.remove_close_listener(exit_listener);
                if let Err(dispose) = native.dispose() {
                    log::debug!("disposing half-built window {key:?}: {dispose:#}");
                }
                Err(e)
            }
        }
    }

    /// Client area size as requested at construction.
    #[inline]
    pub fn size(&self) -> Size {
        self.client
    }

    pub fn kind(&self) -> WindowKind {
        self.native.kind()
    }

    /// Frame bounds on screen, decorations included.
    pub fn frame_bounds(&self) -> Rect {
        self.native.outer_bounds()
    }

    pub fn title(&self) -> String {
        self.native.title()
    }

    pub fn set_title(&mut self, title: &str) {
        self.native.set_title(title);
    }

    /// Current icon; always `None` for kinds without an icon.
    pub fn icon(&self) -> Option<&Icon> {
        if self.kind().supports_icon() {
            self.icon.as_ref()
        } else {
            None
        }
    }

    /// Best effort: failures and unsupported kinds leave the previous icon.
    pub fn set_icon(&mut self, icon: Icon) {
        if !self.kind().supports_icon() {
            log::debug!("{:?} windows have no icon; ignored", self.kind());
            return;
        }

        match self.native.set_icon(&icon) {
            Ok(()) => self.icon = Some(icon),
            Err(e) => log::debug!("window icon not applied: {e:#}"),
        }
    }

    pub fn add_close_listener(&mut self, listener: CloseListener) -> ListenerId {
        self.native.add_close_listener(listener)
    }

    pub fn remove_close_listener(&mut self, id: ListenerId) -> bool {
        self.native.remove_close_listener(id)
    }

    pub fn back_buffer(&mut self) -> Result<&mut dyn Graphics, GraphicsError> {
        self.surface.back_buffer()
    }

    /// Delivers pending window events, then presents the frame.
    pub fn flip(&mut self, fence: &FrameFence) -> Result<bool, GraphicsError> {
        self.native.pump_events();
        self.surface.flip(self.native.as_mut(), fence)
    }

    pub fn is_vsync(&self) -> bool {
        self.surface.is_vsync()
    }

    pub fn buffering_mode(&self) -> BufferingMode {
        self.surface.buffering_mode()
    }

    pub fn renderer_state(&self) -> Option<RendererState> {
        self.surface.renderer_state()
    }

    pub fn native(&self) -> &dyn NativeWindow {
        self.native.as_ref()
    }

    pub(crate) fn poll_completion(&mut self) {
        self.surface.poll_completion();
    }

    /// Releases the surface, leaves the exit signal and destroys the window.
    pub(crate) fn teardown(&mut self) -> Result<()> {
        self.surface.dispose();
        self.native.remove_close_listener(self.exit_listener);
        self.exit.unregister(self.native.key());
        self.native.dispose()
    }

    pub(crate) fn hide(&mut self) {
        self.native.set_visible(false);
    }
}

/// Measure, resize, attach, place, show. Decoration insets are only known
/// once the window has been realized, so it is shown once to measure them.
fn realize(native: &mut dyn NativeWindow, config: &EngineConfig, fence: &FrameFence) -> Result<RenderSurface> {
    native.set_visible(true);
    let insets = native.insets();
    native.set_visible(false);
    log::debug!("window {:?}: decoration insets {insets:?}", native.key());

    let frame = config.size.expanded(insets);
    native.set_outer_size(frame);

    let mut surface = RenderSurface::attach(config.surface, native, config.size)?;

    let position = placement::place(native.kind(), native.screen_bounds(), frame);
    native.set_outer_position(position);
    native.set_visible(true);

    if let Err(e) = surface.activate(native, fence) {
        surface.dispose();
        return Err(e);
    }

    log::debug!(
        "window {:?}: frame {frame} at ({}, {}), client {}, {:?}",
        native.key(),
        position.x,
        position.y,
        config.size,
        surface.buffering_mode()
    );
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurfaceKind;
    use crate::platform::headless::{HeadlessConfig, HeadlessOp, HeadlessToolkit};
    use crate::platform::Toolkit;

    fn quiet_exit() -> &'static ExitSignal {
        fn ignore(_: i32) {}
        Box::leak(Box::new(ExitSignal::new(ignore)))
    }

    fn build(toolkit: &HeadlessToolkit, config: &EngineConfig) -> Result<WindowContainer> {
        let native = toolkit.create_window(config.kind)?;
        WindowContainer::construct(native, config, quiet_exit(), &FrameFence::new())
    }

    // ── construction ─────────────────────────────────────────────────────────

    #[test]
    fn construction_measures_before_resizing() {
        let toolkit = HeadlessToolkit::default();
        build(&toolkit, &EngineConfig::windowed(Size::new(320, 200))).unwrap();
        let journal = toolkit.last_window().unwrap().journal();

        let pos = |op: HeadlessOp| journal.iter().position(|o| *o == op).unwrap();
        let resize = journal
            .iter()
            .position(|o| matches!(o, HeadlessOp::Resize(_)))
            .unwrap();

        assert!(pos(HeadlessOp::Show) < pos(HeadlessOp::MeasureInsets));
        assert!(pos(HeadlessOp::MeasureInsets) < pos(HeadlessOp::Hide));
        assert!(pos(HeadlessOp::Hide) < resize);
        assert_eq!(journal.last(), Some(&HeadlessOp::CreateStrategy));
        assert!(journal[resize..].contains(&HeadlessOp::Show));
    }

    #[test]
    fn frame_is_configured_for_active_rendering() {
        let toolkit = HeadlessToolkit::default();
        let container = build(&toolkit, &EngineConfig::windowed(Size::new(100, 100))).unwrap();
        let probe = toolkit.last_window().unwrap();

        assert!(!probe.is_resizable());
        assert!(probe.ignores_repaint());
        assert!(probe.is_visible());
        assert_eq!(probe.listener_count(), 1);
        assert_eq!(container.title(), "easel");
    }

    #[test]
    fn empty_client_area_is_rejected() {
        let toolkit = HeadlessToolkit::default();
        assert!(build(&toolkit, &EngineConfig::windowed(Size::new(0, 10))).is_err());
    }

    #[test]
    fn failed_surface_disposes_window() {
        let toolkit = HeadlessToolkit::new(HeadlessConfig {
            fail_drawable_creation: true,
            ..HeadlessConfig::default()
        });
        let config = EngineConfig::windowed(Size::new(64, 64))
            .with_surface(SurfaceKind::Accelerated { vsync: false });

        assert!(build(&toolkit, &config).is_err());
        let probe = toolkit.last_window().unwrap();
        assert!(probe.is_disposed());
        assert_eq!(probe.listener_count(), 0);
    }

    // ── placement ────────────────────────────────────────────────────────────

    #[test]
    fn oversized_frame_stays_on_screen() {
        let toolkit = HeadlessToolkit::new(HeadlessConfig {
            screen: Rect::new(0, 0, 800, 600),
            ..HeadlessConfig::default()
        });
        let container = build(&toolkit, &EngineConfig::windowed(Size::new(1000, 700))).unwrap();
        let bounds = container.frame_bounds();
        assert_eq!((bounds.origin.x, bounds.origin.y), (0, 0));
        assert_eq!(container.size(), Size::new(1000, 700));
    }

    // ── icon ─────────────────────────────────────────────────────────────────

    #[test]
    fn icon_failure_keeps_previous_icon() {
        let toolkit = HeadlessToolkit::new(HeadlessConfig {
            fail_icon: true,
            ..HeadlessConfig::default()
        });
        let mut container = build(&toolkit, &EngineConfig::windowed(Size::new(64, 64))).unwrap();
        let icon = Icon::from_rgba(vec![255; 4 * 4 * 4], Size::new(4, 4)).unwrap();

        container.set_icon(icon);
        assert!(container.icon().is_none());
    }

    #[test]
    fn frame_icon_round_trips() {
        let toolkit = HeadlessToolkit::default();
        let mut container = build(&toolkit, &EngineConfig::windowed(Size::new(64, 64))).unwrap();
        let icon = Icon::from_rgba(vec![255; 2 * 2 * 4], Size::new(2, 2)).unwrap();

        container.set_icon(icon);
        assert_eq!(container.icon().map(Icon::size), Some(Size::new(2, 2)));
        assert_eq!(toolkit.last_window().unwrap().icon_size(), Some(Size::new(2, 2)));
    }
}
