use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::WindowKind;
use crate::coords::{Insets, Point, Rect, Size};
use crate::error::PresentError;
use crate::icon::Icon;
use crate::platform::{
    BufferStrategy, CloseListener, CloseListeners, Drawable, DrawableConfig, ListenerId,
    NativeWindow, WindowKey,
};

use super::drawable::WgpuDrawable;
use super::pump::{EventPump, PumpedEvent, SETTLE};
use super::presenter::SoftbufferPresenter;

/// Used when the window system cannot tell which monitor a window is on.
const FALLBACK_SCREEN: Rect = Rect::new(0, 0, 1920, 1080);

/// A winit top-level window.
pub struct DesktopWindow {
    key: WindowKey,
    kind: WindowKind,
    /// Lazily created target of direct blits.
    blitter: Option<SoftbufferPresenter>,
    /// `None` once disposed.
    window: Option<Arc<Window>>,
    id: WindowId,
    pump: Rc<RefCell<EventPump>>,
    listeners: CloseListeners,
    title: String,
}

impl DesktopWindow {
    pub(super) fn create(pump: Rc<RefCell<EventPump>>, kind: WindowKind) -> Result<Self> {
        let attrs = attributes_for(kind);
        let window = pump.borrow_mut().create_window(attrs)?;
        let id = window.id();
        log::debug!("created {kind:?} window {id:?}");

        Ok(Self {
            key: WindowKey::next(),
            kind,
            blitter: None,
            window: Some(Arc::new(window)),
            id,
            pump,
            listeners: CloseListeners::default(),
            title: String::new(),
        })
    }

    fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    fn live(&self) -> Result<&Arc<Window>> {
        self.window
            .as_ref()
            .ok_or_else(|| anyhow!("window {:?} has been disposed", self.key))
    }

    fn settle(&self) {
        self.pump.borrow_mut().settle(SETTLE);
    }
}

fn attributes_for(kind: WindowKind) -> WindowAttributes {
    let attrs = Window::default_attributes()
        .with_visible(false)
        .with_inner_size(PhysicalSize::new(320u32, 240u32));

    match kind {
        WindowKind::Frame => attrs,
        WindowKind::Dialog => dialog_attributes(attrs),
    }
}

#[cfg(target_os = "linux")]
fn dialog_attributes(attrs: WindowAttributes) -> WindowAttributes {
    use winit::platform::x11::{WindowAttributesExtX11, WindowType};
    attrs.with_x11_window_type(vec![WindowType::Dialog])
}

#[cfg(target_os = "windows")]
fn dialog_attributes(attrs: WindowAttributes) -> WindowAttributes {
    use winit::platform::windows::WindowAttributesExtWindows;
    attrs.with_skip_taskbar(true)
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn dialog_attributes(attrs: WindowAttributes) -> WindowAttributes {
    attrs
}

/// Insets when the window system reports sizes but no positions (Wayland).
/// Horizontal decoration is split evenly; the rest of the vertical goes on top.
fn insets_from_sizes(outer: Size, inner: Size) -> Insets {
    let dw = outer.width.saturating_sub(inner.width);
    let dh = outer.height.saturating_sub(inner.height);
    let left = dw / 2;
    let bottom = left.min(dh);
    Insets::new(dh - bottom, left, bottom, dw - left)
}

impl NativeWindow for DesktopWindow {
    fn key(&self) -> WindowKey {
        self.key
    }

    fn kind(&self) -> WindowKind {
        self.kind
    }

    fn set_decorated(&mut self, decorated: bool) {
        if let Some(w) = self.window() {
            w.set_decorations(decorated);
        }
    }

    fn set_resizable(&mut self, resizable: bool) {
        if let Some(w) = self.window() {
            w.set_resizable(resizable);
        }
    }

    fn set_ignore_repaint(&mut self, ignore: bool) {
        // winit never paints on its own; redraw requests are dropped by the pump.
        log::trace!("window {:?}: ignore repaint = {ignore}", self.key);
    }

    fn set_visible(&mut self, visible: bool) {
        let Some(w) = self.window() else { return };
        w.set_visible(visible);
        self.settle();
    }

    fn is_visible(&self) -> bool {
        self.window()
            .and_then(|w| w.is_visible())
            .unwrap_or(false)
    }

    fn insets(&self) -> Insets {
        let Some(w) = self.window() else {
            return Insets::ZERO;
        };

        let outer = w.outer_size();
        let inner = w.inner_size();
        let outer_size = Size::new(outer.width, outer.height);
        let inner_size = Size::new(inner.width, inner.height);

        match (w.outer_position(), w.inner_position()) {
            (Ok(o), Ok(i)) => Insets::between(
                Rect::from_origin_size(Point::new(o.x, o.y), outer_size),
                Rect::from_origin_size(Point::new(i.x, i.y), inner_size),
            ),
            _ => insets_from_sizes(outer_size, inner_size),
        }
    }

    fn set_outer_size(&mut self, size: Size) {
        let insets = self.insets();
        let Some(w) = self.window() else { return };

        let client = size.shrunk(insets);
        if let Some(applied) = w.request_inner_size(PhysicalSize::new(client.width, client.height)) {
            log::trace!("window {:?} resized immediately to {applied:?}", self.key);
        }
        self.settle();
    }

    fn outer_bounds(&self) -> Rect {
        let Some(w) = self.window() else {
            return Rect::default();
        };
        let size = w.outer_size();
        let origin = w
            .outer_position()
            .map(|p| Point::new(p.x, p.y))
            .unwrap_or_default();
        Rect::from_origin_size(origin, Size::new(size.width, size.height))
    }

    fn set_outer_position(&mut self, position: Point) {
        if let Some(w) = self.window() {
            w.set_outer_position(PhysicalPosition::new(position.x, position.y));
        }
    }

    fn screen_bounds(&self) -> Rect {
        let monitor = self
            .window()
            .and_then(|w| w.current_monitor().or_else(|| w.primary_monitor()));

        match monitor {
            Some(m) => {
                let p = m.position();
                let s = m.size();
                Rect::new(p.x, p.y, s.width, s.height)
            }
            None => {
                log::debug!("no monitor reported for window {:?}; assuming {FALLBACK_SCREEN:?}", self.key);
                FALLBACK_SCREEN
            }
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(w) = self.window() {
            w.set_title(title);
        }
        self.title = title.to_owned();
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_icon(&mut self, icon: &Icon) -> Result<()> {
        let w = self.live()?;
        let size = icon.size();
        let native = winit::window::Icon::from_rgba(icon.rgba().to_vec(), size.width, size.height)
            .context("converting icon for the window system")?;
        w.set_window_icon(Some(native));
        Ok(())
    }

    fn add_close_listener(&mut self, listener: CloseListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_close_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn pump_events(&mut self) {
        let events = {
            let mut pump = self.pump.borrow_mut();
            pump.pump(std::time::Duration::ZERO);
            pump.take_events(self.id)
        };

        for event in events {
            match event {
                PumpedEvent::CloseRequested => self.listeners.dispatch(self.key),
                PumpedEvent::Resized(size) => {
                    log::trace!("window {:?} resized by the window system to {size:?}", self.key)
                }
            }
        }
    }

    fn create_buffer_strategy(&mut self, size: Size) -> Result<Box<dyn BufferStrategy>> {
        let w = self.live()?.clone();
        anyhow::ensure!(!size.is_empty(), "buffer strategy for an empty {size} client area");
        Ok(Box::new(SoftbufferPresenter::new(w)?))
    }

    fn blit(&mut self, pixels: &[u32], size: Size) -> std::result::Result<(), PresentError> {
        if self.blitter.is_none() {
            let w = self
                .window()
                .ok_or_else(|| PresentError::Fatal("window disposed".into()))?
                .clone();
            let presenter = SoftbufferPresenter::new(w).map_err(|e| PresentError::Fatal(format!("{e:#}")))?;
            self.blitter = Some(presenter);
        }

        match self.blitter.as_mut() {
            Some(blitter) => blitter.present(pixels, size),
            None => Err(PresentError::Fatal("no blit target".into())),
        }
    }

    fn create_drawable(&mut self, config: DrawableConfig) -> Result<Box<dyn Drawable>> {
        let w = self.live()?.clone();
        Ok(Box::new(WgpuDrawable::new(w, config)?))
    }

    fn dispose(&mut self) -> Result<()> {
        let window = self
            .window
            .take()
            .ok_or_else(|| anyhow!("window {:?} already disposed", self.key))?;

        self.blitter = None;
        window.set_visible(false);
        let outstanding = Arc::strong_count(&window) - 1;
        if outstanding > 0 {
            log::debug!("window {:?} disposed with {outstanding} surface(s) still attached", self.key);
        }
        drop(window);

        let mut pump = self.pump.borrow_mut();
        pump.pump(std::time::Duration::ZERO);
        pump.forget(self.id);
        Ok(())
    }
}
