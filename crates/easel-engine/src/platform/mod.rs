//! Window-system seam.
//!
//! The core drives every toolkit through [`NativeWindow`]; it never touches
//! winit, softbuffer or wgpu directly. Two backends exist:
//! - [`desktop`]: real windows (winit), software presentation (softbuffer) and
//!   GPU drawables (wgpu)
//! - [`headless`]: an in-memory window system for tests and display-less runs
//!
//! Backends are not `Send`: a window and everything attached to it stays on the
//! thread that created it.

pub mod desktop;
pub mod headless;

mod listeners;

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;

use crate::config::WindowKind;
use crate::coords::{Insets, Point, Rect, Size};
use crate::error::PresentError;
use crate::icon::Icon;
use crate::scene::Scene;
use crate::surface::FrameToken;

pub(crate) use listeners::CloseListeners;

/// Process-unique window identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct WindowKey(u64);

impl WindowKey {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Handle returned by [`NativeWindow::add_close_listener`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Invoked when the user asks to close the window.
pub type CloseListener = Box<dyn FnMut(WindowKey)>;

/// Creates top-level windows.
pub trait Toolkit {
    /// Creates a hidden native window of `kind`; the container configures the rest.
    fn create_window(&self, kind: WindowKind) -> Result<Box<dyn NativeWindow>>;
}

/// A top-level native window as seen by the window container.
pub trait NativeWindow {
    fn key(&self) -> WindowKey;

    fn kind(&self) -> WindowKind;

    fn set_decorated(&mut self, decorated: bool);

    fn set_resizable(&mut self, resizable: bool);

    /// Stops the toolkit from scheduling repaints; every frame comes from `flip`.
    fn set_ignore_repaint(&mut self, ignore: bool);

    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// Decoration insets. Only meaningful once the window has been realized
    /// (shown at least once); before that backends report [`Insets::ZERO`].
    fn insets(&self) -> Insets;

    /// Resizes the whole frame, decorations included.
    fn set_outer_size(&mut self, size: Size);

    /// Frame position and size on screen, decorations included.
    fn outer_bounds(&self) -> Rect;

    fn set_outer_position(&mut self, position: Point);

    /// Bounds of the screen the window is on.
    fn screen_bounds(&self) -> Rect;

    fn set_title(&mut self, title: &str);

    fn title(&self) -> String;

    fn set_icon(&mut self, icon: &Icon) -> Result<()>;

    fn add_close_listener(&mut self, listener: CloseListener) -> ListenerId;

    fn remove_close_listener(&mut self, id: ListenerId) -> bool;

    /// Processes pending window-system events; close requests reach the listeners here.
    fn pump_events(&mut self);

    /// Negotiates toolkit-managed page flipping for a client area of `size`.
    fn create_buffer_strategy(&mut self, size: Size) -> Result<Box<dyn BufferStrategy>>;

    /// Copies `pixels` straight onto the visible client area.
    fn blit(&mut self, pixels: &[u32], size: Size) -> std::result::Result<(), PresentError>;

    /// Creates a GPU drawable filling the client area.
    fn create_drawable(&mut self, config: DrawableConfig) -> Result<Box<dyn Drawable>>;

    /// Destroys the native window. Fails when it is already gone.
    fn dispose(&mut self) -> Result<()>;
}

/// Toolkit-managed multi-buffering for the software surface.
pub trait BufferStrategy {
    fn buffer_count(&self) -> u32;

    /// Copies a finished frame into the next back page and flips it on screen.
    fn show(&mut self, pixels: &[u32], size: Size) -> std::result::Result<(), PresentError>;
}

/// Accelerated drawable parameters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawableConfig {
    pub size: Size,
    pub vsync: bool,
}

/// GPU-backed drawing surface driven by explicit display requests.
pub trait Drawable {
    fn size(&self) -> Size;

    /// `false` leaves all redraw scheduling to the caller.
    fn set_auto_redraw(&mut self, enabled: bool);

    fn set_focusable(&mut self, focusable: bool);

    /// Runs one display cycle and blocks until it is submitted.
    ///
    /// The first cycle calls [`FrameListener::init`]; any cycle that sees a new
    /// drawable size calls [`FrameListener::reshape`]; every successful cycle
    /// ends with [`FrameListener::display`]. `token` is released once the GPU
    /// has finished the frame.
    fn display(
        &mut self,
        listener: &mut dyn FrameListener,
        token: FrameToken,
    ) -> std::result::Result<(), PresentError>;

    /// Nudges the device so completion callbacks of submitted frames can run.
    fn poll(&mut self) {}

    fn dispose(&mut self);
}

/// Frame callbacks of an accelerated drawable.
pub trait FrameListener {
    fn init(&mut self, size: Size);

    fn display(&mut self, sink: &mut dyn FrameSink);

    fn reshape(&mut self, size: Size);
}

/// Consumer of recorded scenes inside a display callback.
pub trait FrameSink {
    fn size(&self) -> Size;

    fn draw(&mut self, scene: &Scene);
}
