//! In-memory window system.
//!
//! Behaves like a compositor that decorates windows with fixed insets, reports
//! them only once a window has been realized, and keeps every presented frame.
//! Tests and `--headless` runs drive the engine through it; a
//! [`HeadlessProbe`] looks at a window from the outside.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, anyhow, bail};

use crate::config::WindowKind;
use crate::coords::{Insets, Point, Rect, Size};
use crate::error::PresentError;
use crate::icon::Icon;
use crate::scene::{DrawCmd, Scene};
use crate::surface::FrameToken;

use super::{
    BufferStrategy, CloseListener, CloseListeners, Drawable, DrawableConfig, FrameListener,
    FrameSink, ListenerId, NativeWindow, Toolkit, WindowKey,
};

/// Size of a freshly created window, before the container resizes it.
const INITIAL_SIZE: Size = Size::new(160, 120);

#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Insets of a decorated window. Undecorated windows get none.
    pub decoration: Insets,
    pub screen: Rect,
    /// Where new windows appear.
    pub initial_position: Point,
    /// Pages offered for a buffer strategy; `0` refuses strategies.
    pub buffer_pages: u32,
    pub fail_window_creation: bool,
    pub fail_drawable_creation: bool,
    pub fail_icon: bool,
    pub fail_dispose: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            decoration: Insets::new(30, 4, 4, 4),
            screen: Rect::new(0, 0, 1920, 1080),
            initial_position: Point::new(40, 40),
            buffer_pages: 2,
            fail_window_creation: false,
            fail_drawable_creation: false,
            fail_icon: false,
            fail_dispose: false,
        }
    }
}

/// Native operations in the order a window saw them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HeadlessOp {
    Show,
    Hide,
    MeasureInsets,
    Resize(Size),
    Move(Point),
    CreateStrategy,
    CreateDrawable,
    Blit,
    Flip,
    Display,
    Dispose,
}

/// Window system entry point; remembers every window it created.
#[derive(Default)]
pub struct HeadlessToolkit {
    config: HeadlessConfig,
    windows: RefCell<Vec<HeadlessProbe>>,
}

impl HeadlessToolkit {
    pub fn new(config: HeadlessConfig) -> Self {
        Self {
            config,
            windows: RefCell::new(Vec::new()),
        }
    }

    /// Probe of the most recently created window.
    pub fn last_window(&self) -> Option<HeadlessProbe> {
        self.windows.borrow().last().cloned()
    }

    pub fn window_count(&self) -> usize {
        self.windows.borrow().len()
    }
}

impl Toolkit for HeadlessToolkit {
    fn create_window(&self, kind: WindowKind) -> Result<Box<dyn NativeWindow>> {
        if self.config.fail_window_creation {
            bail!("headless window system refused to create a {kind:?} window");
        }

        let window = HeadlessWindow::new(kind, self.config.clone());
        self.windows.borrow_mut().push(window.probe());
        Ok(Box::new(window))
    }
}

struct HeadlessState {
    key: WindowKey,
    kind: WindowKind,
    config: HeadlessConfig,
    decorated: bool,
    resizable: bool,
    ignore_repaint: bool,
    visible: bool,
    realized: bool,
    disposed: bool,
    bounds: Rect,
    title: String,
    icon: Option<Size>,
    listeners: CloseListeners,
    close_requested: bool,
    journal: Vec<HeadlessOp>,
    failing_presents: u32,
    /// Drawables created on this window and not yet disposed.
    attached_drawables: u32,
    presented: u64,
    last_frame: Vec<u32>,
    rects_drawn: usize,
}

impl HeadlessState {
    fn insets(&self) -> Insets {
        if self.realized && self.decorated {
            self.config.decoration
        } else {
            Insets::ZERO
        }
    }

    fn client_size(&self) -> Size {
        self.bounds.size.shrunk(self.insets())
    }

    /// Shared gate of every presentation path.
    fn present(&mut self, op: HeadlessOp) -> Result<(), PresentError> {
        if self.disposed {
            return Err(PresentError::Fatal("window disposed".into()));
        }
        if !self.visible {
            return Err(PresentError::Transient("window not visible".into()));
        }
        if self.failing_presents > 0 {
            self.failing_presents -= 1;
            return Err(PresentError::Transient("surface lost".into()));
        }

        self.journal.push(op);
        self.presented += 1;
        Ok(())
    }
}

type Shared = Rc<RefCell<HeadlessState>>;

/// A native window living in memory.
pub struct HeadlessWindow {
    state: Shared,
}

impl HeadlessWindow {
    pub fn new(kind: WindowKind, config: HeadlessConfig) -> Self {
        let bounds = Rect::from_origin_size(config.initial_position, INITIAL_SIZE);
        let state = HeadlessState {
            key: WindowKey::next(),
            kind,
            config,
            decorated: true,
            resizable: true,
            ignore_repaint: false,
            visible: false,
            realized: false,
            disposed: false,
            bounds,
            title: String::new(),
            icon: None,
            listeners: CloseListeners::default(),
            close_requested: false,
            journal: Vec::new(),
            failing_presents: 0,
            attached_drawables: 0,
            presented: 0,
            last_frame: Vec::new(),
            rects_drawn: 0,
        };

        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn probe(&self) -> HeadlessProbe {
        HeadlessProbe {
            state: self.state.clone(),
        }
    }
}

impl NativeWindow for HeadlessWindow {
    fn key(&self) -> WindowKey {
        self.state.borrow().key
    }

    fn kind(&self) -> WindowKind {
        self.state.borrow().kind
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.state.borrow_mut().decorated = decorated;
    }

    fn set_resizable(&mut self, resizable: bool) {
        self.state.borrow_mut().resizable = resizable;
    }

    fn set_ignore_repaint(&mut self, ignore: bool) {
        self.state.borrow_mut().ignore_repaint = ignore;
    }

    fn set_visible(&mut self, visible: bool) {
        let mut s = self.state.borrow_mut();
        if s.disposed || s.visible == visible {
            return;
        }

        s.visible = visible;
        if visible {
            s.realized = true;
            s.journal.push(HeadlessOp::Show);
        } else {
            s.journal.push(HeadlessOp::Hide);
        }
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    fn insets(&self) -> Insets {
        let mut s = self.state.borrow_mut();
        s.journal.push(HeadlessOp::MeasureInsets);
        s.insets()
    }

    fn set_outer_size(&mut self, size: Size) {
        let mut s = self.state.borrow_mut();
        s.bounds.size = size;
        s.journal.push(HeadlessOp::Resize(size));
    }

    fn outer_bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    fn set_outer_position(&mut self, position: Point) {
        let mut s = self.state.borrow_mut();
        s.bounds.origin = position;
        s.journal.push(HeadlessOp::Move(position));
    }

    fn screen_bounds(&self) -> Rect {
        self.state.borrow().config.screen
    }

    fn set_title(&mut self, title: &str) {
        self.state.borrow_mut().title = title.to_owned();
    }

    fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    fn set_icon(&mut self, icon: &Icon) -> Result<()> {
        let mut s = self.state.borrow_mut();
        if s.config.fail_icon {
            bail!("icon format not supported by the window system");
        }
        s.icon = Some(icon.size());
        Ok(())
    }

    fn add_close_listener(&mut self, listener: CloseListener) -> ListenerId {
        self.state.borrow_mut().listeners.add(listener)
    }

    fn remove_close_listener(&mut self, id: ListenerId) -> bool {
        self.state.borrow_mut().listeners.remove(id)
    }

    fn pump_events(&mut self) {
        let (key, mut running) = {
            let mut s = self.state.borrow_mut();
            if !std::mem::take(&mut s.close_requested) {
                return;
            }
            (s.key, s.listeners.detach())
        };

        // Not borrowed while listeners run; they may reach the window state.
        for (_, listener) in running.iter_mut() {
            listener(key);
        }
        self.state.borrow_mut().listeners.restore(running);
    }

    fn create_buffer_strategy(&mut self, size: Size) -> Result<Box<dyn BufferStrategy>> {
        let mut s = self.state.borrow_mut();
        if !s.visible {
            bail!("buffer strategy needs a displayable window");
        }
        if s.config.buffer_pages == 0 {
            bail!("page flipping not available");
        }

        s.journal.push(HeadlessOp::CreateStrategy);
        Ok(Box::new(HeadlessStrategy {
            pages: s.config.buffer_pages,
            size,
            state: self.state.clone(),
        }))
    }

    fn blit(&mut self, pixels: &[u32], size: Size) -> Result<(), PresentError> {
        let mut s = self.state.borrow_mut();
        s.present(HeadlessOp::Blit)?;
        s.last_frame = pixels[..size.area().min(pixels.len())].to_vec();
        Ok(())
    }

    fn create_drawable(&mut self, config: DrawableConfig) -> Result<Box<dyn Drawable>> {
        let mut s = self.state.borrow_mut();
        if s.config.fail_drawable_creation {
            bail!("no GPU adapter available");
        }

        s.journal.push(HeadlessOp::CreateDrawable);
        s.attached_drawables += 1;
        Ok(Box::new(HeadlessDrawable {
            requested: config.size,
            vsync: config.vsync,
            auto_redraw: true,
            focusable: false,
            configured: None,
            in_flight: Vec::new(),
            disposed: false,
            state: self.state.clone(),
        }))
    }

    fn dispose(&mut self) -> Result<()> {
        let mut s = self.state.borrow_mut();
        if s.disposed {
            return Err(anyhow!("window {:?} already disposed", s.key));
        }
        if s.config.fail_dispose {
            bail!("window system refused to destroy window {:?}", s.key);
        }

        if s.attached_drawables > 0 {
            log::debug!(
                "window {:?} disposed with {} drawable(s) still attached",
                s.key,
                s.attached_drawables
            );
        }
        s.disposed = true;
        s.visible = false;
        s.journal.push(HeadlessOp::Dispose);
        Ok(())
    }
}

/// Toolkit page flipping: the finished page becomes the visible frame.
struct HeadlessStrategy {
    pages: u32,
    size: Size,
    state: Shared,
}

impl BufferStrategy for HeadlessStrategy {
    fn buffer_count(&self) -> u32 {
        self.pages
    }

    fn show(&mut self, pixels: &[u32], size: Size) -> Result<(), PresentError> {
        if size != self.size {
            return Err(PresentError::Transient(format!(
                "page size {} does not match frame {size}",
                self.size
            )));
        }

        let mut s = self.state.borrow_mut();
        s.present(HeadlessOp::Flip)?;
        s.last_frame = pixels.to_vec();
        Ok(())
    }
}

/// GPU drawable stand-in. Completion of a frame is deferred until the next
/// [`Drawable::poll`], like a device finishing work asynchronously.
struct HeadlessDrawable {
    requested: Size,
    vsync: bool,
    auto_redraw: bool,
    focusable: bool,
    configured: Option<Size>,
    in_flight: Vec<FrameToken>,
    disposed: bool,
    state: Shared,
}

impl Drawable for HeadlessDrawable {
    fn size(&self) -> Size {
        self.configured.unwrap_or(self.requested)
    }

    fn set_auto_redraw(&mut self, enabled: bool) {
        self.auto_redraw = enabled;
    }

    fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
    }

    fn display(&mut self, listener: &mut dyn FrameListener, token: FrameToken) -> Result<(), PresentError> {
        if self.disposed {
            return Err(PresentError::Fatal("drawable disposed".into()));
        }

        let client = self.state.borrow().client_size();
        let size = if client.is_empty() { self.requested } else { client };
        match self.configured {
            None => listener.init(size),
            Some(prev) if prev != size => listener.reshape(size),
            Some(_) => {}
        }
        self.configured = Some(size);

        self.state.borrow_mut().present(HeadlessOp::Display)?;

        let mut sink = CountingSink { size, rects: 0 };
        listener.display(&mut sink);
        self.state.borrow_mut().rects_drawn += sink.rects;

        self.in_flight.push(token);
        Ok(())
    }

    fn poll(&mut self) {
        self.in_flight.clear();
    }

    fn dispose(&mut self) {
        self.in_flight.clear();
        if !std::mem::replace(&mut self.disposed, true) {
            let mut s = self.state.borrow_mut();
            s.attached_drawables = s.attached_drawables.saturating_sub(1);
        }
        log::trace!(
            "headless drawable disposed (vsync: {}, auto redraw: {}, focusable: {})",
            self.vsync,
            self.auto_redraw,
            self.focusable
        );
    }
}

struct CountingSink {
    size: Size,
    rects: usize,
}

impl FrameSink for CountingSink {
    fn size(&self) -> Size {
        self.size
    }

    fn draw(&mut self, scene: &Scene) {
        self.rects += scene
            .list
            .items()
            .iter()
            .filter(|item| matches!(item.cmd, DrawCmd::FillRect(_)))
            .count();
    }
}

/// Outside view of a headless window.
#[derive(Clone)]
pub struct HeadlessProbe {
    state: Shared,
}

impl HeadlessProbe {
    pub fn key(&self) -> WindowKey {
        self.state.borrow().key
    }

    pub fn journal(&self) -> Vec<HeadlessOp> {
        self.state.borrow().journal.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    pub fn is_decorated(&self) -> bool {
        self.state.borrow().decorated
    }

    pub fn is_resizable(&self) -> bool {
        self.state.borrow().resizable
    }

    pub fn ignores_repaint(&self) -> bool {
        self.state.borrow().ignore_repaint
    }

    pub fn outer_bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    pub fn client_size(&self) -> Size {
        self.state.borrow().client_size()
    }

    pub fn icon_size(&self) -> Option<Size> {
        self.state.borrow().icon
    }

    /// Drawables still holding on to the window.
    pub fn attached_drawables(&self) -> u32 {
        self.state.borrow().attached_drawables
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Frames that reached the screen (blits, page flips and GPU displays).
    pub fn presented(&self) -> u64 {
        self.state.borrow().presented
    }

    /// Pixels of the last software frame.
    pub fn last_frame(&self) -> Vec<u32> {
        self.state.borrow().last_frame.clone()
    }

    /// Rectangles replayed by accelerated display callbacks so far.
    pub fn rects_drawn(&self) -> usize {
        self.state.borrow().rects_drawn
    }

    /// The next `count` presentations fail transiently.
    pub fn fail_next_presents(&self, count: u32) {
        self.state.borrow_mut().failing_presents = count;
    }

    pub fn set_fail_dispose(&self, fail: bool) {
        self.state.borrow_mut().config.fail_dispose = fail;
    }

    /// Simulates the user clicking the close button; delivered on the next event pump.
    pub fn request_close(&self) {
        self.state.borrow_mut().close_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(kind: WindowKind) -> (HeadlessWindow, HeadlessProbe) {
        let w = HeadlessWindow::new(kind, HeadlessConfig::default());
        let p = w.probe();
        (w, p)
    }

    // ── geometry ─────────────────────────────────────────────────────────────

    #[test]
    fn insets_appear_only_after_realization() {
        let (mut w, _) = window(WindowKind::Frame);
        assert_eq!(w.insets(), Insets::ZERO);
        w.set_visible(true);
        assert_eq!(w.insets(), Insets::new(30, 4, 4, 4));
    }

    #[test]
    fn undecorated_window_has_no_insets() {
        let (mut w, _) = window(WindowKind::Frame);
        w.set_decorated(false);
        w.set_visible(true);
        assert!(w.insets().is_zero());
    }

    #[test]
    fn client_size_excludes_decorations() {
        let (mut w, p) = window(WindowKind::Frame);
        w.set_visible(true);
        w.set_outer_size(Size::new(108, 134));
        assert_eq!(p.client_size(), Size::new(100, 100));
    }

    // ── presentation ─────────────────────────────────────────────────────────

    #[test]
    fn strategy_needs_visible_window() {
        let (mut w, _) = window(WindowKind::Frame);
        assert!(w.create_buffer_strategy(Size::new(4, 4)).is_err());
        w.set_visible(true);
        assert_eq!(w.create_buffer_strategy(Size::new(4, 4)).unwrap().buffer_count(), 2);
    }

    #[test]
    fn injected_failures_are_transient_then_clear() {
        let (mut w, p) = window(WindowKind::Frame);
        w.set_visible(true);
        p.fail_next_presents(1);

        let frame = [7u32; 4];
        assert!(w.blit(&frame, Size::new(2, 2)).unwrap_err().is_transient());
        assert!(w.blit(&frame, Size::new(2, 2)).is_ok());
        assert_eq!(p.presented(), 1);
        assert_eq!(p.last_frame(), frame.to_vec());
    }

    // ── lifecycle ────────────────────────────────────────────────────────────

    #[test]
    fn second_dispose_fails() {
        let (mut w, p) = window(WindowKind::Dialog);
        w.set_visible(true);
        w.dispose().unwrap();
        assert!(p.is_disposed());
        assert!(!p.is_visible());
        assert!(w.dispose().is_err());
    }

    #[test]
    fn close_request_reaches_listeners_on_pump() {
        let (mut w, p) = window(WindowKind::Frame);
        let hits = Rc::new(RefCell::new(Vec::new()));
        let h = hits.clone();
        w.add_close_listener(Box::new(move |key| h.borrow_mut().push(key)));

        w.pump_events();
        assert!(hits.borrow().is_empty());

        p.request_close();
        w.pump_events();
        assert_eq!(*hits.borrow(), vec![p.key()]);
        assert_eq!(p.listener_count(), 1);
    }

    #[test]
    fn listeners_see_the_window_while_dispatching() {
        let (mut w, p) = window(WindowKind::Frame);
        let counts = Rc::new(RefCell::new(Vec::new()));
        let c = counts.clone();
        let observer = p.clone();
        w.add_close_listener(Box::new(move |_| c.borrow_mut().push(observer.listener_count())));

        p.request_close();
        w.pump_events();
        assert_eq!(*counts.borrow(), vec![1]);

        let later = w.add_close_listener(Box::new(|_| {}));
        assert_eq!(p.listener_count(), 2);
        assert!(w.remove_close_listener(later));
        assert_eq!(p.listener_count(), 1);
    }

    #[test]
    fn toolkit_remembers_windows() {
        let toolkit = HeadlessToolkit::default();
        let w = toolkit.create_window(WindowKind::Dialog).unwrap();
        assert_eq!(toolkit.window_count(), 1);
        assert_eq!(toolkit.last_window().unwrap().key(), w.key());
    }

    #[test]
    fn toolkit_can_refuse_windows() {
        let toolkit = HeadlessToolkit::new(HeadlessConfig {
            fail_window_creation: true,
            ..HeadlessConfig::default()
        });
        assert!(toolkit.create_window(WindowKind::Frame).is_err());
    }
}
