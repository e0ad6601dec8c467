use crate::coords::Size;
use crate::error::GraphicsError;
use crate::graphics::SceneGraphics;
use crate::platform::{FrameListener, FrameSink};

/// Lifecycle of the renderer delegate.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    /// No setup callback received yet.
    Uninitialized,
    /// Set up; every display callback keeps it here.
    Ready,
    /// Torn down; the drawing context is gone and callbacks are ignored.
    Disposed,
}

/// Frame-callback delegate of the accelerated surface.
///
/// Owns the drawing context callers obtain through `back_buffer`. Each display
/// callback replays the current context into the drawable and replaces it with
/// a fresh one, so a context never outlives its frame.
#[derive(Debug)]
pub struct GpuRenderer {
    state: RendererState,
    vsync: bool,
    viewport: Size,
    frames: u64,
    current: Option<SceneGraphics>,
}

impl GpuRenderer {
    pub fn new(vsync: bool) -> Self {
        Self {
            state: RendererState::Uninitialized,
            vsync,
            viewport: Size::default(),
            frames: 0,
            current: None,
        }
    }

    #[inline]
    pub fn state(&self) -> RendererState {
        self.state
    }

    #[inline]
    pub fn is_vsync(&self) -> bool {
        self.vsync
    }

    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Display callbacks completed so far.
    #[inline]
    pub fn frames_displayed(&self) -> u64 {
        self.frames
    }

    /// Drawing context for the next frame.
    pub fn graphics(&mut self) -> Result<&mut SceneGraphics, GraphicsError> {
        match self.state {
            RendererState::Uninitialized => Err(GraphicsError::NotReady),
            RendererState::Disposed => Err(GraphicsError::Disposed),
            RendererState::Ready => self.current.as_mut().ok_or(GraphicsError::NotReady),
        }
    }

    /// Invalidates the drawing context; further callbacks are ignored.
    pub fn dispose(&mut self) {
        self.current = None;
        self.state = RendererState::Disposed;
    }

    fn fresh_context(&self) -> SceneGraphics {
        SceneGraphics::new(self.viewport, self.frames)
    }
}

impl FrameListener for GpuRenderer {
    fn init(&mut self, size: Size) {
        if self.state != RendererState::Uninitialized {
            log::debug!("renderer setup callback in state {:?} ignored", self.state);
            return;
        }

        self.viewport = size;
        self.state = RendererState::Ready;
        self.current = Some(self.fresh_context());
        log::debug!("renderer ready ({size}, vsync: {})", self.vsync);
    }

    fn display(&mut self, sink: &mut dyn FrameSink) {
        if self.state != RendererState::Ready {
            return;
        }

        if let Some(graphics) = self.current.take() {
            sink.draw(&graphics.into_scene());
        }

        self.frames = self.frames.wrapping_add(1);
        self.current = Some(self.fresh_context());
    }

    fn reshape(&mut self, size: Size) {
        if self.state == RendererState::Disposed {
            return;
        }

        self.viewport = size;
        // Commands already recorded stay valid; only the reported size changes.
        if let Some(current) = self.current.as_mut() {
            current.resize(size);
        }
    }
}
