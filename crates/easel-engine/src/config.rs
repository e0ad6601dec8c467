use std::time::Duration;

use crate::coords::Size;

/// Upper bound on how long `cleanup` waits for an in-flight frame.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(200);

/// Top-level window presentation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WindowKind {
    /// Primary application frame.
    Frame,
    /// Dialog-style window, still actively rendered. Dialogs carry no icon.
    Dialog,
}

impl WindowKind {
    #[inline]
    pub fn supports_icon(self) -> bool {
        matches!(self, WindowKind::Frame)
    }

    /// Primary frames are pulled back when centering pushes the top or left
    /// edge past the screen's origin.
    #[inline]
    pub fn clamps_to_screen(self) -> bool {
        matches!(self, WindowKind::Frame)
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            WindowKind::Frame => "Windowed Mode",
            WindowKind::Dialog => "Dialog Mode",
        }
    }
}

/// Which rendering surface the window embeds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceKind {
    /// CPU pixel buffer. `buffer_strategy` asks for toolkit page flipping first;
    /// the engine falls back to a manually blitted back buffer when it is refused.
    Software { buffer_strategy: bool },
    /// GPU drawable driven by frame callbacks.
    Accelerated { vsync: bool },
}

/// What `cleanup` does when the native window refuses to dispose.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TeardownPolicy {
    /// Log, then terminate the process with status -1.
    Exit,
    /// Log, hide the window and report the failure to the caller.
    #[default]
    Hide,
}

/// Graphics engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Requested client area; the frame grows around it by the decoration insets.
    pub size: Size,
    pub kind: WindowKind,
    pub decorated: bool,
    pub title: String,
    pub surface: SurfaceKind,
    pub teardown: TeardownPolicy,
    /// Quiescence bound applied by `cleanup`.
    pub grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: Size::new(640, 480),
            kind: WindowKind::Frame,
            decorated: true,
            title: "easel".to_string(),
            surface: SurfaceKind::Software { buffer_strategy: true },
            teardown: TeardownPolicy::default(),
            grace: DEFAULT_GRACE,
        }
    }
}

impl EngineConfig {
    pub fn windowed(size: Size) -> Self {
        Self { size, ..Self::default() }
    }

    pub fn dialog(size: Size) -> Self {
        Self {
            size,
            kind: WindowKind::Dialog,
            ..Self::default()
        }
    }

    pub fn with_decorations(mut self, decorated: bool) -> Self {
        self.decorated = decorated;
        self
    }

    pub fn with_surface(mut self, surface: SurfaceKind) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_teardown(mut self, teardown: TeardownPolicy) -> Self {
        self.teardown = teardown;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}
