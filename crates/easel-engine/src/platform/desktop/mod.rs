//! Desktop backend: winit windows, softbuffer presentation, wgpu drawables.
//!
//! winit 0.30 only hands out windows from inside event-loop callbacks, while
//! the container needs them synchronously. The toolkit therefore owns the
//! event loop and pumps it on demand: window creation, visibility changes and
//! resizes each run a short pump so the window system has applied them before
//! the call returns.

mod drawable;
mod presenter;
mod pump;
mod toolkit;
mod window;

pub use toolkit::DesktopToolkit;
pub use window::DesktopWindow;
