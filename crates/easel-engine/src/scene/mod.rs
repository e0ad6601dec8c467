//! Recorded draw streams for the accelerated path.
//!
//! The accelerated drawing context records commands here between flips; the
//! renderer delegate replays the stream inside the display callback.

mod cmd;
mod list;

pub use cmd::{DrawCmd, RectCmd};
pub use list::{DrawItem, DrawList};

use crate::paint::Color;

/// One frame's worth of recorded drawing.
#[derive(Debug, Default)]
pub struct Scene {
    /// Background fill applied before any command. `None` keeps the GPU default (black).
    pub clear: Option<Color>,
    pub list: DrawList,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clear.is_none() && self.list.items().is_empty()
    }
}
