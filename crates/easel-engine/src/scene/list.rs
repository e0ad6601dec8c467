use crate::coords::Rect;

use super::{DrawCmd, RectCmd};
use crate::paint::Color;

/// A single draw item: command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    /// Scissor rect in pixels. `None` = no clipping.
    pub clip_rect: Option<Rect>,
}

/// Draw stream for a frame, replayed in insertion order.
///
/// # Clipping
///
/// [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) scope commands to a
/// scissor rect. Nested clips intersect with their parent.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,

    /// Top is the current effective clip, already intersected with all parents.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and the clip stack. Keeps allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Appends a command; it inherits the current clip rect.
    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(DrawItem {
            cmd,
            clip_rect: self.clip_stack.last().copied(),
        });
    }

    #[inline]
    pub fn push_fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCmd::FillRect(RectCmd { rect, color }));
    }

    /// Begins a scissor region, intersected with any parent clip.
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            // No overlap: a zero-area clip makes the renderer skip the draws.
            Some(&parent) => parent.intersect(rect).unwrap_or_default(),
        };
        self.clip_stack.push(effective);
    }

    /// Ends the most recent scissor region. Unbalanced pops are ignored.
    #[inline]
    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_none() {
            log::debug!("DrawList::pop_clip without matching push_clip");
        }
    }

    #[inline]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }
}
