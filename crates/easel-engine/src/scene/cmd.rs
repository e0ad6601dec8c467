use crate::coords::Rect;
use crate::paint::Color;

/// Solid rectangle fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

/// Renderer-agnostic draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect(RectCmd),
}
