use super::Size;

/// Viewport size in pixels, as seen by GPU shaders.
///
/// Renderers upload this to convert pixel positions to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_size(size: Size) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}
