use crate::coords::{Point, Rect, Size};
use crate::icon::Icon;
use crate::paint::Color;

use super::Graphics;

/// CPU pixel buffer in `0x00RRGGBB`, row-major, stride = width.
///
/// Backs the software surface. Contents persist across flips, like an AWT back
/// buffer; the frame serial advances on every flip.
#[derive(Debug, Clone)]
pub struct PixelGraphics {
    size: Size,
    pixels: Vec<u32>,
    clip_stack: Vec<Rect>,
    frame: u64,
}

impl PixelGraphics {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![0; size.area()],
            clip_stack: Vec::new(),
            frame: 0,
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `p`, or `None` outside the surface.
    pub fn pixel(&self, p: Point) -> Option<u32> {
        if !Rect::from_size(self.size).contains(p) {
            return None;
        }
        self.pixels.get(self.index(p.x as u32, p.y as u32)).copied()
    }

    /// Blits an RGBA image with alpha blending, honoring the clip.
    pub fn draw_image(&mut self, image: &Icon, at: Point) {
        let Some(area) = self.clipped(Rect::from_origin_size(at, image.size())) else {
            return;
        };

        let src_w = image.size().width as usize;
        let rgba = image.rgba();
        for y in area.origin.y..area.bottom() {
            for x in area.origin.x..area.right() {
                let sx = (x - at.x) as usize;
                let sy = (y - at.y) as usize;
                let s = (sy * src_w + sx) * 4;
                let color = Color::from_straight_u8(rgba[s], rgba[s + 1], rgba[s + 2], rgba[s + 3]);
                let i = self.index(x as u32, y as u32);
                self.pixels[i] = color.blend_over_xrgb(self.pixels[i]);
            }
        }
    }

    pub(crate) fn advance_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.clip_stack.clear();
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    /// `rect` cropped to the surface and the active clip.
    fn clipped(&self, rect: Rect) -> Option<Rect> {
        let bounds = self
            .clip_stack
            .last()
            .copied()
            .unwrap_or_else(|| Rect::from_size(self.size));
        rect.intersect(bounds)
    }
}

impl Graphics for PixelGraphics {
    fn size(&self) -> Size {
        self.size
    }

    fn frame(&self) -> u64 {
        self.frame
    }

    fn clear(&mut self, color: Color) {
        let px = color.blend_over_xrgb(0);
        self.pixels.fill(px);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(area) = self.clipped(rect) else { return };

        let width = self.size.width as usize;
        for y in area.origin.y..area.bottom() {
            let row = y as usize * width;
            let span = &mut self.pixels[row + area.origin.x as usize..row + area.right() as usize];
            if color.is_opaque() {
                span.fill(color.to_xrgb());
            } else {
                for px in span {
                    *px = color.blend_over_xrgb(*px);
                }
            }
        }
    }

    fn push_clip(&mut self, rect: Rect) {
        let effective = self.clipped(rect).unwrap_or_default();
        self.clip_stack.push(effective);
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn pixels_mut(&mut self) -> Option<&mut PixelGraphics> {
        Some(self)
    }
}
