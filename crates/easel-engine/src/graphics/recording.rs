use crate::coords::{Rect, Size};
use crate::paint::Color;
use crate::scene::Scene;

use super::Graphics;

/// Drawing context of the accelerated surface.
///
/// Commands are recorded into a [`Scene`] and replayed on the GPU by the
/// renderer delegate during the next display callback. Each display callback
/// retires the context and issues a fresh one with the next frame serial.
#[derive(Debug)]
pub struct SceneGraphics {
    size: Size,
    frame: u64,
    scene: Scene,
}

impl SceneGraphics {
    pub fn new(size: Size, frame: u64) -> Self {
        Self {
            size,
            frame,
            scene: Scene::new(),
        }
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub(crate) fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn into_scene(self) -> Scene {
        self.scene
    }
}

impl Graphics for SceneGraphics {
    fn size(&self) -> Size {
        self.size
    }

    fn frame(&self) -> u64 {
        self.frame
    }

    fn clear(&mut self, color: Color) {
        // Everything recorded so far is covered.
        self.scene.list.clear();
        self.scene.clear = Some(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.scene.list.push_fill_rect(rect, color);
    }

    fn push_clip(&mut self, rect: Rect) {
        self.scene.list.push_clip(rect);
    }

    fn pop_clip(&mut self) {
        self.scene.list.pop_clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_discards_earlier_commands() {
        let mut g = SceneGraphics::new(Size::new(10, 10), 3);
        g.fill_rect(Rect::new(0, 0, 2, 2), Color::WHITE);
        g.clear(Color::BLACK);
        assert!(g.scene().list.items().is_empty());
        assert_eq!(g.scene().clear, Some(Color::BLACK));
    }

    #[test]
    fn empty_rects_are_not_recorded() {
        let mut g = SceneGraphics::new(Size::new(10, 10), 0);
        g.fill_rect(Rect::new(0, 0, 0, 5), Color::WHITE);
        assert!(g.scene().is_empty());
    }
}
