use super::{Point, Size};

/// Axis-aligned pixel rectangle (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Rectangle anchored at the origin covering `size`.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self { origin: Point::zero(), size }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(self) -> i32 {
        self.origin.x.saturating_add(self.size.width as i32)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(self) -> i32 {
        self.origin.y.saturating_add(self.size.height as i32)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.is_empty()
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < self.right() && p.y < self.bottom()
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = self.origin.x.max(other.origin.x);
        let y0 = self.origin.y.max(other.origin.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
        }
    }

    /// Top-left position that centers a box of `size` inside `self`.
    ///
    /// A box larger than `self` yields negative offsets relative to `self`.
    #[inline]
    pub fn centered(self, size: Size) -> Point {
        let dx = (i64::from(self.size.width) - i64::from(size.width)) / 2;
        let dy = (i64::from(self.size.height) - i64::from(size.height)) / 2;
        Point::new(self.origin.x + dx as i32, self.origin.y + dy as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0, 0, 10, 10).contains(Point::new(0, 0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0, 0, 10, 10).contains(Point::new(10, 10)));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let i = r(0, 0, 10, 10).intersect(r(5, 5, 10, 10)).unwrap();
        assert_eq!(i, r(5, 5, 5, 5));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        assert!(r(0, 0, 10, 10).intersect(r(10, 0, 10, 10)).is_none());
    }

    #[test]
    fn intersect_negative_origin_is_cropped() {
        let i = r(-5, -5, 10, 10).intersect(r(0, 0, 100, 100)).unwrap();
        assert_eq!(i, r(0, 0, 5, 5));
    }

    // ── centered ──────────────────────────────────────────────────────────

    #[test]
    fn centered_inside_screen() {
        let screen = r(0, 0, 1920, 1080);
        assert_eq!(screen.centered(Size::new(640, 480)), Point::new(640, 300));
    }

    #[test]
    fn centered_respects_screen_origin() {
        let screen = r(1920, 0, 1280, 1024);
        assert_eq!(screen.centered(Size::new(1280, 1024)), Point::new(1920, 0));
    }

    #[test]
    fn centered_oversized_goes_negative() {
        let screen = r(0, 0, 800, 600);
        assert_eq!(screen.centered(Size::new(1000, 700)), Point::new(-100, -50));
    }
}
