use super::Rect;

/// Extra pixels the window system adds around a client area (title bar, borders).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl Insets {
    pub const ZERO: Insets = Insets::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(top: u32, left: u32, bottom: u32, right: u32) -> Self {
        Self { top, left, bottom, right }
    }

    #[inline]
    pub const fn horizontal(self) -> u32 {
        self.left + self.right
    }

    #[inline]
    pub const fn vertical(self) -> u32 {
        self.top + self.bottom
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Derives insets from the outer frame bounds and the client bounds inside it.
    ///
    /// A client rect that pokes outside the frame (some compositors report this
    /// transiently) clamps the offending side to zero.
    pub fn between(frame: Rect, client: Rect) -> Self {
        let top = (client.origin.y - frame.origin.y).max(0) as u32;
        let left = (client.origin.x - frame.origin.x).max(0) as u32;
        let bottom = (frame.bottom() - client.bottom()).max(0) as u32;
        let right = (frame.right() - client.right()).max(0) as u32;
        Self { top, left, bottom, right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_typical_decorated_frame() {
        let frame = Rect::new(100, 100, 648, 514);
        let client = Rect::new(104, 130, 640, 480);
        assert_eq!(Insets::between(frame, client), Insets::new(30, 4, 4, 4));
    }

    #[test]
    fn between_identical_rects_is_zero() {
        let r = Rect::new(0, 0, 320, 240);
        assert!(Insets::between(r, r).is_zero());
    }

    #[test]
    fn between_clamps_client_outside_frame() {
        let frame = Rect::new(10, 10, 100, 100);
        let client = Rect::new(5, 12, 100, 100);
        let insets = Insets::between(frame, client);
        assert_eq!(insets.left, 0);
        assert_eq!(insets.top, 2);
    }
}
