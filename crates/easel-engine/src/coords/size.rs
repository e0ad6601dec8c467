use std::fmt;

use super::Insets;

/// Pixel dimensions of a client area, frame or drawing surface.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered, as a buffer length.
    #[inline]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Frame size needed to surround a client area of `self` with `insets`.
    #[inline]
    pub fn expanded(self, insets: Insets) -> Self {
        Self {
            width: self.width.saturating_add(insets.horizontal()),
            height: self.height.saturating_add(insets.vertical()),
        }
    }

    /// Client area left inside a frame of `self` once `insets` are removed.
    #[inline]
    pub fn shrunk(self, insets: Insets) -> Self {
        Self {
            width: self.width.saturating_sub(insets.horizontal()),
            height: self.height.saturating_sub(insets.vertical()),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expanded_adds_both_sides() {
        let s = Size::new(640, 480).expanded(Insets::new(30, 4, 4, 4));
        assert_eq!(s, Size::new(648, 514));
    }

    #[test]
    fn shrunk_inverts_expanded() {
        let insets = Insets::new(22, 1, 3, 1);
        let client = Size::new(320, 200);
        assert_eq!(client.expanded(insets).shrunk(insets), client);
    }

    #[test]
    fn shrunk_saturates_at_zero() {
        assert_eq!(Size::new(2, 2).shrunk(Insets::new(10, 10, 10, 10)), Size::new(0, 0));
    }

    #[test]
    fn display_uses_x_separator() {
        assert_eq!(Size::new(800, 600).to_string(), "800x600");
    }

    #[test]
    fn empty_when_any_side_is_zero() {
        assert!(Size::new(0, 10).is_empty());
        assert!(Size::new(10, 0).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }
}
