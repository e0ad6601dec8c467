/// Premultiplied RGBA color with `f32` channels in `[0, 1]`.
///
/// Invariant:
/// - `rgb` components are already multiplied by `a`.
///
/// The GPU pipeline blends with `One, OneMinusSrcAlpha`; the software path
/// converts to packed `0x00RRGGBB` with [`Color::blend_over_xrgb`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Opaque color from 8-bit channels.
    #[inline]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_straight_u8(r, g, b, 255)
    }

    /// Creates a premultiplied color from straight 8-bit channels.
    #[inline]
    pub fn from_straight_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Packs an opaque color as `0x00RRGGBB` (alpha dropped).
    #[inline]
    pub fn to_xrgb(self) -> u32 {
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Composites this color over a packed `0x00RRGGBB` destination pixel.
    #[inline]
    pub fn blend_over_xrgb(self, dst: u32) -> u32 {
        if self.is_opaque() {
            return self.to_xrgb();
        }
        if self.a <= 0.0 {
            return dst;
        }

        let inv = 1.0 - self.a.clamp(0.0, 1.0);
        let dr = ((dst >> 16) & 0xFF) as f32 / 255.0;
        let dg = ((dst >> 8) & 0xFF) as f32 / 255.0;
        let db = (dst & 0xFF) as f32 / 255.0;

        (channel(self.r + dr * inv) << 16) | (channel(self.g + dg * inv) << 8) | channel(self.b + db * inv)
    }
}

#[inline]
fn channel(v: f32) -> u32 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_to_xrgb() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_xrgb(), 0x0012_3456);
    }

    #[test]
    fn straight_is_premultiplied() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c.r, 0.5);
        assert_eq!(c.g, 0.25);
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn opaque_blend_replaces_destination() {
        assert_eq!(Color::WHITE.blend_over_xrgb(0x0000_0000), 0x00FF_FFFF);
    }

    #[test]
    fn transparent_blend_keeps_destination() {
        assert_eq!(Color::transparent().blend_over_xrgb(0x00AB_CDEF), 0x00AB_CDEF);
    }

    #[test]
    fn half_white_over_black_is_mid_gray() {
        let c = Color::from_straight(1.0, 1.0, 1.0, 0.5);
        assert_eq!(c.blend_over_xrgb(0), 0x0080_8080);
    }
}
