//! Colors used by the draw pass.

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An opaque RGB color, packed as `0x00RRGGBB`.
///
/// The application only ever draws fully opaque pixels, so no alpha is
/// carried here; backends add it when they pack pixels for their
/// surface format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// The clear color of every frame.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    /// The fill color of the draw rectangle.
    pub const HOT_PINK: Self = Self::from_rgb(255, 105, 180);

    /// Creates a color from 8-bit RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Red component.
    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green component.
    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue component.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Packs the color as an opaque `0xFFRRGGBB` pixel, the layout
    /// shared by `u32` framebuffers.
    #[inline]
    pub const fn to_pixel(self) -> u32 {
        0xFF00_0000 | self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_packs_components() {
        let c = Color::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(c.0, 0x0012_3456);
        assert_eq!(c.r(), 0x12);
        assert_eq!(c.g(), 0x34);
        assert_eq!(c.b(), 0x56);
    }

    #[test]
    fn palette_values() {
        assert_eq!(Color::BLACK.0, 0x0000_0000);
        assert_eq!(
            (Color::HOT_PINK.r(), Color::HOT_PINK.g(), Color::HOT_PINK.b()),
            (255, 105, 180)
        );
    }

    #[test]
    fn to_pixel_sets_alpha() {
        assert_eq!(Color::BLACK.to_pixel(), 0xFF00_0000);
        assert_eq!(Color::HOT_PINK.to_pixel(), 0xFFFF_69B4);
    }
}
