//! Geometric types for the application: [`Rect`].

use std::fmt;

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle in integer pixel coordinates.
///
/// Follows screen conventions: x grows to the right, y grows downward,
/// and `(x, y)` is the top-left corner. Coordinates are signed so a
/// rectangle may sit partially (or entirely) outside the window;
/// clipping is the renderer's problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The exclusive right edge, `x + w`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.w
    }

    /// The exclusive bottom edge, `y + h`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.h
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_new() {
        let r = Rect::new(10, 20, 40, 40);
        assert_eq!(r.x, 10);
        assert_eq!(r.y, 20);
        assert_eq!(r.w, 40);
        assert_eq!(r.h, 40);
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(5, 7, 40, 40);
        assert_eq!(r.right(), 45);
        assert_eq!(r.bottom(), 47);
    }

    #[test]
    fn rect_edges_negative_origin() {
        let r = Rect::new(-10, -10, 4, 4);
        assert_eq!(r.right(), -6);
        assert_eq!(r.bottom(), -6);
    }

    #[test]
    fn rect_is_empty() {
        assert!(Rect::new(0, 0, 0, 10).is_empty());
        assert!(Rect::new(0, 0, 10, 0).is_empty());
        assert!(Rect::new(0, 0, -1, 10).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn rect_display() {
        assert_eq!(Rect::new(20, 0, 40, 40).to_string(), "40x40+20+0");
    }
}
