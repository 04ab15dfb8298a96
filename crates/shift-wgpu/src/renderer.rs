//! GPU-side types for the rectangle pipeline.
//!
//! Each `fill_rect` call in a frame becomes one [`RectInstance`]; the
//! vertex shader expands a triangle-strip unit quad per instance and
//! converts pixel coordinates to clip space using the surface size
//! carried in [`Uniforms`].

use bytemuck::{Pod, Zeroable};

use shift_core::{Color, Rect};

// ---------------------------------------------------------------------------
// Uniforms
// ---------------------------------------------------------------------------

/// Per-frame uniform data. Layout must match `rect.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct Uniforms {
    /// Surface size in pixels.
    pub screen_size: [f32; 2],
    /// Pad to 16 bytes for uniform buffer alignment.
    pub _pad: [f32; 2],
}

impl Uniforms {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            screen_size: [width as f32, height as f32],
            _pad: [0.0; 2],
        }
    }
}

// ---------------------------------------------------------------------------
// RectInstance
// ---------------------------------------------------------------------------

/// Per-instance data for one filled rectangle. Layout must match the
/// vertex attributes declared in `rect.wgsl` and the buffer layout in
/// the pipeline setup.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct RectInstance {
    /// Top-left corner in pixels.
    pub pos: [f32; 2],
    /// Size in pixels.
    pub size: [f32; 2],
    /// Packed RGBA color, low byte first: `r | g << 8 | b << 16 | a << 24`.
    pub color: u32,
}

impl RectInstance {
    /// Builds an instance from a core rectangle and fill color.
    pub(crate) fn new(rect: Rect, color: Color) -> Self {
        Self {
            pos: [rect.x as f32, rect.y as f32],
            size: [rect.w as f32, rect.h as f32],
            color: pack_color(color),
        }
    }
}

/// Packs a core color the way the shader unpacks it.
pub(crate) fn pack_color(color: Color) -> u32 {
    (color.r() as u32) | ((color.g() as u32) << 8) | ((color.b() as u32) << 16) | (0xFF << 24)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_color_is_low_byte_red() {
        let c = Color::from_rgb(0x11, 0x22, 0x33);
        assert_eq!(pack_color(c), 0xFF33_2211);
    }

    #[test]
    fn instance_mirrors_rect() {
        let inst = RectInstance::new(Rect::new(20, 0, 40, 40), Color::HOT_PINK);
        assert_eq!(inst.pos, [20.0, 0.0]);
        assert_eq!(inst.size, [40.0, 40.0]);
        // r=255, g=105 (0x69), b=180 (0xB4), opaque alpha.
        assert_eq!(inst.color, 0xFFB4_69FF);
    }

    #[test]
    fn instance_stride_matches_pipeline_layout() {
        // pos (8) + size (8) + color (4); attribute offsets 0, 8, 16.
        assert_eq!(std::mem::size_of::<RectInstance>(), 20);
    }

    #[test]
    fn uniforms_carry_surface_size() {
        let u = Uniforms::new(1280, 720);
        assert_eq!(u.screen_size, [1280.0, 720.0]);
        assert_eq!(std::mem::size_of::<Uniforms>(), 16);
    }
}
