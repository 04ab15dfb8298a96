//! CPU painter: clear and clipped rectangle fills over a `u32` pixel
//! buffer in `0xFFRRGGBB` layout, the format softbuffer presents.

use shift_core::{Color, Rect};

// ---------------------------------------------------------------------------
// Painter
// ---------------------------------------------------------------------------

pub(crate) struct Painter {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Painter {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK.to_pixel(); width * height],
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    #[cfg(test)]
    pub(crate) fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Resizes the buffer. Contents reset to black; the next frame
    /// repaints everything anyway.
    pub(crate) fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Color::BLACK.to_pixel());
    }

    /// Fills the whole buffer with `color`.
    pub(crate) fn fill(&mut self, color: Color) {
        self.pixels.fill(color.to_pixel());
    }

    /// Fills `rect` with `color`, clipped to the buffer. A rectangle
    /// entirely outside the buffer paints nothing.
    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.clamp(0, self.width as i32) as usize;
        let y0 = rect.y.clamp(0, self.height as i32) as usize;
        let x1 = rect.right().clamp(0, self.width as i32) as usize;
        let y1 = rect.bottom().clamp(0, self.height as i32) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let pixel = color.to_pixel();
        for y in y0..y1 {
            let row = y * self.width;
            self.pixels[row + x0..row + x1].fill(pixel);
        }
    }

    /// Copies the painted frame into a surface buffer. Sizes can drift
    /// apart for a frame around a resize, so the copy is clipped and
    /// any uncovered border is blacked out.
    pub(crate) fn blit_to(&self, buf: &mut [u32], buf_width: usize, buf_height: usize) {
        let copy_w = self.width.min(buf_width);
        let copy_h = self.height.min(buf_height);

        if buf_width > self.width || buf_height > self.height {
            buf.fill(Color::BLACK.to_pixel());
        }

        for y in 0..copy_h {
            let src_start = y * self.width;
            let dst_start = y * buf_width;
            let src_end = src_start + copy_w;
            let dst_end = dst_start + copy_w;
            if src_end <= self.pixels.len() && dst_end <= buf.len() {
                buf[dst_start..dst_end].copy_from_slice(&self.pixels[src_start..src_end]);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
