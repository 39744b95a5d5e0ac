//! Color and depth storage for the software pipeline.
//!
//! Both buffers are row-major with `index = x + y * width`. Coordinates are
//! only validated when the owning pipeline runs in debug mode; see
//! [`FrameBuffers::check_bounds`].

use super::error::{RenderError, RenderResult};

/// Depth value meaning "farthest". Depth buffers are cleared to it.
pub const MAX_DEPTH: i16 = i16::MAX;

/// A packed color buffer plus a parallel 16-bit depth buffer
#[derive(Debug, Clone, Default)]
pub struct FrameBuffers {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    depths: Vec<i16>,
}

impl FrameBuffers {
    /// Create empty buffers. Nothing is allocated until [`resize`](Self::resize).
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocate both buffers to `width * height` slots.
    ///
    /// Prior contents are always discarded, including when the size does not
    /// change. New slots hold color 0 and depth 0 until the next clear.
    pub fn resize(&mut self, width: u32, height: u32) {
        let len = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.pixels = vec![0; len];
        self.depths = vec![0; len];
    }

    /// Drop both buffers, leaving 0x0 dimensions.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    /// Fill every color slot with `color` and every depth slot with [`MAX_DEPTH`].
    pub fn clear(&mut self, color: u32) {
        for (pixel, depth) in self.pixels.iter_mut().zip(self.depths.iter_mut()) {
            *pixel = color;
            *depth = MAX_DEPTH;
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of slots in each buffer
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn depths(&self) -> &[i16] {
        &self.depths
    }

    /// Fail with [`RenderError::OutOfBounds`] unless `(x, y)` lies in
    /// `[0, width) x [0, height)`.
    pub fn check_bounds(&self, x: i32, y: i32) -> RenderResult<()> {
        let inside = x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height;
        if inside {
            Ok(())
        } else {
            Err(RenderError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Row-major slot for `(x, y)`.
    ///
    /// Unchecked: an `x` past the row end addresses a pixel on another row,
    /// and negative or past-the-end coordinates produce an index that panics
    /// when used. Callers that need validation go through `check_bounds`.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> usize {
        (x as isize + y as isize * self.width as isize) as usize
    }

    #[inline]
    pub fn color_at(&self, index: usize) -> u32 {
        self.pixels[index]
    }

    #[inline]
    pub fn depth_at(&self, index: usize) -> i16 {
        self.depths[index]
    }

    #[inline]
    pub fn set_color(&mut self, index: usize, color: u32) {
        self.pixels[index] = color;
    }

    #[inline]
    pub fn set_depth(&mut self, index: usize, depth: i16) {
        self.depths[index] = depth;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_allocates_nothing() {
        let buffers = FrameBuffers::new();
        assert!(buffers.is_empty());
        assert_eq!(buffers.pixels().len(), 0);
        assert_eq!(buffers.depths().len(), 0);
    }

    #[test]
    fn test_resize_allocates_both_buffers() {
        let mut buffers = FrameBuffers::new();
        buffers.resize(640, 480);
        assert_eq!(buffers.len(), 640 * 480);
        assert_eq!(buffers.depths().len(), 640 * 480);
        assert_eq!((buffers.width(), buffers.height()), (640, 480));
    }

    #[test]
    fn test_resize_to_same_size_discards_contents() {
        let mut buffers = FrameBuffers::new();
        buffers.resize(2, 2);
        buffers.clear(0xABCDEF);
        buffers.resize(2, 2);
        assert!(buffers.pixels().iter().all(|&p| p == 0));
        assert!(buffers.depths().iter().all(|&d| d == 0));
    }

    #[test]
    fn test_clear_fills_color_and_far_depth() {
        let mut buffers = FrameBuffers::new();
        buffers.resize(3, 5);
        buffers.clear(0x123456);
        assert!(buffers.pixels().iter().all(|&p| p == 0x123456));
        assert!(buffers.depths().iter().all(|&d| d == MAX_DEPTH));
    }

    #[test]
    fn test_index_is_row_major() {
        let mut buffers = FrameBuffers::new();
        buffers.resize(4, 3);
        assert_eq!(buffers.index(0, 0), 0);
        assert_eq!(buffers.index(3, 0), 3);
        assert_eq!(buffers.index(0, 1), 4);
        assert_eq!(buffers.index(3, 2), 11);
    }

    #[test]
    fn test_check_bounds_uses_height_for_y() {
        let mut buffers = FrameBuffers::new();
        buffers.resize(8, 2);
        assert!(buffers.check_bounds(7, 1).is_ok());
        // y within width but outside height must be rejected
        assert_eq!(
            buffers.check_bounds(0, 2),
            Err(RenderError::OutOfBounds { x: 0, y: 2, width: 8, height: 2 })
        );
    }

    #[test]
    fn test_check_bounds_rejects_negative() {
        let mut buffers = FrameBuffers::new();
        buffers.resize(4, 4);
        assert!(buffers.check_bounds(-1, 0).is_err());
        assert!(buffers.check_bounds(0, -1).is_err());
        assert!(buffers.check_bounds(4, 0).is_err());
    }

    #[test]
    fn test_release_returns_to_empty() {
        let mut buffers = FrameBuffers::new();
        buffers.resize(10, 10);
        buffers.release();
        assert!(buffers.is_empty());
        assert_eq!((buffers.width(), buffers.height()), (0, 0));
    }
}
