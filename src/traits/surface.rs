use crate::core::error::RenderResult;

/// A finished frame handed to a presentation surface.
///
/// `pixels` is the renderer's color buffer: packed 0xRRGGBB, row-major,
/// `width * height` long. `scale` is the integer magnification to display at.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub pixels: &'a [u32],
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

impl Frame<'_> {
    /// Size of the visible surface in physical pixels, saturating at `u32::MAX`
    pub fn scaled_size(&self) -> (u32, u32) {
        (self.width.saturating_mul(self.scale), self.height.saturating_mul(self.scale))
    }
}

/// Where finished frames go - a window, or memory in tests
pub trait PresentationSurface {
    /// Copy the frame to the visible surface. May block on the buffer swap.
    fn present(&mut self, frame: &Frame<'_>) -> RenderResult<()>;

    /// Match the surface to a new scaled size in physical pixels
    fn resize(&mut self, width: u32, height: u32);

    fn set_title(&mut self, title: &str);

    fn set_visible(&mut self, visible: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_size() {
        let pixels = vec![0u32; 6];
        let frame = Frame { pixels: &pixels, width: 3, height: 2, scale: 4 };
        assert_eq!(frame.scaled_size(), (12, 8));
    }

    #[test]
    fn test_scaled_size_saturates() {
        let frame = Frame { pixels: &[], width: 70000, height: 1, scale: 70000 };
        assert_eq!(frame.scaled_size(), (u32::MAX, 70000));
    }

    // Mock surface for testing trait implementation
    struct MockSurface {
        presented: usize,
        size: (u32, u32),
    }

    impl PresentationSurface for MockSurface {
        fn present(&mut self, _frame: &Frame<'_>) -> RenderResult<()> {
            self.presented += 1;
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn set_title(&mut self, _title: &str) {}

        fn set_visible(&mut self, _visible: bool) {}
    }

    #[test]
    fn test_surface_trait_object() {
        let mut mock = MockSurface { presented: 0, size: (0, 0) };
        let surface: &mut dyn PresentationSurface = &mut mock;
        let pixels = vec![0u32; 4];

        surface.resize(2, 2);
        surface.present(&Frame { pixels: &pixels, width: 2, height: 2, scale: 1 }).unwrap();
        surface.present(&Frame { pixels: &pixels, width: 2, height: 2, scale: 1 }).unwrap();

        assert_eq!(mock.presented, 2);
        assert_eq!(mock.size, (2, 2));
    }
}
