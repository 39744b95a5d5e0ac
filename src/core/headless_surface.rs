use crate::core::error::RenderResult;
use crate::traits::{Frame, PresentationSurface};

/// In-memory presentation surface.
///
/// Keeps a copy of the last presented frame so tests and benches can run
/// the whole renderer without a window or GPU.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    title: String,
    visible: bool,
    size: (u32, u32),
    last_frame: Vec<u32>,
    last_dimensions: (u32, u32),
    last_scale: u32,
    present_count: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Last size requested through `resize`, in physical pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn last_frame(&self) -> &[u32] {
        &self.last_frame
    }

    /// Unscaled dimensions of the last presented frame
    pub fn last_dimensions(&self) -> (u32, u32) {
        self.last_dimensions
    }

    /// Scale the last frame was presented at
    pub fn last_scale(&self) -> u32 {
        self.last_scale
    }

    pub fn present_count(&self) -> u64 {
        self.present_count
    }
}

impl PresentationSurface for HeadlessSurface {
    fn present(&mut self, frame: &Frame<'_>) -> RenderResult<()> {
        self.last_frame.clear();
        self.last_frame.extend_from_slice(frame.pixels);
        self.last_dimensions = (frame.width, frame.height);
        self.last_scale = frame.scale;
        self.present_count += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
