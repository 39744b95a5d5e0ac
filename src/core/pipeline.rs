//! Per-pixel read, test and write.
//!
//! Every higher-level draw routine funnels each covered pixel through
//! [`PixelPipeline::write_pixel`] (optionally preceded by
//! [`PixelPipeline::test_depth`]), so the visibility policy lives here only.
//!
//! # Bounds
//!
//! With debug enabled, coordinates outside `[0, width) x [0, height)` fail
//! with [`RenderError::OutOfBounds`](super::error::RenderError::OutOfBounds).
//! With debug disabled they are not checked: an out-of-row `x` silently
//! addresses a pixel on a neighbouring row, and anything past either end of
//! the buffer panics on the slice index. Neither case is clamped.

use super::capability::{Capability, CapabilitySet};
use super::error::RenderResult;
use super::frame_buffer::FrameBuffers;

/// Settings fixed when a pipeline is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Validate pixel coordinates on every access
    pub debug: bool,
    /// Initial depth-writing state
    pub depth_writing: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            debug: true,
            depth_writing: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PixelPipeline {
    buffers: FrameBuffers,
    capabilities: CapabilitySet,
    depth_writing: bool,
    debug: bool,
}

impl PixelPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            buffers: FrameBuffers::new(),
            capabilities: CapabilitySet::new(),
            depth_writing: settings.depth_writing,
            debug: settings.debug,
        }
    }

    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut FrameBuffers {
        &mut self.buffers
    }

    pub fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.capabilities.set(capability, enabled);
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.capabilities.is_enabled(capability)
    }

    pub fn set_depth_writing(&mut self, enabled: bool) {
        self.depth_writing = enabled;
    }

    pub fn is_depth_writing(&self) -> bool {
        self.depth_writing
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    #[inline]
    fn locate(&self, x: i32, y: i32) -> RenderResult<usize> {
        if self.debug {
            self.buffers.check_bounds(x, y)?;
        }
        Ok(self.buffers.index(x, y))
    }

    #[inline]
    fn passes(&self, index: usize, depth: i16) -> bool {
        !self.capabilities.is_enabled(Capability::DepthTest) || depth <= self.buffers.depth_at(index)
    }

    /// Whether a fragment at `depth` would be visible. Never writes.
    ///
    /// Always true with depth testing disabled; otherwise true when `depth`
    /// is less than or equal to the stored depth.
    pub fn test_depth(&self, x: i32, y: i32, depth: i16) -> RenderResult<bool> {
        let index = self.locate(x, y)?;
        Ok(self.passes(index, depth))
    }

    /// Depth-test and write one pixel. Returns whether the pixel was written.
    ///
    /// On a pass the color is always stored; depth is stored only when depth
    /// testing and depth writing are both enabled.
    pub fn write_pixel(&mut self, x: i32, y: i32, depth: i16, color: u32) -> RenderResult<bool> {
        let index = self.locate(x, y)?;
        if !self.passes(index, depth) {
            return Ok(false);
        }

        self.buffers.set_color(index, color);
        if self.depth_writing && self.capabilities.is_enabled(Capability::DepthTest) {
            self.buffers.set_depth(index, depth);
        }
        Ok(true)
    }

    pub fn read_pixel_color(&self, x: i32, y: i32) -> RenderResult<u32> {
        let index = self.locate(x, y)?;
        Ok(self.buffers.color_at(index))
    }

    pub fn read_pixel_depth(&self, x: i32, y: i32) -> RenderResult<i16> {
        let index = self.locate(x, y)?;
        Ok(self.buffers.depth_at(index))
    }

    pub fn clear(&mut self, color: u32) {
        self.buffers.clear(color);
    }
}
