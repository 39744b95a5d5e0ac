//! The software renderer: pixel pipeline, bindings and window lifecycle.
//!
//! Construction allocates nothing. [`SoftwareRenderer::init`] allocates the
//! frame buffers and shows the surface; [`SoftwareRenderer::dispose`]
//! releases them and detaches the program. Every buffer operation in between
//! fails with [`RenderError::NotInitialized`] outside that window.
//!
//! All drawing for a frame must come from one thread, and window resizes
//! must happen between frames.

use std::sync::Arc;

use super::capability::Capability;
use super::close_signal::CloseSignal;
use super::error::{RenderError, RenderResult};
use super::pipeline::PixelPipeline;
use super::program::{ProgramSlot, SoftwareProgram};
use super::rasterizer::{self, DrawStats, VertexData};
use super::rect::Rectangle;
use super::texture::{SoftwareTexture, TextureRegistry};
use crate::config::{scaled_size, RendererConfig};
use crate::traits::{Frame, PresentationSurface};

pub struct SoftwareRenderer<S: PresentationSurface> {
    surface: S,
    title: String,
    width: u32,
    height: u32,
    scale: u32,
    initialized: bool,
    close: CloseSignal,
    viewport: Rectangle,
    clear_color: u32,
    pipeline: PixelPipeline,
    program: ProgramSlot,
    textures: TextureRegistry,
}

impl<S: PresentationSurface> SoftwareRenderer<S> {
    pub fn new(surface: S, config: &RendererConfig) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            surface,
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            scale: config.scale,
            initialized: false,
            close: CloseSignal::new(),
            viewport: Rectangle::default(),
            clear_color: config.clear_color,
            pipeline: PixelPipeline::new(config.pipeline_settings()),
            program: ProgramSlot::new(),
            textures: TextureRegistry::new(),
        })
    }

    // Lifecycle

    /// Allocate the buffers, size the viewport to the window and show it
    pub fn init(&mut self) -> RenderResult<()> {
        self.allocate()?;
        self.surface.set_title(&self.title);
        self.surface.set_visible(true);
        self.viewport.set_size(self.width, self.height);
        self.initialized = true;
        log::info!(
            "software renderer initialized at {}x{} (scale {})",
            self.width,
            self.height,
            self.scale
        );
        Ok(())
    }

    /// Release buffers and detach the program. `init` must run again before reuse.
    pub fn dispose(&mut self) {
        self.surface.set_visible(false);
        self.pipeline.buffers_mut().release();
        self.program.bind(None);
        self.initialized = false;
        log::info!("software renderer disposed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn allocate(&mut self) -> RenderResult<()> {
        let (surface_width, surface_height) = scaled_size(self.width, self.height, self.scale)?;
        self.pipeline.buffers_mut().resize(self.width, self.height);
        self.surface.resize(surface_width, surface_height);
        log::debug!("frame buffers allocated at {}x{}", self.width, self.height);
        Ok(())
    }

    fn ensure_initialized(&self) -> RenderResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(RenderError::NotInitialized)
        }
    }

    // Window

    pub fn window_width(&self) -> u32 {
        self.width
    }

    pub fn window_height(&self) -> u32 {
        self.height
    }

    /// Change the logical size. Buffers are reallocated immediately when
    /// initialized; their contents are lost.
    ///
    /// A size whose scaled surface would not fit in `u32` is rejected with
    /// [`RenderError::InvalidConfig`] and the current size is kept.
    pub fn set_window_size(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if self.width == width && self.height == height {
            return Ok(());
        }
        scaled_size(width, height, self.scale)?;
        self.width = width;
        self.height = height;
        if self.initialized {
            self.allocate()?;
        }
        Ok(())
    }

    pub fn window_title(&self) -> &str {
        &self.title
    }

    pub fn set_window_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.surface.set_title(title);
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Handle for the window event source to signal a close gesture
    pub fn close_signal(&self) -> CloseSignal {
        self.close.clone()
    }

    /// True once per close gesture
    pub fn poll_close_requested(&self) -> bool {
        self.close.take()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // State

    pub fn view_port(&self) -> Rectangle {
        self.viewport
    }

    pub fn set_view_port(&mut self, viewport: Rectangle) {
        self.viewport = viewport;
    }

    pub fn set_capability_enabled(&mut self, capability: Capability, enabled: bool) {
        self.pipeline.set_capability(capability, enabled);
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.pipeline.is_enabled(capability)
    }

    pub fn set_clear_color(&mut self, color: u32) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> u32 {
        self.clear_color
    }

    pub fn enable_depth_writing(&mut self, enabled: bool) {
        self.pipeline.set_depth_writing(enabled);
    }

    pub fn is_depth_writing(&self) -> bool {
        self.pipeline.is_depth_writing()
    }

    /// Toggle per-pixel bounds checks for this renderer only
    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.pipeline.set_debug(enabled);
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.pipeline.is_debug()
    }

    pub fn program(&self) -> Option<&Arc<SoftwareProgram>> {
        self.program.get()
    }

    pub fn set_program(&mut self, program: Option<Arc<SoftwareProgram>>) {
        self.program.bind(program);
    }

    pub fn bind_texture(&mut self, unit: u32, texture: Arc<SoftwareTexture>) {
        self.textures.bind(unit, texture);
    }

    pub fn unbind_texture(&mut self, unit: u32) {
        self.textures.unbind(unit);
    }

    pub fn texture(&self, unit: u32) -> Option<&Arc<SoftwareTexture>> {
        self.textures.get(unit)
    }

    // Frame

    /// Fill the color buffer with the clear color and depth with the far value
    pub fn clear_pixels(&mut self) -> RenderResult<()> {
        self.ensure_initialized()?;
        self.pipeline.clear(self.clear_color);
        Ok(())
    }

    pub fn read_pixel_color(&self, x: i32, y: i32) -> RenderResult<u32> {
        self.ensure_initialized()?;
        self.pipeline.read_pixel_color(x, y)
    }

    pub fn read_pixel_depth(&self, x: i32, y: i32) -> RenderResult<i16> {
        self.ensure_initialized()?;
        self.pipeline.read_pixel_depth(x, y)
    }

    pub fn test_depth(&self, x: i32, y: i32, depth: i16) -> RenderResult<bool> {
        self.ensure_initialized()?;
        self.pipeline.test_depth(x, y, depth)
    }

    /// See [`PixelPipeline::write_pixel`]
    pub fn write_pixel(&mut self, x: i32, y: i32, depth: i16, color: u32) -> RenderResult<bool> {
        self.ensure_initialized()?;
        self.pipeline.write_pixel(x, y, depth, color)
    }

    /// Rasterize a triangle list with the bound program and textures
    pub fn draw_triangles(&mut self, vertices: &VertexData) -> RenderResult<DrawStats> {
        self.ensure_initialized()?;
        let program = self.program.get().ok_or(RenderError::NoProgram)?;
        rasterizer::draw_triangles(&mut self.pipeline, program, &self.textures, &self.viewport, vertices)
    }

    /// Copy the color buffer to the surface at the configured scale
    pub fn present(&mut self) -> RenderResult<()> {
        self.ensure_initialized()?;
        let frame = Frame {
            pixels: self.pipeline.buffers().pixels(),
            width: self.width,
            height: self.height,
            scale: self.scale,
        };
        self.surface.present(&frame)
    }
}
