use std::collections::HashMap;
use std::sync::Arc;

use super::error::{RenderError, RenderResult};

/// CPU texture holding packed 0xRRGGBB texels, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareTexture {
    width: u32,
    height: u32,
    texels: Vec<u32>,
}

impl SoftwareTexture {
    /// Create texture from existing texels
    pub fn new(width: u32, height: u32, texels: Vec<u32>) -> RenderResult<Self> {
        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "texture {}x{} expects {} texels, got {}",
                width,
                height,
                expected,
                texels.len()
            )));
        }
        Ok(Self { width, height, texels })
    }

    /// Two-color checkerboard with square cells of `cell` texels
    pub fn checkerboard(width: u32, height: u32, cell: u32, a: u32, b: u32) -> Self {
        let cell = cell.max(1);
        let texels = (0..height)
            .flat_map(|y| (0..width).map(move |x| if (x / cell + y / cell) % 2 == 0 { a } else { b }))
            .collect();
        Self { width, height, texels }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Texel at pixel coordinates, clamped to the edge
    pub fn texel(&self, x: i32, y: i32) -> u32 {
        if self.texels.is_empty() {
            return 0;
        }
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.texels[x + y * self.width as usize]
    }

    /// Nearest sample at normalized coordinates, clamped to the edge
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let x = (u * self.width as f32).floor() as i32;
        let y = (v * self.height as f32).floor() as i32;
        self.texel(x, y)
    }
}

/// Sparse texture unit table.
///
/// Units are caller-chosen, so binding unit 1_000_000 costs one map entry.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    units: HashMap<u32, Arc<SoftwareTexture>>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `texture` to `unit`, replacing any previous binding
    pub fn bind(&mut self, unit: u32, texture: Arc<SoftwareTexture>) {
        self.units.insert(unit, texture);
    }

    pub fn unbind(&mut self, unit: u32) {
        self.units.remove(&unit);
    }

    pub fn get(&self, unit: u32) -> Option<&Arc<SoftwareTexture>> {
        self.units.get(&unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }
}
