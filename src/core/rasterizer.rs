//! Triangle rasterization on top of the pixel pipeline.
//!
//! Vertices run through the bound program's vertex shader, are divided by
//! `w`, mapped onto the viewport and scanned with edge functions at pixel
//! centers. Each covered pixel is depth-tested, shaded, then written through
//! [`PixelPipeline::write_pixel`].

use glam::Vec3;

use super::capability::Capability;
use super::error::{RenderError, RenderResult};
use super::pipeline::PixelPipeline;
use super::program::{ShaderEnv, SoftwareProgram, VertexInput, VertexOutput};
use super::rect::Rectangle;
use super::texture::TextureRegistry;

/// Interleaved vertex attributes, optionally indexed, drawn as a triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct VertexData {
    attribute_sizes: Vec<usize>,
    data: Vec<f32>,
    indices: Option<Vec<u32>>,
}

impl VertexData {
    /// `attribute_sizes` lists the component count of each attribute in the
    /// order they are interleaved in `data`.
    pub fn new(attribute_sizes: Vec<usize>, data: Vec<f32>) -> RenderResult<Self> {
        let stride: usize = attribute_sizes.iter().sum();
        if stride == 0 {
            return Err(RenderError::InvalidVertexData("vertex stride is zero".into()));
        }
        if data.len() % stride != 0 {
            return Err(RenderError::InvalidVertexData(format!(
                "{} floats is not a multiple of the {}-float stride",
                data.len(),
                stride
            )));
        }
        Ok(Self {
            attribute_sizes,
            data,
            indices: None,
        })
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> RenderResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(RenderError::InvalidVertexData(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        let count = self.vertex_count();
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= count) {
            return Err(RenderError::InvalidVertexData(format!(
                "index {} out of range for {} vertices",
                bad, count
            )));
        }
        self.indices = Some(indices);
        Ok(self)
    }

    pub fn stride(&self) -> usize {
        self.attribute_sizes.iter().sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.stride()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    fn vertex(&self, index: usize) -> Vec<&[f32]> {
        let mut offset = index * self.stride();
        self.attribute_sizes
            .iter()
            .map(|&size| {
                let slice = &self.data[offset..offset + size];
                offset += size;
                slice
            })
            .collect()
    }

    fn triangle(&self, n: usize) -> [usize; 3] {
        match &self.indices {
            Some(indices) => [
                indices[n * 3] as usize,
                indices[n * 3 + 1] as usize,
                indices[n * 3 + 2] as usize,
            ],
            None => [n * 3, n * 3 + 1, n * 3 + 2],
        }
    }
}

/// Counters for one draw call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub triangles: u32,
    pub culled: u32,
    pub fragments_written: u64,
}

/// Map NDC z in [-1, 1] onto the full 16-bit depth range
pub fn ndc_to_depth(z: f32) -> i16 {
    let scaled = (z + 1.0) * 0.5 * 65535.0 - 32768.0;
    scaled.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

#[inline]
fn edge(a: Vec3, b: Vec3, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

struct ScreenVertex {
    position: Vec3,
    inv_w: f32,
}

fn to_screen(out: &VertexOutput, viewport: &Rectangle) -> ScreenVertex {
    let inv_w = 1.0 / out.position.w;
    let ndc = out.position.truncate() * inv_w;
    ScreenVertex {
        position: Vec3::new(
            viewport.x as f32 + (ndc.x + 1.0) * 0.5 * viewport.width as f32,
            viewport.y as f32 + (1.0 - ndc.y) * 0.5 * viewport.height as f32,
            ndc.z,
        ),
        inv_w,
    }
}

/// Rasterize `vertices` as a triangle list with `program`.
pub fn draw_triangles(
    pipeline: &mut PixelPipeline,
    program: &SoftwareProgram,
    textures: &TextureRegistry,
    viewport: &Rectangle,
    vertices: &VertexData,
) -> RenderResult<DrawStats> {
    let mut stats = DrawStats::default();
    let buffers = pipeline.buffers();
    let target = Rectangle::sized(buffers.width(), buffers.height());
    let Some(clip) = viewport.intersection(&target) else {
        return Ok(stats);
    };

    let env = program.env(textures);
    let cull = pipeline.is_enabled(Capability::CullFace);

    for n in 0..vertices.triangle_count() {
        stats.triangles += 1;
        let outputs = vertices.triangle(n).map(|i| {
            let attributes = vertices.vertex(i);
            program.run_vertex(&VertexInput::new(&attributes), &env)
        });

        if outputs.iter().any(|o| o.position.w <= 0.0) {
            stats.culled += 1;
            continue;
        }

        let screen = [
            to_screen(&outputs[0], viewport),
            to_screen(&outputs[1], viewport),
            to_screen(&outputs[2], viewport),
        ];
        let area = edge(screen[0].position, screen[1].position, screen[2].position.x, screen[2].position.y);
        // Counter-clockwise in NDC turns clockwise once y points down
        if area == 0.0 || (cull && area > 0.0) {
            stats.culled += 1;
            continue;
        }

        stats.fragments_written += raster_triangle(pipeline, program, &env, &clip, &screen, &outputs, area)?;
    }

    Ok(stats)
}

fn raster_triangle(
    pipeline: &mut PixelPipeline,
    program: &SoftwareProgram,
    env: &ShaderEnv<'_>,
    clip: &Rectangle,
    screen: &[ScreenVertex; 3],
    outputs: &[VertexOutput; 3],
    area: f32,
) -> RenderResult<u64> {
    let [p0, p1, p2] = [screen[0].position, screen[1].position, screen[2].position];
    let min_x = p0.x.min(p1.x).min(p2.x).floor().max(clip.x as f32) as i32;
    let max_x = p0.x.max(p1.x).max(p2.x).ceil().min(clip.right() as f32) as i32;
    let min_y = p0.y.min(p1.y).min(p2.y).floor().max(clip.y as f32) as i32;
    let max_y = p0.y.max(p1.y).max(p2.y).ceil().min(clip.bottom() as f32) as i32;

    let varying_count = outputs.iter().map(|o| o.varyings.len()).min().unwrap_or(0);
    let mut varyings = vec![0.0f32; varying_count];
    let mut written = 0;

    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;
            let b0 = edge(p1, p2, px, py) / area;
            let b1 = edge(p2, p0, px, py) / area;
            let b2 = edge(p0, p1, px, py) / area;
            if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                continue;
            }

            let depth = ndc_to_depth(b0 * p0.z + b1 * p1.z + b2 * p2.z);
            if !pipeline.test_depth(x, y, depth)? {
                continue;
            }

            let w0 = b0 * screen[0].inv_w;
            let w1 = b1 * screen[1].inv_w;
            let w2 = b2 * screen[2].inv_w;
            let norm = 1.0 / (w0 + w1 + w2);
            for (i, v) in varyings.iter_mut().enumerate() {
                *v = (w0 * outputs[0].varyings[i] + w1 * outputs[1].varyings[i] + w2 * outputs[2].varyings[i]) * norm;
            }

            if let Some(color) = program.run_fragment(&varyings, env) {
                if pipeline.write_pixel(x, y, depth, color)? {
                    written += 1;
                }
            }
        }
    }

    Ok(written)
}
