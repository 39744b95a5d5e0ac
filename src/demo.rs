//! The demo scene: two overlapping textured triangles spinning in place.
//!
//! Both triangles sit at different depths, so with depth testing enabled the
//! nearer one always covers the farther one where they overlap, whatever
//! order they are drawn in.

use std::sync::Arc;

use glam::{Mat4, Vec4};

use crate::core::capability::Capability;
use crate::core::error::RenderResult;
use crate::core::program::{SoftwareProgram, VertexOutput};
use crate::core::rasterizer::{DrawStats, VertexData};
use crate::core::renderer::SoftwareRenderer;
use crate::core::texture::SoftwareTexture;
use crate::core::uniform::{Uniform, UniformHolder, UniformValue};
use crate::traits::PresentationSurface;

pub const TEXTURE_UNIT: u32 = 0;

const POSITION: usize = 0;
const UV: usize = 1;
const SHADE: usize = 2;

/// Radians per second
const SPIN_SPEED: f32 = 0.8;

/// position(3) uv(2) shade(1), counter-clockwise in NDC
#[rustfmt::skip]
const TRIANGLES: [f32; 36] = [
    // Near triangle
    -0.7, -0.6, -0.2,   0.0, 1.0,   1.0,
     0.5, -0.6, -0.2,   1.0, 1.0,   1.0,
    -0.1,  0.7, -0.2,   0.5, 0.0,   1.0,
    // Far triangle, offset to the right
    -0.3, -0.4,  0.4,   0.0, 1.0,   0.5,
     0.8, -0.4,  0.4,   1.0, 1.0,   0.5,
     0.3,  0.8,  0.4,   0.5, 0.0,   0.5,
];

/// Multiply each 8-bit channel of `color` by `factor`
fn shade(color: u32, factor: f32) -> u32 {
    let channel = |shift: u32| {
        let c = ((color >> shift) & 0xFF) as f32 * factor.clamp(0.0, 1.0);
        (c.round() as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// Per-channel product of two packed colors
fn modulate(color: u32, tint: u32) -> u32 {
    let channel = |shift: u32| {
        let a = (color >> shift) & 0xFF;
        let b = (tint >> shift) & 0xFF;
        (a * b / 255) << shift
    };
    channel(16) | channel(8) | channel(0)
}

fn build_program() -> Arc<SoftwareProgram> {
    let program = SoftwareProgram::shared(
        |input, env| {
            let p = input.attribute(POSITION);
            let rotation = env
                .uniform("rotation")
                .and_then(|u| u.as_mat4())
                .unwrap_or(Mat4::IDENTITY);
            let position = rotation * Vec4::new(p[0], p[1], p[2], 1.0);

            let mut varyings = input.attribute(UV).to_vec();
            varyings.extend_from_slice(input.attribute(SHADE));
            VertexOutput::new(position, varyings)
        },
        |varyings, env| {
            let (u, v, factor) = (varyings[0], varyings[1], varyings[2]);
            let texel = env.sampler("checker")?.sample(u, v);
            let tint = env.uniform("tint").and_then(|t| t.as_color()).unwrap_or(0xFFFFFF);
            Some(shade(modulate(texel, tint), factor))
        },
    );
    program.add_attribute_layout("position", POSITION);
    program.add_attribute_layout("uv", UV);
    program.add_attribute_layout("shade", SHADE);
    program.add_texture_layout("checker", TEXTURE_UNIT);
    program
}

pub struct DemoScene {
    program: Arc<SoftwareProgram>,
    texture: Arc<SoftwareTexture>,
    vertices: VertexData,
    uniforms: UniformHolder,
}

impl DemoScene {
    pub fn new() -> RenderResult<Self> {
        let vertices = VertexData::new(vec![3, 2, 1], TRIANGLES.to_vec())?;
        let texture = Arc::new(SoftwareTexture::checkerboard(64, 64, 8, 0xFFD040, 0x2050C0));

        let mut uniforms = UniformHolder::new();
        uniforms.add(Uniform::new("rotation", UniformValue::Mat4(Mat4::IDENTITY)));
        uniforms.add(Uniform::new("tint", UniformValue::Color(0xFFFFFF)));

        let scene = Self {
            program: build_program(),
            texture,
            vertices,
            uniforms,
        };
        scene.uniforms.upload_all(scene.program.as_ref());
        Ok(scene)
    }

    pub fn program(&self) -> &Arc<SoftwareProgram> {
        &self.program
    }

    /// Bind program and texture and turn on depth testing
    pub fn install<S: PresentationSurface>(&self, renderer: &mut SoftwareRenderer<S>) {
        renderer.set_program(Some(self.program.clone()));
        renderer.bind_texture(TEXTURE_UNIT, self.texture.clone());
        renderer.set_capability_enabled(Capability::DepthTest, true);
    }

    /// Spin to the angle for `elapsed` seconds and upload the uniforms
    pub fn update(&mut self, elapsed: f32) {
        if let Some(rotation) = self.uniforms.get_mut("rotation") {
            rotation.set(UniformValue::Mat4(Mat4::from_rotation_z(elapsed * SPIN_SPEED)));
        }
        self.uniforms.upload_all(self.program.as_ref());
    }

    pub fn set_tint(&mut self, color: u32) {
        self.uniforms.add(Uniform::new("tint", UniformValue::Color(color)));
    }

    /// Clear and draw one frame
    pub fn draw<S: PresentationSurface>(&self, renderer: &mut SoftwareRenderer<S>) -> RenderResult<DrawStats> {
        renderer.clear_pixels()?;
        renderer.draw_triangles(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererConfig;
    use crate::core::headless_surface::HeadlessSurface;

    fn renderer() -> SoftwareRenderer<HeadlessSurface> {
        let config = RendererConfig {
            width: 64,
            height: 64,
            clear_color: 0x000000,
            ..Default::default()
        };
        let mut renderer = SoftwareRenderer::new(HeadlessSurface::new(), &config).unwrap();
        renderer.init().unwrap();
        renderer
    }

    #[test]
    fn test_modulate_and_shade() {
        assert_eq!(modulate(0xFF8040, 0xFFFFFF), 0xFF8040);
        assert_eq!(modulate(0xFF8040, 0x000000), 0);
        assert_eq!(shade(0xFF8040, 0.5), 0x804020);
        assert_eq!(shade(0xFFFFFF, 2.0), 0xFFFFFF);
    }

    #[test]
    fn test_draws_both_triangles() {
        let mut r = renderer();
        let mut scene = DemoScene::new().unwrap();
        scene.install(&mut r);
        scene.update(0.0);

        let stats = scene.draw(&mut r).unwrap();
        assert_eq!(stats.triangles, 2);
        assert_eq!(stats.culled, 0);
        assert!(stats.fragments_written > 0);
        assert!(r.is_enabled(Capability::DepthTest));
    }

    #[test]
    fn test_near_triangle_covers_far() {
        let mut r = renderer();
        let scene = DemoScene::new().unwrap();
        scene.install(&mut r);
        scene.draw(&mut r).unwrap();

        // NDC (0.2, -0.3) lies inside both triangles
        let (x, y) = (38, 41);
        let depth = r.read_pixel_depth(x, y).unwrap();
        assert!(depth < 0, "near triangle depth expected, got {depth}");
    }

    #[test]
    fn test_tint_reaches_fragments() {
        let mut r = renderer();
        let mut scene = DemoScene::new().unwrap();
        scene.set_tint(0x000000);
        scene.update(0.0);
        scene.install(&mut r);
        r.set_clear_color(0x123456);
        scene.draw(&mut r).unwrap();

        assert_eq!(r.read_pixel_color(38, 41).unwrap(), 0x000000);
        assert_eq!(r.read_pixel_color(0, 0).unwrap(), 0x123456);
    }
}
