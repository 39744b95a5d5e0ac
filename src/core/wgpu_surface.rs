use std::sync::Arc;
use wgpu::{BindGroup, Device, RenderPipeline, Surface, SurfaceConfiguration, Texture, TextureView};
use winit::window::Window;

use super::error::{RenderError, RenderResult};
use super::gpu_context::GpuContext;
use crate::config::Buffering;
use crate::traits::{Frame, PresentationSurface};

/// Presents software frames in a winit window
///
/// Each frame's color buffer is uploaded to a texture the size of the
/// frame and drawn as a fullscreen triangle with nearest sampling, so the
/// integer scale shows as square blocks. Buffer swapping is whatever the
/// surface's `Fifo` present mode provides, bounded by the configured
/// frame latency.
pub struct WgpuSurface {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    render_pipeline: RenderPipeline,
    texture: Texture,
    bind_group: BindGroup,
    texture_size: (u32, u32),
    staging: Vec<[u8; 4]>,
}

impl WgpuSurface {
    /// Create a surface for a window
    pub fn new(window: Arc<Window>, buffering: Buffering) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let gpu = pollster::block_on(GpuContext::for_surface(&instance, &surface))?;

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: buffering.frame_latency(),
        };
        surface.configure(gpu.device(), &surface_config);

        let texture = Self::create_frame_texture(gpu.device(), 1, 1);
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (render_pipeline, bind_group) =
            Self::create_render_pipeline(gpu.device(), &texture_view, surface_format);

        log::debug!(
            "surface configured {}x{} {:?}, latency {}",
            surface_config.width,
            surface_config.height,
            surface_format,
            surface_config.desired_maximum_frame_latency
        );

        Ok(Self {
            window,
            gpu,
            surface,
            surface_config,
            render_pipeline,
            texture,
            bind_group,
            texture_size: (1, 1),
            staging: Vec::new(),
        })
    }

    /// Recreate the frame texture when the frame size changes
    fn ensure_texture(&mut self, width: u32, height: u32) {
        if self.texture_size == (width, height) {
            return;
        }
        self.texture = Self::create_frame_texture(self.gpu.device(), width, height);
        let view = self.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let layout = self.render_pipeline.get_bind_group_layout(0);
        self.bind_group = Self::create_bind_group(self.gpu.device(), &layout, &view);
        self.texture_size = (width, height);
    }

    fn reconfigure(&self) {
        self.surface.configure(self.gpu.device(), &self.surface_config);
    }

    fn create_frame_texture(device: &Device, width: u32, height: u32) -> Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Software Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    /// Create render pipeline for displaying the frame texture on the surface
    fn create_render_pipeline(
        device: &Device,
        texture_view: &TextureView,
        surface_format: wgpu::TextureFormat,
    ) -> (RenderPipeline, BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Software Frame Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("present.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Software Frame Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = Self::create_bind_group(device, &bind_group_layout, texture_view);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Software Frame Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Software Frame Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    fn create_bind_group(
        device: &Device,
        layout: &wgpu::BindGroupLayout,
        texture_view: &TextureView,
    ) -> BindGroup {
        // Nearest keeps scaled pixels crisp
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Software Frame Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Software Frame Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        })
    }
}

/// Expand packed 0xRRGGBB pixels into opaque RGBA8 bytes
pub fn pack_rgba(pixels: &[u32], out: &mut Vec<[u8; 4]>) {
    out.clear();
    out.extend(pixels.iter().map(|&p| [(p >> 16) as u8, (p >> 8) as u8, p as u8, 0xFF]));
}

impl PresentationSurface for WgpuSurface {
    fn present(&mut self, frame: &Frame<'_>) -> RenderResult<()> {
        if frame.width == 0 || frame.height == 0 {
            return Ok(());
        }
        let expected = frame.width as usize * frame.height as usize;
        if frame.pixels.len() != expected {
            return Err(RenderError::Presentation(format!(
                "Invalid pixel buffer size: expected {} pixels, got {}",
                expected,
                frame.pixels.len()
            )));
        }

        self.ensure_texture(frame.width, frame.height);
        pack_rgba(frame.pixels, &mut self.staging);

        self.gpu.queue().write_texture(
            self.texture.as_image_copy(),
            bytemuck::cast_slice(&self.staging),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * frame.width),
                rows_per_image: Some(frame.height),
            },
            wgpu::Extent3d {
                width: frame.width,
                height: frame.height,
                depth_or_array_layers: 1,
            },
        );

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("surface {}, reconfiguring and skipping frame", e);
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(RenderError::Presentation(e.to_string())),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Software Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Software Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();

        let _ = self.window.request_inner_size(winit::dpi::PhysicalSize::new(width, height));
        log::debug!("surface resized to {}x{}", width, height);
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn set_visible(&mut self, visible: bool) {
        self.window.set_visible(visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rgba_channel_order() {
        let mut out = Vec::new();
        pack_rgba(&[0xFF0000, 0x00FF00, 0x0000FF, 0x123456], &mut out);
        assert_eq!(
            bytemuck::cast_slice::<[u8; 4], u8>(&out),
            &[
                255, 0, 0, 255, // Red
                0, 255, 0, 255, // Green
                0, 0, 255, 255, // Blue
                0x12, 0x34, 0x56, 255,
            ]
        );
    }

    #[test]
    fn test_pack_rgba_ignores_high_byte() {
        let mut out = Vec::new();
        pack_rgba(&[0xAB00_0000], &mut out);
        assert_eq!(out, vec![[0, 0, 0, 255]]);
    }

    #[test]
    fn test_pack_rgba_reuses_buffer() {
        let mut out = vec![[9; 4]; 100];
        pack_rgba(&[0xFFFFFF], &mut out);
        assert_eq!(out, vec![[255; 4]]);
    }
}
