pub mod capability;
pub mod clock;
pub mod close_signal;
pub mod error;
pub mod frame_buffer;
pub mod gpu_context;
pub mod headless_surface;
pub mod pipeline;
pub mod program;
pub mod rasterizer;
pub mod rect;
pub mod renderer;
pub mod texture;
pub mod uniform;
pub mod wgpu_surface;

pub use capability::{Capability, CapabilitySet};
pub use clock::FrameClock;
pub use close_signal::CloseSignal;
pub use error::{RenderError, RenderResult};
pub use frame_buffer::{FrameBuffers, MAX_DEPTH};
pub use gpu_context::GpuContext;
pub use headless_surface::HeadlessSurface;
pub use pipeline::{PipelineSettings, PixelPipeline};
pub use program::{ProgramSlot, ShaderEnv, SoftwareProgram, VertexInput, VertexOutput};
pub use rasterizer::{ndc_to_depth, DrawStats, VertexData};
pub use rect::Rectangle;
pub use renderer::SoftwareRenderer;
pub use texture::{SoftwareTexture, TextureRegistry};
pub use uniform::{Uniform, UniformHolder, UniformValue};
pub use wgpu_surface::WgpuSurface;
