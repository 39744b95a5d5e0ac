pub mod cli;
pub mod config;
pub mod core;
pub mod demo;
pub mod logging;
pub mod traits;

pub use crate::config::{Buffering, RendererConfig};
pub use crate::core::{
    Capability, CloseSignal, HeadlessSurface, Rectangle, RenderError, RenderResult, SoftwareProgram,
    SoftwareRenderer, SoftwareTexture, UniformValue, VertexData, WgpuSurface, MAX_DEPTH,
};
pub use crate::traits::{Frame, PresentationSurface, UniformTarget};
