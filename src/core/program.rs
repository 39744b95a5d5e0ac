//! Programmable shading for the software pipeline.
//!
//! A [`SoftwareProgram`] is a vertex callable plus a fragment callable, with
//! the uniform values and layouts they read. Programs are shared as
//! `Arc<SoftwareProgram>`; uniforms and layouts may be changed through a
//! shared reference at any time. A draw works from a snapshot taken when it
//! starts, so changes made while it runs (including from inside a shader)
//! apply to the next draw.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use glam::Vec4;

use super::texture::{SoftwareTexture, TextureRegistry};
use super::uniform::UniformValue;
use crate::traits::UniformTarget;

/// Per-vertex attributes, one slice per attribute index
#[derive(Debug, Clone, Copy)]
pub struct VertexInput<'a> {
    attributes: &'a [&'a [f32]],
}

impl<'a> VertexInput<'a> {
    pub fn new(attributes: &'a [&'a [f32]]) -> Self {
        Self { attributes }
    }

    /// Components of attribute `index`, empty if the vertex has no such attribute
    pub fn attribute(&self, index: usize) -> &'a [f32] {
        self.attributes.get(index).copied().unwrap_or(&[])
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// Vertex shader result: clip-space position and values to interpolate
#[derive(Debug, Clone, PartialEq)]
pub struct VertexOutput {
    pub position: Vec4,
    pub varyings: Vec<f32>,
}

impl VertexOutput {
    pub fn new(position: Vec4, varyings: Vec<f32>) -> Self {
        Self { position, varyings }
    }
}

pub type VertexShader = Box<dyn Fn(&VertexInput<'_>, &ShaderEnv<'_>) -> VertexOutput + Send + Sync>;

/// Returns the packed color for a fragment, or `None` to discard it
pub type FragmentShader = Box<dyn Fn(&[f32], &ShaderEnv<'_>) -> Option<u32> + Send + Sync>;

#[derive(Debug, Clone, Default)]
struct ProgramState {
    uniforms: HashMap<String, UniformValue>,
    attribute_layouts: HashMap<String, usize>,
    texture_layouts: HashMap<u32, String>,
}

/// Read-only view handed to shaders for one draw.
///
/// Holds a copy of the program's uniforms and layouts, not its lock.
pub struct ShaderEnv<'a> {
    state: ProgramState,
    textures: &'a TextureRegistry,
}

impl ShaderEnv<'_> {
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.state.uniforms.get(name).copied()
    }

    pub fn attribute_layout(&self, name: &str) -> Option<usize> {
        self.state.attribute_layouts.get(name).copied()
    }

    /// Texture bound to `unit`
    pub fn texture(&self, unit: u32) -> Option<&SoftwareTexture> {
        self.textures.get(unit).map(|t| t.as_ref())
    }

    /// Texture bound to the unit whose layout carries `name`
    pub fn sampler(&self, name: &str) -> Option<&SoftwareTexture> {
        self.state
            .texture_layouts
            .iter()
            .find(|(_, layout)| layout.as_str() == name)
            .and_then(|(&unit, _)| self.texture(unit))
    }
}

pub struct SoftwareProgram {
    vertex: VertexShader,
    fragment: FragmentShader,
    state: RwLock<ProgramState>,
}

impl SoftwareProgram {
    pub fn new(vertex: VertexShader, fragment: FragmentShader) -> Self {
        Self {
            vertex,
            fragment,
            state: RwLock::new(ProgramState::default()),
        }
    }

    /// Convenience for building a shareable program from closures
    pub fn shared<V, F>(vertex: V, fragment: F) -> Arc<Self>
    where
        V: Fn(&VertexInput<'_>, &ShaderEnv<'_>) -> VertexOutput + Send + Sync + 'static,
        F: Fn(&[f32], &ShaderEnv<'_>) -> Option<u32> + Send + Sync + 'static,
    {
        Arc::new(Self::new(Box::new(vertex), Box::new(fragment)))
    }

    fn read(&self) -> RwLockReadGuard<'_, ProgramState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProgramState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of this program's state over the given textures
    pub fn env<'a>(&self, textures: &'a TextureRegistry) -> ShaderEnv<'a> {
        ShaderEnv {
            state: self.read().clone(),
            textures,
        }
    }

    pub fn run_vertex(&self, input: &VertexInput<'_>, env: &ShaderEnv<'_>) -> VertexOutput {
        (self.vertex)(input, env)
    }

    pub fn run_fragment(&self, varyings: &[f32], env: &ShaderEnv<'_>) -> Option<u32> {
        (self.fragment)(varyings, env)
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.read().uniforms.get(name).copied()
    }

    pub fn add_attribute_layout(&self, name: impl Into<String>, index: usize) {
        self.write().attribute_layouts.insert(name.into(), index);
    }

    pub fn has_attribute_layout(&self, name: &str) -> bool {
        self.read().attribute_layouts.contains_key(name)
    }

    pub fn attribute_layout(&self, name: &str) -> Option<usize> {
        self.read().attribute_layouts.get(name).copied()
    }

    pub fn remove_attribute_layout(&self, name: &str) {
        self.write().attribute_layouts.remove(name);
    }

    /// Name the sampler that reads texture `unit`
    pub fn add_texture_layout(&self, name: impl Into<String>, unit: u32) {
        self.write().texture_layouts.insert(unit, name.into());
    }

    pub fn has_texture_layout(&self, unit: u32) -> bool {
        self.read().texture_layouts.contains_key(&unit)
    }

    pub fn texture_layout(&self, unit: u32) -> Option<String> {
        self.read().texture_layouts.get(&unit).cloned()
    }

    pub fn remove_texture_layout(&self, unit: u32) {
        self.write().texture_layouts.remove(&unit);
    }
}

impl UniformTarget for SoftwareProgram {
    fn set_uniform(&self, name: &str, value: UniformValue) {
        self.write().uniforms.insert(name.to_string(), value);
    }
}

impl fmt::Debug for SoftwareProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareProgram")
            .field("state", &*self.read())
            .finish_non_exhaustive()
    }
}

/// The single active-program slot.
///
/// Last writer wins; an empty slot means nothing can be drawn.
#[derive(Debug, Clone, Default)]
pub struct ProgramSlot {
    program: Option<Arc<SoftwareProgram>>,
}

impl ProgramSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, program: Option<Arc<SoftwareProgram>>) {
        self.program = program;
    }

    pub fn get(&self) -> Option<&Arc<SoftwareProgram>> {
        self.program.as_ref()
    }
}
