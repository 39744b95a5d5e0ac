//! Typed shader inputs.
//!
//! A [`Uniform`] pairs a name with a [`UniformValue`]; uploading hands both to
//! a [`UniformTarget`], usually a bound program.

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::traits::UniformTarget;

/// The fixed set of uniform kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
    /// Packed 0xRRGGBB
    Color(u32),
}

impl UniformValue {
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            UniformValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match *self {
            UniformValue::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            UniformValue::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match *self {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<Vec4> {
        match *self {
            UniformValue::Vec4(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mat2(&self) -> Option<Mat2> {
        match *self {
            UniformValue::Mat2(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mat3(&self) -> Option<Mat3> {
        match *self {
            UniformValue::Mat3(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mat4(&self) -> Option<Mat4> {
        match *self {
            UniformValue::Mat4(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<u32> {
        match *self {
            UniformValue::Color(c) => Some(c),
            _ => None,
        }
    }
}

/// A named uniform value
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    name: String,
    value: UniformValue,
}

impl Uniform {
    pub fn new(name: impl Into<String>, value: UniformValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Upload this uniform to the target under its name
    pub fn upload(&self, target: &dyn UniformTarget) {
        target.set_uniform(&self.name, self.value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> UniformValue {
        self.value
    }

    pub fn set(&mut self, value: UniformValue) {
        self.value = value;
    }
}

/// Ordered collection of uniforms, unique by name
#[derive(Debug, Clone, Default)]
pub struct UniformHolder {
    uniforms: Vec<Uniform>,
}

impl UniformHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a uniform. A uniform with the same name is replaced in place.
    pub fn add(&mut self, uniform: Uniform) {
        match self.uniforms.iter_mut().find(|u| u.name == uniform.name) {
            Some(existing) => *existing = uniform,
            None => self.uniforms.push(uniform),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Uniform> {
        self.uniforms.iter_mut().find(|u| u.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Uniform> {
        let index = self.uniforms.iter().position(|u| u.name == name)?;
        Some(self.uniforms.remove(index))
    }

    pub fn len(&self) -> usize {
        self.uniforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uniform> {
        self.uniforms.iter()
    }

    /// Upload every uniform in insertion order
    pub fn upload_all(&self, target: &dyn UniformTarget) {
        for uniform in &self.uniforms {
            uniform.upload(target);
        }
    }
}
