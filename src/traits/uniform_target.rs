use crate::core::uniform::UniformValue;

/// Anything a uniform can be uploaded into
pub trait UniformTarget {
    /// Store `value` under `name`, replacing any previous value
    fn set_uniform(&self, name: &str, value: UniformValue);
}
