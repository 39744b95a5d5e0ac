use thiserror::Error;

/// Contract violations raised by the software pipeline.
///
/// None of these are transient: a caller that receives one has a bug and
/// retrying the same call will fail the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("({x}, {y}) not within (0, 0) to ({}, {})", last_index(.width), last_index(.height))]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("renderer used before init() or after dispose()")]
    NotInitialized,

    #[error("no program is bound")]
    NoProgram,

    #[error("invalid vertex data: {0}")]
    InvalidVertexData(String),

    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    #[error("presentation failed: {0}")]
    Presentation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

fn last_index(extent: &u32) -> i64 {
    i64::from(*extent) - 1
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message_names_last_valid_pixel() {
        let err = RenderError::OutOfBounds { x: 4, y: 0, width: 4, height: 3 };
        assert_eq!(err.to_string(), "(4, 0) not within (0, 0) to (3, 2)");
    }

    #[test]
    fn out_of_bounds_message_on_empty_buffer() {
        let err = RenderError::OutOfBounds { x: 0, y: 0, width: 0, height: 0 };
        assert_eq!(err.to_string(), "(0, 0) not within (0, 0) to (-1, -1)");
    }
}
