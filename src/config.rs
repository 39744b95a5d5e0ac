//! Renderer configuration, loadable from JSON.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::error::{RenderError, RenderResult};
use crate::core::pipeline::PipelineSettings;

/// How many images the presentation surface may queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Buffering {
    Double,
    Triple,
}

impl Buffering {
    /// Frames the presentation backend may hold ahead of the one being drawn
    pub fn frame_latency(self) -> u32 {
        match self {
            Buffering::Double => 1,
            Buffering::Triple => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Integer magnification applied when presenting
    pub scale: u32,
    /// Bounds-check every pixel access
    pub debug: bool,
    pub depth_writing: bool,
    /// Packed 0xRRGGBB
    pub clear_color: u32,
    pub buffering: Buffering,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "softgl".to_string(),
            width: 640,
            height: 480,
            scale: 1,
            debug: true,
            depth_writing: true,
            clear_color: 0x000000,
            buffering: Buffering::Triple,
        }
    }
}

impl RendererConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.scale == 0 {
            return Err(RenderError::InvalidConfig("scale must be at least 1".into()));
        }
        scaled_size(self.width, self.height, self.scale)?;
        Ok(())
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            debug: self.debug,
            depth_writing: self.depth_writing,
        }
    }
}

/// Physical size of a `width` x `height` frame shown at `scale`
pub fn scaled_size(width: u32, height: u32, scale: u32) -> RenderResult<(u32, u32)> {
    match (width.checked_mul(scale), height.checked_mul(scale)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(RenderError::InvalidConfig(format!(
            "{}x{} at scale {} overflows the surface size",
            width, height, scale
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert_eq!((config.width, config.height, config.scale), (640, 480, 1));
        assert!(config.debug);
        assert!(config.depth_writing);
        assert_eq!(config.buffering, Buffering::Triple);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = RendererConfig::from_json(r#"{ "width": 320, "scale": 2, "buffering": "double" }"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 480);
        assert_eq!(config.scale, 2);
        assert_eq!(config.buffering, Buffering::Double);
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(RendererConfig::from_json(r#"{ "scale": 0 }"#).is_err());
        let config = RendererConfig { scale: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_pipeline_settings_follow_config() {
        let config = RendererConfig { debug: false, depth_writing: false, ..Default::default() };
        let settings = config.pipeline_settings();
        assert!(!settings.debug);
        assert!(!settings.depth_writing);
    }

    #[test]
    fn test_scaled_size_overflow_rejected() {
        let config = RendererConfig { width: 70000, height: 1, scale: 70000, ..Default::default() };
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
        let config = RendererConfig { width: 1, height: u32::MAX, scale: 2, ..Default::default() };
        assert!(config.validate().is_err());
        assert_eq!(scaled_size(640, 480, 3), Ok((1920, 1440)));
    }

    #[test]
    fn test_frame_latency() {
        assert_eq!(Buffering::Double.frame_latency(), 1);
        assert_eq!(Buffering::Triple.frame_latency(), 2);
    }

    #[test]
    fn test_roundtrip_through_json() {
        let config = RendererConfig { title: "x".into(), clear_color: 0x102030, ..Default::default() };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(RendererConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RendererConfig::load("/nonexistent/softgl.json").unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
