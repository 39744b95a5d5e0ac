// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::RendererConfig;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "softgl")]
#[command(about = "Software rasterizer demo", long_about = None)]
pub struct Cli {
    /// JSON renderer config; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frame buffer width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame buffer height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Integer magnification of the window
    #[arg(long)]
    pub scale: Option<u32>,

    /// Window title
    #[arg(long)]
    pub title: Option<String>,

    /// Skip per-pixel bounds checks
    #[arg(long = "no-debug", default_value = "false")]
    pub no_debug: bool,

    /// Log filter, env_logger syntax
    #[arg(long)]
    pub log: Option<String>,
}

impl Cli {
    /// Overlay command-line values on `config`
    pub fn apply(&self, mut config: RendererConfig) -> RendererConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if self.no_debug {
            config.debug = false;
        }
        config
    }

    /// Config file (or defaults) with flags applied, validated
    pub fn resolve_config(&self) -> anyhow::Result<RendererConfig> {
        let base = match &self.config {
            Some(path) => RendererConfig::load(path)?,
            None => RendererConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }
}
