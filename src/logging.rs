//! Logger setup for the demo binary and anything embedding the renderer.

use crate::cli::Cli;
use crate::config::RendererConfig;

/// GPU backend crates that log per-frame at info
const QUIET_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Where the log filter comes from, highest priority first: an explicit
/// filter (`--log`), then `RUST_LOG`, then a default that turns softgl's own
/// logs up to debug when the renderer runs with bounds checks on.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter syntax, e.g. "softgl=trace,wgpu=warn"
    pub filter: Option<String>,
    /// Debug-level softgl logs in the default filter
    pub verbose: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            verbose: false,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// `--log` wins; otherwise a debug renderer gets verbose softgl logs
    pub fn from_cli(cli: &Cli, config: &RendererConfig) -> Self {
        Self {
            filter: cli.log.clone(),
            verbose: config.debug,
            ..Default::default()
        }
    }

    /// The filter string `init_logging` installs, given the `RUST_LOG` value
    pub fn resolve_filter(&self, rust_log: Option<&str>) -> String {
        if let Some(filter) = self.filter.as_deref().or(rust_log).filter(|f| !f.trim().is_empty()) {
            return filter.to_string();
        }

        let mut filter = String::from("info");
        if self.verbose {
            filter.push_str(",softgl=debug");
        }
        for module in QUIET_MODULES {
            filter.push_str(&format!(",{}=warn", module));
        }
        filter
    }
}

/// Install the global logger. Returns false if one was already installed,
/// in which case the existing logger is left alone.
pub fn init_logging(config: LoggingConfig) -> bool {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = config.resolve_filter(rust_log.as_deref());

    let installed = env_logger::Builder::new()
        .parse_filters(&filter)
        .write_style(config.write_style)
        .try_init()
        .is_ok();

    if installed {
        log::debug!("logging initialized with filter {:?}", filter);
    }
    installed
}
