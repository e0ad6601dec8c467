use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "easel_engine=debug,wgpu=warn"). When absent, `RUST_LOG` is consulted and
/// `default_level` applies last.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Debug output for the engine, warnings only for the GPU stack.
    pub fn verbose() -> Self {
        Self {
            env_filter: Some("easel_engine=debug,easel_studio=debug,wgpu=warn,naga=warn".into()),
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger.
///
/// Idempotent: only the first call has any effect, later configs are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(config.default_level);
                }
            },
        }

        builder.write_style(config.write_style);
        builder.format_timestamp_millis();

        // A logger installed by the host (tests, embedding app) wins.
        if builder.try_init().is_err() {
            log::debug!("global logger already installed; keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}
