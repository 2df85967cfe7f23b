//! Logging setup.
//!
//! The crate logs through the `log` facade. In the browser `console_log`
//! routes records to the devtools console at the matching level; native
//! builds (tests, tools) use `env_logger` and honour `RUST_LOG`.

use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "math_sprint::round=debug") and only applies to native builds. The browser
/// console logger takes `max_level` alone.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub max_level: LevelFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            max_level: LevelFilter::Info,
        }
    }
}

static INIT: Once = Once::new();

/// Install the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        install(config);
        log::debug!("logging initialized");
    });
}

#[cfg(target_arch = "wasm32")]
fn install(config: LoggingConfig) {
    let Some(level) = config.max_level.to_level() else {
        log::set_max_level(LevelFilter::Off);
        return;
    };
    // Fails only if the page already installed a logger.
    let _ = console_log::init_with_level(level);
}

#[cfg(not(target_arch = "wasm32"))]
fn install(config: LoggingConfig) {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = config.env_filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(config.max_level);
    }

    // Tests may race to install; the loser keeps the winner's logger.
    let _ = builder.is_test(cfg!(test)).try_init();
}
