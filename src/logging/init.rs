use std::sync::atomic::{AtomicBool, Ordering};

use env_logger::{Builder, Env, WriteStyle};
use log::LevelFilter;

/// Environment variable read before falling back to the built-in directives.
pub const LOG_ENV: &str = "QUAD_LOG";

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Where the demo's log lines go and how loud each side is.
///
/// Resource lifetimes (create/delete of every handle) are logged at `debug`
/// by this crate, so `quad_level` decides whether those show up. `driver_level`
/// covers everything else, SDL2 included.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub quad_level: LevelFilter,
    pub driver_level: LevelFilter,
    /// Millisecond timestamps, handy when reading frame pacing.
    pub timestamps: bool,
    pub write_style: WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let quad_level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        LoggingConfig {
            quad_level,
            driver_level: LevelFilter::Warn,
            timestamps: true,
            write_style: WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// `env_logger` directives for this config, e.g. `sdl2_gl_quad=debug,warn`.
    pub fn directives(&self) -> String {
        format!(
            "{}={},{}",
            env!("CARGO_CRATE_NAME"),
            self.quad_level.as_str().to_ascii_lowercase(),
            self.driver_level.as_str().to_ascii_lowercase()
        )
    }
}

/// Installs the global logger. `QUAD_LOG`, when set, replaces the configured
/// directives.
///
/// Returns `false` if a logger was already installed, by an earlier call or
/// by someone else.
pub fn init_logging(config: LoggingConfig) -> bool {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }

    let directives = config.directives();
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, directives.as_str()));
    builder.write_style(config.write_style);
    if config.timestamps {
        builder.format_timestamp_millis();
    } else {
        builder.format_timestamp(None);
    }

    match builder.try_init() {
        Ok(()) => {
            log::debug!("logger installed ({})", directives);
            true
        }
        Err(_) => false,
    }
}
