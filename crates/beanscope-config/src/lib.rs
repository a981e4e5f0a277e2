//! Configuration and logging setup for beanscope.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! [reflection]
//! cache_enabled = true
//! allow_private_access = true
//!
//! [logging]
//! level = "beanscope_reflect=debug"
//! json = false
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
#[serde(deny_unknown_fields)]
pub struct ReflectionConfig {
    /// Memoize per-class metadata.
    ///
    /// Disable in environments that redefine classes at runtime; every lookup then rebuilds the
    /// metadata from the registered schema.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Treat non-public fields, methods and constructors as accessible.
    #[serde(default = "default_true")]
    pub allow_private_access: bool,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            allow_private_access: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all beanscope crates.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr.
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Append logs to the given file path.
    ///
    /// If the file cannot be opened, file logging is disabled while other sinks
    /// remain active.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// Create the effective `EnvFilter`.
    ///
    /// `level` may be either a simple level (`info`, `debug`, ...) or a full
    /// `tracing_subscriber::EnvFilter` directive string. If `RUST_LOG` is set, it is merged into
    /// the resulting filter.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: true,
            file: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
#[serde(deny_unknown_fields)]
pub struct BeanscopeConfig {
    /// Metadata discovery settings.
    #[serde(default)]
    pub reflection: ReflectionConfig,

    /// Global logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The `Display` impl includes a source snippet; keep just the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl BeanscopeConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// JSON schema of [`BeanscopeConfig`], for editor integration.
pub fn json_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(BeanscopeConfig);
    serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
}

#[derive(Clone)]
struct MutexFileMakeWriter {
    file: Arc<Mutex<std::fs::File>>,
}

struct MutexFileWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl std::io::Write for MutexFileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.file.lock() {
            Ok(mut file) => file.write(buf),
            Err(poisoned) => poisoned.into_inner().write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(poisoned) => poisoned.into_inner().flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for MutexFileMakeWriter {
    type Writer = MutexFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MutexFileWriter {
            file: self.file.clone(),
        }
    }
}

impl fmt::Debug for MutexFileMakeWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutexFileMakeWriter").finish_non_exhaustive()
    }
}

static TRACING_INIT: Once = Once::new();

/// Initializes structured `tracing` logging.
///
/// This function is safe to call multiple times; only the first call installs a
/// global subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config
            .file
            .as_ref()
            .and_then(|path| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .ok()
            })
            .map(|file| Arc::new(Mutex::new(file)));

        let make_writer = match (config.stderr, file) {
            (true, Some(file)) => {
                BoxMakeWriter::new(std::io::stderr.and(MutexFileMakeWriter { file }))
            }
            (false, Some(file)) => BoxMakeWriter::new(MutexFileMakeWriter { file }),
            (true, None) => {
                // `cargo test` output capture only works for the stdlib's `print!/eprint!`
                // macros.
                if cfg!(debug_assertions) {
                    BoxMakeWriter::new(tracing_subscriber::fmt::writer::TestWriter::with_stderr)
                } else {
                    BoxMakeWriter::new(std::io::stderr)
                }
            }
            (false, None) => BoxMakeWriter::new(std::io::sink),
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(make_writer)
            .with_target(true);

        let result = if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        };

        if result.is_err() {
            tracing::debug!(
                target: "beanscope.config",
                "global tracing subscriber already installed"
            );
        }
    });
}
