//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::Path, path::PathBuf, str::FromStr};

use clap::Args;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "postdesk";
const ENV_PREFIX: &str = "POSTDESK";
const DEFAULT_BUCKET: &str = "cover_image";
const DEFAULT_OBJECT_PREFIX: &str = "private";

/// Flags shared by every subcommand that override file and environment values.
#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// API base URL, e.g. <https://blog.example.com/api>
    #[arg(long, global = true, env = "POSTDESK_SITE_URL", value_name = "URL")]
    pub site: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub storage: Option<StorageSettings>,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Option<Url>,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Directory inside the bucket that cover images are written to.
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub enum StorageBackend {
    Http {
        endpoint: Url,
        bucket: String,
        api_key: Option<String>,
    },
    Filesystem {
        directory: PathBuf,
        public_base_url: Url,
    },
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(config_file: Option<&Path>, overrides: &GlobalOverrides) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);
    Settings::from_raw(raw)
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            api: build_api_settings(raw.api)?,
            storage: build_storage_settings(raw.storage)?,
            logging: build_logging_settings(raw.logging)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    storage: RawStorageSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(site) = &overrides.site {
            self.api.base_url = Some(site.clone());
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = Some(level.clone());
        }
        if overrides.log_json {
            self.logging.json = Some(true);
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStorageSettings {
    backend: Option<String>,
    endpoint: Option<String>,
    bucket: Option<String>,
    api_key: Option<String>,
    directory: Option<PathBuf>,
    public_base_url: Option<String>,
    prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let base_url = non_blank(api.base_url)
        .map(|value| parse_url(&value, "api.base_url"))
        .transpose()?;
    Ok(ApiSettings { base_url })
}

fn build_storage_settings(
    storage: RawStorageSettings,
) -> Result<Option<StorageSettings>, LoadError> {
    let backend = non_blank(storage.backend).unwrap_or_else(|| "http".to_string());
    let prefix = storage
        .prefix
        .unwrap_or_else(|| DEFAULT_OBJECT_PREFIX.to_string());

    let backend = match backend.to_ascii_lowercase().as_str() {
        "http" => {
            let Some(endpoint) = non_blank(storage.endpoint) else {
                return Ok(None);
            };
            StorageBackend::Http {
                endpoint: parse_url(&endpoint, "storage.endpoint")?,
                bucket: non_blank(storage.bucket).unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                api_key: non_blank(storage.api_key),
            }
        }
        "filesystem" => {
            let directory = storage
                .directory
                .filter(|path| !path.as_os_str().is_empty())
                .ok_or_else(|| {
                    LoadError::invalid("storage.directory", "required for the filesystem backend")
                })?;
            let public_base_url = non_blank(storage.public_base_url).ok_or_else(|| {
                LoadError::invalid(
                    "storage.public_base_url",
                    "required for the filesystem backend",
                )
            })?;
            StorageBackend::Filesystem {
                directory,
                public_base_url: parse_url(&public_base_url, "storage.public_base_url")?,
            }
        }
        other => {
            return Err(LoadError::invalid(
                "storage.backend",
                format!("unknown backend `{other}` (expected http or filesystem)"),
            ));
        }
    };

    Ok(Some(StorageSettings { backend, prefix }))
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn parse_url(value: &str, key: &'static str) -> Result<Url, LoadError> {
    Url::parse(value).map_err(|err| LoadError::invalid(key, format!("invalid url `{value}`: {err}")))
}
