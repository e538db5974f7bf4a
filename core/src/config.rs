use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ron::ser::{PrettyConfig, to_string_pretty};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::auth::DemoUser;
use crate::client::{ClientConfig, DEFAULT_BASE_URL};
use crate::{ConfigError, StorageAction};

pub const CONFIG_ENV: &str = "IMS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "ims.ron";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown log level `{value}`"))
    }
}

/// Settings read from `ims.ron` (or the file named by `IMS_CONFIG`).
///
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub log_level: LogLevel,
    pub log_capacity: usize,
    pub demo_users: Vec<DemoUser>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
            log_level: LogLevel::Info,
            log_capacity: 2000,
            demo_users: DemoUser::defaults(),
        }
    }
}

impl AppConfig {
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// A missing file is not an error: it yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::StorageIo {
                    action: StorageAction::Load,
                    path: Some(path.display().to_string()),
                    source,
                });
            }
        };

        let config: AppConfig = ron::from_str(&contents).map_err(|source| ConfigError::Ron {
            action: StorageAction::Load,
            path: Some(path.display().to_string()),
            source,
        })?;
        Ok(config.normalized())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents =
            to_string_pretty(self, PrettyConfig::new()).map_err(|source| ConfigError::Encode {
                path: Some(path.display().to_string()),
                source,
            })?;
        fs::write(path, contents).map_err(|source| ConfigError::StorageIo {
            action: StorageAction::Save,
            path: Some(path.display().to_string()),
            source,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(self.request_timeout_ms.max(1)),
        }
    }

    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = DEFAULT_BASE_URL.to_string();
        }
        self.log_capacity = self.log_capacity.max(1);
        self
    }
}
