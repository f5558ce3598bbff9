pub mod cli;

use crate::utils::error::{MpError, Result};
use crate::utils::output::{eecho_style, Tone};
use crate::utils::validation::{validate_aws_region, validate_non_empty_string, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_CONFIG_FILE: &str = ".config/aws_mp_utils/default.yaml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Numeric levels as used by Python's `logging` module.
    fn from_number(level: u64) -> Option<Self> {
        match level {
            10 => Some(LogLevel::Debug),
            20 => Some(LogLevel::Info),
            30 => Some(LogLevel::Warning),
            40 | 50 => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Number(u64),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Name(name) => LogLevel::from_name(&name),
            Raw::Number(level) => LogLevel::from_number(level),
        };
        parsed.ok_or_else(|| {
            serde::de::Error::custom("log_level must be one of debug, info, warning, error")
        })
    }
}

/// Values accepted in the YAML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[allow(dead_code)]
    config_file: Option<PathBuf>,
    profile: Option<String>,
    log_level: Option<LogLevel>,
    no_color: Option<bool>,
    region: Option<String>,
}

/// Values given on the command line. `None` means not given, so the file
/// or the default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub profile: Option<String>,
    pub log_level: Option<LogLevel>,
    pub no_color: Option<bool>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub config_file: PathBuf,
    pub profile: String,
    pub log_level: LogLevel,
    pub no_color: bool,
    pub region: String,
}

pub fn default_config_file() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

impl AppConfig {
    /// Resolves the configuration: command line first, then the config
    /// file, then defaults. A missing file is not an error; defaults are
    /// used instead.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let config_file = overrides
            .config_file
            .clone()
            .unwrap_or_else(default_config_file);

        let file = match std::fs::read_to_string(&config_file) {
            Ok(content) => Self::parse_file(&config_file, &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                eecho_style(
                    &format!(
                        "Config file: {} not found. Using default configuration values.",
                        config_file.display()
                    ),
                    Tone::Notice,
                    true,
                );
                FileConfig::default()
            }
            Err(e) => return Err(MpError::IoError(e)),
        };

        Ok(Self::merge(config_file, overrides, file))
    }

    fn parse_file(path: &Path, content: &str) -> Result<FileConfig> {
        if content.trim().is_empty() {
            return Ok(FileConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| MpError::ConfigError {
            message: format!("Invalid config file {}: {}", path.display(), e),
        })
    }

    fn merge(config_file: PathBuf, overrides: &ConfigOverrides, file: FileConfig) -> Self {
        Self {
            config_file,
            profile: overrides
                .profile
                .clone()
                .or(file.profile)
                .unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            log_level: overrides.log_level.or(file.log_level).unwrap_or_default(),
            no_color: overrides.no_color.or(file.no_color).unwrap_or(false),
            region: overrides
                .region
                .clone()
                .or(file.region)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("profile", &self.profile)?;
        validate_aws_region("region", &self.region)?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
