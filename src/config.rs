//! Layered configuration for the binaries.
//!
//! Priority, highest first:
//! 1. CLI arguments
//! 2. Environment variables (via clap `env`)
//! 3. TOML file (`<config_dir>/daily-schedule/config.toml`)
//! 4. Compiled defaults
//!
//! A missing default config file is not an error. An explicit `--config` path
//! that cannot be read is.

use crate::time::ClockTime;
use chrono::Utc;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "daily-schedule";

/// Zone the clock faces and the agenda are read in unless configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Yekaterinburg;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("unknown timezone '{0}' (expected an IANA name such as Europe/Berlin)")]
    InvalidTimezone(String),
}

/// Where the schedule document is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Markdown,
    Sqlite,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    schedule: ScheduleFileConfig,
    server: ServerFileConfig,
    logging: LoggingFileConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScheduleFileConfig {
    document: Option<PathBuf>,
    store: Option<StoreKind>,
    timezone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoggingFileConfig {
    level: Option<String>,
}

#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Daily schedule on two clock faces, kept as Markdown")]
pub struct CliArgs {
    /// Path to config file (default: `<config_dir>/daily-schedule/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Schedule document (Markdown file, or SQLite database with `--store sqlite`).
    #[arg(short, long, env = "DAILY_SCHEDULE_DOCUMENT")]
    pub document: Option<PathBuf>,

    #[arg(long, value_enum, env = "DAILY_SCHEDULE_STORE")]
    pub store: Option<StoreKind>,

    /// Address for the HTTP API.
    #[arg(short, long, env = "DAILY_SCHEDULE_HTTP_ADDR")]
    pub bind: Option<String>,

    /// Log filter (trace, debug, info, warn, error, or a tracing directive).
    #[arg(long, env = "DAILY_SCHEDULE_LOG")]
    pub log_level: Option<String>,

    /// IANA timezone used for "now" (default: Asia/Yekaterinburg).
    #[arg(long, env = "DAILY_SCHEDULE_TIMEZONE")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub document_path: PathBuf,
    pub store_kind: StoreKind,
    pub bind_addr: String,
    pub log_level: String,
    pub timezone: Tz,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            document_path: data_dir.join(APP_DIR).join("schedule.md"),
            store_kind: StoreKind::Markdown,
            bind_addr: "127.0.0.1:3000".to_string(),
            log_level: "warn".to_string(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read, or
    /// if any config file cannot be parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, file)
    }

    /// Current wall-clock time in the configured zone.
    pub fn now(&self) -> ClockTime {
        ClockTime::at(Utc::now(), &self.timezone)
    }

    fn resolve(cli: &CliArgs, file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timezone = match cli.timezone.clone().or(file.schedule.timezone) {
            Some(name) => parse_timezone(&name)?,
            None => defaults.timezone,
        };
        Ok(Self {
            document_path: cli
                .document
                .clone()
                .or(file.schedule.document)
                .unwrap_or(defaults.document_path),
            store_kind: cli
                .store
                .or(file.schedule.store)
                .unwrap_or(defaults.store_kind),
            bind_addr: cli
                .bind
                .clone()
                .or(file.server.bind_addr)
                .unwrap_or(defaults.bind_addr),
            log_level: cli
                .log_level
                .clone()
                .or(file.logging.level)
                .unwrap_or(defaults.log_level),
            timezone,
        })
    }
}

fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join(APP_DIR).join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
