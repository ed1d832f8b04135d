//! Configuration file management for studyplan.
//!
//! Provides a TOML-based config file at `~/.config/studyplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use studyplan_core::{DEFAULT_HOURS_PER_DAY, FillPolicy, ScheduleDefaults};

pub const ENV_TIMEZONE: &str = "STUDYPLAN_TIMEZONE";
pub const ENV_HOURS_PER_DAY: &str = "STUDYPLAN_HOURS_PER_DAY";
pub const ENV_FILL_POLICY: &str = "STUDYPLAN_FILL_POLICY";

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleSection {
    /// Daily budget used when a request omits `hours_per_day`.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: u32,
    #[serde(default)]
    pub fill_policy: FillPolicy,
    /// IANA zone name used to resolve "today".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            fill_policy: FillPolicy::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

fn default_hours_per_day() -> u32 {
    DEFAULT_HOURS_PER_DAY
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the studyplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/studyplan` or
/// `~/.config/studyplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("studyplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("studyplan")
}

/// Return the path to the studyplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse a config file. Returns an error if it does not exist.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct StudyplanConfig {
    pub defaults: ScheduleDefaults,
    pub timezone: Tz,
    pub server: ServerSection,
}

impl StudyplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn resolve(cli_timezone: Option<&str>) -> Result<Self> {
        let path = config_path();
        let file = if path.exists() {
            Some(load_config_from(&path)?)
        } else {
            None
        };
        Self::resolve_with(file, cli_timezone)
    }

    /// Resolve against an already loaded (or absent) config file.
    ///
    /// - Time zone: `cli_timezone` > `STUDYPLAN_TIMEZONE` > `schedule.timezone` > `UTC`
    /// - Hours per day: `STUDYPLAN_HOURS_PER_DAY` > `schedule.hours_per_day` > 2
    /// - Fill policy: `STUDYPLAN_FILL_POLICY` > `schedule.fill_policy` > `pad_with_empty_days`
    pub fn resolve_with(file: Option<ConfigFile>, cli_timezone: Option<&str>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let tz_name = match cli_timezone {
            Some(name) => name.to_string(),
            None => std::env::var(ENV_TIMEZONE).unwrap_or(file.schedule.timezone),
        };
        let timezone = parse_timezone(&tz_name)?;

        let hours_per_day = match std::env::var(ENV_HOURS_PER_DAY) {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{ENV_HOURS_PER_DAY} is not a valid number: {raw:?}"))?,
            Err(_) => file.schedule.hours_per_day,
        };
        if hours_per_day == 0 {
            anyhow::bail!("configured hours per day must be positive");
        }

        let fill_policy = match std::env::var(ENV_FILL_POLICY) {
            Ok(raw) => raw
                .trim()
                .parse::<FillPolicy>()
                .with_context(|| format!("{ENV_FILL_POLICY} is invalid"))?,
            Err(_) => file.schedule.fill_policy,
        };

        Ok(Self {
            defaults: ScheduleDefaults {
                hours_per_day,
                fill_policy,
            },
            timezone,
            server: file.server,
        })
    }
}

/// Parse an IANA time zone name such as `Europe/Berlin`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow!("unknown time zone {name:?}: {e}"))
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
