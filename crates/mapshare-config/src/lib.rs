//! Shared configuration for MapShare tools.
//!
//! TOML profiles, an environment overlay, password resolution (env +
//! plaintext), and translation to `mapshare_core::MapShareConfig`. The
//! CLI layers its own flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mapshare_core::{DeviceRecord, DeviceSnapshot, MapShareConfig};

/// Environment variable consulted for the link password.
pub const PASSWORD_ENV: &str = "MAPSHARE_PASSWORD";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named MapShare link profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Seconds between background refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Seconds allowed for a fetch or a send.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            refresh_interval: default_refresh_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "text".into()
}
fn default_refresh_interval() -> u64 {
    600
}
fn default_timeout() -> u64 {
    10
}

/// A named MapShare link.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// MapShare link name (the path segment after the service root).
    pub link_name: String,

    /// Service root, when not the public MapShare site.
    pub base_url: Option<String>,

    /// Link password (plaintext; prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the link password.
    pub password_env: Option<String>,

    /// Sender label for outgoing messages.
    pub from_addr: Option<String>,

    pub refresh_interval: Option<u64>,

    pub timeout: Option<u64>,

    /// Known devices: device key → attribute map (`Id`, `Name`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub devices: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(name, profile)| (name.as_str(), profile))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }

    /// A copy with every plaintext password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for profile in config.profiles.values_mut() {
            if profile.password.is_some() {
                profile.password = Some(REDACTED.into());
            }
        }
        config
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "mapshare", "mapshare").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("mapshare");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path`, overlaid with `MAPSHARE_*` environment.
///
/// A missing file is not an error. Nested keys use a double underscore
/// (`MAPSHARE_DEFAULTS__TIMEOUT=30`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MAPSHARE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation ─────────────────────────────────────────────────────

/// Resolve the link password: `password_env`, then `MAPSHARE_PASSWORD`,
/// then the plaintext field. A link without a password is valid.
pub fn resolve_password(profile: &Profile) -> Option<SecretString> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Some(SecretString::from(val));
    }

    profile.password.clone().map(SecretString::from)
}

/// The device table declared in a profile, as a snapshot.
pub fn profile_devices(profile: &Profile) -> DeviceSnapshot {
    profile
        .devices
        .iter()
        .map(|(key, attrs)| (key.clone(), DeviceRecord::from(attrs.clone())))
        .collect()
}

/// Build a `MapShareConfig` from a profile and the global defaults.
pub fn profile_to_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<MapShareConfig, ConfigError> {
    if profile.link_name.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: format!("profiles.{profile_name}.link_name"),
            reason: "must not be empty".into(),
        });
    }

    let mut config = MapShareConfig::new(profile.link_name.clone());

    if let Some(ref raw) = profile.base_url {
        config.base_url = raw.parse().map_err(|e: url::ParseError| ConfigError::Validation {
            field: format!("profiles.{profile_name}.base_url"),
            reason: format!("invalid URL '{raw}': {e}"),
        })?;
    }

    config.link_password = resolve_password(profile);

    if let Some(ref from) = profile.from_addr {
        config.default_sender.clone_from(from);
    }

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.fetch_timeout = timeout;
    config.send_timeout = timeout;
    config.refresh_interval =
        Duration::from_secs(profile.refresh_interval.unwrap_or(defaults.refresh_interval));

    Ok(config)
}
