//! CLI flag overrides on top of `mapshare_config` profiles.
//!
//! Precedence: command-line flags (and their env vars) > profile > defaults.

use std::path::PathBuf;
use std::time::Duration;

use mapshare_config::{Config, profile_devices, profile_to_config};
use mapshare_core::{DeviceSnapshot, MapShareConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// A link ready to hand to the coordinator.
#[derive(Debug)]
pub struct ResolvedLink {
    pub config: MapShareConfig,
    /// Devices declared in the profile; empty without a profile.
    pub devices: DeviceSnapshot,
}

/// The config file in use: `--config` or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(mapshare_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let cfg = match global.config {
        Some(ref path) => mapshare_config::load_config_from(path)?,
        None => mapshare_config::load_config()?,
    };
    Ok(cfg)
}

/// Resolve the active link from the config file and CLI overrides.
///
/// A profile named with `--profile` must exist. Without a matching
/// profile, `--link` alone is enough to build a link.
pub fn resolve_link(global: &GlobalOpts) -> Result<ResolvedLink, CliError> {
    let cfg = load(global)?;

    let (mut config, devices) = match cfg.profile(global.profile.as_deref()) {
        Ok((name, profile)) => (
            profile_to_config(profile, name, &cfg.defaults)?,
            profile_devices(profile),
        ),
        Err(_) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: global.profile.clone().unwrap_or_default(),
                available: available_profiles(&cfg),
            });
        }
        Err(_) => {
            let link = global.link.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_file(global).display().to_string(),
            })?;
            let mut config = MapShareConfig::new(link);
            config.refresh_interval = Duration::from_secs(cfg.defaults.refresh_interval);
            config.fetch_timeout = Duration::from_secs(cfg.defaults.timeout);
            config.send_timeout = config.fetch_timeout;
            (config, DeviceSnapshot::new())
        }
    };

    if let Some(ref link) = global.link {
        config.link_name.clone_from(link);
    }
    if let Some(ref raw) = global.base_url {
        config.base_url = raw.parse().map_err(|e: url::ParseError| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL '{raw}': {e}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        config.fetch_timeout = Duration::from_secs(secs);
        config.send_timeout = config.fetch_timeout;
    }

    Ok(ResolvedLink { config, devices })
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
