use crate::client::{
    ClientSettings, TargetMode, CONNECT_TIMEOUT, COUNTRIES_TIMEOUT, DEFAULT_BASE_URL,
    GENERATE_TIMEOUT,
};
use crate::generate::ConfigFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global configuration loaded from `~/.config/tpn/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpnConfig {
    /// Base URL of the validator API or the proxy in front of it. In `host`
    /// mode it must contain `{validator}`.
    pub base_url: String,
    /// How the validator is addressed: "query" (default) or "host".
    #[serde(default)]
    pub target_mode: TargetMode,
    /// Deadline for listing countries, in milliseconds.
    pub countries_timeout_ms: u64,
    /// Deadline for generating a config, in milliseconds.
    pub generate_timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Validator used when none is given on the command line.
    #[serde(default)]
    pub default_validator: Option<String>,
    #[serde(default = "default_lease_minutes")]
    pub default_lease_minutes: u32,
    #[serde(default)]
    pub default_format: ConfigFormat,
}

fn default_connect_timeout_ms() -> u64 {
    CONNECT_TIMEOUT.as_millis() as u64
}

fn default_lease_minutes() -> u32 {
    60
}

impl Default for TpnConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            target_mode: TargetMode::Query,
            countries_timeout_ms: COUNTRIES_TIMEOUT.as_millis() as u64,
            generate_timeout_ms: GENERATE_TIMEOUT.as_millis() as u64,
            connect_timeout_ms: default_connect_timeout_ms(),
            default_validator: None,
            default_lease_minutes: default_lease_minutes(),
            default_format: ConfigFormat::Text,
        }
    }
}

impl TpnConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            target_mode: self.target_mode,
            countries_timeout: Duration::from_millis(self.countries_timeout_ms),
            generate_timeout: Duration::from_millis(self.generate_timeout_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tpn")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TpnConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<TpnConfig> {
    if !path.exists() {
        let default_cfg = TpnConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: TpnConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TpnConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:5001/proxy");
        assert_eq!(cfg.target_mode, TargetMode::Query);
        assert_eq!(cfg.countries_timeout_ms, 5_000);
        assert_eq!(cfg.generate_timeout_ms, 100_000);
        assert_eq!(cfg.default_lease_minutes, 60);
        assert_eq!(cfg.default_format, ConfigFormat::Text);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TpnConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TpnConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_host_variant() {
        let toml = r#"
            base_url = "http://{validator}:3000"
            target_mode = "host"
            countries_timeout_ms = 5000
            generate_timeout_ms = 10000
            default_validator = "185.189.44.166"
            default_format = "json"
        "#;
        let cfg: TpnConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.target_mode, TargetMode::Host);
        assert_eq!(cfg.default_validator.as_deref(), Some("185.189.44.166"));
        assert_eq!(cfg.default_format, ConfigFormat::Json);
        assert_eq!(cfg.default_lease_minutes, 60);
        let settings = cfg.client_settings();
        assert_eq!(settings.generate_timeout, Duration::from_secs(10));
        assert_eq!(settings.connect_timeout, CONNECT_TIMEOUT);
    }

    #[test]
    fn load_or_init_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert_eq!(cfg, TpnConfig::default());
        assert!(path.exists());
        let again = load_or_init_at(&path).unwrap();
        assert_eq!(again, cfg);
    }

    #[test]
    fn load_rejects_unknown_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"x\"\ntarget_mode = \"dns\"\ncountries_timeout_ms = 1\ngenerate_timeout_ms = 1\n",
        )
        .unwrap();
        assert!(load_or_init_at(&path).is_err());
    }
}
