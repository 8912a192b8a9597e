//! Settings resolved once at startup
//!
//! Precedence, highest first: command-line flag, `TABLE_EXPORT_PROVIDER_VERSION`,
//! the TOML config file, then whatever the provider reports.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::dataset::{DatasetProvider, ProviderVersion};

pub const PROVIDER_VERSION_ENV: &str = "TABLE_EXPORT_PROVIDER_VERSION";

/// Contents of `config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub provider_version: Option<String>,
}

/// Settings passed explicitly to the extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Decides which cursor shape rows are read with
    pub provider_version: ProviderVersion,
}

impl ExportConfig {
    /// Resolve settings from the process environment and the config file
    pub fn resolve(
        cli_version: Option<&str>,
        config_path: Option<&Path>,
        provider: &dyn DatasetProvider,
    ) -> Result<Self> {
        let file = load_config_file(config_path)?;
        let env_version = std::env::var(PROVIDER_VERSION_ENV).ok();
        Self::resolve_from(cli_version, env_version.as_deref(), &file, provider.version())
    }

    fn resolve_from(
        cli_version: Option<&str>,
        env_version: Option<&str>,
        file: &ConfigFile,
        reported: ProviderVersion,
    ) -> Result<Self> {
        let configured = cli_version
            .map(|v| ("--provider-version", v))
            .or_else(|| env_version.map(|v| (PROVIDER_VERSION_ENV, v)))
            .or_else(|| file.provider_version.as_deref().map(|v| ("config file", v)));

        let provider_version = match configured {
            Some((origin, raw)) => {
                let version = raw
                    .parse::<ProviderVersion>()
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("Invalid provider version from {}", origin))?;
                log::debug!("Provider version {} (from {})", version, origin);
                version
            }
            None => {
                log::debug!("Provider version {} (reported by provider)", reported);
                reported
            }
        };

        Ok(Self { provider_version })
    }
}

/// Default config location: `<config_dir>/table-export/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("table-export").join("config.toml"))
}

/// Load the config file
///
/// An explicit path must exist; a missing default file yields empty settings.
pub fn load_config_file(path: Option<&Path>) -> Result<ConfigFile> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(ConfigFile::default()),
        },
    };

    if !required && !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
