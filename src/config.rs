//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config file < environment. Only the service base
//! URL can be set from the environment (`FIELER_BACKEND_URL`).
use crate::staging::DEFAULT_ACCEPT;
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use glob::Pattern;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "fieler")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("fieler.toml"))
}

/// What happens to the staged files once a submission succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StagingPolicy {
    #[default]
    Keep,
    ClearOnSuccess,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the upload service, without a trailing slash.
    pub backend_url: String,
    /// Glob patterns for file names the intake lets through.
    pub accept: Vec<String>,
    pub staging: StagingPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            accept: DEFAULT_ACCEPT.iter().map(|p| p.to_string()).collect(),
            staging: StagingPolicy::Keep,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.backend_url)
            .with_context(|| format!("Invalid config: backend_url {:?}", self.backend_url))?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            "Invalid config: backend_url must use http or https"
        );

        ensure!(
            !self.accept.is_empty(),
            "Invalid config: accept must list at least one pattern"
        );
        for pattern in &self.accept {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid config: accept pattern {pattern:?}"))?;
        }

        Ok(())
    }
}

/// Loads config from the platform config file and environment.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let mut config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FIELER_").only(&["backend_url"]))
        .extract()
        .context("Failed to load configuration")?;

    config.backend_url = config.backend_url.trim_end_matches('/').to_string();
    config.validate()?;

    Ok(config)
}
