use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::RiskTier;

/// Root configuration structure, deserialized from `.reop-risk/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the classifier artifact lives.
    pub model: ModelConfig,
    /// Text shown for each advisory tier.
    pub advisory: AdvisoryConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelConfig {
    /// Path to the JSON model artifact. Relative paths resolve against the
    /// directory holding the config file.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub high: String,
    pub moderate: String,
    pub low: String,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        AdvisoryConfig {
            high: "High Risk: Consult your surgeon for additional evaluation.".to_string(),
            moderate: "Moderate Risk: Monitor closely with your healthcare provider.".to_string(),
            low: "Low Risk: Continue with standard follow-up care.".to_string(),
        }
    }
}

impl AdvisoryConfig {
    pub fn message_for(&self, tier: RiskTier) -> &str {
        match tier {
            RiskTier::High => &self.high,
            RiskTier::Moderate => &self.moderate,
            RiskTier::Low => &self.low,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `./.reop-risk/config.toml`
/// 3. `~/.config/reop-risk/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local = Path::new(".reop-risk").join("config.toml");
    if local.exists() {
        return read_config(&local);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("reop-risk").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    tracing::debug!("no config file found, using defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;

    if let Some(model_path) = &config.model.path {
        if model_path.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.model.path = Some(base.join(model_path));
        }
    }

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
