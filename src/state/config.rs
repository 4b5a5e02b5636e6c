// Provider configuration loading

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

use crate::models::ProviderConfig;

#[cfg(debug_assertions)]
const APP_NAME: &str = "mongodb-index-resource-dev";

#[cfg(not(debug_assertions))]
const APP_NAME: &str = "mongodb-index-resource";

/// Environment variable that overrides the configured connection URI.
pub const URI_ENV: &str = "MONGODB_URI";

/// Locates and reads the provider configuration file
#[derive(Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    const PROVIDER_FILE: &'static str = "provider.json";

    /// Use the platform-specific config directory
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .context("Could not determine config directory")?;
        Ok(Self { config_dir })
    }

    /// Use an explicit config directory
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self { config_dir: config_dir.into() }
    }

    /// Get path to a specific config file
    fn file_path(&self, filename: &str) -> PathBuf {
        self.config_dir.join(filename)
    }

    /// Load data from a JSON file
    fn load_json<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.file_path(filename);

        if !path.exists() {
            return Ok(None);
        }

        let data =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", filename))?;

        let value: T = serde_json::from_str(&data)
            .with_context(|| format!("Failed to deserialize {}", filename))?;

        Ok(Some(value))
    }

    /// Load the provider configuration, letting `MONGODB_URI` override the file.
    pub fn load_provider_config(&self) -> Result<ProviderConfig> {
        let from_file = self.load_json::<ProviderConfig>(Self::PROVIDER_FILE)?;
        let config = resolve_provider_config(from_file, std::env::var(URI_ENV).ok())?;
        log::debug!("Loaded provider config from {}", self.config_dir.display());
        Ok(config)
    }
}

/// Merge the file configuration with an environment URI and validate the result.
pub fn resolve_provider_config(
    from_file: Option<ProviderConfig>,
    env_uri: Option<String>,
) -> Result<ProviderConfig> {
    let env_uri = env_uri.filter(|uri| !uri.trim().is_empty());

    let config = match (from_file, env_uri) {
        (Some(mut config), Some(uri)) => {
            config.uri = uri;
            config
        }
        (Some(config), None) => config,
        (None, Some(uri)) => ProviderConfig::new(uri),
        (None, None) => {
            bail!("No provider configuration found and {} is not set", URI_ENV)
        }
    };

    if let Err(err) = config.validate() {
        bail!("Invalid provider configuration: {}", err);
    }
    Ok(config)
}
