use crate::credentials::{KeyringStore, TokenStore};
use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Token read from the keyring; never written back to the file
    #[serde(skip)]
    stored_token: Option<String>,
}

/// Where the API token came from when the config was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Missing,
    File,
    Keyring,
    /// Moved from the file into the keyring during this load
    Migrated,
    /// The keyring did not keep the token, so it stays in the file
    MigrationFailed(String),
    /// The keyring could not be read; the file token (if any) is used
    KeyringUnavailable(String),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    /// Company whose entries and tolerance are shown by default
    pub company_id: Option<u32>,
    /// Bearer token; moved to the keyring on load when `use_keyring` is set
    pub token: Option<String>,
    #[serde(default)]
    pub use_keyring: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            company_id: None,
            token: None,
            use_keyring: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BillingConfig {
    /// Grace period used when the backend has no tolerance for the company
    pub default_tolerance_minutes: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Ok(()); // Only needed by commands that hit the backend
        }

        let url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid API base URL '{}'", self.base_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("API base URL must use http or https, got '{}'", url.scheme());
        }

        Ok(())
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.level)
            .with_context(|| format!("Invalid log level '{}'", self.level))?;
        Ok(())
    }
}

impl Config {
    /// The bearer token for backend calls: keyring first, then the file.
    pub fn get_api_token(&self) -> Result<String> {
        if let Some(token) = self.stored_token.as_ref().or(self.api.token.as_ref()) {
            return Ok(token.clone());
        }

        anyhow::bail!("API token not found. Run 'cochera config set api.token <TOKEN>' to configure")
    }

    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Move a plain-text token into `store`.
    ///
    /// The file copy is dropped only after the store has accepted (and read
    /// back) the token; on error the config is left untouched.
    pub fn migrate_credentials(&mut self, store: &dyn TokenStore) -> Result<bool> {
        if !self.api.use_keyring {
            return Ok(false);
        }
        let Some(token) = self.api.token.clone() else {
            return Ok(false);
        };

        store.save(&token)?;
        self.stored_token = Some(token);
        self.api.token = None;
        Ok(true)
    }

    /// Migrate a file token if the keyring is enabled, then load the keyring
    /// token. Failures are reported in the returned source, never raised.
    pub fn resolve_token(&mut self, store: &dyn TokenStore) -> TokenSource {
        if self.api.use_keyring {
            match self.migrate_credentials(store) {
                Ok(true) => return TokenSource::Migrated,
                Ok(false) => {}
                Err(e) => return TokenSource::MigrationFailed(format!("{:#}", e)),
            }

            match store.load() {
                Ok(Some(token)) => {
                    self.stored_token = Some(token);
                    return TokenSource::Keyring;
                }
                Ok(None) => {}
                Err(e) => return TokenSource::KeyringUnavailable(format!("{:#}", e)),
            }
        }

        if self.api.token.is_some() {
            TokenSource::File
        } else {
            TokenSource::Missing
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let config_dir = home::home_dir()
        .context("Could not find home directory")?
        .join(".cochera");
    Ok(config_dir.join("config.toml"))
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

/// Load, validate and resolve the token against `store`. A migrated token
/// is removed from the file before returning.
pub fn load_with_store(path: &Path, store: &dyn TokenStore) -> Result<(Config, TokenSource)> {
    let mut config = load_from_path(path)?;
    config.validate()?;

    let source = config.resolve_token(store);
    if source == TokenSource::Migrated {
        save_to_path(&config, path)?;
    }

    Ok((config, source))
}

pub fn load() -> Result<(Config, TokenSource)> {
    load_with_store(&config_path()?, &KeyringStore::default())
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}
