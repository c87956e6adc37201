use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE: &str = "cochera-api";
const ACCOUNT: &str = "default";

/// Somewhere the backend bearer token can live outside the config file.
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>>;

    /// Persist `token`. Implementations must only return `Ok` once the token
    /// can be read back, since the caller deletes its own copy afterwards.
    fn save(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// The OS credential store (Keychain, Credential Manager, Secret Service).
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    account: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(SERVICE, ACCOUNT)
    }
}

impl KeyringStore {
    pub fn new(service: &str, account: &str) -> Self {
        Self {
            service: service.to_string(),
            account: account.to_string(),
        }
    }

    // A fresh entry per call: the mock backend only remembers a secret on
    // the entry object that set it.
    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.account).context("Failed to open keyring entry")
    }
}

impl TokenStore for KeyringStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read API token from keyring"),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .context("Failed to store API token in keyring")?;

        match self.load()? {
            Some(stored) if stored == token => Ok(()),
            _ => anyhow::bail!(
                "Keyring did not keep the API token (no persistent credential store available)"
            ),
        }
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete API token from keyring"),
        }
    }
}
