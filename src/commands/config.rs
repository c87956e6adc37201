use crate::config::Config;
use crate::credentials::TokenStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

pub fn list(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;

    // Dot notation: "api.company_id"
    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .with_context(|| format!("Key not found: {}", part))?;
    }

    match current {
        serde_json::Value::String(s) => println!("{}", s),
        v => println!("{}", v),
    }

    Ok(())
}

/// Update one dotted key in the config file, keeping the other settings.
///
/// An empty value removes the key. Values that read as integers or booleans
/// are stored as such; everything else is stored as a string. With
/// `api.use_keyring` on, `api.token` goes to `store` instead of the file.
pub fn set(path: &Path, key: &str, value: &str, store: &dyn TokenStore) -> Result<()> {
    let mut root = read_table(path)?;

    let parts: Vec<&str> = key.split('.').collect();
    let (leaf, parents) = parts
        .split_last()
        .filter(|(leaf, _)| !leaf.is_empty())
        .with_context(|| format!("Invalid key '{}'", key))?;

    let mut table = &mut root;
    for part in parents {
        table = table
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::map::Map::new()))
            .as_table_mut()
            .with_context(|| format!("'{}' is not a section", part))?;
    }

    if value.is_empty() {
        table.remove(*leaf);
    } else {
        table.insert(leaf.to_string(), parse_scalar(value));
    }

    let mut config: Config = toml::Value::Table(root.clone())
        .try_into()
        .with_context(|| format!("'{}' is not a valid value for {}", value, key))?;
    config.validate()?;

    if key == "api.token" && config.api.use_keyring {
        if value.is_empty() {
            store.clear()?;
        } else {
            match config.migrate_credentials(store) {
                Ok(_) => {
                    if let Some(api) = root.get_mut("api").and_then(toml::Value::as_table_mut) {
                        api.remove("token");
                    }
                }
                Err(e) => warn!("Keeping API token in config file: {:#}", e),
            }
        }
    }

    let toml_string = toml::to_string_pretty(&root).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    std::fs::write(path, toml_string).context("Failed to write config file")?;

    info!(key, "config updated");
    println!("✓ {} updated", key);
    Ok(())
}

fn read_table(path: &Path) -> Result<toml::map::Map<String, toml::Value>> {
    if !path.exists() {
        return Ok(toml::map::Map::new());
    }
    let content = std::fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn parse_scalar(value: &str) -> toml::Value {
    if let Ok(i) = value.parse::<i64>() {
        toml::Value::Integer(i)
    } else if let Ok(b) = value.parse::<bool>() {
        toml::Value::Boolean(b)
    } else {
        toml::Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct MemoryStore(RefCell<Option<String>>);

    impl TokenStore for MemoryStore {
        fn load(&self) -> Result<Option<String>> {
            Ok(self.0.borrow().clone())
        }

        fn save(&self, token: &str) -> Result<()> {
            *self.0.borrow_mut() = Some(token.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            *self.0.borrow_mut() = None;
            Ok(())
        }
    }

    #[test]
    fn test_set_creates_file_and_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let store = MemoryStore::default();
        set(&path, "api.company_id", "7", &store).unwrap();
        set(&path, "api.base_url", "http://localhost:8000/api", &store).unwrap();

        let config = crate::config::load_from_path(&path).unwrap();
        assert_eq!(config.api.company_id, Some(7));
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_set_empty_value_removes_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let store = MemoryStore::default();
        set(&path, "billing.default_tolerance_minutes", "15", &store).unwrap();
        set(&path, "billing.default_tolerance_minutes", "", &store).unwrap();

        let config = crate::config::load_from_path(&path).unwrap();
        assert_eq!(config.billing.default_tolerance_minutes, None);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let store = MemoryStore::default();
        assert!(set(&path, "api.base_url", "ftp://example.com", &store).is_err());
        assert!(set(&path, "api.company_id", "not-a-number", &store).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_set_token_goes_to_keyring_when_enabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = MemoryStore::default();

        set(&path, "api.use_keyring", "true", &store).unwrap();
        set(&path, "api.token", "abc", &store).unwrap();

        assert_eq!(store.0.borrow().as_deref(), Some("abc"));
        let config = crate::config::load_from_path(&path).unwrap();
        assert_eq!(config.api.token, None);

        set(&path, "api.token", "", &store).unwrap();
        assert_eq!(*store.0.borrow(), None);
    }

    #[test]
    fn test_set_token_stays_in_file_when_keyring_fails() {
        struct BrokenStore;

        impl TokenStore for BrokenStore {
            fn load(&self) -> Result<Option<String>> {
                Ok(None)
            }

            fn save(&self, _token: &str) -> Result<()> {
                anyhow::bail!("no credential store")
            }

            fn clear(&self) -> Result<()> {
                Ok(())
            }
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set(&path, "api.use_keyring", "true", &BrokenStore).unwrap();
        set(&path, "api.token", "abc", &BrokenStore).unwrap();

        let config = crate::config::load_from_path(&path).unwrap();
        assert_eq!(config.api.token.as_deref(), Some("abc"));
    }
}
