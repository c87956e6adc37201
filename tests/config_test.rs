use anyhow::Result;
use cochera::config::{Config, TokenSource, load_from_path, load_with_store, save_to_path};
use cochera::credentials::TokenStore;
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, tempdir};

/// Keeps the token across loads, like a working OS keyring.
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

/// Loses every token it is given; KeyringStore reports that as a failed save.
struct ForgetfulStore;

impl TokenStore for ForgetfulStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, _token: &str) -> Result<()> {
        anyhow::bail!("Keyring did not keep the API token")
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }
}

fn write_keyring_config(path: &Path) {
    std::fs::write(
        path,
        "[api]\nbase_url = \"http://localhost:8000\"\ntoken = \"secret\"\nuse_keyring = true\n",
    )
    .unwrap();
}

#[test]
fn test_load_config_valid() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let config_content = r#"
        [api]
        base_url = "https://cochera.example/api"
        company_id = 3
        token = "abc"

        [billing]
        default_tolerance_minutes = 15

        [logging]
        level = "debug"
    "#;
    temp_file.write_all(config_content.as_bytes()).unwrap();

    let config = load_from_path(temp_file.path()).expect("Failed to load valid config");

    assert_eq!(config.api.base_url, "https://cochera.example/api");
    assert_eq!(config.api.company_id, Some(3));
    assert_eq!(config.api.token.as_deref(), Some("abc"));
    assert!(!config.api.use_keyring);
    assert_eq!(config.billing.default_tolerance_minutes, Some(15));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_config_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[api]\n").unwrap();

    let config = load_from_path(temp_file.path()).expect("Sections should default");

    assert!(config.api.base_url.is_empty());
    assert_eq!(config.api.company_id, None);
    assert_eq!(config.billing.default_tolerance_minutes, None);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_load_config_rejects_wrong_types() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[billing]\ndefault_tolerance_minutes = \"soon\"\n")
        .unwrap();

    assert!(load_from_path(temp_file.path()).is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg").join("config.toml");

    let mut config = Config::default();
    config.api.base_url = "http://localhost:8000".to_string();
    config.api.company_id = Some(9);
    config.billing.default_tolerance_minutes = Some(10);

    save_to_path(&config, &path).unwrap();
    let loaded = load_from_path(&path).unwrap();

    assert_eq!(loaded.api.base_url, "http://localhost:8000");
    assert_eq!(loaded.api.company_id, Some(9));
    assert_eq!(loaded.billing.default_tolerance_minutes, Some(10));
}

#[test]
fn test_migrate_credentials_skipped_without_keyring() {
    let mut config = Config::default();
    config.api.token = Some("token-123".to_string());
    let store = MemoryStore::default();

    assert!(!config.migrate_credentials(&store).unwrap());
    assert_eq!(config.api.token.as_deref(), Some("token-123"));
    assert_eq!(*store.0.borrow(), None);
}

#[test]
fn test_migrated_token_survives_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    write_keyring_config(&path);
    let store = MemoryStore::default();

    let (config, source) = load_with_store(&path, &store).unwrap();
    assert_eq!(source, TokenSource::Migrated);
    assert_eq!(config.get_api_token().unwrap(), "secret");
    assert_eq!(load_from_path(&path).unwrap().api.token, None);

    let (reloaded, source) = load_with_store(&path, &store).unwrap();
    assert_eq!(source, TokenSource::Keyring);
    assert_eq!(reloaded.get_api_token().unwrap(), "secret");
}

#[test]
fn test_token_kept_in_file_when_keyring_forgets() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    write_keyring_config(&path);

    let (config, source) = load_with_store(&path, &ForgetfulStore).unwrap();
    assert!(matches!(source, TokenSource::MigrationFailed(_)));
    assert_eq!(config.get_api_token().unwrap(), "secret");

    // Nothing was rewritten, so the next run still has the token
    let on_disk = load_from_path(&path).unwrap();
    assert_eq!(on_disk.api.token.as_deref(), Some("secret"));
}

#[test]
fn test_token_source_without_keyring() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\ntoken = \"plain\"\n").unwrap();

    let (config, source) = load_with_store(&path, &ForgetfulStore).unwrap();
    assert_eq!(source, TokenSource::File);
    assert_eq!(config.get_api_token().unwrap(), "plain");
}
