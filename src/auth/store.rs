//! Client-local token persistence
//!
//! Exactly two opaque strings are persisted, under fixed key names. Nothing
//! else about the session survives a restart.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Token pair issued by the backend's login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Result<Option<String>>;

    fn save(&self, tokens: &TokenPair) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// In-memory store, for ephemeral sessions and tests
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an access/refresh pair.
    pub fn with_tokens(tokens: &TokenPair) -> Self {
        let store = Self::new();
        store.write(tokens);
        store
    }

    fn write(&self, tokens: &TokenPair) {
        let mut entries = self.entries.write();
        entries.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access.clone());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), tokens.refresh.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.entries.read().get(ACCESS_TOKEN_KEY).cloned())
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        self.write(tokens);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write();
        entries.remove(ACCESS_TOKEN_KEY);
        entries.remove(REFRESH_TOKEN_KEY);
        Ok(())
    }
}

/// Store backed by a small JSON document on disk, readable by its owner only
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path).context("Failed to read token file")?;
        serde_json::from_str(&content).context("Failed to parse token file")
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Result<Option<String>> {
        self.get(ACCESS_TOKEN_KEY)
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create token directory")?;
        }

        let entries = BTreeMap::from([
            (ACCESS_TOKEN_KEY, tokens.access.as_str()),
            (REFRESH_TOKEN_KEY, tokens.refresh.as_str()),
        ]);
        let content = serde_json::to_string_pretty(&entries).context("Failed to serialize tokens")?;
        write_private(&self.path, content.as_bytes()).context("Failed to write token file")?;

        tracing::debug!(path = %self.path.display(), "Tokens persisted");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove token file")?;
            tracing::debug!(path = %self.path.display(), "Tokens cleared");
        }
        Ok(())
    }
}

fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // An existing file keeps its old mode on open
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access: "a.b.c".to_string(),
            refresh: "d.e.f".to_string(),
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.access_token().unwrap(), None);

        store.save(&pair()).unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("a.b.c"));
        assert_eq!(store.entries.read()[REFRESH_TOKEN_KEY], "d.e.f");

        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("tokens.json");
        let store = FileTokenStore::new(&path);
        store.save(&pair()).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw["access_token"], "a.b.c");
        assert_eq!(raw["refresh_token"], "d.e.f");

        store.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(store.access_token().unwrap(), None);
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(store.access_token().is_err());
        store.clear().unwrap();
        assert_eq!(store.access_token().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private_to_its_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        FileTokenStore::new(&path).save(&pair()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "token file mode is {:o}", mode & 0o777);
        assert_eq!(
            FileTokenStore::new(&path).access_token().unwrap().as_deref(),
            Some("a.b.c")
        );
    }
}
