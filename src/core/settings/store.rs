//! Config Store
//!
//! Plaintext persistence surface for the non-sensitive settings payload.
//! The payload written here is always the sanitized JSON representation —
//! API keys go through [`crate::core::credentials`] instead.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use super::error::{SettingsError, SettingsResult};

/// File name of the settings blob inside the app config directory.
const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// ConfigStore Trait
// ============================================================================

/// Key-value-by-path persistence for the non-secret settings payload.
///
/// `read` distinguishes "absent" (`Ok(None)`, expected on first run) from a
/// real failure so callers can treat a missing blob as "use defaults".
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored payload. `None` means no blob exists yet.
    async fn read(&self) -> SettingsResult<Option<String>>;

    /// Replace the stored payload.
    async fn write(&self, contents: &str) -> SettingsResult<()>;
}

#[async_trait]
impl<T: ConfigStore + ?Sized> ConfigStore for std::sync::Arc<T> {
    async fn read(&self) -> SettingsResult<Option<String>> {
        (**self).read().await
    }

    async fn write(&self, contents: &str) -> SettingsResult<()> {
        (**self).write(contents).await
    }
}

// ============================================================================
// File-Backed Store
// ============================================================================

/// Production store: a single well-known file inside an application-private
/// config directory.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Store at the default location, `<config_dir>/palaver/settings.json`.
    pub fn new() -> Self {
        Self { path: default_settings_path() }
    }

    /// Store at an explicit path. Used by hosts that own their own scope
    /// resolution, and by tests.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn read(&self) -> SettingsResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SettingsError::io(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write(&self, contents: &str) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SettingsError::io(format!(
                    "failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }
        tokio::fs::write(&self.path, contents).await.map_err(|e| {
            SettingsError::io(format!(
                "failed to write {}: {e}",
                self.path.display()
            ))
        })?;
        log::debug!("Wrote settings to {}", self.path.display());
        Ok(())
    }
}

/// Resolve `<config_dir>/palaver/settings.json`, falling back to a relative
/// path when no config directory is available.
fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("palaver").join(SETTINGS_FILE))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// In-memory store for hosts without a writable disk scope and for tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    contents: RwLock<Option<String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an existing payload.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: RwLock::new(Some(contents.into())),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn read(&self) -> SettingsResult<Option<String>> {
        Ok(self
            .contents
            .read()
            .map_err(|e| SettingsError::io(e.to_string()))?
            .clone())
    }

    async fn write(&self, contents: &str) -> SettingsResult<()> {
        *self
            .contents
            .write()
            .map_err(|e| SettingsError::io(e.to_string()))? = Some(contents.to_string());
        Ok(())
    }
}
