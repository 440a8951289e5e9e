//! Secure Credential Storage
//!
//! Uses the system keychain (keyring) for secure storage of provider API
//! keys. Keys never travel through the plaintext config store; the settings
//! controller routes them here, one secret-store account per provider.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use keyring::Entry;

use crate::core::settings::error::{SettingsError, SettingsResult};
use crate::core::settings::model::Provider;

/// Keyring service name identifying this application.
const SERVICE_NAME: &str = "palaver";

// ============================================================================
// SecretStore Trait
// ============================================================================

/// Per-account credential vault.
///
/// `get` returns `Ok(None)` for a missing entry, and `delete` succeeds on a
/// missing entry — absence is an expected state, not a failure.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Retrieve the secret stored for `account`, if any.
    async fn get(&self, account: &str) -> SettingsResult<Option<String>>;

    /// Store a secret under `account`, replacing any existing value.
    async fn set(&self, account: &str, value: &str) -> SettingsResult<()>;

    /// Remove the secret stored for `account`. Missing entries are not an
    /// error.
    async fn delete(&self, account: &str) -> SettingsResult<()>;
}

#[async_trait]
impl<T: SecretStore + ?Sized> SecretStore for std::sync::Arc<T> {
    async fn get(&self, account: &str) -> SettingsResult<Option<String>> {
        (**self).get(account).await
    }

    async fn set(&self, account: &str, value: &str) -> SettingsResult<()> {
        (**self).set(account, value).await
    }

    async fn delete(&self, account: &str) -> SettingsResult<()> {
        (**self).delete(account).await
    }
}

// ============================================================================
// Keyring-Backed Store
// ============================================================================

/// Production store backed by the OS credential vault:
/// - macOS: Keychain
/// - Linux: Secret Service (GNOME Keyring, KWallet)
/// - Windows: Credential Manager
#[derive(Debug, Clone)]
pub struct KeyringSecretStore {
    service: String,
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringSecretStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Store under a custom service name (e.g. to isolate test entries).
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

#[async_trait]
impl SecretStore for KeyringSecretStore {
    async fn get(&self, account: &str) -> SettingsResult<Option<String>> {
        let service = self.service.clone();
        let account = account.to_string();
        // Keyring calls can block on the OS vault; keep them off the runtime.
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &account)
                .map_err(|e| SettingsError::io(format!("keyring entry error: {e}")))?;
            match entry.get_password() {
                Ok(value) => Ok(Some(value)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(SettingsError::io(format!("keyring error: {e}"))),
            }
        })
        .await
        .map_err(|e| SettingsError::io(format!("keyring task failed: {e}")))?
    }

    async fn set(&self, account: &str, value: &str) -> SettingsResult<()> {
        let service = self.service.clone();
        let account = account.to_string();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &account)
                .map_err(|e| SettingsError::io(format!("keyring entry error: {e}")))?;
            entry
                .set_password(&value)
                .map_err(|e| SettingsError::io(format!("keyring error: {e}")))?;
            log::info!("Stored secret for account: {account}");
            Ok(())
        })
        .await
        .map_err(|e| SettingsError::io(format!("keyring task failed: {e}")))?
    }

    async fn delete(&self, account: &str) -> SettingsResult<()> {
        let service = self.service.clone();
        let account = account.to_string();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &account)
                .map_err(|e| SettingsError::io(format!("keyring entry error: {e}")))?;
            match entry.delete_password() {
                Ok(()) => {
                    log::info!("Deleted secret for account: {account}");
                    Ok(())
                }
                // Already deleted
                Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(SettingsError::io(format!("keyring error: {e}"))),
            }
        })
        .await
        .map_err(|e| SettingsError::io(format!("keyring task failed: {e}")))?
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// In-memory vault for environments without an OS keyring, and for tests.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, account: &str) -> SettingsResult<Option<String>> {
        Ok(self
            .entries
            .read()
            .map_err(|e| SettingsError::io(e.to_string()))?
            .get(account)
            .cloned())
    }

    async fn set(&self, account: &str, value: &str) -> SettingsResult<()> {
        self.entries
            .write()
            .map_err(|e| SettingsError::io(e.to_string()))?
            .insert(account.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, account: &str) -> SettingsResult<()> {
        self.entries
            .write()
            .map_err(|e| SettingsError::io(e.to_string()))?
            .remove(account);
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Validate an API key's format for the given provider.
///
/// Prefix convention only — this says nothing about whether the key is live.
/// Empty keys are always invalid.
pub fn validate_key_format(provider: Provider, key: &str) -> bool {
    if key.is_empty() {
        return false;
    }
    match provider {
        Provider::OpenAi => key.starts_with("sk-"),
        Provider::Anthropic => key.starts_with("sk-ant-"),
    }
}

/// Mask an API key for display (show first 4 and last 4 chars).
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        return "********".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_format() {
        assert!(!validate_key_format(Provider::OpenAi, ""));
        assert!(!validate_key_format(Provider::OpenAi, "abc"));
        assert!(validate_key_format(Provider::OpenAi, "sk-XYZ"));

        assert!(!validate_key_format(Provider::Anthropic, ""));
        assert!(!validate_key_format(Provider::Anthropic, "sk-XYZ"));
        assert!(validate_key_format(Provider::Anthropic, "sk-ant-XYZ"));
    }

    #[test]
    fn test_openai_prefix_also_matches_anthropic_shaped_keys() {
        // "sk-ant-..." starts with "sk-", so it passes the OpenAI rule.
        // The rule is per-provider, not cross-provider exclusion.
        assert!(validate_key_format(Provider::OpenAi, "sk-ant-XYZ"));
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("sk-ant-REDACTED"), "sk-a...mnop");
        assert_eq!(mask_api_key("short"), "********");
        assert_eq!(mask_api_key(""), "********");
    }

    #[tokio::test]
    async fn test_memory_store_lifecycle() {
        let store = MemorySecretStore::new();
        assert!(store.get("openai").await.unwrap().is_none());

        store.set("openai", "sk-test").await.unwrap();
        assert_eq!(store.get("openai").await.unwrap().unwrap(), "sk-test");

        store.delete("openai").await.unwrap();
        assert!(store.get("openai").await.unwrap().is_none());

        // Deleting a missing entry is fine
        store.delete("openai").await.unwrap();
    }
}
