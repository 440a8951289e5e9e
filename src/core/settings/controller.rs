//! Settings Controller
//!
//! Owns the process-wide [`Settings`] instance and orchestrates the two
//! asynchronous persistence surfaces: the plaintext config store for the
//! sanitized payload and the secret store for API keys. The UI layer holds
//! read snapshots and dispatches mutations through the typed update
//! methods — it never touches fields directly.

use std::future::Future;
use std::time::Duration;

use super::error::{SettingsError, SettingsResult};
use super::model::{AnthropicSettings, Model, OpenAiSettings, Provider, SafetySettings, Settings};
use super::store::{ConfigStore, FileConfigStore};
use crate::core::credentials::{validate_key_format, KeyringSecretStore, SecretStore};

/// Default deadline applied to each individual store I/O call.
const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Controller
// ============================================================================

/// In-memory settings state plus load/save orchestration.
///
/// One instance per application session, created from defaults at startup
/// and injected into the UI layer. `load` and `save` are guarded against
/// reentrant invocation: a call that arrives while another load/save is
/// in flight is a logged no-op, so overlapping cycles cannot race each
/// other into lost updates.
pub struct SettingsController<C: ConfigStore, S: SecretStore> {
    settings: Settings,
    is_loading: bool,
    has_loaded: bool,
    config: C,
    secrets: S,
    io_timeout: Duration,
}

impl SettingsController<FileConfigStore, KeyringSecretStore> {
    /// Controller wired to the production stores (config file + OS keyring).
    pub fn with_default_stores() -> Self {
        Self::new(FileConfigStore::new(), KeyringSecretStore::new())
    }
}

impl<C: ConfigStore, S: SecretStore> SettingsController<C, S> {
    /// Fresh controller holding default settings. Nothing is read from the
    /// stores until [`load`](Self::load) is called.
    pub fn new(config: C, secrets: S) -> Self {
        Self {
            settings: Settings::default(),
            is_loading: false,
            has_loaded: false,
            config,
            secrets,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    /// Override the per-call I/O deadline.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    // ========================================================================
    // Snapshot Access
    // ========================================================================

    /// Read snapshot of the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// True exactly while a load or save is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// True once the first load has completed (successfully or not).
    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    // ========================================================================
    // Typed Updates
    // ========================================================================

    /// Set the selected model. Does not change the default provider.
    pub fn select_model(&mut self, model: Model) {
        self.settings.selected_model = model;
    }

    /// Set the default provider. Does not change the selected model.
    pub fn select_provider(&mut self, provider: Provider) {
        self.settings.default_provider = provider;
    }

    /// Replace the OpenAI parameter block.
    pub fn update_openai(&mut self, openai: OpenAiSettings) {
        self.settings.openai = openai;
    }

    /// Replace the Anthropic parameter block.
    pub fn update_anthropic(&mut self, anthropic: AnthropicSettings) {
        self.settings.anthropic = anthropic;
    }

    /// Replace the safety policy block.
    pub fn update_safety(&mut self, safety: SafetySettings) {
        self.settings.safety = safety;
    }

    /// Set one provider's API key. An empty string means "clear on save".
    pub fn set_api_key(&mut self, provider: Provider, key: impl Into<String>) {
        self.settings.set_api_key(provider, key);
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Reconcile in-memory state with the persisted stores.
    ///
    /// Idempotent after the first completion: once `has_loaded` is set,
    /// subsequent calls return immediately without any store I/O. Each read
    /// (config blob, one secret per provider) is independently
    /// fault-isolated — absence and I/O failure leave the current value in
    /// place and never block the other reads. The loading flags are
    /// restored unconditionally so the UI cannot get stuck on a partial
    /// failure.
    pub async fn load(&mut self) -> SettingsResult<()> {
        if self.is_loading {
            log::warn!("load() called while a load/save is in flight — ignoring");
            return Ok(());
        }
        if self.has_loaded {
            log::debug!("Settings already loaded — skipping store reads");
            return Ok(());
        }
        self.is_loading = true;

        let blob = bounded(self.io_timeout, "config read", self.config.read()).await;
        match blob {
            Ok(Some(contents)) => self.apply_config_blob(&contents),
            // First run: no blob yet, defaults stay in effect
            Ok(None) => log::debug!("No settings file found — using defaults"),
            Err(e) => log::warn!("Failed to read settings file: {e} — using defaults"),
        }

        for provider in Provider::ALL {
            let secret = bounded(
                self.io_timeout,
                "secret read",
                self.secrets.get(provider.as_str()),
            )
            .await;
            match secret {
                Ok(Some(key)) => self.settings.set_api_key(provider, key),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Failed to read {provider} key from secret store: {e}");
                }
            }
        }

        self.is_loading = false;
        self.has_loaded = true;
        Ok(())
    }

    /// Merge a persisted config payload into the in-memory state. The blob
    /// is sanitized by construction, so any keys already typed into memory
    /// survive the merge.
    fn apply_config_blob(&mut self, contents: &str) {
        match serde_json::from_str::<Settings>(contents) {
            Ok(loaded) => {
                let openai_key = std::mem::take(&mut self.settings.openai.api_key);
                let anthropic_key = std::mem::take(&mut self.settings.anthropic.api_key);
                self.settings = loaded;
                if !openai_key.is_empty() {
                    self.settings.openai.api_key = openai_key;
                }
                if !anthropic_key.is_empty() {
                    self.settings.anthropic.api_key = anthropic_key;
                }
                log::info!("Loaded settings from config store");
            }
            Err(e) => {
                log::warn!("Failed to parse settings file: {e} — using defaults");
            }
        }
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Flush the current state to the stores.
    ///
    /// The sanitized payload (API keys forced empty) goes to the config
    /// store; each provider's live key goes to the secret store, or is
    /// deleted from it when empty. Sub-operation failures are caught
    /// individually so the remaining writes still run; best-effort deletes
    /// are swallowed. The caller sees `Ok` only when every attempted write
    /// succeeded — a failed save must be able to keep the settings UI open.
    pub async fn save(&mut self) -> SettingsResult<()> {
        if self.is_loading {
            log::warn!("save() called while a load/save is in flight — ignoring");
            return Ok(());
        }
        self.is_loading = true;

        let mut attempted = 0usize;
        let mut failures: Vec<SettingsError> = Vec::new();

        attempted += 1;
        match serde_json::to_string_pretty(&self.settings.sanitized()) {
            Ok(payload) => {
                if let Err(e) =
                    bounded(self.io_timeout, "config write", self.config.write(&payload)).await
                {
                    log::error!("Failed to write settings file: {e}");
                    failures.push(e);
                }
            }
            Err(e) => failures.push(e.into()),
        }

        for provider in Provider::ALL {
            let key = self.settings.api_key(provider).to_string();
            if !key.is_empty() {
                attempted += 1;
                if let Err(e) = bounded(
                    self.io_timeout,
                    "secret write",
                    self.secrets.set(provider.as_str(), &key),
                )
                .await
                {
                    log::error!("Failed to store {provider} key: {e}");
                    failures.push(e);
                }
            } else {
                // Empty key means "remove any stored secret". Best effort:
                // a failure here must not abort the other provider's write.
                if let Err(e) = bounded(
                    self.io_timeout,
                    "secret delete",
                    self.secrets.delete(provider.as_str()),
                )
                .await
                {
                    if !e.is_not_found() {
                        log::warn!("Best-effort delete of {provider} key failed: {e}");
                    }
                }
            }
        }

        self.is_loading = false;

        if failures.is_empty() {
            log::info!("Settings saved");
            Ok(())
        } else if failures.len() < attempted {
            Err(SettingsError::PartialSave(
                failures.iter().map(|e| e.to_string()).collect(),
            ))
        } else if failures.len() == 1 {
            Err(failures.remove(0))
        } else {
            Err(SettingsError::io(
                failures
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            ))
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check the stored key for `provider` against its format convention.
    ///
    /// Local format check only — no network round-trip is performed. A real
    /// liveness probe against the provider would slot in here; until then
    /// this must not claim more than the prefix rule verifies.
    pub async fn validate_api_key(&self, provider: Provider) -> bool {
        validate_key_format(provider, self.settings.api_key(provider))
    }
}

/// Apply the controller deadline to a single store I/O call.
async fn bounded<T>(
    timeout: Duration,
    what: &str,
    fut: impl Future<Output = SettingsResult<T>>,
) -> SettingsResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(SettingsError::timeout(format!(
            "{what} exceeded {}ms",
            timeout.as_millis()
        ))),
    }
}
