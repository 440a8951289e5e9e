//! Settings Schema
//!
//! Typed model for the multi-provider application settings: selected model,
//! per-provider credentials/parameters, and safety policy. Pure data — no
//! I/O happens here. Persistence and secret handling live in
//! [`super::store`] and [`crate::core::credentials`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Providers and Models
// ============================================================================

/// A supported model vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Stable identifier, also used as the secret-store account name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// All known providers, in display order.
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Anthropic];
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable chat model. The union of both providers' model sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "gpt-4-turbo-preview")]
    Gpt4TurboPreview,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus,
    #[serde(rename = "claude-3-sonnet-20240229")]
    Claude3Sonnet,
    #[serde(rename = "claude-3-haiku-20240307")]
    Claude3Haiku,
    #[serde(rename = "claude-3-5-sonnet-20241022")]
    Claude35Sonnet,
}

impl Model {
    /// The provider whose model set contains this model.
    ///
    /// This determines which provider's parameters apply when the model is
    /// selected, independent of [`Settings::default_provider`] (which only
    /// records the last explicitly chosen provider).
    pub fn provider(&self) -> Provider {
        match self {
            Model::Gpt4TurboPreview | Model::Gpt35Turbo => Provider::OpenAi,
            Model::Claude3Opus
            | Model::Claude3Sonnet
            | Model::Claude3Haiku
            | Model::Claude35Sonnet => Provider::Anthropic,
        }
    }

    /// Wire identifier as sent to the provider API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gpt4TurboPreview => "gpt-4-turbo-preview",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Claude3Opus => "claude-3-opus-20240229",
            Model::Claude3Sonnet => "claude-3-sonnet-20240229",
            Model::Claude3Haiku => "claude-3-haiku-20240307",
            Model::Claude35Sonnet => "claude-3-5-sonnet-20241022",
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Per-Provider Settings
// ============================================================================

/// OpenAI connection and generation parameters.
///
/// `api_key` is a secret: it is held in memory here but must never reach the
/// plaintext config file. [`Settings::sanitized`] strips it before
/// persistence; the live value goes to the secret store instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiSettings {
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    pub default_temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub use_moderation: bool,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            org_id: None,
            default_temperature: 0.7,
            max_tokens: 4096,
            system_prompt: String::new(),
            use_moderation: true,
        }
    }
}

/// Anthropic connection and generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnthropicSettings {
    pub api_key: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub stop_sequences: Vec<String>,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            max_tokens: 4096,
            system_prompt: String::new(),
            stop_sequences: Vec::new(),
        }
    }
}

// ============================================================================
// Safety Policy
// ============================================================================

/// Coarse content filter policy applied downstream of this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilterLevel {
    Strict,
    Moderate,
    Low,
}

/// Capability toggles gated by the safety policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnabledCapabilities {
    pub code_generation: bool,
    pub external_links: bool,
}

impl Default for EnabledCapabilities {
    fn default() -> Self {
        Self {
            code_generation: true,
            external_links: true,
        }
    }
}

/// Safety policy block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetySettings {
    pub content_filter_level: ContentFilterLevel,
    pub enabled_capabilities: EnabledCapabilities,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            content_filter_level: ContentFilterLevel::Moderate,
            enabled_capabilities: EnabledCapabilities::default(),
        }
    }
}

// ============================================================================
// Root Settings Aggregate
// ============================================================================

/// Root settings aggregate. One instance per application session, owned by
/// the [`super::controller::SettingsController`].
///
/// Numeric fields are stored as received — range clamping is a UI-boundary
/// concern, and out-of-range values must never make this type panic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub selected_model: Model,
    pub default_provider: Provider,
    pub openai: OpenAiSettings,
    pub anthropic: AnthropicSettings,
    pub safety: SafetySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_model: Model::Gpt4TurboPreview,
            default_provider: Provider::OpenAi,
            openai: OpenAiSettings::default(),
            anthropic: AnthropicSettings::default(),
            safety: SafetySettings::default(),
        }
    }
}

impl Settings {
    /// The in-memory API key for the given provider.
    pub fn api_key(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenAi => &self.openai.api_key,
            Provider::Anthropic => &self.anthropic.api_key,
        }
    }

    /// Set the in-memory API key for the given provider.
    pub fn set_api_key(&mut self, provider: Provider, key: impl Into<String>) {
        match provider {
            Provider::OpenAi => self.openai.api_key = key.into(),
            Provider::Anthropic => self.anthropic.api_key = key.into(),
        }
    }

    /// Copy of these settings with every API key forced empty.
    ///
    /// This is the only representation allowed to reach the plaintext config
    /// store. Invariant: the persisted payload never carries a non-empty key.
    pub fn sanitized(&self) -> Settings {
        let mut copy = self.clone();
        copy.openai.api_key = String::new();
        copy.anthropic.api_key = String::new();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_baseline() {
        let settings = Settings::default();
        assert_eq!(settings.selected_model, Model::Gpt4TurboPreview);
        assert_eq!(settings.default_provider, Provider::OpenAi);
        assert_eq!(settings.openai.default_temperature, 0.7);
        assert_eq!(settings.openai.max_tokens, 4096);
        assert!(settings.openai.use_moderation);
        assert!(settings.openai.api_key.is_empty());
        assert_eq!(settings.anthropic.max_tokens, 4096);
        assert!(settings.anthropic.stop_sequences.is_empty());
        assert_eq!(
            settings.safety.content_filter_level,
            ContentFilterLevel::Moderate
        );
        assert!(settings.safety.enabled_capabilities.code_generation);
        assert!(settings.safety.enabled_capabilities.external_links);
    }

    #[test]
    fn test_model_provider_membership() {
        assert_eq!(Model::Gpt4TurboPreview.provider(), Provider::OpenAi);
        assert_eq!(Model::Gpt35Turbo.provider(), Provider::OpenAi);
        assert_eq!(Model::Claude3Opus.provider(), Provider::Anthropic);
        assert_eq!(Model::Claude35Sonnet.provider(), Provider::Anthropic);
    }

    #[test]
    fn test_model_serde_identifiers() {
        let json = serde_json::to_string(&Model::Claude3Opus).unwrap();
        assert_eq!(json, "\"claude-3-opus-20240229\"");
        let model: Model = serde_json::from_str("\"gpt-4-turbo-preview\"").unwrap();
        assert_eq!(model, Model::Gpt4TurboPreview);
    }

    #[test]
    fn test_sanitized_strips_keys_only() {
        let mut settings = Settings::default();
        settings.openai.api_key = "sk-live".to_string();
        settings.anthropic.api_key = "sk-ant-live".to_string();
        settings.openai.system_prompt = "be brief".to_string();

        let clean = settings.sanitized();
        assert!(clean.openai.api_key.is_empty());
        assert!(clean.anthropic.api_key.is_empty());
        assert_eq!(clean.openai.system_prompt, "be brief");
        assert_eq!(clean.selected_model, settings.selected_model);
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let mut settings = Settings::default();
        settings.selected_model = Model::Claude3Haiku;
        settings.anthropic.stop_sequences = vec!["\n\nHuman:".to_string()];

        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert!(json.contains("selectedModel"));
        assert!(json.contains("claude-3-haiku-20240307"));

        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_out_of_range_values_are_stored_as_received() {
        let mut settings = Settings::default();
        settings.openai.default_temperature = 99.0;
        settings.openai.max_tokens = 1_000_000;
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.openai.default_temperature, 99.0);
        assert_eq!(back.openai.max_tokens, 1_000_000);
    }
}
