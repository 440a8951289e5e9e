/// Palaver - Desktop AI Chat Client (Core Library)
///
/// Core library for the Palaver chat shell: multi-provider settings
/// persistence with keychain-backed credentials, chat transcript state,
/// and the (currently simulated) completion backend. The GUI host owns
/// all presentation.

pub mod core;

pub use crate::core::chat::{ChatBackend, ChatMessage, ChatSession, MessageRole, SimulatedBackend};
pub use crate::core::credentials::{
    mask_api_key, validate_key_format, KeyringSecretStore, MemorySecretStore, SecretStore,
};
pub use crate::core::settings::{
    AnthropicSettings, ConfigStore, ContentFilterLevel, FileConfigStore, MemoryConfigStore, Model,
    OpenAiSettings, Provider, SafetySettings, Settings, SettingsController, SettingsError,
    SettingsResult,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
