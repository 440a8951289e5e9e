//! Settings Module
//!
//! The settings persistence and validation lifecycle:
//!
//! - `model`: the typed settings schema and documented defaults
//! - `controller`: load/mutate/validate/save orchestration
//! - `store`: plaintext config store for the sanitized payload
//! - `error`: the shared error taxonomy
//!
//! Secret handling (API keys) lives in [`crate::core::credentials`]; the
//! controller splits every save between the two surfaces so keys never
//! reach the plaintext path.

pub mod controller;
pub mod error;
pub mod model;
pub mod store;

// Re-export commonly used types
pub use controller::SettingsController;
pub use error::{SettingsError, SettingsResult};
pub use model::{
    AnthropicSettings, ContentFilterLevel, EnabledCapabilities, Model, OpenAiSettings, Provider,
    SafetySettings, Settings,
};
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};
