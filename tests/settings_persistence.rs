//! Integration tests for the settings persistence lifecycle against the
//! real file-backed config store. The secret store stays in memory — the
//! OS keyring is not available in CI.

use std::sync::Arc;

use palaver::{
    ConfigStore, FileConfigStore, MemorySecretStore, Model, Provider, SecretStore,
    SettingsController,
};

#[tokio::test]
async fn save_then_load_round_trips_through_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("palaver").join("settings.json");
    let secrets = Arc::new(MemorySecretStore::new());

    let mut first = SettingsController::new(
        FileConfigStore::with_path(&path),
        secrets.clone(),
    );
    first.select_model(Model::Claude3Sonnet);
    first.select_provider(Provider::Anthropic);
    first.set_api_key(Provider::OpenAi, "sk-integration");
    first.set_api_key(Provider::Anthropic, "sk-ant-integration");
    let expected = first.settings().clone();
    first.save().await.unwrap();

    let mut second =
        SettingsController::new(FileConfigStore::with_path(&path), secrets.clone());
    second.load().await.unwrap();

    assert_eq!(*second.settings(), expected);
    assert_eq!(second.settings().openai.api_key, "sk-integration");
    assert_eq!(second.settings().anthropic.api_key, "sk-ant-integration");
}

#[tokio::test]
async fn settings_file_on_disk_is_sanitized_and_pretty_printed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut controller = SettingsController::new(
        FileConfigStore::with_path(&path),
        MemorySecretStore::new(),
    );
    controller.set_api_key(Provider::OpenAi, "sk-should-not-hit-disk");
    controller.set_api_key(Provider::Anthropic, "sk-ant-should-not-hit-disk");
    controller.save().await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("should-not-hit-disk"));
    // Pretty-printed for human inspection
    assert!(raw.contains('\n'));

    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["openai"]["apiKey"], "");
    assert_eq!(value["anthropic"]["apiKey"], "");
    assert_eq!(value["selectedModel"], "gpt-4-turbo-preview");
    assert_eq!(value["defaultProvider"], "openai");
}

#[tokio::test]
async fn first_run_with_no_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");

    let mut controller = SettingsController::new(
        FileConfigStore::with_path(&path),
        MemorySecretStore::new(),
    );
    controller.load().await.unwrap();

    assert!(controller.has_loaded());
    assert_eq!(controller.settings().selected_model, Model::Gpt4TurboPreview);
    assert_eq!(controller.settings().openai.default_temperature, 0.7);
    // Nothing was written just by loading
    assert!(!path.exists());
}

#[tokio::test]
async fn clearing_a_key_removes_it_from_the_secret_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set("openai", "sk-stale").await.unwrap();

    let mut controller =
        SettingsController::new(FileConfigStore::with_path(&path), secrets.clone());
    controller.set_api_key(Provider::OpenAi, "");
    controller.save().await.unwrap();

    assert!(secrets.get("openai").await.unwrap().is_none());
}

#[tokio::test]
async fn corrupt_settings_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = FileConfigStore::with_path(&path);
    store.write("{ definitely not settings").await.unwrap();

    let mut controller = SettingsController::new(store, MemorySecretStore::new());
    controller.load().await.unwrap();

    assert!(controller.has_loaded());
    assert_eq!(controller.settings().selected_model, Model::Gpt4TurboPreview);
}
