pub mod chat;
pub mod credentials;
pub mod logging;
pub mod settings;
