//! Chat Types and Simulated Backend
//!
//! Conversation transcript state plus the chat-completion seam. The backend
//! is currently simulated — real provider integration is deliberately out
//! of scope, so [`SimulatedBackend`] produces a canned reply after a short
//! delay. Single-shot completions only: no streaming, no cancellation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in a conversation.
///
/// `Error` marks failure bubbles rendered in the transcript when a
/// completion fails; it is never sent to a backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Error,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Error => write!(f, "error"),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Error, content)
    }
}

// ============================================================================
// Backend Seam
// ============================================================================

/// Error type for chat completion.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Completion timed out")]
    Timeout,
}

/// Result type alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Chat-completion backend: given the conversation so far, produce one
/// reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, conversation: &[ChatMessage]) -> ChatResult<ChatMessage>;
}

/// Stand-in backend used until real provider integration lands. Replies
/// with a fixed message after a configurable delay.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: std::time::Duration,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self {
            delay: std::time::Duration::from_secs(1),
        }
    }
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with a custom reply delay (zero for tests).
    pub fn with_delay(delay: std::time::Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ChatBackend for SimulatedBackend {
    async fn complete(&self, _conversation: &[ChatMessage]) -> ChatResult<ChatMessage> {
        tokio::time::sleep(self.delay).await;
        Ok(ChatMessage::assistant(
            "This is a simulated response. Replace this with actual API integration.",
        ))
    }
}

// ============================================================================
// Chat Session
// ============================================================================

/// Ordered transcript of one chat session plus its in-flight flag.
///
/// The UI renders snapshots of `messages` and dispatches through
/// [`send`](Self::send); a failed completion becomes an `Error`-role
/// message so the turn is never silently dropped.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    is_waiting: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The transcript so far.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while a completion is in flight.
    pub fn is_waiting(&self) -> bool {
        self.is_waiting
    }

    /// Append a user message, ask the backend for a reply, and append the
    /// outcome. Returns the appended reply (or error bubble).
    pub async fn send(&mut self, content: impl Into<String>, backend: &dyn ChatBackend) -> &ChatMessage {
        self.messages.push(ChatMessage::user(content));
        self.is_waiting = true;

        let reply = match backend.complete(&self.messages).await {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Chat completion failed: {e}");
                ChatMessage::error("Sorry, there was an error processing your message.")
            }
        };

        let idx = self.messages.len();
        self.messages.push(reply);
        self.is_waiting = false;
        &self.messages[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        async fn complete(&self, _conversation: &[ChatMessage]) -> ChatResult<ChatMessage> {
            Err(ChatError::Backend("503 from upstream".to_string()))
        }
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let backend = SimulatedBackend::with_delay(std::time::Duration::ZERO);
        let mut session = ChatSession::new();

        let reply = session.send("hello", &backend).await;
        assert_eq!(reply.role, MessageRole::Assistant);

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(!session.is_waiting());
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_error_message() {
        let mut session = ChatSession::new();

        let reply = session.send("hello", &FailingBackend).await;
        assert_eq!(reply.role, MessageRole::Error);
        assert_eq!(session.messages().len(), 2);
        assert!(!session.is_waiting());
    }

    #[test]
    fn test_message_serde_roles_are_lowercase() {
        let msg = ChatMessage::user("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));

        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
