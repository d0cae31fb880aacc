//! # Completion service abstraction
//!
//! Defines the [`CompletionService`] trait the chat orchestrator depends on,
//! plus the Gemini-backed implementation. The trait is object-safe so callers
//! can hold `Arc<dyn CompletionService>` and tests can substitute doubles.

use anyhow::Result;
use async_trait::async_trait;
use omsehat_core::{ImageAttachment, Message, Sender};

mod config;
mod gemini;

pub use config::GeminiConfig;
pub use gemini::{GeminiCompletionService, NO_USER_MESSAGE_REPLY};

/// One outbound completion call: conversation history, optional staged image,
/// and the fixed system instruction.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub history: Vec<Message>,
    pub image: Option<ImageAttachment>,
    pub system_instruction: String,
}

/// Completion interface: one request in, one reply text out (possibly empty).
///
/// Every failure mode (network, upload, service error) surfaces as a single
/// error; the caller decides how to present it.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

/// Text of the latest user turn in the history, if any. The Gemini adapter
/// sends only this turn; older turns are context the service does not consult.
pub(crate) fn latest_user_text(history: &[Message]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|m| m.sender == Sender::User)
        .map(|m| m.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(sender: Sender, text: &str) -> Message {
        Message {
            id: 0,
            text: text.to_string(),
            sender,
            timestamp: Utc::now(),
            image_ref: None,
        }
    }

    #[test]
    fn latest_user_text_picks_most_recent_user_turn() {
        let history = vec![
            message(Sender::User, "first question"),
            message(Sender::Assistant, "first answer"),
            message(Sender::User, "second question"),
            message(Sender::Assistant, "second answer"),
        ];
        assert_eq!(latest_user_text(&history), Some("second question"));
    }

    #[test]
    fn latest_user_text_none_without_user_turns() {
        let history = vec![message(Sender::Assistant, "welcome")];
        assert_eq!(latest_user_text(&history), None);
        assert_eq!(latest_user_text(&[]), None);
    }
}
