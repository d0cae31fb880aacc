//! Core chat types: message, sender, staged image attachment, and the
//! append-only conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

/// One turn in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique within one log; assigned by [`ConversationLog::push`], strictly increasing.
    pub id: u64,
    /// May be empty when the turn carried only an image.
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Opaque reference to the attached image; only set on user turns that carried one.
    pub image_ref: Option<String>,
}

/// An image the user has picked but not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// True when the declared media type is an image (`image/...`).
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Append-only, session-scoped message log.
///
/// No edit or delete API; insertion order is chronological order. Ids are
/// assigned on push and strictly increase, so they are unique within the log.
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message with the next id and the current time. Returns the assigned id.
    pub fn push(
        &mut self,
        sender: Sender,
        text: impl Into<String>,
        image_ref: Option<String>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            image_ref,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_increasing_unique_ids() {
        let mut log = ConversationLog::new();
        let a = log.push(Sender::User, "a", None);
        let b = log.push(Sender::Assistant, "b", None);
        let c = log.push(Sender::User, "c", None);
        assert!(a < b && b < c);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn messages_keep_insertion_order() {
        let mut log = ConversationLog::new();
        log.push(Sender::User, "first", None);
        log.push(Sender::Assistant, "second", None);
        let texts: Vec<&str> = log.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn last_returns_newest_entry() {
        let mut log = ConversationLog::new();
        log.push(Sender::User, "question", None);
        log.push(Sender::Assistant, "answer", None);
        assert_eq!(log.last().unwrap().text, "answer");
    }

    #[test]
    fn attachment_media_type_check() {
        let png = ImageAttachment {
            file_name: "scan.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let pdf = ImageAttachment {
            file_name: "report.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: vec![4, 5],
        };
        assert!(png.is_image());
        assert!(!pdf.is_image());
    }
}
