//! # chat-orchestrator
//!
//! Owns the conversation log, the pending flag, and the staged image. One
//! outbound completion request per submit; exactly one assistant entry is
//! appended per exchange, either the service's reply or a synthesized failure
//! notice. Per request the state machine is
//! `idle → sending → (fulfilled | failed) → idle`; there is no cancellation
//! path and no automatic retry.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use completion_client::{CompletionRequest, CompletionService};
use omsehat_core::{ConversationLog, ImageAttachment, Message, Sender};
use tracing::{error, info, instrument, warn};

/// Fixed persona instruction sent with every completion request.
pub const SYSTEM_INSTRUCTION: &str = "You are Om SAPA, an AI health assistant. \
If an image is provided, analyze it for medical context and respond in Bahasa Indonesia. \
If no image, answer as a health assistant.";

/// Assistant entry used when the service resolves with an empty reply.
pub const EMPTY_REPLY_FALLBACK: &str = "No response from Gemini.";

/// Assistant entry used when the completion call fails.
pub const SEND_ERROR_REPLY: &str = "Terjadi kesalahan saat mengirim pesan. Silakan coba lagi.";

/// Opening assistant message of a fresh session.
pub const WELCOME_MESSAGE: &str = "Halo! Selamat datang di Om Sapa. Silakan mulai percakapan.";

/// Outcome of a [`ChatOrchestrator::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// User turn and assistant turn were appended (reply or failure notice).
    Exchanged,
    /// Empty draft with no staged image; nothing appended, nothing sent.
    Ignored,
    /// Another request is in flight; nothing appended.
    Busy,
}

#[derive(Default)]
struct ChatState {
    log: ConversationLog,
    pending: bool,
    staged_image: Option<ImageAttachment>,
}

/// One orchestrator per chat session. The log, pending flag, and staged image
/// sit behind one mutex; the lock is never held across an await point, so the
/// pending flag is what serializes submissions, not the lock.
pub struct ChatOrchestrator {
    state: Mutex<ChatState>,
    service: Arc<dyn CompletionService>,
    system_instruction: String,
    typing_delay: Duration,
}

impl ChatOrchestrator {
    /// Creates an orchestrator with an empty log and the default 1 s typing
    /// delay before a successful reply is appended.
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            state: Mutex::new(ChatState::default()),
            service,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            typing_delay: Duration::from_secs(1),
        }
    }

    /// Seeds the log with [`WELCOME_MESSAGE`] as the opening assistant turn.
    pub fn with_welcome(self) -> Self {
        self.lock().log.push(Sender::Assistant, WELCOME_MESSAGE, None);
        self
    }

    /// Overrides the cosmetic delay before a successful reply is appended.
    /// Tests pass [`Duration::ZERO`] for determinism.
    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    /// Overrides the persona instruction sent with every request.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the log, in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().log.messages().to_vec()
    }

    /// True while a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    /// Currently staged (unsent) image, if any.
    pub fn staged_image(&self) -> Option<ImageAttachment> {
        self.lock().staged_image.clone()
    }

    /// Stages an image for the next submit, replacing any previous one. Only
    /// media types beginning with `image/` are accepted; anything else leaves
    /// the staged image unchanged and returns false.
    pub fn attach_image(&self, attachment: ImageAttachment) -> bool {
        if !attachment.is_image() {
            warn!(
                mime_type = %attachment.mime_type,
                file = %attachment.file_name,
                "rejected non-image attachment"
            );
            return false;
        }
        self.lock().staged_image = Some(attachment);
        true
    }

    /// Clears the staged image.
    pub fn remove_attached_image(&self) {
        self.lock().staged_image = None;
    }

    /// Submits one user turn.
    ///
    /// The user message is appended optimistically before the network call,
    /// the staged image is consumed (cleared even when the call fails), and
    /// the pending flag gates re-entry until the assistant turn lands. A
    /// failed completion is logged and swallowed: it becomes the fixed
    /// [`SEND_ERROR_REPLY`] assistant entry, never an error to the caller.
    #[instrument(skip(self, draft))]
    pub async fn submit(&self, draft: &str) -> SubmitOutcome {
        let text = draft.trim();

        let (history, image) = {
            let mut state = self.lock();
            if text.is_empty() && state.staged_image.is_none() {
                return SubmitOutcome::Ignored;
            }
            if state.pending {
                info!("submit rejected: request already in flight");
                return SubmitOutcome::Busy;
            }
            state.pending = true;
            let image = state.staged_image.take();
            let image_ref = image.as_ref().map(|a| a.file_name.clone());
            state.log.push(Sender::User, text, image_ref);
            (state.log.messages().to_vec(), image)
        };

        let request = CompletionRequest {
            history,
            image,
            system_instruction: self.system_instruction.clone(),
        };

        let reply = match self.service.complete(request).await {
            Ok(text) => {
                if !self.typing_delay.is_zero() {
                    tokio::time::sleep(self.typing_delay).await;
                }
                if text.is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    text
                }
            }
            Err(err) => {
                error!(error = %err, "completion request failed");
                SEND_ERROR_REPLY.to_string()
            }
        };

        let mut state = self.lock();
        state.log.push(Sender::Assistant, reply, None);
        state.pending = false;
        SubmitOutcome::Exchanged
    }
}
