//! # omsehat-core
//!
//! Core types for the Om Sehat chat client: [`Message`], [`Sender`],
//! [`ImageAttachment`], the append-only [`ConversationLog`], and tracing
//! initialization. Transport-agnostic; used by completion-client and
//! chat-orchestrator.

pub mod logger;
pub mod types;

pub use logger::init_tracing;
pub use types::{ConversationLog, ImageAttachment, Message, Sender};
