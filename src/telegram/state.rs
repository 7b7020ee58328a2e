//! Per-chat conversation state: the link waiting for a resolution choice.

use dashmap::DashMap;
use teloxide::types::ChatId;

use crate::core::error::{AppError, AppResult};

/// A link a chat submitted and has not yet picked a resolution for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub chat_id: ChatId,
    pub url: String,
}

/// One pending-link slot per chat, last write wins.
///
/// Entries are never expired; a chat only ever holds its latest link.
#[derive(Debug, Default)]
pub struct ConversationState {
    pending: DashMap<ChatId, String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `url` for the chat, replacing any earlier one
    pub fn set_pending_url(&self, chat_id: ChatId, url: impl Into<String>) {
        let url = url.into();
        if let Some(previous) = self.pending.insert(chat_id, url) {
            log::debug!("Chat {} replaced pending link {}", chat_id, previous);
        }
    }

    pub fn get_pending_url(&self, chat_id: ChatId) -> Option<String> {
        self.pending.get(&chat_id).map(|url| url.value().clone())
    }

    /// Like [`get_pending_url`](Self::get_pending_url) but absence is an error
    pub fn require_pending_url(&self, chat_id: ChatId) -> AppResult<String> {
        self.get_pending_url(chat_id).ok_or(AppError::NoPendingRequest)
    }

    pub fn pending_request(&self, chat_id: ChatId) -> Option<PendingRequest> {
        self.get_pending_url(chat_id).map(|url| PendingRequest { chat_id, url })
    }

    /// Number of chats with a stored link
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
