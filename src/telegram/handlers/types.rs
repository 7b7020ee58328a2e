//! Handler types and dependencies

use std::sync::Arc;

use teloxide::types::Message;

use crate::download::Orchestrator;
use crate::telegram::state::ConversationState;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub state: Arc<ConversationState>,
    pub orchestrator: Arc<Orchestrator>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(state: Arc<ConversationState>, orchestrator: Arc<Orchestrator>) -> Self {
        Self { state, orchestrator }
    }
}

/// Name used to greet the sender of a message
pub fn display_name(msg: &Message) -> String {
    msg.from
        .as_ref()
        .map(|u| u.first_name.clone())
        .or_else(|| msg.chat.first_name().map(str::to_string))
        .unwrap_or_else(|| "there".to_string())
}
