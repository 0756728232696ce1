//! Conversation transcript
//!
//! Ordered message history for one session, kept within a token budget.
//! When the budget is exceeded the oldest messages are dropped first,
//! always preserving a leading system message and the most recent
//! exchange.

use crate::llm::{Message, MessageRole};

/// Default token budget (conservative for mid-size context windows)
const DEFAULT_TOKEN_BUDGET: usize = 8000;

/// Rough estimate: 1 token per 4 characters of text
const CHARS_PER_TOKEN: usize = 4;

/// Fixed per-message overhead for role and framing
const MESSAGE_OVERHEAD_TOKENS: usize = 10;

/// Conversation history with budget-bounded trimming
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    token_budget: usize,
    token_count: usize,
}

impl Transcript {
    /// Create a transcript with the default token budget
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_TOKEN_BUDGET)
    }

    /// Create a transcript with a specific token budget
    pub fn with_budget(token_budget: usize) -> Self {
        Self {
            messages: Vec::new(),
            token_budget,
            token_count: 0,
        }
    }

    /// Append a message, trimming old history if the budget is exceeded
    pub fn push(&mut self, message: Message) {
        self.token_count += Self::estimate(&message);
        self.messages.push(message);

        while self.token_count > self.token_budget && self.trim_oldest() {}
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current estimated token count
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Forget the whole conversation
    pub fn clear(&mut self) {
        self.messages.clear();
        self.token_count = 0;
    }

    /// Drop the oldest droppable message. Returns false when nothing can
    /// be dropped: the leading system message is pinned, and the last
    /// two messages are always kept so the model sees the live exchange.
    fn trim_oldest(&mut self) -> bool {
        let pinned = usize::from(
            self.messages
                .first()
                .is_some_and(|m| m.role == MessageRole::System),
        );

        if self.messages.len() <= pinned + 2 {
            return false;
        }

        let removed = self.messages.remove(pinned);
        self.token_count = self.token_count.saturating_sub(Self::estimate(&removed));
        true
    }

    fn estimate(message: &Message) -> usize {
        let chars = message.content.len() + message.call_id.as_deref().map_or(0, str::len);
        chars.div_ceil(CHARS_PER_TOKEN) + MESSAGE_OVERHEAD_TOKENS
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
