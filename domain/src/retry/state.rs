//! Attempt state: the orchestrator's working memory for one invocation.
//!
//! The working history is an ordered sequence keyed by message id plus an integer
//! boundary. Messages below the boundary are prior conversation context;
//! messages at or above it were produced inside the retry loop and are the
//! only ones the aggregator sees.

use crate::conversation::message::{Message, Role};

/// Working history, attempt counter and generation boundary.
#[derive(Debug, Clone, Default)]
pub struct AttemptState {
    messages: Vec<Message>,
    attempts: usize,
    boundary: usize,
    next_id: usize,
}

impl AttemptState {
    pub fn new(messages: Vec<Message>) -> Self {
        let mut state = Self::default();
        for message in messages {
            state.push(message);
        }
        state
    }

    /// Mark the current end of history as the start of generated output.
    pub fn record_boundary(&mut self) {
        self.boundary = self.messages.len();
    }

    /// Count one generation attempt.
    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Append `message`, or replace the message that already has its id.
    ///
    /// Messages without an id are given one.
    pub fn push(&mut self, mut message: Message) {
        if message.id.is_none() {
            message.id = Some(self.fresh_id());
        } else if let Some(index) = self.messages.iter().position(|m| m.id == message.id) {
            self.messages[index] = message;
            return;
        }
        self.messages.push(message);
    }

    /// Append `message` as a new entry, never replacing one.
    ///
    /// Generators may repeat ids across attempts; a taken id is swapped for
    /// a fresh one so the new output lands at the end of the history.
    pub fn append(&mut self, mut message: Message) {
        if message.id.is_some() && self.messages.iter().any(|m| m.id == message.id) {
            message.id = None;
        }
        self.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.push(message);
        }
    }

    /// Replace the whole history with the resolved answer.
    pub fn finalize(&mut self, message: Message) {
        self.messages.clear();
        self.boundary = 0;
        self.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages generated since the boundary.
    pub fn generated(&self) -> &[Message] {
        &self.messages[self.boundary.min(self.messages.len())..]
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn boundary(&self) -> usize {
        self.boundary
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether the latest round of validation reported an error.
    ///
    /// Scans backward from the end and stops at the first assistant
    /// message; an error-flagged message found before it means the last
    /// candidate was rejected.
    pub fn last_round_failed(&self) -> bool {
        self.messages
            .iter()
            .rev()
            .take_while(|m| m.role != Role::Assistant)
            .any(|m| m.is_error)
    }

    /// Output adapter: the terminal message.
    ///
    /// Every message carries an id once it is in the history, so an id-less
    /// input comes back with the id it was stamped with on entry.
    pub fn into_output(mut self) -> Option<Message> {
        self.messages.pop()
    }

    fn fresh_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("msg-{}", self.next_id);
            if !self.messages.iter().any(|m| m.id.as_deref() == Some(id.as_str())) {
                return id;
            }
        }
    }
}
