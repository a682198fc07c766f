// Tutor conversation with a persisted history

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::tutor::{ChatMessage, ChatRole, Tutor};
use crate::error::{MasteryError, Result};
use crate::storage::{self, KeyValueStore, CHAT_HISTORY_KEY};

pub struct TutorChat {
    store: Arc<dyn KeyValueStore>,
    tutor: Box<dyn Tutor>,
    history: Vec<ChatMessage>,
}

impl TutorChat {
    pub fn load(store: Arc<dyn KeyValueStore>, tutor: Box<dyn Tutor>) -> Self {
        let history: Vec<ChatMessage> = storage::load_json(store.as_ref(), CHAT_HISTORY_KEY);
        debug!("Loaded {} chat messages", history.len());
        Self {
            store,
            tutor,
            history,
        }
    }

    fn persist(&self) {
        storage::save_json(self.store.as_ref(), CHAT_HISTORY_KEY, &self.history);
    }

    /// Oldest first
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Record the question and the tutor's reply, then save both
    pub fn ask(&mut self, message: &str, now: DateTime<Utc>) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(MasteryError::missing("message"));
        }

        let reply = self.tutor.reply(message);
        self.history.push(ChatMessage::new(ChatRole::User, message, now));
        self.history.push(ChatMessage::new(ChatRole::Assistant, &reply, now));
        self.persist();
        Ok(reply)
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.persist();
        info!("Chat history cleared");
    }
}
