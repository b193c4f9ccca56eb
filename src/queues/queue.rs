use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The whole durable queue document: queue id -> queue state.
pub type QueueMap = HashMap<String, Queue>;

/// A single FIFO waiting queue. `users` is ordered by arrival; the front
/// element is always the next one to be served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Queue {
    pub created: DateTime<Utc>,
    pub users: Vec<String>,
}

impl Queue {
    pub fn new(created: DateTime<Utc>) -> Self {
        Queue {
            created,
            users: Vec::new(),
        }
    }

    /// Appends an arrival and returns its 1-based position.
    pub fn push_user(&mut self, name: String) -> usize {
        self.users.push(name);
        self.users.len()
    }

    /// Removes and returns the earliest arrival still waiting.
    pub fn pop_front(&mut self) -> Option<String> {
        if self.users.is_empty() {
            return None;
        }
        Some(self.users.remove(0))
    }

    pub fn waiting(&self) -> usize {
        self.users.len()
    }
}

/// Row of the admin queue listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSummary {
    pub id: String,
    pub waiting: usize,
    pub created: String,
}

impl QueueSummary {
    pub fn of(id: &str, queue: &Queue) -> Self {
        QueueSummary {
            id: id.to_string(),
            waiting: queue.waiting(),
            created: queue
                .created
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string(),
        }
    }
}
