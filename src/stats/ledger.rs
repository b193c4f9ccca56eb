use crate::error::ServiceResult;
use crate::storage::DocumentStore;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// History is bounded to this many entries; the oldest are dropped first.
pub const HISTORY_LIMIT: usize = 50;

/// One serve or deletion event. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub user: String,
    pub queue: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatsDocument {
    pub served_today: u64,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub served_today: u64,
    pub history: Vec<HistoryEntry>,
}

/// Owns the stats document: a served counter plus the bounded event history.
/// Same discipline as the queue registry: in-memory copy is authoritative,
/// every mutation is persisted before returning, callers provide the lock.
///
/// `served_today` is never reset; despite the name it counts over the
/// service's lifetime.
pub struct StatsLedger {
    store: DocumentStore<StatsDocument>,
    stats: StatsDocument,
}

impl StatsLedger {
    pub fn open(store: DocumentStore<StatsDocument>) -> ServiceResult<Self> {
        let stats = store.load()?;

        if !store.path().exists() {
            store.save(&stats)?;
        }

        Ok(StatsLedger { store, stats })
    }

    /// Counts a served user and appends a history entry stamped with the
    /// current wall-clock time.
    pub fn record_served(&mut self, queue_id: &str, user: &str) -> ServiceResult<()> {
        self.stats.served_today += 1;
        self.append(HistoryEntry {
            user: user.to_string(),
            queue: queue_id.to_string(),
            time: wall_clock(),
            event: None,
        })
    }

    pub fn record_deletion(&mut self, queue_id: &str) -> ServiceResult<()> {
        self.append(HistoryEntry {
            user: String::from("-"),
            queue: queue_id.to_string(),
            time: wall_clock(),
            event: Some(String::from("Queue deleted")),
        })
    }

    fn append(&mut self, entry: HistoryEntry) -> ServiceResult<()> {
        self.stats.history.push(entry);

        let len = self.stats.history.len();
        if len > HISTORY_LIMIT {
            self.stats.history.drain(..len - HISTORY_LIMIT);
        }

        self.store.save(&self.stats)
    }

    /// Pops the most recently appended entry, if any.
    pub fn clear_last(&mut self) -> ServiceResult<Option<HistoryEntry>> {
        match self.stats.history.pop() {
            Some(entry) => {
                self.store.save(&self.stats)?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// Empties the history and returns how many entries were dropped.
    /// `served_today` is left alone.
    pub fn clear_all(&mut self) -> ServiceResult<usize> {
        let cleared = self.stats.history.len();
        self.stats.history.clear();
        self.store.save(&self.stats)?;

        Ok(cleared)
    }

    /// Counter plus the most recent `limit` entries, oldest first.
    pub fn snapshot(&self, limit: usize) -> StatsSnapshot {
        let history = &self.stats.history;
        let skip = history.len().saturating_sub(limit);

        StatsSnapshot {
            served_today: self.stats.served_today,
            history: history[skip..].to_vec(),
        }
    }

    pub fn served_today(&self) -> u64 {
        self.stats.served_today
    }

    pub fn history_len(&self) -> usize {
        self.stats.history.len()
    }
}

fn wall_clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
