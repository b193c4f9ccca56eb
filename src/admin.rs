use crate::queues::queue::QueueSummary;
use crate::queues::registry::QueueRegistry;
use crate::stats::ledger::{HistoryEntry, StatsLedger, HISTORY_LIMIT};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

const DASHBOARD_HISTORY: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub active_queues: usize,
    pub total_waiting: usize,
    pub served_today: u64,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueuesOverview {
    pub queues: Vec<QueueSummary>,
    pub history: Vec<HistoryEntry>,
}

/// Read-only composition of registry and ledger into the admin dashboard
/// views. Holds no state of its own; the two snapshots are taken one after
/// the other, never under both locks at once.
#[derive(Clone)]
pub struct AdminAggregator {
    registry: Arc<Mutex<QueueRegistry>>,
    ledger: Arc<Mutex<StatsLedger>>,
}

impl AdminAggregator {
    pub fn new(registry: Arc<Mutex<QueueRegistry>>, ledger: Arc<Mutex<StatsLedger>>) -> Self {
        AdminAggregator { registry, ledger }
    }

    pub async fn dashboard_stats(&self) -> DashboardStats {
        let (active_queues, total_waiting) = {
            let registry = self.registry.lock().await;
            (registry.active_count(), registry.total_waiting())
        };

        let snapshot = self.ledger.lock().await.snapshot(DASHBOARD_HISTORY);

        DashboardStats {
            active_queues,
            total_waiting,
            served_today: snapshot.served_today,
            history: snapshot.history,
        }
    }

    pub async fn queues_overview(&self) -> QueuesOverview {
        let queues = self.registry.lock().await.list_queues();
        let snapshot = self.ledger.lock().await.snapshot(HISTORY_LIMIT);

        QueuesOverview {
            queues,
            history: snapshot.history,
        }
    }
}
