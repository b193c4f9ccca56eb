use crate::admin::AdminAggregator;
use crate::config::Config;
use crate::error::ServiceResult;
use crate::qr::{PngQrRenderer, QrCache};
use crate::queues::registry::QueueRegistry;
use crate::stats::ledger::StatsLedger;
use crate::storage::DocumentStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the HTTP handlers share. Each document sits behind its own
/// lock; the two are never held at the same time.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Mutex<QueueRegistry>>,
    pub ledger: Arc<Mutex<StatsLedger>>,
    pub aggregator: AdminAggregator,
    pub qr_cache: Arc<QrCache>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn build(config: Config) -> ServiceResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let registry = QueueRegistry::open(DocumentStore::open(config.data_dir.join("queues.json")))?;
        let ledger = StatsLedger::open(DocumentStore::open(config.data_dir.join("stats.json")))?;
        let qr_cache = QrCache::new(config.data_dir.join("qr_cache"), Box::new(PngQrRenderer))?;

        let registry = Arc::new(Mutex::new(registry));
        let ledger = Arc::new(Mutex::new(ledger));

        Ok(AppState {
            aggregator: AdminAggregator::new(registry.clone(), ledger.clone()),
            registry,
            ledger,
            qr_cache: Arc::new(qr_cache),
            config: Arc::new(config),
        })
    }
}
