use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::PgPool;

use crate::store::SettingsStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SettingsStore,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    settings_reads_total: AtomicU64,
    settings_writes_total: AtomicU64,
    rejected_init_data_total: AtomicU64,
    store_failures_total: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservabilitySnapshot {
    pub settings_reads_total: u64,
    pub settings_writes_total: u64,
    pub rejected_init_data_total: u64,
    pub store_failures_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            settings_reads_total: self.settings_reads_total.load(Ordering::Relaxed),
            settings_writes_total: self.settings_writes_total.load(Ordering::Relaxed),
            rejected_init_data_total: self.rejected_init_data_total.load(Ordering::Relaxed),
            store_failures_total: self.store_failures_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_settings_read(&self) {
        self.settings_reads_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_settings_write(&self) {
        self.settings_writes_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_init_data(&self) {
        self.rejected_init_data_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_failure(&self) {
        self.store_failures_total.fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    /// Postgres-backed when a pool is given, in-memory otherwise.
    pub fn new(db: Option<PgPool>) -> Self {
        let store = match db {
            Some(pool) => SettingsStore::Postgres(pool),
            None => SettingsStore::in_memory(),
        };
        Self {
            store,
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }
}
