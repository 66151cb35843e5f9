//! In-memory record store for tests/dev.

use std::sync::{PoisonError, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use granja_capture::{FeedRow, PackagingRow, RecordStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredRow {
    Feed(FeedRow),
    Packaging(PackagingRow),
}

/// Keeps every inserted row in call order; no deduplication.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    rows: RwLock<Vec<StoredRow>>,
    calls: AtomicUsize,
    fail_on: Option<usize>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `call`-th insert (1-based) fails.
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    /// Number of insert calls received, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<StoredRow> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn feed_rows(&self) -> Vec<FeedRow> {
        self.rows()
            .into_iter()
            .filter_map(|row| match row {
                StoredRow::Feed(row) => Some(row),
                StoredRow::Packaging(_) => None,
            })
            .collect()
    }

    pub fn packaging_rows(&self) -> Vec<PackagingRow> {
        self.rows()
            .into_iter()
            .filter_map(|row| match row {
                StoredRow::Packaging(row) => Some(row),
                StoredRow::Feed(_) => None,
            })
            .collect()
    }

    fn push(&self, row: StoredRow) -> Result<(), StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(call) {
            return Err(StoreError::backend(format!("insert #{call} failed")));
        }
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert_feed(&self, row: &FeedRow) -> Result<(), StoreError> {
        self.push(StoredRow::Feed(row.clone()))
    }

    async fn insert_packaging(&self, row: &PackagingRow) -> Result<(), StoreError> {
        self.push(StoredRow::Packaging(row.clone()))
    }
}
