//! Offline persistence contract.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::feed::FeedRow;
use crate::packaging::PackagingRow;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store itself failed (IO, database, connection).
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Local store the sheets write their rows to.
///
/// No transaction spans several calls: a save that fails midway leaves the
/// rows already inserted in place.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_feed(&self, row: &FeedRow) -> Result<(), StoreError>;
    async fn insert_packaging(&self, row: &PackagingRow) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn insert_feed(&self, row: &FeedRow) -> Result<(), StoreError> {
        (**self).insert_feed(row).await
    }

    async fn insert_packaging(&self, row: &PackagingRow) -> Result<(), StoreError> {
        (**self).insert_packaging(row).await
    }
}

/// A row that knows which store call persists it.
#[async_trait]
pub trait PersistRow: Send + Sync {
    /// Label of the item the row was built from.
    fn item(&self) -> &str;

    async fn persist(&self, store: &dyn RecordStore) -> Result<(), StoreError>;
}

#[async_trait]
impl PersistRow for FeedRow {
    fn item(&self) -> &str {
        &self.caseta
    }

    async fn persist(&self, store: &dyn RecordStore) -> Result<(), StoreError> {
        store.insert_feed(self).await
    }
}

#[async_trait]
impl PersistRow for PackagingRow {
    fn item(&self) -> &str {
        &self.tipo
    }

    async fn persist(&self, store: &dyn RecordStore) -> Result<(), StoreError> {
        store.insert_packaging(self).await
    }
}
