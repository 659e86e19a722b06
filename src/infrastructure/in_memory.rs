use crate::domain::ports::{HistoryIter, HistoryRecord, LedgerStore};
use crate::domain::wallet::{AccountId, TxId};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory versioned store.
///
/// Every key keeps the full list of its versions; the last one is the current value. Clones
/// share the same underlying map, so a test can keep a handle while a service owns another.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    versions: Arc<RwLock<HashMap<AccountId, Vec<HistoryRecord>>>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a deletion marker to `key`, making it absent for point reads.
    pub async fn tombstone(&self, key: &AccountId) -> TxId {
        self.append(key, None).await
    }

    async fn append(&self, key: &AccountId, value: Option<Vec<u8>>) -> TxId {
        let tx_id = TxId::from(Uuid::now_v7().simple().to_string());
        let mut versions = self.versions.write().await;
        versions.entry(key.clone()).or_default().push(HistoryRecord {
            tx_id: tx_id.clone(),
            value,
        });
        tx_id
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get(&self, key: &AccountId) -> Result<Option<Vec<u8>>> {
        let versions = self.versions.read().await;
        Ok(versions
            .get(key)
            .and_then(|history| history.last())
            .and_then(|latest| latest.value.clone()))
    }

    async fn put(&self, key: &AccountId, value: Vec<u8>) -> Result<TxId> {
        Ok(self.append(key, Some(value)).await)
    }

    async fn history(&self, key: &AccountId) -> Result<HistoryIter> {
        let versions = self.versions.read().await;
        let snapshot = versions.get(key).cloned().unwrap_or_default();
        Ok(Box::new(snapshot.into_iter().map(Ok::<_, LedgerError>)))
    }
}
