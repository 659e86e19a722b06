use super::wallet::{AccountId, TxId};
use crate::error::Result;
use async_trait::async_trait;

/// One version of a key as retained by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub tx_id: TxId,
    /// `None` when the version is a deletion marker.
    pub value: Option<Vec<u8>>,
}

/// Versions of a key, oldest first. Consumed once.
pub type HistoryIter = Box<dyn Iterator<Item = Result<HistoryRecord>> + Send>;

/// A versioned key-value store holding encoded wallets.
///
/// Writes to a single key are linearizable. Nothing spans keys: two puts are two independent
/// commits.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get(&self, key: &AccountId) -> Result<Option<Vec<u8>>>;

    /// Commits `value` as the latest version of `key` and returns the id assigned to the write.
    async fn put(&self, key: &AccountId, value: Vec<u8>) -> Result<TxId>;

    async fn history(&self, key: &AccountId) -> Result<HistoryIter>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type LedgerStoreFactory = Box<dyn Fn() -> LedgerStoreBox + Send + Sync>;
