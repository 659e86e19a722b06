use crate::domain::ports::{HistoryIter, HistoryRecord, LedgerStore};
use crate::domain::wallet::{AccountId, TxId};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Column Family holding the current value of every key.
pub const CF_STATE: &str = "state";
/// Column Family holding every version of every key, ordered per key by commit sequence.
pub const CF_HISTORY: &str = "history";
/// Column Family holding store bookkeeping (the commit sequence).
pub const CF_META: &str = "meta";

const SEQ_KEY: &[u8] = b"seq";

#[derive(Serialize, Deserialize)]
struct StoredVersion {
    #[serde(rename = "txId")]
    tx_id: String,
    value: Option<Vec<u8>>,
}

/// A persistent versioned store backed by RocksDB.
///
/// A put writes the current value, the history row and the advanced commit sequence in a
/// single `WriteBatch`, so the latest value and its history never disagree. Commits are
/// serialized through the sequence lock.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    seq: Arc<Mutex<u64>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "state", "history" and "meta" column families exist and resumes the
    /// commit sequence where the previous process left it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_STATE, CF_HISTORY, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));
        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        let seq = {
            let meta = db
                .cf_handle(CF_META)
                .ok_or_else(|| missing_cf(CF_META))?;
            match db.get_cf(meta, SEQ_KEY)? {
                Some(bytes) => {
                    let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                        LedgerError::Storage("Corrupt commit sequence".to_string())
                    })?;
                    u64::from_be_bytes(raw)
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            seq: Arc::new(Mutex::new(seq)),
        })
    }

    /// Appends a deletion marker to `key`, making it absent for point reads.
    pub async fn tombstone(&self, key: &AccountId) -> Result<TxId> {
        self.commit(key, None).await
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| missing_cf(name))
    }

    async fn commit(&self, key: &AccountId, value: Option<Vec<u8>>) -> Result<TxId> {
        let mut seq = self.seq.lock().await;
        let next = *seq + 1;
        let tx_id = Uuid::now_v7().simple().to_string();

        let state = self.cf(CF_STATE)?;
        let history = self.cf(CF_HISTORY)?;
        let meta = self.cf(CF_META)?;

        let mut batch = WriteBatch::default();
        match &value {
            Some(bytes) => batch.put_cf(state, key.as_str(), bytes),
            None => batch.delete_cf(state, key.as_str()),
        }
        let version = serde_json::to_vec(&StoredVersion {
            tx_id: tx_id.clone(),
            value,
        })?;
        batch.put_cf(history, history_key(key, next), version);
        batch.put_cf(meta, SEQ_KEY, next.to_be_bytes());
        self.db.write(batch)?;

        *seq = next;
        Ok(TxId::from(tx_id))
    }
}

fn missing_cf(name: &str) -> LedgerError {
    LedgerError::Storage(format!("Column family '{name}' not found"))
}

/// Length-prefixed key so that no key's history prefix is a prefix of another key's.
fn history_prefix(key: &AccountId) -> Vec<u8> {
    let bytes = key.as_str().as_bytes();
    let mut prefix = Vec::with_capacity(4 + bytes.len() + 8);
    prefix.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    prefix.extend_from_slice(bytes);
    prefix
}

fn history_key(key: &AccountId, seq: u64) -> Vec<u8> {
    let mut full = history_prefix(key);
    full.extend_from_slice(&seq.to_be_bytes());
    full
}

#[async_trait]
impl LedgerStore for RocksDBStore {
    async fn get(&self, key: &AccountId) -> Result<Option<Vec<u8>>> {
        let state = self.cf(CF_STATE)?;
        Ok(self.db.get_cf(state, key.as_str())?)
    }

    async fn put(&self, key: &AccountId, value: Vec<u8>) -> Result<TxId> {
        self.commit(key, Some(value)).await
    }

    async fn history(&self, key: &AccountId) -> Result<HistoryIter> {
        let history = self.cf(CF_HISTORY)?;
        let prefix = history_prefix(key);

        let mut versions = Vec::new();
        let iter = self
            .db
            .iterator_cf(history, IteratorMode::From(&prefix, Direction::Forward));
        for item in iter {
            let (row_key, row) = item?;
            if !row_key.starts_with(&prefix) {
                break;
            }
            versions.push(
                serde_json::from_slice::<StoredVersion>(&row)
                    .map(|stored| HistoryRecord {
                        tx_id: TxId::from(stored.tx_id),
                        value: stored.value,
                    })
                    .map_err(LedgerError::from),
            );
        }

        Ok(Box::new(versions.into_iter()))
    }
}
