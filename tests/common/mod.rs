#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use wallet_ledger::domain::ports::{HistoryIter, LedgerStore};
use wallet_ledger::domain::wallet::{AccountId, TxId};
use wallet_ledger::error::{LedgerError, Result};
use wallet_ledger::infrastructure::in_memory::InMemoryLedgerStore;

pub fn id(s: &str) -> AccountId {
    AccountId::new(s).unwrap()
}

/// Writes a header-less invocation script, one row per line.
pub fn script(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

/// Wraps an in-memory store and rejects puts to selected keys once their budget runs out.
///
/// Point reads and history reads can also be switched to fail for every key.
#[derive(Clone, Default)]
pub struct FaultyStore {
    pub inner: InMemoryLedgerStore,
    budgets: Arc<Mutex<HashMap<AccountId, usize>>>,
    reads_fail: Arc<AtomicBool>,
    history_fails: Arc<AtomicBool>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `successes` more puts to `key` through, then fails every later one.
    pub fn fail_after(&self, key: &str, successes: usize) {
        self.budgets.lock().unwrap().insert(id(key), successes);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    pub fn fail_history(&self, fail: bool) {
        self.history_fails.store(fail, Ordering::SeqCst);
    }

    fn admit(&self, key: &AccountId) -> bool {
        let mut budgets = self.budgets.lock().unwrap();
        match budgets.get_mut(key) {
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
            None => true,
        }
    }
}

#[async_trait]
impl LedgerStore for FaultyStore {
    async fn get(&self, key: &AccountId) -> Result<Option<Vec<u8>>> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage(format!("read of {key} rejected")));
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &AccountId, value: Vec<u8>) -> Result<TxId> {
        if !self.admit(key) {
            return Err(LedgerError::Storage(format!("write to {key} rejected")));
        }
        self.inner.put(key, value).await
    }

    async fn history(&self, key: &AccountId) -> Result<HistoryIter> {
        if self.history_fails.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage(format!("history of {key} rejected")));
        }
        self.inner.history(key).await
    }
}
