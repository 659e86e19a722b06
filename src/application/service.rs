use crate::config::TransferPolicy;
use crate::domain::codec;
use crate::domain::engine::{self, Write};
use crate::domain::operation::{Operation, Outcome, PublishRequest, TransferRequest};
use crate::domain::ports::LedgerStoreBox;
use crate::domain::wallet::{Account, AccountId, HistoryEntry, TxId};
use crate::error::{LedgerError, Result};
use tracing::{error, info, instrument, warn};

/// Runs ledger operations against a store.
///
/// Reads the snapshots an operation needs, asks the engine for the next snapshots and commits
/// them in order. Reads are not re-validated before writing: two operations racing on the same
/// wallet can overwrite each other's result. Callers that need stronger guarantees must
/// serialize operations per wallet.
pub struct WalletService {
    store: LedgerStoreBox,
    policy: TransferPolicy,
}

impl WalletService {
    /// Creates a service with the [`TransferPolicy::BestEffort`] transfer policy.
    pub fn new(store: LedgerStoreBox) -> Self {
        Self::with_policy(store, TransferPolicy::default())
    }

    pub fn with_policy(store: LedgerStoreBox, policy: TransferPolicy) -> Self {
        Self { store, policy }
    }

    #[instrument(skip_all, fields(op = operation.name()))]
    pub async fn execute(&self, operation: Operation) -> Result<Outcome> {
        match operation {
            Operation::InitWallet(key) => self.init_wallet(key).await.map(Outcome::Account),
            Operation::Publish(request) => self.publish(request).await.map(Outcome::Account),
            Operation::Transfer(request) => self.transfer(request).await.map(Outcome::TxId),
            Operation::GetAccount(key) => self.get_account(&key).await.map(Outcome::Balance),
            Operation::GetTxList(key) => self.get_tx_list(&key).await.map(Outcome::History),
        }
    }

    /// Opens `key` with a zero balance.
    ///
    /// An existing wallet under `key` is reset to zero; check for it first if that is not
    /// wanted.
    pub async fn init_wallet(&self, key: AccountId) -> Result<Account> {
        let write = engine::open(key);
        let tx_id = self.persist(&write).await?;
        info!(account = %write.key, %tx_id, "wallet initialized");
        Ok(write.account)
    }

    pub async fn publish(&self, request: PublishRequest) -> Result<Account> {
        let target = self.snapshot(&request.target).await?;
        let write = engine::publish(&request, target)?;
        let tx_id = self.persist(&write).await?;
        info!(
            account = %write.key,
            issuer = %request.issuer,
            amount = %request.amount,
            %tx_id,
            "published"
        );
        Ok(write.account)
    }

    /// Moves `amount` from source to destination and returns the id of the source write.
    ///
    /// The debit and the credit are two separate commits. If the credit fails the error has
    /// `debited` set; under [`TransferPolicy::BestEffort`] the source stays debited.
    pub async fn transfer(&self, request: TransferRequest) -> Result<TxId> {
        let source = self.snapshot(&request.source).await?;
        let destination = self.snapshot(&request.destination).await?;
        let before = source.clone();

        let plan = engine::transfer(&request, source, destination)?;
        let debit = codec::encode_account(&plan.debit.account)?;
        let credit = codec::encode_account(&plan.credit.account)?;

        let tx_id = self
            .store
            .put(&plan.debit.key, debit)
            .await
            .map_err(|e| LedgerError::WriteFailed {
                account: plan.debit.key.to_string(),
                reason: e.to_string(),
                debited: false,
                compensated: false,
            })?;

        if let Err(e) = self.store.put(&plan.credit.key, credit).await {
            let compensated = match (self.policy, before) {
                (TransferPolicy::Compensate, Some(before)) => {
                    self.restore(&plan.debit.key, &before).await
                }
                _ => false,
            };
            if compensated {
                warn!(
                    source = %plan.debit.key,
                    destination = %plan.credit.key,
                    error = %e,
                    "credit failed, source debit compensated"
                );
            } else {
                error!(
                    source = %plan.debit.key,
                    destination = %plan.credit.key,
                    amount = %request.amount,
                    %tx_id,
                    error = %e,
                    "credit failed after source was debited"
                );
            }
            return Err(LedgerError::WriteFailed {
                account: plan.credit.key.to_string(),
                reason: e.to_string(),
                debited: true,
                compensated,
            });
        }

        info!(
            source = %plan.debit.key,
            destination = %plan.credit.key,
            amount = %request.amount,
            code = %request.code,
            %tx_id,
            "transferred"
        );
        Ok(tx_id)
    }

    pub async fn get_account(&self, key: &AccountId) -> Result<String> {
        let snapshot = self.snapshot(key).await?;
        engine::balance(key, snapshot)
    }

    pub async fn get_tx_list(&self, key: &AccountId) -> Result<Vec<HistoryEntry>> {
        let versions = self.store.history(key).await?;
        let rebuilt = engine::history(versions)?;
        for tx_id in &rebuilt.undecodable {
            warn!(account = %key, %tx_id, "undecodable history entry");
        }
        Ok(rebuilt.entries)
    }

    /// Reads and decodes the current wallet under `key`. An undecodable value reads as absent.
    async fn snapshot(&self, key: &AccountId) -> Result<Option<Account>> {
        let Some(bytes) = self.store.get(key).await? else {
            return Ok(None);
        };
        match codec::decode_account(&bytes) {
            Ok(account) => Ok(Some(account)),
            Err(e) => {
                warn!(account = %key, error = %e, "undecodable wallet");
                Ok(None)
            }
        }
    }

    async fn persist(&self, write: &Write) -> Result<TxId> {
        let bytes = codec::encode_account(&write.account)?;
        self.store
            .put(&write.key, bytes)
            .await
            .map_err(|e| LedgerError::WriteFailed {
                account: write.key.to_string(),
                reason: e.to_string(),
                debited: false,
                compensated: false,
            })
    }

    async fn restore(&self, key: &AccountId, before: &Account) -> bool {
        let restored = match codec::encode_account(before) {
            Ok(bytes) => self.store.put(key, bytes).await,
            Err(e) => Err(e),
        };
        match restored {
            Ok(tx_id) => {
                info!(account = %key, %tx_id, "restored pre-transfer snapshot");
                true
            }
            Err(e) => {
                error!(account = %key, error = %e, "compensating write failed");
                false
            }
        }
    }
}
