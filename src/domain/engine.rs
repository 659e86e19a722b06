//! State transitions of the ledger.
//!
//! Every function here maps snapshots read by the caller to the snapshots the caller must
//! write. Nothing in this module reads or writes the store.

use super::codec;
use super::operation::{PublishRequest, TransferRequest};
use super::ports::HistoryIter;
use super::wallet::{Account, AccountId, HistoryEntry, MovementCode, MovementRecord, TxId};
use crate::error::{LedgerError, Result};

/// A snapshot to be persisted under `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub key: AccountId,
    pub account: Account,
}

/// The two writes of a transfer.
///
/// The debit must be committed before the credit, and the credit must not be attempted if the
/// debit fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub debit: Write,
    pub credit: Write,
}

/// Produces a zero-balance wallet for `key`.
///
/// Does not look at any existing value: opening a key that already holds a wallet resets it.
pub fn open(key: AccountId) -> Write {
    Write {
        key,
        account: Account::new(),
    }
}

pub fn publish(request: &PublishRequest, target: Option<Account>) -> Result<Write> {
    let target = target.ok_or_else(|| LedgerError::NotFound(request.target.to_string()))?;
    let account = target.credited(MovementRecord {
        counterparty: request.issuer.clone(),
        amount: request.amount,
        occurred_on: request.occurred_on.clone(),
        code: MovementCode::PUBLISH,
    })?;
    Ok(Write {
        key: request.target.clone(),
        account,
    })
}

/// Plans the debit of the source and the credit of the destination.
///
/// Argument errors are reported before wallet state is looked at: a self-transfer, base code 0
/// or a base code without a pair is `InvalidArgument` even when the source could not cover the
/// amount. Then a missing wallet is `NotFound`, and only then is the balance checked, so
/// `InsufficientBalance` holds exactly when a well-formed transfer exceeds the source balance.
pub fn transfer(
    request: &TransferRequest,
    source: Option<Account>,
    destination: Option<Account>,
) -> Result<TransferPlan> {
    if request.source == request.destination {
        return Err(LedgerError::InvalidArgument(format!(
            "Cannot transfer from {} to itself",
            request.source
        )));
    }
    if request.code == MovementCode::PUBLISH {
        return Err(LedgerError::InvalidArgument(
            "Movement code 0 is reserved for publish".to_string(),
        ));
    }
    let source_code = request.code.paired()?;

    let source = source.ok_or_else(|| LedgerError::NotFound(request.source.to_string()))?;
    let destination =
        destination.ok_or_else(|| LedgerError::NotFound(request.destination.to_string()))?;

    let debited = source.debited(
        &request.source,
        MovementRecord {
            counterparty: request.destination.clone(),
            amount: request.amount,
            occurred_on: request.occurred_on.clone(),
            code: source_code,
        },
    )?;
    let credited = destination.credited(MovementRecord {
        counterparty: request.source.clone(),
        amount: request.amount,
        occurred_on: request.occurred_on.clone(),
        code: request.code,
    })?;

    Ok(TransferPlan {
        debit: Write {
            key: request.source.clone(),
            account: debited,
        },
        credit: Write {
            key: request.destination.clone(),
            account: credited,
        },
    })
}

/// Renders the balance of `key` as a decimal string.
pub fn balance(key: &AccountId, snapshot: Option<Account>) -> Result<String> {
    snapshot
        .map(|account| account.balance.to_string())
        .ok_or_else(|| LedgerError::NotFound(key.to_string()))
}

/// History of a wallet as rebuilt from its stored versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuiltHistory {
    pub entries: Vec<HistoryEntry>,
    /// Versions whose value could not be decoded, replaced by a zero-balance snapshot.
    pub undecodable: Vec<TxId>,
}

/// Rebuilds the history of a wallet from its stored versions.
///
/// A deletion marker or an undecodable version yields a zero-balance snapshot for that entry;
/// an error from the iterator itself aborts the whole query.
pub fn history(versions: HistoryIter) -> Result<RebuiltHistory> {
    let mut entries = Vec::new();
    let mut undecodable = Vec::new();
    for version in versions {
        let version = version?;
        let account = match version.value.as_deref() {
            Some(bytes) => codec::decode_account(bytes).unwrap_or_else(|_| {
                undecodable.push(version.tx_id.clone());
                Account::new()
            }),
            None => Account::new(),
        };
        entries.push(HistoryEntry {
            tx_id: version.tx_id,
            account,
        });
    }
    Ok(RebuiltHistory {
        entries,
        undecodable,
    })
}
