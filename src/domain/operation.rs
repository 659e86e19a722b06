//! The closed set of ledger operations and their results.

use super::codec;
use super::wallet::{Account, AccountId, Amount, HistoryEntry, MovementCode, TxId};
use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub target: AccountId,
    /// Recorded as the counterparty; no wallet is debited.
    pub issuer: AccountId,
    pub amount: Amount,
    pub occurred_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: AccountId,
    pub destination: AccountId,
    pub amount: Amount,
    /// Base code, recorded on the destination. The source records its pair.
    pub code: MovementCode,
    pub occurred_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    InitWallet(AccountId),
    Publish(PublishRequest),
    Transfer(TransferRequest),
    GetAccount(AccountId),
    GetTxList(AccountId),
}

impl Operation {
    /// Builds an operation from a function name and its positional text arguments.
    ///
    /// ```
    /// use wallet_ledger::domain::operation::Operation;
    ///
    /// let args = ["1", "2", "1000", "3", "20181212"].map(String::from);
    /// let op = Operation::parse("transfer", &args).unwrap();
    /// assert_eq!(op.name(), "transfer");
    /// ```
    pub fn parse(function: &str, args: &[String]) -> Result<Self> {
        match function {
            "init_wallet" => {
                let [account] = expect_args(args)?;
                Ok(Self::InitWallet(account.parse()?))
            }
            "publish" => {
                let [target, issuer, amount, date] = expect_args(args)?;
                Ok(Self::Publish(PublishRequest {
                    target: target.parse()?,
                    issuer: issuer.parse()?,
                    amount: amount.parse()?,
                    occurred_on: date.clone(),
                }))
            }
            "transfer" => {
                let [source, destination, amount, code, date] = expect_args(args)?;
                Ok(Self::Transfer(TransferRequest {
                    source: source.parse()?,
                    destination: destination.parse()?,
                    amount: amount.parse()?,
                    code: code.parse()?,
                    occurred_on: date.clone(),
                }))
            }
            "get_account" => {
                let [account] = expect_args(args)?;
                Ok(Self::GetAccount(account.parse()?))
            }
            "get_txList" => {
                let [account] = expect_args(args)?;
                Ok(Self::GetTxList(account.parse()?))
            }
            other => Err(LedgerError::InvalidArgument(format!(
                "Received unknown invoke function name: {other}"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::InitWallet(_) => "init_wallet",
            Self::Publish(_) => "publish",
            Self::Transfer(_) => "transfer",
            Self::GetAccount(_) => "get_account",
            Self::GetTxList(_) => "get_txList",
        }
    }
}

fn expect_args<const N: usize>(args: &[String]) -> Result<&[String; N]> {
    args.try_into().map_err(|_| LedgerError::arity(N))
}

/// What an operation hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Account(Account),
    TxId(TxId),
    Balance(String),
    History(Vec<HistoryEntry>),
}

impl Outcome {
    /// Renders the outcome in its text form: JSON for records, the bare value otherwise.
    pub fn to_payload(&self) -> Result<String> {
        match self {
            Self::Account(account) => codec::account_to_string(account),
            Self::TxId(tx_id) => Ok(tx_id.to_string()),
            Self::Balance(balance) => Ok(balance.clone()),
            Self::History(entries) => codec::history_to_string(entries),
        }
    }
}
