use crate::error::{LedgerError, Result};
use std::fmt;
use std::str::FromStr;

/// Key of a wallet in the ledger store.
///
/// Never empty. Otherwise opaque: no further structure is imposed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "Account identifier is required".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Wraps an identifier read back from stored data, which may predate validation.
    pub(crate) fn from_stored(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Opaque identifier the store assigns to a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxId(String);

impl TxId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TxId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-negative magnitude moved by a publish or a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    /// Parses a plain decimal integer. Signs, blanks and fractions are rejected rather than
    /// read as zero.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::InvalidArgument(format!("Invalid amount: '{s}'")));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| LedgerError::InvalidArgument(format!("Invalid amount '{s}': {e}")))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tags the family of a movement and the side of the account in it.
///
/// Transfer codes come in pairs: the destination records the base code chosen by the caller,
/// the source records `base + 1`.
///
/// | base | paired | family            |
/// |------|--------|-------------------|
/// | 1    | 2      | payment           |
/// | 3    | 4      | cancel payment    |
/// | 5    | 6      | remittance        |
/// | 7    | 8      | cancel remittance |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MovementCode(u32);

impl MovementCode {
    /// Issuance by an external issuer.
    pub const PUBLISH: Self = Self(0);

    pub fn new(code: u32) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// The code recorded on the source side of a transfer whose destination records `self`.
    pub fn paired(self) -> Result<Self> {
        self.0.checked_add(1).map(Self).ok_or_else(|| {
            LedgerError::InvalidArgument(format!("Movement code {} has no pair", self.0))
        })
    }
}

impl FromStr for MovementCode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::InvalidArgument(format!(
                "Invalid movement code: '{s}'"
            )));
        }
        s.parse::<u32>().map(Self).map_err(|e| {
            LedgerError::InvalidArgument(format!("Invalid movement code '{s}': {e}"))
        })
    }
}

impl fmt::Display for MovementCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The last balance-changing event applied to a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRecord {
    /// Issuer for a publish, the other wallet for a transfer.
    pub counterparty: AccountId,
    pub amount: Amount,
    /// Caller-supplied date, stored verbatim.
    pub occurred_on: String,
    pub code: MovementCode,
}

/// Snapshot of a wallet as stored under its key.
///
/// Snapshots are values: every transition consumes one and yields the next. Earlier versions
/// are retained by the store, not by the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Account {
    pub balance: u64,
    /// `None` until the first publish or transfer.
    pub last_movement: Option<MovementRecord>,
}

impl Account {
    /// A freshly opened wallet: zero balance, no movement.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn credited(self, movement: MovementRecord) -> Result<Self> {
        let balance = self
            .balance
            .checked_add(movement.amount.value())
            .ok_or_else(|| {
                LedgerError::InvalidArgument(format!(
                    "Crediting {} to balance {} would overflow",
                    movement.amount, self.balance
                ))
            })?;
        Ok(Self {
            balance,
            last_movement: Some(movement),
        })
    }

    pub(crate) fn debited(self, owner: &AccountId, movement: MovementRecord) -> Result<Self> {
        let balance = self
            .balance
            .checked_sub(movement.amount.value())
            .ok_or_else(|| LedgerError::InsufficientBalance {
                account: owner.to_string(),
                balance: self.balance,
                requested: movement.amount.value(),
            })?;
        Ok(Self {
            balance,
            last_movement: Some(movement),
        })
    }
}

/// A wallet snapshot paired with the transaction that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tx_id: TxId,
    pub account: Account,
}
