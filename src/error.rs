use miette::Diagnostic;
use thiserror::Error;

/// Machine-readable classification of a [`LedgerError`].
///
/// The message carried by the error is the human-facing contract; the kind lets callers
/// branch without parsing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    InsufficientBalance,
    WriteFailed,
    Storage,
}

#[derive(Error, Diagnostic, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    #[diagnostic(code(ledger::invalid_argument))]
    InvalidArgument(String),

    #[error("Not found wallet: {0}")]
    #[diagnostic(code(ledger::not_found))]
    NotFound(String),

    #[error("{account} is not enough balance: balance {balance}, requested {requested}")]
    #[diagnostic(code(ledger::insufficient_balance))]
    InsufficientBalance {
        account: String,
        balance: u64,
        requested: u64,
    },

    /// A write was rejected by the store.
    ///
    /// `debited` is set when the failing write was the destination credit of a transfer whose
    /// source debit had already been committed. Unless `compensated` is also set, the ledger
    /// is left with the source debited and the destination not credited.
    #[error("Failed to write wallet {account}: {reason}")]
    #[diagnostic(
        code(ledger::write_failed),
        help("a transfer that fails after debiting its source is not rolled back unless the compensate policy is enabled")
    )]
    WriteFailed {
        account: String,
        reason: String,
        debited: bool,
        compensated: bool,
    },

    #[error("Storage error: {0}")]
    #[diagnostic(code(ledger::storage))]
    Storage(String),

    #[error("Codec error: {0}")]
    #[diagnostic(code(ledger::codec))]
    Codec(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    #[diagnostic(code(ledger::csv))]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::Csv(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::WriteFailed { .. } => ErrorKind::WriteFailed,
            Self::Storage(_) | Self::Codec(_) => ErrorKind::Storage,
        }
    }

    pub fn arity(expected: usize) -> Self {
        Self::InvalidArgument(format!(
            "Incorrect number of arguments. Expecting {expected}"
        ))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
