use clap::ValueEnum;
use std::path::PathBuf;

/// What a transfer does when its destination credit fails after the source debit committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransferPolicy {
    /// Leave the source debited and report the failure.
    #[default]
    BestEffort,
    /// Write the source's pre-transfer snapshot back, then report the failure.
    Compensate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Runtime settings of the ledger binary.
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    /// Directory of the persistent store. In-memory storage when absent.
    pub db_path: Option<PathBuf>,
    pub transfer_policy: TransferPolicy,
    pub log_format: LogFormat,
}
