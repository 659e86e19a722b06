use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use wallet_ledger::application::service::WalletService;
use wallet_ledger::config::{LedgerConfig, LogFormat, TransferPolicy};
use wallet_ledger::domain::operation::Operation;
use wallet_ledger::domain::ports::LedgerStoreBox;
use wallet_ledger::infrastructure::in_memory::InMemoryLedgerStore;
#[cfg(feature = "storage-rocksdb")]
use wallet_ledger::infrastructure::rocksdb::RocksDBStore;
use wallet_ledger::interfaces::csv::invocation_reader::InvocationReader;
use wallet_ledger::telemetry;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// What to do when a transfer's credit fails after its debit was committed.
    #[arg(long, value_enum, default_value_t, global = true)]
    transfer_policy: TransferPolicy,

    #[arg(long, value_enum, default_value_t, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every invocation of a CSV script, printing one payload per line
    Run {
        /// Header-less CSV, one `function,arg1,arg2,...` row per invocation
        script: PathBuf,
    },
    /// Run a single invocation
    Invoke {
        function: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Cli {
    fn config(&self) -> LedgerConfig {
        LedgerConfig {
            db_path: self.db_path.clone(),
            transfer_policy: self.transfer_policy,
            log_format: self.log_format,
        }
    }
}

fn open_store(config: &LedgerConfig) -> Result<LedgerStoreBox> {
    match &config.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(RocksDBStore::open(path)?)),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryLedgerStore::new()))
        }
        None => Ok(Box::new(InMemoryLedgerStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();
    telemetry::init(config.log_format);

    let service = WalletService::with_policy(open_store(&config)?, config.transfer_policy);
    let stdout = io::stdout();

    match cli.command {
        Command::Run { script } => {
            let file = File::open(script).into_diagnostic()?;
            let reader = InvocationReader::new(file);
            for invocation in reader.invocations() {
                let result = match invocation.and_then(|invocation| invocation.to_operation()) {
                    Ok(operation) => service.execute(operation).await,
                    Err(e) => {
                        eprintln!("Error reading invocation: {}", e);
                        continue;
                    }
                };
                match result.and_then(|outcome| outcome.to_payload()) {
                    Ok(payload) => writeln!(stdout.lock(), "{payload}").into_diagnostic()?,
                    Err(e) => eprintln!("Error processing invocation: {}", e),
                }
            }
        }
        Command::Invoke { function, args } => {
            let operation = Operation::parse(&function, &args)?;
            let payload = service.execute(operation).await?.to_payload()?;
            writeln!(stdout.lock(), "{payload}").into_diagnostic()?;
        }
    }

    Ok(())
}
