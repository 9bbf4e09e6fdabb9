use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use txledger::application::ledger::Ledger;
use txledger::commands::executor::CommandExecutor;
use txledger::config::{self, LedgerConfig};
use txledger::interfaces::batch::BatchRunner;
use txledger::interfaces::csv::command_reader::CommandReader;
use txledger::interfaces::csv::record_writer::{OutputFormat, RecordWriter};
use txledger::interfaces::csv::records::AccountRecord;
use txledger::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Lowest balance an account may hold
    #[arg(long, env = "TXLEDGER_MIN_BALANCE", default_value_t = config::DEFAULT_MIN_BALANCE)]
    min_balance: Decimal,

    /// Highest balance an account may hold
    #[arg(long, env = "TXLEDGER_MAX_BALANCE", default_value_t = config::DEFAULT_MAX_BALANCE)]
    max_balance: Decimal,

    /// Number of runtime worker threads and concurrent commands
    #[arg(long, env = "TXLEDGER_WORKERS", default_value_t = config::DEFAULT_WORKERS)]
    workers: usize,

    /// How long a transfer waits for an account lock, in milliseconds
    #[arg(long, env = "TXLEDGER_LOCK_WAIT_MS", default_value_t = 100)]
    lock_wait_ms: u64,

    /// Idle time after which an unused account lock is dropped, in seconds
    #[arg(long, env = "TXLEDGER_LOCK_IDLE_SECS", default_value_t = 60)]
    lock_idle_secs: u64,

    /// Delay suggested to callers of a busy account, in milliseconds
    #[arg(long, env = "TXLEDGER_RETRY_AFTER_MS", default_value_t = 100)]
    retry_after_ms: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "TXLEDGER_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output format for outcomes and the accounts table
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Print every account after the commands have run
    #[arg(long)]
    accounts: bool,
}

impl Cli {
    fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            min_balance: self.min_balance,
            max_balance: self.max_balance,
            workers: self.workers,
            lock_wait: Duration::from_millis(self.lock_wait_ms),
            lock_idle_timeout: Duration::from_secs(self.lock_idle_secs),
            retry_after: Duration::from_millis(self.retry_after_ms),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = cli.ledger_config().validate().into_diagnostic()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
        .into_diagnostic()?;

    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: LedgerConfig) -> Result<()> {
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);

    let executor = CommandExecutor::new(Ledger::new(&config), config.workers);
    let runner = BatchRunner::new(executor.clone());

    let stdout = io::stdout();
    let mut writer = RecordWriter::new(stdout.lock(), cli.format);
    let summary = runner.run(reader, &mut writer).await.into_diagnostic()?;
    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        "finished processing commands"
    );

    let mut out = writer.into_inner().into_diagnostic()?;
    if cli.accounts {
        let mut writer = RecordWriter::new(out, cli.format);
        for account in executor.ledger().accounts().await {
            writer.write(&AccountRecord::from(&account)).into_diagnostic()?;
        }
        out = writer.into_inner().into_diagnostic()?;
    }
    out.flush().into_diagnostic()?;

    Ok(())
}
