use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::ledger::TransactionFilter;
use crate::wallet::{Currency, CustomerId, TransactionStatus, TransactionType};

/// Runs a batch of wallet commands and reports the resulting state as CSV on the standard output.
#[derive(Debug, Parser)]
#[command(name = "digiwallet-ledger", version)]
pub struct Config {
  /// CSV file with the commands to process. The standard input is used when missing.
  #[arg(value_name = "COMMANDS")]
  pub input: Option<PathBuf>,

  /// What to report once all the commands have been processed
  #[arg(short, long, value_enum, default_value_t = Report::Wallets)]
  pub report: Report,

  /// Only report the wallets of this customer
  #[arg(long, value_name = "UUID")]
  pub customer: Option<CustomerId>,

  /// Only report the wallets in this currency (TRY, USD or EUR)
  #[arg(long)]
  pub currency: Option<Currency>,

  /// Only report the transactions with this status
  #[arg(long, value_enum)]
  pub status: Option<Status>,

  /// Only report the transactions of this type
  #[arg(long = "type", value_enum)]
  pub kind: Option<Kind>,

  /// Log filter, using the `tracing-subscriber` directives syntax. Logs are written to the standard error.
  #[arg(long, env = "LEDGER_LOG", default_value = "warn")]
  pub log_level: String,
}

impl Config {
  pub fn report_filter(&self) -> ReportFilter {
    let mut transactions = TransactionFilter::all();
    if let Some(status) = self.status {
      transactions = transactions.with_status(status.into());
    }
    if let Some(kind) = self.kind {
      transactions = transactions.with_kind(kind.into());
    }

    ReportFilter {
      customer: self.customer,
      currency: self.currency,
      transactions,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Report {
  /// One row per wallet with its balances
  Wallets,
  /// One row per transaction of every wallet
  Transactions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Status {
  Pending,
  Approved,
  Denied,
}

impl From<Status> for TransactionStatus {
  fn from(status: Status) -> Self {
    match status {
      Status::Pending => TransactionStatus::Pending,
      Status::Approved => TransactionStatus::Approved,
      Status::Denied => TransactionStatus::Denied,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
  Deposit,
  Withdraw,
}

impl From<Kind> for TransactionType {
  fn from(kind: Kind) -> Self {
    match kind {
      Kind::Deposit => TransactionType::Deposit,
      Kind::Withdraw => TransactionType::Withdraw,
    }
  }
}

/// Which wallets, and which of their transactions, end up in the report
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportFilter {
  pub customer: Option<CustomerId>,
  pub currency: Option<Currency>,
  pub transactions: TransactionFilter,
}
