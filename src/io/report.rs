use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::{self, Reference};

const MAX_PRECISION: u32 = 4;

/// A report on a wallet state used to serialize into a CSV file
#[derive(Debug, PartialEq, Serialize)]
pub struct WalletReport {
  wallet: Reference,
  id: Uuid,
  customer: Uuid,
  name: String,
  currency: &'static str,
  balance: Decimal,
  usable_balance: Decimal,
  active_for_shopping: bool,
  active_for_withdraw: bool,
}

impl From<ledger::WalletReport> for WalletReport {
  /// A conversion between the domain representation of a wallet report into a serializable structure
  fn from(report: ledger::WalletReport) -> Self {
    WalletReport {
      wallet: report.reference,
      id: report.id,
      customer: report.customer_id,
      name: report.name,
      currency: report.currency.code(),
      balance: with_max_precision(report.balance),
      usable_balance: with_max_precision(report.usable_balance),
      active_for_shopping: report.active_for_shopping,
      active_for_withdraw: report.active_for_withdraw,
    }
  }
}

/// A report on a transaction used to serialize into a CSV file
#[derive(Debug, PartialEq, Serialize)]
pub struct TransactionReport {
  wallet: Reference,
  id: Uuid,
  #[serde(rename = "type")]
  kind: String,
  status: String,
  amount: Decimal,
  opposite_party_type: String,
  opposite_party: String,
}

impl From<ledger::TransactionReport> for TransactionReport {
  fn from(report: ledger::TransactionReport) -> Self {
    let transaction = report.transaction;
    TransactionReport {
      wallet: report.wallet,
      id: transaction.id(),
      kind: transaction.kind().to_string(),
      status: transaction.status().to_string(),
      amount: with_max_precision(transaction.amount()),
      opposite_party_type: transaction.opposite_party_type().to_string(),
      opposite_party: transaction.opposite_party().to_string(),
    }
  }
}

fn with_max_precision(mut value: Decimal) -> Decimal {
  if value.scale() > MAX_PRECISION {
    value.rescale(MAX_PRECISION);
  }
  if value.is_zero() {
    value = Decimal::ZERO;
  }
  value
}
