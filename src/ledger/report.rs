use rust_decimal::Decimal;

use super::command::Reference;
use crate::wallet::{Currency, CustomerId, Transaction, Wallet, WalletId};

/// Wallet report structure used to export the state of the wallets.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletReport {
  pub reference: Reference,
  pub id: WalletId,
  pub customer_id: CustomerId,
  pub name: String,
  pub currency: Currency,
  pub balance: Decimal,
  pub usable_balance: Decimal,
  pub active_for_shopping: bool,
  pub active_for_withdraw: bool,
}

impl WalletReport {
  pub fn new(reference: Reference, wallet: &Wallet) -> Self {
    Self {
      reference,
      id: wallet.id(),
      customer_id: wallet.customer_id(),
      name: wallet.name().to_string(),
      currency: wallet.currency(),
      balance: wallet.balance(),
      usable_balance: wallet.usable_balance(),
      active_for_shopping: wallet.active_for_shopping(),
      active_for_withdraw: wallet.active_for_withdraw(),
    }
  }
}

/// Transaction report structure used to export the transactions of the wallets.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReport {
  pub wallet: Reference,
  pub transaction: Transaction,
}

impl TransactionReport {
  pub fn new(wallet: Reference, transaction: Transaction) -> Self {
    Self {
      wallet,
      transaction,
    }
  }
}
