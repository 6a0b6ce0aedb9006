use thiserror::Error;

use super::transaction::{TransactionId, TransactionStatus, WalletId};

pub type Result<T> = core::result::Result<T, WalletError>;

/// Rejections raised by the wallet rules.
/// None of them is transient: retrying without changing the input will fail the same way,
/// and a rejected call leaves the wallet and the transaction untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WalletError {
  #[error("Unsupported currency: {0}")]
  InvalidCurrency(String),

  #[error("Customer ID is required")]
  MissingCustomerId,

  #[error("Withdraw not allowed for wallet {0}")]
  WithdrawNotAllowed(WalletId),

  #[error("Insufficient usable balance")]
  InsufficientUsableBalance,

  #[error("Transaction {0} is {1} and can no longer change its status")]
  InvalidStateTransition(TransactionId, TransactionStatus),

  #[error("Transaction {0} is not pending")]
  TransactionNotPending(TransactionId),

  #[error("Transaction {0} does not belong to wallet {1}")]
  ForeignTransaction(TransactionId, WalletId),

  #[error("Balance of wallet {0} out of range")]
  BalanceOverflow(WalletId),
}
