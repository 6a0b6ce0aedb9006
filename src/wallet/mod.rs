//! This module contains the wallet rules: how deposits, withdrawals and approvals move the two balances of a wallet.
//!
//! A [`Wallet`] keeps a gross `balance` and a `usable_balance`. Amounts above [`APPROVAL_THRESHOLD`] create
//! [`Transaction`]s that stay pending until they are approved or denied, and meanwhile only one of the balances reflects them.
//!
//! Everything here is synchronous and does no IO. Every operation returns the [`WalletEvent`] it produced,
//! and loading, saving and serialising access to a wallet are left to the caller.
//

mod currency;
mod error;
mod event;
mod transaction;
#[allow(clippy::module_inception)]
mod wallet;

pub use currency::Currency;
pub use error::WalletError;
pub use event::WalletEvent;
pub use transaction::{
  CustomerId, OppositePartyType, Transaction, TransactionId, TransactionStatus, TransactionType,
  WalletId,
};
pub use wallet::Wallet;
