use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::wallet::{
  Currency, CustomerId, Transaction, TransactionId, TransactionStatus, TransactionType, Wallet,
  WalletId,
};

pub type Result<T> = core::result::Result<T, StoreError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
  #[error("Transaction {0} can not be saved with wallet {1}")]
  WalletMismatch(TransactionId, WalletId),

  #[cfg(test)]
  #[error("Storage unavailable: {0}")]
  Unavailable(String),
}

/// Criteria to select the transactions of a wallet. Unset criteria match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionFilter {
  pub status: Option<TransactionStatus>,
  pub kind: Option<TransactionType>,
}

impl TransactionFilter {
  pub fn all() -> Self {
    Self::default()
  }

  pub fn with_status(mut self, status: TransactionStatus) -> Self {
    self.status = Some(status);
    self
  }

  pub fn with_kind(mut self, kind: TransactionType) -> Self {
    self.kind = Some(kind);
    self
  }

  pub fn matches(&self, transaction: &Transaction) -> bool {
    self.status.map_or(true, |status| status == transaction.status())
      && self.kind.map_or(true, |kind| kind == transaction.kind())
  }
}

/// Interface to the storage of wallets and transactions.
///
/// Saving replaces any previous version of the same entity.
/// A wallet and the transaction that changed it are saved together with [`LedgerStore::save`],
/// which stores both or none of them.
/// Implementations backed by a database are expected to serialise the operations on the same wallet.
#[async_trait]
pub trait LedgerStore {
  async fn load_wallet(&self, id: WalletId) -> Result<Option<Wallet>>;

  /// Saves a wallet with no transaction involved, as when it is created.
  async fn save_wallet(&mut self, wallet: Wallet) -> Result<()>;

  /// Saves a wallet together with the transaction that changed its balances.
  async fn save(&mut self, wallet: Wallet, transaction: Transaction) -> Result<()>;

  /// Wallets owned by a customer, optionally restricted to one currency, in creation order.
  async fn list_wallets(
    &self,
    customer_id: CustomerId,
    currency: Option<Currency>,
  ) -> Result<Vec<Wallet>>;

  async fn load_transaction(&self, id: TransactionId) -> Result<Option<Transaction>>;

  /// Transactions of a wallet matching the filter, in creation order.
  async fn list_transactions(
    &self,
    wallet_id: WalletId,
    filter: TransactionFilter,
  ) -> Result<Vec<Transaction>>;
}

/// Implementation of the [`LedgerStore`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
  wallets: HashMap<WalletId, Wallet>,
  wallets_order: Vec<WalletId>,
  transactions: HashMap<TransactionId, Transaction>,
  transactions_by_wallet: HashMap<WalletId, Vec<TransactionId>>,
}

impl InMemoryLedgerStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn insert_wallet(&mut self, wallet: Wallet) {
    let id = wallet.id();
    if self.wallets.insert(id, wallet).is_none() {
      self.wallets_order.push(id);
    }
  }

  fn insert_transaction(&mut self, transaction: Transaction) {
    let id = transaction.id();
    let wallet_id = transaction.wallet_id();
    if self.transactions.insert(id, transaction).is_none() {
      self
        .transactions_by_wallet
        .entry(wallet_id)
        .or_insert_with(Vec::new)
        .push(id);
    }
  }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
  async fn load_wallet(&self, id: WalletId) -> Result<Option<Wallet>> {
    Ok(self.wallets.get(&id).cloned())
  }

  async fn save_wallet(&mut self, wallet: Wallet) -> Result<()> {
    self.insert_wallet(wallet);
    Ok(())
  }

  async fn save(&mut self, wallet: Wallet, transaction: Transaction) -> Result<()> {
    if transaction.wallet_id() != wallet.id() {
      return Err(StoreError::WalletMismatch(transaction.id(), wallet.id()));
    }
    self.insert_wallet(wallet);
    self.insert_transaction(transaction);
    Ok(())
  }

  async fn list_wallets(
    &self,
    customer_id: CustomerId,
    currency: Option<Currency>,
  ) -> Result<Vec<Wallet>> {
    Ok(
      self
        .wallets_order
        .iter()
        .filter_map(|id| self.wallets.get(id))
        .filter(|wallet| wallet.customer_id() == customer_id)
        .filter(|wallet| currency.map_or(true, |currency| currency == wallet.currency()))
        .cloned()
        .collect(),
    )
  }

  async fn load_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
    Ok(self.transactions.get(&id).cloned())
  }

  async fn list_transactions(
    &self,
    wallet_id: WalletId,
    filter: TransactionFilter,
  ) -> Result<Vec<Transaction>> {
    let ids = self
      .transactions_by_wallet
      .get(&wallet_id)
      .map(Vec::as_slice)
      .unwrap_or_default();

    Ok(
      ids
        .iter()
        .filter_map(|id| self.transactions.get(id))
        .filter(|transaction| filter.matches(transaction))
        .cloned()
        .collect(),
    )
  }
}
