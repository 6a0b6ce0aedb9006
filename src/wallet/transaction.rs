use std::fmt;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::{Result, WalletError};

/// Alias for a customer ID
pub type CustomerId = Uuid;

/// Alias for a wallet ID
pub type WalletId = Uuid;

/// Alias for a transaction ID
pub type TransactionId = Uuid;

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
  Deposit,
  Withdraw,
}

/// A transaction starts either `Pending` or directly `Approved`,
/// and a `Pending` one is resolved exactly once into `Approved` or `Denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
  Pending,
  Approved,
  Denied,
}

/// Classification of the external counter-party of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OppositePartyType {
  Iban,
  Payment,
}

/// A single money movement request recorded against a wallet.
/// Everything but the status is fixed at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
  id: TransactionId,
  wallet_id: WalletId,
  amount: Decimal,
  kind: TransactionType,
  status: TransactionStatus,
  opposite_party_type: OppositePartyType,
  opposite_party: String,
}

impl Transaction {
  /// The `amount` is expected to be positive, it is validated where requests enter the system.
  pub fn deposit(
    wallet_id: WalletId,
    amount: Decimal,
    source: String,
    party_type: OppositePartyType,
    status: TransactionStatus,
  ) -> Self {
    Self::new(
      wallet_id,
      amount,
      TransactionType::Deposit,
      status,
      party_type,
      source,
    )
  }

  pub fn withdraw(
    wallet_id: WalletId,
    amount: Decimal,
    destination: String,
    party_type: OppositePartyType,
    status: TransactionStatus,
  ) -> Self {
    Self::new(
      wallet_id,
      amount,
      TransactionType::Withdraw,
      status,
      party_type,
      destination,
    )
  }

  fn new(
    wallet_id: WalletId,
    amount: Decimal,
    kind: TransactionType,
    status: TransactionStatus,
    opposite_party_type: OppositePartyType,
    opposite_party: String,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      wallet_id,
      amount,
      kind,
      status,
      opposite_party_type,
      opposite_party,
    }
  }

  pub fn id(&self) -> TransactionId {
    self.id
  }

  pub fn wallet_id(&self) -> WalletId {
    self.wallet_id
  }

  pub fn amount(&self) -> Decimal {
    self.amount
  }

  pub fn kind(&self) -> TransactionType {
    self.kind
  }

  pub fn status(&self) -> TransactionStatus {
    self.status
  }

  pub fn opposite_party_type(&self) -> OppositePartyType {
    self.opposite_party_type
  }

  pub fn opposite_party(&self) -> &str {
    &self.opposite_party
  }

  pub fn is_pending(&self) -> bool {
    self.status == TransactionStatus::Pending
  }

  /// Only a `Pending` transaction accepts a new status.
  pub fn set_status(&mut self, new_status: TransactionStatus) -> Result<()> {
    if !self.is_pending() {
      Err(WalletError::InvalidStateTransition(self.id, self.status))
    } else {
      self.status = new_status;
      Ok(())
    }
  }
}

impl fmt::Display for TransactionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      TransactionType::Deposit => "DEPOSIT",
      TransactionType::Withdraw => "WITHDRAW",
    })
  }
}

impl fmt::Display for TransactionStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      TransactionStatus::Pending => "PENDING",
      TransactionStatus::Approved => "APPROVED",
      TransactionStatus::Denied => "DENIED",
    })
  }
}

impl fmt::Display for OppositePartyType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      OppositePartyType::Iban => "IBAN",
      OppositePartyType::Payment => "PAYMENT",
    })
  }
}
