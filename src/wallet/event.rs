use rust_decimal::Decimal;

use super::transaction::{
  OppositePartyType, Transaction, TransactionId, TransactionStatus, TransactionType, WalletId,
};

/// Events describing what happened to the transactions of a wallet.
/// They are derived from the final state of a transaction, so they can be produced once it is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletEvent {
  TransactionCreated {
    id: TransactionId,
    wallet_id: WalletId,
    status: TransactionStatus,
    kind: TransactionType,
    amount: Decimal,
    opposite_party_type: OppositePartyType,
    opposite_party: String,
  },
  TransactionStatusChanged {
    id: TransactionId,
    wallet_id: WalletId,
    new_status: TransactionStatus,
    kind: TransactionType,
    amount: Decimal,
    opposite_party_type: OppositePartyType,
    opposite_party: String,
  },
}

impl WalletEvent {
  pub fn transaction_created(transaction: &Transaction) -> Self {
    WalletEvent::TransactionCreated {
      id: transaction.id(),
      wallet_id: transaction.wallet_id(),
      status: transaction.status(),
      kind: transaction.kind(),
      amount: transaction.amount(),
      opposite_party_type: transaction.opposite_party_type(),
      opposite_party: transaction.opposite_party().to_string(),
    }
  }

  pub fn status_changed(transaction: &Transaction) -> Self {
    WalletEvent::TransactionStatusChanged {
      id: transaction.id(),
      wallet_id: transaction.wallet_id(),
      new_status: transaction.status(),
      kind: transaction.kind(),
      amount: transaction.amount(),
      opposite_party_type: transaction.opposite_party_type(),
      opposite_party: transaction.opposite_party().to_string(),
    }
  }

  pub fn transaction_id(&self) -> TransactionId {
    match self {
      WalletEvent::TransactionCreated { id, .. } => *id,
      WalletEvent::TransactionStatusChanged { id, .. } => *id,
    }
  }

  pub fn wallet_id(&self) -> WalletId {
    match self {
      WalletEvent::TransactionCreated { wallet_id, .. } => *wallet_id,
      WalletEvent::TransactionStatusChanged { wallet_id, .. } => *wallet_id,
    }
  }
}

#[cfg(test)]
mod tests {

  use rust_decimal_macros::dec;
  use uuid::Uuid;

  use super::*;

  #[test]
  fn events_from_transaction() {
    let mut transaction = Transaction::withdraw(
      Uuid::new_v4(),
      dec!(1200),
      "TR330006100519786457841326".to_string(),
      OppositePartyType::Iban,
      TransactionStatus::Pending,
    );

    let created = WalletEvent::transaction_created(&transaction);

    assert_eq!(
      created,
      WalletEvent::TransactionCreated {
        id: transaction.id(),
        wallet_id: transaction.wallet_id(),
        status: TransactionStatus::Pending,
        kind: TransactionType::Withdraw,
        amount: dec!(1200),
        opposite_party_type: OppositePartyType::Iban,
        opposite_party: "TR330006100519786457841326".to_string(),
      }
    );

    transaction.set_status(TransactionStatus::Denied).unwrap();
    let changed = WalletEvent::status_changed(&transaction);

    assert_eq!(
      changed,
      WalletEvent::TransactionStatusChanged {
        id: transaction.id(),
        wallet_id: transaction.wallet_id(),
        new_status: TransactionStatus::Denied,
        kind: TransactionType::Withdraw,
        amount: dec!(1200),
        opposite_party_type: OppositePartyType::Iban,
        opposite_party: "TR330006100519786457841326".to_string(),
      }
    );
    assert_eq!(changed.transaction_id(), transaction.id());
    assert_eq!(changed.wallet_id(), transaction.wallet_id());
  }
}
