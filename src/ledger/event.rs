use async_trait::async_trait;

use crate::wallet::WalletEvent;

/// Interface for the consumers of wallet events (notifications, auditing, ...).
/// Publishing is fire-and-forget: a publisher has no way to reject an event.
#[async_trait]
pub trait EventPublisher {
  async fn publish(&mut self, event: WalletEvent);
}

/// Implementation of the [`EventPublisher`] that writes every event to the log.
#[derive(Debug, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
  async fn publish(&mut self, event: WalletEvent) {
    let transaction = event.transaction_id();
    let wallet = event.wallet_id();
    match event {
      WalletEvent::TransactionCreated {
        status,
        kind,
        amount,
        opposite_party_type,
        opposite_party,
        ..
      } => tracing::info!(
        %transaction,
        %wallet,
        %status,
        %kind,
        %amount,
        %opposite_party_type,
        %opposite_party,
        "Transaction created"
      ),
      WalletEvent::TransactionStatusChanged {
        new_status,
        kind,
        amount,
        opposite_party_type,
        opposite_party,
        ..
      } => tracing::info!(
        %transaction,
        %wallet,
        %new_status,
        %kind,
        %amount,
        %opposite_party_type,
        %opposite_party,
        "Transaction status changed"
      ),
    }
  }
}
