use rust_decimal::Decimal;
use thiserror::Error;

use super::event::EventPublisher;
use super::store::{LedgerStore, StoreError, TransactionFilter};
use crate::wallet::{
  Currency, CustomerId, OppositePartyType, Transaction, TransactionId, TransactionStatus, Wallet,
  WalletError, WalletId,
};

pub type Result<T> = core::result::Result<T, LedgerError>;

/// Errors returned by the [`LedgerService`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
  #[error("Access denied: customers can only access their own wallets")]
  AccessDenied,

  #[error("Wallet not found: {0}")]
  WalletNotFound(WalletId),

  #[error("Transaction not found: {0}")]
  TransactionNotFound(TransactionId),

  #[error(transparent)]
  Wallet(#[from] WalletError),

  #[error(transparent)]
  Store(#[from] StoreError),
}

/// Who is performing an operation, as already established by the authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
  /// Employees can act on behalf of any customer.
  Employee,
  /// Customers can only act on their own wallets.
  Customer(CustomerId),
}

impl Actor {
  pub fn can_act_for(&self, customer_id: CustomerId) -> bool {
    match self {
      Actor::Employee => true,
      Actor::Customer(actor_id) => *actor_id == customer_id,
    }
  }

  fn check_access(&self, customer_id: CustomerId) -> Result<()> {
    if self.can_act_for(customer_id) {
      Ok(())
    } else {
      Err(LedgerError::AccessDenied)
    }
  }
}

/// The use cases of the ledger: every operation checks the actor's access,
/// applies the wallet rules, stores the outcome and only then publishes the resulting event.
///
/// Operations take `&mut self`, so a single service never runs two operations concurrently.
pub struct LedgerService<S, P> {
  store: S,
  publisher: P,
}

impl<S, P> LedgerService<S, P>
where
  S: LedgerStore + Send + Sync,
  P: EventPublisher + Send,
{
  pub fn new(store: S, publisher: P) -> Self {
    Self { store, publisher }
  }

  pub async fn create_wallet(
    &mut self,
    actor: Actor,
    customer_id: CustomerId,
    name: String,
    currency: &str,
    active_for_shopping: bool,
    active_for_withdraw: bool,
  ) -> Result<Wallet> {
    actor.check_access(customer_id)?;

    let wallet = Wallet::new(
      customer_id,
      name,
      currency,
      active_for_shopping,
      active_for_withdraw,
    )?;
    self.store.save_wallet(wallet.clone()).await?;

    tracing::info!(wallet = %wallet.id(), customer = %customer_id, currency = %wallet.currency(), "Wallet created");
    Ok(wallet)
  }

  pub async fn list_wallets(
    &self,
    actor: Actor,
    customer_id: CustomerId,
    currency: Option<Currency>,
  ) -> Result<Vec<Wallet>> {
    actor.check_access(customer_id)?;
    Ok(self.store.list_wallets(customer_id, currency).await?)
  }

  pub async fn wallet(&self, actor: Actor, wallet_id: WalletId) -> Result<Wallet> {
    let wallet = self.load_wallet(wallet_id).await?;
    actor.check_access(wallet.customer_id())?;
    Ok(wallet)
  }

  pub async fn deposit(
    &mut self,
    actor: Actor,
    wallet_id: WalletId,
    amount: Decimal,
    source: String,
    party_type: OppositePartyType,
  ) -> Result<Transaction> {
    let mut wallet = self.wallet(actor, wallet_id).await?;

    let (transaction, event) = wallet.deposit(amount, source, party_type)?;

    self.save(wallet, transaction.clone()).await?;
    self.publisher.publish(event).await;
    Ok(transaction)
  }

  pub async fn withdraw(
    &mut self,
    actor: Actor,
    wallet_id: WalletId,
    amount: Decimal,
    destination: String,
    party_type: OppositePartyType,
  ) -> Result<Transaction> {
    let mut wallet = self.wallet(actor, wallet_id).await?;

    let (transaction, event) = wallet.withdraw(amount, destination, party_type)?;

    self.save(wallet, transaction.clone()).await?;
    self.publisher.publish(event).await;
    Ok(transaction)
  }

  /// Resolves a pending transaction into `new_status`.
  pub async fn approve_transaction(
    &mut self,
    actor: Actor,
    transaction_id: TransactionId,
    new_status: TransactionStatus,
  ) -> Result<Transaction> {
    let mut transaction = self.load_transaction(transaction_id).await?;
    let mut wallet = self.wallet(actor, transaction.wallet_id()).await?;

    let event = wallet.apply_transaction_approval(&mut transaction, new_status)?;

    self.save(wallet, transaction.clone()).await?;
    self.publisher.publish(event).await;
    Ok(transaction)
  }

  #[cfg(test)]
  pub async fn transaction(&self, actor: Actor, transaction_id: TransactionId) -> Result<Transaction> {
    let transaction = self.load_transaction(transaction_id).await?;
    self.wallet(actor, transaction.wallet_id()).await?;
    Ok(transaction)
  }

  pub async fn list_transactions(
    &self,
    actor: Actor,
    wallet_id: WalletId,
    filter: TransactionFilter,
  ) -> Result<Vec<Transaction>> {
    self.wallet(actor, wallet_id).await?;
    Ok(self.store.list_transactions(wallet_id, filter).await?)
  }

  async fn load_wallet(&self, wallet_id: WalletId) -> Result<Wallet> {
    self
      .store
      .load_wallet(wallet_id)
      .await?
      .ok_or(LedgerError::WalletNotFound(wallet_id))
  }

  async fn load_transaction(&self, transaction_id: TransactionId) -> Result<Transaction> {
    self
      .store
      .load_transaction(transaction_id)
      .await?
      .ok_or(LedgerError::TransactionNotFound(transaction_id))
  }

  async fn save(&mut self, wallet: Wallet, transaction: Transaction) -> Result<()> {
    tracing::debug!(
      wallet = %wallet.id(),
      transaction = %transaction.id(),
      status = %transaction.status(),
      balance = %wallet.balance(),
      usable_balance = %wallet.usable_balance(),
      "Saving wallet and transaction"
    );
    self.store.save(wallet, transaction).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {

  use async_trait::async_trait;
  use rust_decimal_macros::dec;
  use uuid::Uuid;

  use super::*;
  use crate::ledger::store::{InMemoryLedgerStore, Result as StoreResult};
  use crate::wallet::{TransactionType, WalletEvent};

  const IBAN: &str = "TR330006100519786457841326";

  type TestService = LedgerService<InMemoryLedgerStore, MockTestEventPublisher>;

  mockall::mock! {
    TestEventPublisher {}
    #[async_trait]
    impl EventPublisher for TestEventPublisher {
      async fn publish(&mut self, event: WalletEvent);
    }
  }

  mockall::mock! {
    TestLedgerStore {}
    #[async_trait]
    impl LedgerStore for TestLedgerStore {
      async fn load_wallet(&self, id: WalletId) -> StoreResult<Option<Wallet>>;
      async fn save_wallet(&mut self, wallet: Wallet) -> StoreResult<()>;
      async fn save(&mut self, wallet: Wallet, transaction: Transaction) -> StoreResult<()>;
      async fn list_wallets(
        &self,
        customer_id: CustomerId,
        currency: Option<Currency>,
      ) -> StoreResult<Vec<Wallet>>;
      async fn load_transaction(&self, id: TransactionId) -> StoreResult<Option<Transaction>>;
      async fn list_transactions(
        &self,
        wallet_id: WalletId,
        filter: TransactionFilter,
      ) -> StoreResult<Vec<Transaction>>;
    }
  }

  fn silent_publisher() -> MockTestEventPublisher {
    let mut publisher = MockTestEventPublisher::new();
    publisher.expect_publish().return_const(());
    publisher
  }

  fn expect_events(events: usize) -> MockTestEventPublisher {
    let mut publisher = MockTestEventPublisher::new();
    publisher.expect_publish().times(events).return_const(());
    publisher
  }

  async fn service_with_wallet(
    publisher: MockTestEventPublisher,
    active_for_withdraw: bool,
  ) -> (TestService, Wallet) {
    let mut service = LedgerService::new(InMemoryLedgerStore::new(), publisher);
    let wallet = service
      .create_wallet(
        Actor::Employee,
        Uuid::new_v4(),
        "Main".to_string(),
        "USD",
        true,
        active_for_withdraw,
      )
      .await
      .unwrap();
    (service, wallet)
  }

  #[test]
  fn actor_access() {
    let customer_id = Uuid::new_v4();

    assert!(Actor::Employee.can_act_for(customer_id));
    assert!(Actor::Customer(customer_id).can_act_for(customer_id));
    assert!(!Actor::Customer(Uuid::new_v4()).can_act_for(customer_id));
  }

  #[tokio::test]
  async fn create_wallet_by_owner_or_employee() {
    let mut service = LedgerService::new(InMemoryLedgerStore::new(), expect_events(0));
    let customer_id = Uuid::new_v4();

    let own = service
      .create_wallet(
        Actor::Customer(customer_id),
        customer_id,
        "Own".to_string(),
        "TRY",
        true,
        true,
      )
      .await
      .unwrap();
    let by_employee = service
      .create_wallet(
        Actor::Employee,
        customer_id,
        "Managed".to_string(),
        "EUR",
        false,
        true,
      )
      .await
      .unwrap();

    assert_eq!(
      service
        .list_wallets(Actor::Customer(customer_id), customer_id, None)
        .await,
      Ok(vec![own.clone(), by_employee.clone()])
    );
    assert_eq!(
      service
        .list_wallets(Actor::Employee, customer_id, Some(Currency::Eur))
        .await,
      Ok(vec![by_employee])
    );
    assert_eq!(service.wallet(Actor::Customer(customer_id), own.id()).await, Ok(own));
  }

  #[tokio::test]
  async fn create_wallet_for_another_customer_denied() {
    let mut service = LedgerService::new(InMemoryLedgerStore::new(), expect_events(0));
    let customer_id = Uuid::new_v4();

    let result = service
      .create_wallet(
        Actor::Customer(Uuid::new_v4()),
        customer_id,
        "Other".to_string(),
        "USD",
        true,
        true,
      )
      .await;

    assert_eq!(result, Err(LedgerError::AccessDenied));
    assert_eq!(
      service.list_wallets(Actor::Employee, customer_id, None).await,
      Ok(vec![])
    );
  }

  #[tokio::test]
  async fn create_wallet_invalid_currency() {
    let mut service = LedgerService::new(InMemoryLedgerStore::new(), expect_events(0));

    let result = service
      .create_wallet(
        Actor::Employee,
        Uuid::new_v4(),
        "Pounds".to_string(),
        "GBP",
        true,
        true,
      )
      .await;

    assert_eq!(
      result,
      Err(LedgerError::Wallet(WalletError::InvalidCurrency(
        "GBP".to_string()
      )))
    );
  }

  #[tokio::test]
  async fn list_wallets_of_another_customer_denied() {
    let (service, wallet) = service_with_wallet(expect_events(0), true).await;
    let stranger = Actor::Customer(Uuid::new_v4());

    assert_eq!(
      service
        .list_wallets(stranger, wallet.customer_id(), None)
        .await,
      Err(LedgerError::AccessDenied)
    );
    assert_eq!(
      service.wallet(stranger, wallet.id()).await,
      Err(LedgerError::AccessDenied)
    );
  }

  #[tokio::test]
  async fn deposit_stores_and_publishes() {
    let mut publisher = MockTestEventPublisher::new();
    publisher
      .expect_publish()
      .withf(|event| {
        matches!(
          event,
          WalletEvent::TransactionCreated {
            status: TransactionStatus::Pending,
            kind: TransactionType::Deposit,
            ..
          }
        )
      })
      .times(1)
      .return_const(());
    let (mut service, wallet) = service_with_wallet(publisher, true).await;
    let owner = Actor::Customer(wallet.customer_id());

    let transaction = service
      .deposit(owner, wallet.id(), dec!(1500), IBAN.to_string(), OppositePartyType::Iban)
      .await
      .unwrap();

    assert_eq!(transaction.status(), TransactionStatus::Pending);
    assert_eq!(service.transaction(owner, transaction.id()).await, Ok(transaction));
    let stored = service.wallet(owner, wallet.id()).await.unwrap();
    assert_eq!(stored.balance(), dec!(1500));
    assert_eq!(stored.usable_balance(), dec!(0));
  }

  #[tokio::test]
  async fn deposit_into_unknown_wallet() {
    let mut service = LedgerService::new(InMemoryLedgerStore::new(), expect_events(0));
    let wallet_id = Uuid::new_v4();

    let result = service
      .deposit(
        Actor::Employee,
        wallet_id,
        dec!(10),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await;

    assert_eq!(result, Err(LedgerError::WalletNotFound(wallet_id)));
  }

  #[tokio::test]
  async fn deposit_into_another_customer_wallet_denied() {
    let (mut service, wallet) = service_with_wallet(expect_events(0), true).await;

    let result = service
      .deposit(
        Actor::Customer(Uuid::new_v4()),
        wallet.id(),
        dec!(10),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await;

    assert_eq!(result, Err(LedgerError::AccessDenied));
    assert_eq!(service.wallet(Actor::Employee, wallet.id()).await, Ok(wallet));
  }

  #[tokio::test]
  async fn withdraw_rejected_leaves_wallet_untouched() {
    let (mut service, wallet) = service_with_wallet(expect_events(1), false).await;
    service
      .deposit(
        Actor::Employee,
        wallet.id(),
        dec!(100),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await
      .unwrap();
    let before = service.wallet(Actor::Employee, wallet.id()).await.unwrap();

    let result = service
      .withdraw(
        Actor::Employee,
        wallet.id(),
        dec!(10),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await;

    assert_eq!(
      result,
      Err(LedgerError::Wallet(WalletError::WithdrawNotAllowed(wallet.id())))
    );
    assert_eq!(service.wallet(Actor::Employee, wallet.id()).await, Ok(before));
    assert_eq!(
      service
        .list_transactions(Actor::Employee, wallet.id(), TransactionFilter::all())
        .await
        .map(|transactions| transactions.len()),
      Ok(1)
    );
  }

  #[tokio::test]
  async fn withdraw_insufficient_usable_balance() {
    let (mut service, wallet) = service_with_wallet(expect_events(1), true).await;
    service
      .deposit(
        Actor::Employee,
        wallet.id(),
        dec!(200),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await
      .unwrap();

    let result = service
      .withdraw(
        Actor::Employee,
        wallet.id(),
        dec!(1500),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await;

    assert_eq!(
      result,
      Err(LedgerError::Wallet(WalletError::InsufficientUsableBalance))
    );
  }

  #[tokio::test]
  async fn approve_and_deny_pending_transactions() {
    let (mut service, wallet) = service_with_wallet(expect_events(4), true).await;
    let employee = Actor::Employee;

    let deposit = service
      .deposit(employee, wallet.id(), dec!(1500), IBAN.to_string(), OppositePartyType::Iban)
      .await
      .unwrap();
    let deposit = service
      .approve_transaction(employee, deposit.id(), TransactionStatus::Approved)
      .await
      .unwrap();
    assert_eq!(deposit.status(), TransactionStatus::Approved);

    let withdraw = service
      .withdraw(employee, wallet.id(), dec!(1200), IBAN.to_string(), OppositePartyType::Iban)
      .await
      .unwrap();
    let stored = service.wallet(employee, wallet.id()).await.unwrap();
    assert_eq!((stored.balance(), stored.usable_balance()), (dec!(1500), dec!(300)));

    let withdraw = service
      .approve_transaction(employee, withdraw.id(), TransactionStatus::Denied)
      .await
      .unwrap();
    assert_eq!(withdraw.status(), TransactionStatus::Denied);

    let stored = service.wallet(employee, wallet.id()).await.unwrap();
    assert_eq!((stored.balance(), stored.usable_balance()), (dec!(1500), dec!(1500)));
    assert_eq!(
      service
        .list_transactions(
          employee,
          wallet.id(),
          TransactionFilter::all().with_status(TransactionStatus::Denied)
        )
        .await,
      Ok(vec![withdraw])
    );
  }

  #[tokio::test]
  async fn approve_final_transaction_fails() {
    let (mut service, wallet) = service_with_wallet(expect_events(1), true).await;
    let transaction = service
      .deposit(
        Actor::Employee,
        wallet.id(),
        dec!(200),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await
      .unwrap();

    let result = service
      .approve_transaction(Actor::Employee, transaction.id(), TransactionStatus::Denied)
      .await;

    assert_eq!(
      result,
      Err(LedgerError::Wallet(WalletError::TransactionNotPending(
        transaction.id()
      )))
    );
    assert_eq!(
      service.transaction(Actor::Employee, transaction.id()).await,
      Ok(transaction)
    );
  }

  #[tokio::test]
  async fn approve_unknown_transaction() {
    let mut service = LedgerService::new(InMemoryLedgerStore::new(), expect_events(0));
    let transaction_id = Uuid::new_v4();

    let result = service
      .approve_transaction(Actor::Employee, transaction_id, TransactionStatus::Approved)
      .await;

    assert_eq!(result, Err(LedgerError::TransactionNotFound(transaction_id)));
  }

  #[tokio::test]
  async fn transactions_of_another_customer_denied() {
    let (mut service, wallet) = service_with_wallet(silent_publisher(), true).await;
    let transaction = service
      .deposit(
        Actor::Employee,
        wallet.id(),
        dec!(2000),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await
      .unwrap();
    let stranger = Actor::Customer(Uuid::new_v4());

    assert_eq!(
      service.transaction(stranger, transaction.id()).await,
      Err(LedgerError::AccessDenied)
    );
    assert_eq!(
      service
        .list_transactions(stranger, wallet.id(), TransactionFilter::all())
        .await,
      Err(LedgerError::AccessDenied)
    );
    assert_eq!(
      service
        .approve_transaction(stranger, transaction.id(), TransactionStatus::Approved)
        .await,
      Err(LedgerError::AccessDenied)
    );
  }

  /// Keeps everything in memory but fails to save any movement
  struct UnreliableStore(InMemoryLedgerStore);

  #[async_trait]
  impl LedgerStore for UnreliableStore {
    async fn load_wallet(&self, id: WalletId) -> StoreResult<Option<Wallet>> {
      self.0.load_wallet(id).await
    }

    async fn save_wallet(&mut self, wallet: Wallet) -> StoreResult<()> {
      self.0.save_wallet(wallet).await
    }

    async fn save(&mut self, _wallet: Wallet, _transaction: Transaction) -> StoreResult<()> {
      Err(StoreError::Unavailable("disk full".to_string()))
    }

    async fn list_wallets(
      &self,
      customer_id: CustomerId,
      currency: Option<Currency>,
    ) -> StoreResult<Vec<Wallet>> {
      self.0.list_wallets(customer_id, currency).await
    }

    async fn load_transaction(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
      self.0.load_transaction(id).await
    }

    async fn list_transactions(
      &self,
      wallet_id: WalletId,
      filter: TransactionFilter,
    ) -> StoreResult<Vec<Transaction>> {
      self.0.list_transactions(wallet_id, filter).await
    }
  }

  #[tokio::test]
  async fn storage_failure_publishes_nothing() {
    let wallet = Wallet::new(Uuid::new_v4(), "Main".to_string(), "USD", true, true).unwrap();
    let wallet_id = wallet.id();
    let mut store = MockTestLedgerStore::new();
    store
      .expect_load_wallet()
      .returning(move |_| Ok(Some(wallet.clone())));
    store
      .expect_save()
      .times(1)
      .returning(|_, _| Err(StoreError::Unavailable("disk full".to_string())));
    store.expect_save_wallet().never();
    let mut service = LedgerService::new(store, expect_events(0));

    let result = service
      .deposit(
        Actor::Employee,
        wallet_id,
        dec!(10),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await;

    assert_eq!(
      result,
      Err(LedgerError::Store(StoreError::Unavailable(
        "disk full".to_string()
      )))
    );
  }

  #[tokio::test]
  async fn storage_failure_keeps_stored_state() {
    let store = UnreliableStore(InMemoryLedgerStore::new());
    let mut service = LedgerService::new(store, expect_events(0));
    let wallet = service
      .create_wallet(Actor::Employee, Uuid::new_v4(), "Main".to_string(), "USD", true, true)
      .await
      .unwrap();

    let result = service
      .deposit(
        Actor::Employee,
        wallet.id(),
        dec!(500),
        IBAN.to_string(),
        OppositePartyType::Iban,
      )
      .await;

    assert!(matches!(result, Err(LedgerError::Store(_))));
    assert_eq!(service.wallet(Actor::Employee, wallet.id()).await, Ok(wallet.clone()));
    assert_eq!(
      service
        .list_transactions(Actor::Employee, wallet.id(), TransactionFilter::all())
        .await,
      Ok(vec![])
    );
  }

  #[tokio::test]
  async fn deposit_overflow_rejected() {
    let (mut service, wallet) = service_with_wallet(expect_events(1), true).await;
    let huge = Decimal::MAX - dec!(1);
    service
      .deposit(Actor::Employee, wallet.id(), huge, IBAN.to_string(), OppositePartyType::Iban)
      .await
      .unwrap();

    let result = service
      .deposit(Actor::Employee, wallet.id(), huge, IBAN.to_string(), OppositePartyType::Iban)
      .await;

    assert_eq!(
      result,
      Err(LedgerError::Wallet(WalletError::BalanceOverflow(wallet.id())))
    );
    let stored = service.wallet(Actor::Employee, wallet.id()).await.unwrap();
    assert_eq!(stored.balance(), huge);
    assert_eq!(stored.usable_balance(), dec!(0));
  }
}
