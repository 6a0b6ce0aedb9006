use rust_decimal::Decimal;
use uuid::Uuid;

use super::currency::Currency;
use super::error::{Result, WalletError};
use super::event::WalletEvent;
use super::transaction::{
  CustomerId, OppositePartyType, Transaction, TransactionStatus, TransactionType, WalletId,
};

/// Amounts strictly above this threshold are held until someone approves or denies them.
/// It is applied as is to every currency.
pub const APPROVAL_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// A customer wallet and the rules that move its balances.
///
/// - `balance` is the gross total: deposits count as soon as they arrive, withdrawals once they are settled.
/// - `usable_balance` is what the customer can draw on: deposits count once approved, withdrawals are held immediately.
///
/// Balances are computed before anything is changed, so an operation that would overflow them leaves the wallet as it was.
/// Both figures only change through [`Wallet::deposit`], [`Wallet::withdraw`] and [`Wallet::apply_transaction_approval`].
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
  id: WalletId,
  customer_id: CustomerId,
  name: String,
  currency: Currency,
  active_for_shopping: bool,
  active_for_withdraw: bool,
  balance: Decimal,
  usable_balance: Decimal,
}

impl Wallet {
  pub fn new(
    customer_id: CustomerId,
    name: String,
    currency: &str,
    active_for_shopping: bool,
    active_for_withdraw: bool,
  ) -> Result<Self> {
    if customer_id.is_nil() {
      return Err(WalletError::MissingCustomerId);
    }

    Ok(Self {
      id: Uuid::new_v4(),
      customer_id,
      name,
      currency: Currency::new(currency)?,
      active_for_shopping,
      active_for_withdraw,
      balance: Decimal::ZERO,
      usable_balance: Decimal::ZERO,
    })
  }

  #[cfg(test)]
  pub fn with_balances(mut self, balance: Decimal, usable_balance: Decimal) -> Self {
    self.balance = balance;
    self.usable_balance = usable_balance;
    self
  }

  pub fn id(&self) -> WalletId {
    self.id
  }

  pub fn customer_id(&self) -> CustomerId {
    self.customer_id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn currency(&self) -> Currency {
    self.currency
  }

  pub fn active_for_shopping(&self) -> bool {
    self.active_for_shopping
  }

  pub fn active_for_withdraw(&self) -> bool {
    self.active_for_withdraw
  }

  pub fn balance(&self) -> Decimal {
    self.balance
  }

  pub fn usable_balance(&self) -> Decimal {
    self.usable_balance
  }

  /// Records money coming in. The gross balance grows right away,
  /// the usable balance only if the amount does not need approval.
  pub fn deposit(
    &mut self,
    amount: Decimal,
    source: String,
    party_type: OppositePartyType,
  ) -> Result<(Transaction, WalletEvent)> {
    let status = initial_status(amount);
    let balance = self.add(self.balance, amount)?;
    let usable_balance = if status == TransactionStatus::Approved {
      self.add(self.usable_balance, amount)?
    } else {
      self.usable_balance
    };

    let transaction = Transaction::deposit(self.id, amount, source, party_type, status);
    self.balance = balance;
    self.usable_balance = usable_balance;

    let event = WalletEvent::transaction_created(&transaction);
    Ok((transaction, event))
  }

  /// Records money going out. The amount is held from the usable balance right away,
  /// and the gross balance is only settled if the amount does not need approval.
  pub fn withdraw(
    &mut self,
    amount: Decimal,
    destination: String,
    party_type: OppositePartyType,
  ) -> Result<(Transaction, WalletEvent)> {
    if !self.active_for_withdraw {
      Err(WalletError::WithdrawNotAllowed(self.id))
    } else if self.usable_balance < amount {
      Err(WalletError::InsufficientUsableBalance)
    } else {
      let status = initial_status(amount);
      let usable_balance = self.subtract(self.usable_balance, amount)?;
      let balance = if status == TransactionStatus::Approved {
        self.subtract(self.balance, amount)?
      } else {
        self.balance
      };

      let transaction = Transaction::withdraw(self.id, amount, destination, party_type, status);
      self.balance = balance;
      self.usable_balance = usable_balance;

      let event = WalletEvent::transaction_created(&transaction);
      Ok((transaction, event))
    }
  }

  /// Resolves a pending transaction of this wallet, applying the balance effect deferred at creation.
  ///
  /// Denying a deposit leaves `balance` as it is: the amount counted on arrival is not reversed.
  pub fn apply_transaction_approval(
    &mut self,
    transaction: &mut Transaction,
    new_status: TransactionStatus,
  ) -> Result<WalletEvent> {
    if transaction.wallet_id() != self.id {
      return Err(WalletError::ForeignTransaction(transaction.id(), self.id));
    }
    if !transaction.is_pending() {
      return Err(WalletError::TransactionNotPending(transaction.id()));
    }

    let amount = transaction.amount();
    let (balance, usable_balance) = match (transaction.kind(), new_status) {
      (TransactionType::Deposit, TransactionStatus::Approved) => {
        (self.balance, self.add(self.usable_balance, amount)?)
      }
      (TransactionType::Withdraw, TransactionStatus::Approved) => {
        (self.subtract(self.balance, amount)?, self.usable_balance)
      }
      (TransactionType::Deposit, TransactionStatus::Denied) => (self.balance, self.usable_balance),
      (TransactionType::Withdraw, TransactionStatus::Denied) => {
        (self.balance, self.add(self.usable_balance, amount)?)
      }
      (_, TransactionStatus::Pending) => (self.balance, self.usable_balance),
    };

    transaction.set_status(new_status)?;
    self.balance = balance;
    self.usable_balance = usable_balance;

    Ok(WalletEvent::status_changed(transaction))
  }

  fn add(&self, value: Decimal, amount: Decimal) -> Result<Decimal> {
    value
      .checked_add(amount)
      .ok_or(WalletError::BalanceOverflow(self.id))
  }

  fn subtract(&self, value: Decimal, amount: Decimal) -> Result<Decimal> {
    value
      .checked_sub(amount)
      .ok_or(WalletError::BalanceOverflow(self.id))
  }
}

fn initial_status(amount: Decimal) -> TransactionStatus {
  if amount > APPROVAL_THRESHOLD {
    TransactionStatus::Pending
  } else {
    TransactionStatus::Approved
  }
}
