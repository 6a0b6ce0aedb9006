use rust_decimal::Decimal;

use super::service::Actor;
use crate::wallet::{CustomerId, OppositePartyType, TransactionStatus};

/// Label given to a wallet or a transaction within a batch of commands,
/// since their IDs are only known once they have been created.
pub type Reference = String;

/// Representation of the operations that can be requested to the ledger.
/// Amounts, names and statuses are expected to be validated already.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
  CreateWallet {
    actor: Actor,
    wallet: Reference,
    customer_id: CustomerId,
    name: String,
    currency: String,
    active_for_shopping: bool,
    active_for_withdraw: bool,
  },
  Deposit {
    actor: Actor,
    wallet: Reference,
    transaction: Reference,
    amount: Decimal,
    party_type: OppositePartyType,
    source: String,
  },
  Withdraw {
    actor: Actor,
    wallet: Reference,
    transaction: Reference,
    amount: Decimal,
    party_type: OppositePartyType,
    destination: String,
  },
  Approve {
    actor: Actor,
    transaction: Reference,
    status: TransactionStatus,
  },
}
