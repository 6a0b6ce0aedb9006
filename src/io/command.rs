use std::convert::TryFrom;

use anyhow::{anyhow, bail, Context, Result};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::Deserialize;
use uuid::Uuid;

use crate::ledger::{Actor, Command};
use crate::wallet::{OppositePartyType, TransactionStatus};

/// Amounts are accepted with up to this number of decimals
const MAX_PRECISION: u32 = 4;

/// Amounts are accepted with up to this number of integer digits
const MAX_INTEGER_DIGITS: u32 = 15;

const EMPLOYEE: &str = "employee";

/// The movements supported by the reader
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
  Deposit,
  Withdraw,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartyType {
  Iban,
  Payment,
}

/// The statuses a pending transaction can be resolved into
#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Resolution {
  Approved,
  Denied,
}

/// A deserializable wallet creation: `wallet, actor, wallet_ref, customer, name, currency[, shopping, withdraw]`
#[derive(Debug, Deserialize)]
pub struct WalletRecord {
  _command: IgnoredAny,
  actor: String,
  wallet: String,
  customer: Uuid,
  name: String,
  currency: String,
  active_for_shopping: Option<bool>,
  active_for_withdraw: Option<bool>,
}

impl WalletRecord {
  pub const FIELDS: usize = 8;
}

/// A deserializable deposit or withdraw: `type, actor, wallet_ref, transaction_ref, amount, party_type, party`
#[derive(Debug, Deserialize)]
pub struct MovementRecord {
  #[serde(rename = "type")]
  kind: MovementType,
  actor: String,
  wallet: String,
  transaction: String,
  amount: Decimal,
  party_type: PartyType,
  party: String,
}

impl MovementRecord {
  pub const FIELDS: usize = 7;
}

/// A deserializable approval: `approve, actor, transaction_ref, status`
#[derive(Debug, Deserialize)]
pub struct ApprovalRecord {
  _command: IgnoredAny,
  actor: String,
  transaction: String,
  status: Resolution,
}

impl ApprovalRecord {
  pub const FIELDS: usize = 4;
}

impl TryFrom<WalletRecord> for Command {
  type Error = anyhow::Error;

  fn try_from(record: WalletRecord) -> Result<Self> {
    Ok(Command::CreateWallet {
      actor: parse_actor(&record.actor)?,
      wallet: required("wallet", record.wallet)?,
      customer_id: record.customer,
      name: required("name", record.name)?,
      currency: record.currency,
      active_for_shopping: record.active_for_shopping.unwrap_or(true),
      active_for_withdraw: record.active_for_withdraw.unwrap_or(true),
    })
  }
}

impl TryFrom<MovementRecord> for Command {
  type Error = anyhow::Error;

  fn try_from(record: MovementRecord) -> Result<Self> {
    let actor = parse_actor(&record.actor)?;
    let wallet = required("wallet", record.wallet)?;
    let transaction = required("transaction", record.transaction)?;
    let amount = validate_amount(record.amount)?;
    let party_type = record.party_type.into();
    let party = required("party", record.party)?;

    Ok(match record.kind {
      MovementType::Deposit => Command::Deposit {
        actor,
        wallet,
        transaction,
        amount,
        party_type,
        source: party,
      },
      MovementType::Withdraw => Command::Withdraw {
        actor,
        wallet,
        transaction,
        amount,
        party_type,
        destination: party,
      },
    })
  }
}

impl TryFrom<ApprovalRecord> for Command {
  type Error = anyhow::Error;

  fn try_from(record: ApprovalRecord) -> Result<Self> {
    Ok(Command::Approve {
      actor: parse_actor(&record.actor)?,
      transaction: required("transaction", record.transaction)?,
      status: record.status.into(),
    })
  }
}

impl From<PartyType> for OppositePartyType {
  fn from(party_type: PartyType) -> Self {
    match party_type {
      PartyType::Iban => OppositePartyType::Iban,
      PartyType::Payment => OppositePartyType::Payment,
    }
  }
}

impl From<Resolution> for TransactionStatus {
  fn from(resolution: Resolution) -> Self {
    match resolution {
      Resolution::Approved => TransactionStatus::Approved,
      Resolution::Denied => TransactionStatus::Denied,
    }
  }
}

fn parse_actor(actor: &str) -> Result<Actor> {
  if actor == EMPLOYEE {
    Ok(Actor::Employee)
  } else {
    Uuid::parse_str(actor)
      .map(Actor::Customer)
      .with_context(|| format!("Invalid actor: {:?}", actor))
  }
}

fn required(field: &str, value: String) -> Result<String> {
  if value.trim().is_empty() {
    Err(anyhow!("Missing {}", field))
  } else {
    Ok(value)
  }
}

fn validate_amount(amount: Decimal) -> Result<Decimal> {
  if amount <= Decimal::ZERO {
    bail!("Amount must be greater than zero: {}", amount)
  }
  if amount.trunc() >= Decimal::from(10u64.pow(MAX_INTEGER_DIGITS)) {
    bail!(
      "Amount has more than {} integer digits: {}",
      MAX_INTEGER_DIGITS,
      amount
    )
  }
  if amount.normalize().scale() > MAX_PRECISION {
    bail!(
      "Amount has more than {} decimals: {}",
      MAX_PRECISION,
      amount
    )
  }
  Ok(amount)
}
