use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};
use tokio_stream::StreamExt;

use crate::config::{Report, ReportFilter};
use crate::io::{CommandsReader, ReportWriter};
use crate::ledger::{
  Actor, Command, EventPublisher, LedgerService, LedgerStore, Reference, TransactionReport,
  WalletReport,
};
use crate::wallet::{CustomerId, TransactionId, Wallet, WalletId};

/// This is a simple processor of ledger commands that
/// - reads commands from a [`CommandsReader`]
/// - applies them using a [`LedgerService`]
/// - writes a report of the wallets or their transactions using a [`ReportWriter`]
///
/// Commands refer to wallets and transactions through references chosen in the input,
/// and the processor keeps track of the IDs they were given once created.
///
/// Commands that can not be read or are rejected by the ledger are logged and skipped,
/// so a single wrong line does not prevent the rest of the batch from being processed.
/// The report is produced on behalf of an employee. It lists the wallets grouped by customer,
/// in the order customers first appear in the batch, restricted to what the [`ReportFilter`] selects.
pub async fn run<R, S, P, W>(
  mut commands_reader: R,
  mut ledger: LedgerService<S, P>,
  mut report_writer: W,
  report: Report,
  filter: ReportFilter,
) -> Result<()>
where
  R: CommandsReader,
  S: LedgerStore + Send + Sync,
  P: EventPublisher + Send,
  W: ReportWriter,
{
  let mut references = References::default();
  let mut commands = commands_reader.read_commands();
  let mut line = 0usize;

  while let Some(maybe_command) = commands.next().await {
    line += 1;
    let result = match maybe_command {
      Ok(command) => process(&mut ledger, &mut references, command).await,
      Err(err) => Err(err),
    };
    if let Err(err) = result {
      tracing::warn!(command = line, error = %err, "Skipping command");
    }
  }

  tracing::info!(
    commands = line,
    wallets = references.wallet_ids.len(),
    transactions = references.transactions.len(),
    "Commands processed"
  );

  let wallets = selected_wallets(&ledger, &references, &filter).await?;

  match report {
    Report::Wallets => {
      let rows = wallets
        .into_iter()
        .map(|(reference, wallet)| WalletReport::new(reference, &wallet))
        .collect::<Vec<_>>();
      report_writer.write_wallets_report(rows.into_iter()).await
    }
    Report::Transactions => {
      let mut rows = Vec::new();
      for (reference, wallet) in wallets {
        let transactions = ledger
          .list_transactions(Actor::Employee, wallet.id(), filter.transactions)
          .await?;
        rows.extend(
          transactions
            .into_iter()
            .map(|transaction| TransactionReport::new(reference.clone(), transaction)),
        );
      }
      report_writer.write_transactions_report(rows.into_iter()).await
    }
  }
}

async fn selected_wallets<S, P>(
  ledger: &LedgerService<S, P>,
  references: &References,
  filter: &ReportFilter,
) -> Result<Vec<(Reference, Wallet)>>
where
  S: LedgerStore + Send + Sync,
  P: EventPublisher + Send,
{
  let customers = match filter.customer {
    Some(customer_id) => vec![customer_id],
    None => references.customers.clone(),
  };

  let mut selected = Vec::new();
  for customer_id in customers {
    let wallets = ledger
      .list_wallets(Actor::Employee, customer_id, filter.currency)
      .await?;
    for wallet in wallets {
      if let Some(reference) = references.wallet_reference(wallet.id()) {
        selected.push((reference.clone(), wallet));
      }
    }
  }
  Ok(selected)
}

async fn process<S, P>(
  ledger: &mut LedgerService<S, P>,
  references: &mut References,
  command: Command,
) -> Result<()>
where
  S: LedgerStore + Send + Sync,
  P: EventPublisher + Send,
{
  match command {
    Command::CreateWallet {
      actor,
      wallet,
      customer_id,
      name,
      currency,
      active_for_shopping,
      active_for_withdraw,
    } => {
      references.check_new_wallet(&wallet)?;
      let created = ledger
        .create_wallet(
          actor,
          customer_id,
          name,
          &currency,
          active_for_shopping,
          active_for_withdraw,
        )
        .await?;
      references.add_wallet(wallet, &created);
    }
    Command::Deposit {
      actor,
      wallet,
      transaction,
      amount,
      party_type,
      source,
    } => {
      let wallet_id = references.wallet(&wallet)?;
      references.check_new_transaction(&transaction)?;
      let created = ledger
        .deposit(actor, wallet_id, amount, source, party_type)
        .await?;
      references.add_transaction(transaction, created.id());
    }
    Command::Withdraw {
      actor,
      wallet,
      transaction,
      amount,
      party_type,
      destination,
    } => {
      let wallet_id = references.wallet(&wallet)?;
      references.check_new_transaction(&transaction)?;
      let created = ledger
        .withdraw(actor, wallet_id, amount, destination, party_type)
        .await?;
      references.add_transaction(transaction, created.id());
    }
    Command::Approve {
      actor,
      transaction,
      status,
    } => {
      let transaction_id = references.transaction(&transaction)?;
      ledger
        .approve_transaction(actor, transaction_id, status)
        .await?;
    }
  }
  Ok(())
}

/// IDs given to the references used in a batch of commands.
#[derive(Debug, Default)]
struct References {
  /// Owners of the wallets, in order of appearance
  customers: Vec<CustomerId>,
  wallet_ids: HashMap<Reference, WalletId>,
  wallet_references: HashMap<WalletId, Reference>,
  transactions: HashMap<Reference, TransactionId>,
}

impl References {
  fn check_new_wallet(&self, reference: &str) -> Result<()> {
    if self.wallet_ids.contains_key(reference) {
      bail!("Duplicated wallet reference: {}", reference)
    }
    Ok(())
  }

  fn add_wallet(&mut self, reference: Reference, wallet: &Wallet) {
    if !self.customers.contains(&wallet.customer_id()) {
      self.customers.push(wallet.customer_id());
    }
    self.wallet_ids.insert(reference.clone(), wallet.id());
    self.wallet_references.insert(wallet.id(), reference);
  }

  fn wallet_reference(&self, wallet_id: WalletId) -> Option<&Reference> {
    self.wallet_references.get(&wallet_id)
  }

  fn wallet(&self, reference: &str) -> Result<WalletId> {
    self
      .wallet_ids
      .get(reference)
      .copied()
      .ok_or_else(|| anyhow!("Unknown wallet reference: {}", reference))
  }

  fn check_new_transaction(&self, reference: &str) -> Result<()> {
    if self.transactions.contains_key(reference) {
      bail!("Duplicated transaction reference: {}", reference)
    }
    Ok(())
  }

  fn add_transaction(&mut self, reference: Reference, transaction_id: TransactionId) {
    self.transactions.insert(reference, transaction_id);
  }

  fn transaction(&self, reference: &str) -> Result<TransactionId> {
    self
      .transactions
      .get(reference)
      .copied()
      .ok_or_else(|| anyhow!("Unknown transaction reference: {}", reference))
  }
}
