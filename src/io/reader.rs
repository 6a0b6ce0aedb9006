use std::convert::TryFrom;

use anyhow::{bail, Result};
use csv_async::StringRecord;
use tokio::io::AsyncRead;
use tokio_stream::{Stream, StreamExt};

use super::command::{ApprovalRecord, MovementRecord, WalletRecord};
use crate::ledger::Command;

const COMMENT: char = '#';

/// Interface to read ledger commands from an external source
pub trait CommandsReader {
  /// Read commands and return an [`Stream`] of possibly successful commands.
  /// Each item yielded by the stream is either `Ok` if the command was read successfully,
  /// or `Err` if there was any kind of problem (like wrong format or invalid values).
  fn read_commands<'a>(&'a mut self) -> Box<dyn Stream<Item = Result<Command>> + Unpin + 'a>;
}

/// Implementation of [`CommandsReader`] for the CSV format.
///
/// There is no header row, each row starts with the command name and rows have different lengths.
/// Rows whose first field starts with `#` are ignored.
pub struct CsvCommandsReader<R>(R);

impl<R> CsvCommandsReader<R>
where
  R: AsyncRead + Unpin + Send + Sync,
{
  pub fn new(reader: R) -> Self {
    Self(reader)
  }
}

impl<R> CommandsReader for CsvCommandsReader<R>
where
  R: AsyncRead + Unpin + Send + Sync,
{
  fn read_commands<'a>(&'a mut self) -> Box<dyn Stream<Item = Result<Command>> + Unpin + 'a> {
    Box::new(
      csv_async::AsyncReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .create_reader(&mut self.0)
        .into_records()
        .filter_map(|maybe_record| match maybe_record {
          Ok(mut record) => {
            record.trim();
            if is_comment(&record) {
              None
            } else {
              Some(parse_command(record))
            }
          }
          Err(err) => Some(Err(anyhow::Error::from(err))),
        }),
    )
  }
}

fn is_comment(record: &StringRecord) -> bool {
  record
    .get(0)
    .map_or(false, |field| field.starts_with(COMMENT))
}

fn parse_command(mut record: StringRecord) -> Result<Command> {
  let command = record.get(0).unwrap_or_default().to_string();
  match command.as_str() {
    "wallet" => {
      check_length(&record, WalletRecord::FIELDS)?;
      pad(&mut record, WalletRecord::FIELDS);
      Command::try_from(record.deserialize::<WalletRecord>(None)?)
    }
    "deposit" | "withdraw" => {
      check_length(&record, MovementRecord::FIELDS)?;
      Command::try_from(record.deserialize::<MovementRecord>(None)?)
    }
    "approve" => {
      check_length(&record, ApprovalRecord::FIELDS)?;
      Command::try_from(record.deserialize::<ApprovalRecord>(None)?)
    }
    other => bail!("Unknown command: {:?}", other),
  }
}

fn check_length(record: &StringRecord, fields: usize) -> Result<()> {
  if record.len() > fields {
    bail!(
      "Too many fields: expected at most {}, found {}",
      fields,
      record.len()
    )
  }
  Ok(())
}

/// Optional trailing fields are allowed to be left out
fn pad(record: &mut StringRecord, fields: usize) {
  while record.len() < fields {
    record.push_field("");
  }
}
