mod config;
mod io;
mod ledger;
mod processors;
mod wallet;

use anyhow::Result;
use clap::Parser;
use tokio::io::AsyncRead;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::io::{CsvCommandsReader, CsvReportWriter};
use crate::ledger::{InMemoryLedgerStore, LedgerService, TracingEventPublisher};

#[tokio::main]
async fn main() -> Result<()> {
  let config = Config::parse();

  tracing_subscriber::registry()
    .with(EnvFilter::try_new(&config.log_level)?)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let reader = get_commands_async_read(&config).await?;
  let commands_reader = CsvCommandsReader::new(reader);
  let ledger = LedgerService::new(InMemoryLedgerStore::new(), TracingEventPublisher);
  let report_writer = CsvReportWriter::new(tokio::io::stdout());

  let filter = config.report_filter();
  processors::simple::run(commands_reader, ledger, report_writer, config.report, filter).await
}

type CommandsAsyncRead = Box<dyn AsyncRead + Unpin + Send + Sync>;

/// This allows to use either a file if the path is specified in the command line,
/// or the stdin otherwise, which might be more convenient for pipe the data.
async fn get_commands_async_read(config: &Config) -> Result<CommandsAsyncRead> {
  match &config.input {
    Some(path) => tokio::fs::File::open(path)
      .await
      .map(|file| Box::new(file) as CommandsAsyncRead)
      .map_err(anyhow::Error::from),
    None => Ok(Box::new(tokio::io::stdin()) as CommandsAsyncRead),
  }
}
