//! This module contains all the components needed to read commands and write reports from files (specifically CSV)
//!
//! The [`reader`] module contains a reader of ledger commands from CSV and the [`writer`] module contains a report writer into CSV.
//! It would be possible to add new file formats by implementing the traits [`CommandsReader`] and [`ReportWriter`] respectively.
//!
//! The [`command`] and [`report`] modules contain structs needed to serialize/deserialize data.
//! They are intentionally duplicated from the domain model to decouple the IO details from the domain logic and allow their evolution independently.
//! This is also where requests are validated before they reach the ledger (positive amounts with at most 4 decimals, required fields, ...).
//!

mod command;
mod reader;
mod report;
mod writer;

pub use reader::{CommandsReader, CsvCommandsReader};
pub use writer::{CsvReportWriter, ReportWriter};
