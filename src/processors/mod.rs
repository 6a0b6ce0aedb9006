//! Processors drive a whole batch of commands from a reader into the ledger and write the final report.

pub mod simple;
