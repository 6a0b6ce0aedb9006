//! This module contains the use cases built on top of the wallet rules
//!
//! The [`LedgerService`] checks who is acting, loads and saves wallets and transactions through a [`LedgerStore`],
//! and forwards the resulting events to an [`EventPublisher`].
//! The [`InMemoryLedgerStore`] is a dummy implementation of a [`LedgerStore`] that keeps everything in memory.
//

mod command;
mod event;
mod report;
mod service;
mod store;

pub use command::{Command, Reference};
pub use event::{EventPublisher, TracingEventPublisher};
pub use report::{TransactionReport, WalletReport};
pub use service::{Actor, LedgerService};
pub use store::{InMemoryLedgerStore, LedgerStore, TransactionFilter};
