use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWrite;

use crate::ledger::{TransactionReport, WalletReport};

/// Interface for a ledger report writer
#[async_trait(?Send)]
pub trait ReportWriter {
  /// Write the wallets provided by the [`Iterator`] and return whether the operation was successful or not.
  async fn write_wallets_report<'a, T>(&'a mut self, report: T) -> Result<()>
  where
    T: Iterator<Item = WalletReport> + 'a;

  /// Write the transactions provided by the [`Iterator`] and return whether the operation was successful or not.
  async fn write_transactions_report<'a, T>(&'a mut self, report: T) -> Result<()>
  where
    T: Iterator<Item = TransactionReport> + 'a;
}

/// An implementation of [`ReportWriter`] for the CSV format.
pub struct CsvReportWriter<W>(W);

impl<W> CsvReportWriter<W>
where
  W: AsyncWrite + Unpin + Send + Sync,
{
  pub fn new(writer: W) -> Self {
    Self(writer)
  }

  async fn write_rows<T, S>(&mut self, rows: T) -> Result<()>
  where
    T: Iterator<Item = S>,
    S: Serialize,
  {
    let mut serializer = csv_async::AsyncSerializer::from_writer(&mut self.0);
    for row in rows {
      serializer.serialize(row).await?;
    }
    serializer.flush().await?;
    Ok(())
  }
}

#[async_trait(?Send)]
impl<W> ReportWriter for CsvReportWriter<W>
where
  W: AsyncWrite + Unpin + Send + Sync,
{
  async fn write_wallets_report<'a, T>(&'a mut self, report: T) -> Result<()>
  where
    T: Iterator<Item = WalletReport> + 'a,
  {
    self
      .write_rows(report.map(super::report::WalletReport::from))
      .await
  }

  async fn write_transactions_report<'a, T>(&'a mut self, report: T) -> Result<()>
  where
    T: Iterator<Item = TransactionReport> + 'a,
  {
    self
      .write_rows(report.map(super::report::TransactionReport::from))
      .await
  }
}

#[cfg(test)]
mod tests {

  use rust_decimal_macros::dec;
  use std::io::Cursor;
  use std::iter;
  use uuid::Uuid;

  use super::*;
  use crate::wallet::{Currency, OppositePartyType, Wallet};

  const WALLET_ID: &str = "0f8a5a52-1d3c-4c62-9a35-0b5f0e0c9a11";
  const CUSTOMER_ID: &str = "5b7e4bd8-5ad4-4a1c-9c6e-2f64c3f4d1a1";

  fn wallet_report(reference: &str, balance: rust_decimal::Decimal) -> WalletReport {
    WalletReport {
      reference: reference.to_string(),
      id: Uuid::parse_str(WALLET_ID).unwrap(),
      customer_id: Uuid::parse_str(CUSTOMER_ID).unwrap(),
      name: "Main".to_string(),
      currency: Currency::Usd,
      balance,
      usable_balance: dec!(0),
      active_for_shopping: true,
      active_for_withdraw: false,
    }
  }

  #[tokio::test]
  async fn write_wallets_report_fails() {
    let buff: &mut [u8] = &mut [0u8, 0, 0, 0];
    let mut buffer = Cursor::new(buff);
    let mut writer = CsvReportWriter::new(&mut buffer);

    let report = vec![wallet_report("main", dec!(100))].into_iter();

    let result = writer.write_wallets_report(report).await;

    assert!(result.is_err());
  }

  #[tokio::test]
  async fn write_wallets_empty() {
    let mut buffer = Vec::<u8>::with_capacity(1024);
    let mut writer = CsvReportWriter::new(&mut buffer);

    let result = writer.write_wallets_report(iter::empty()).await;

    assert!(result.is_ok());
    assert_eq!(String::from_utf8_lossy(buffer.as_slice()), "".to_string())
  }

  #[tokio::test]
  async fn write_wallets_report_success() {
    let mut buffer = Vec::<u8>::with_capacity(1024);
    let mut writer = CsvReportWriter::new(&mut buffer);

    let report = vec![
      wallet_report("main", dec!(1500)),
      wallet_report("other", dec!(10.25)),
    ]
    .into_iter();

    let result = writer.write_wallets_report(report).await;

    assert!(result.is_ok());
    assert_eq!(
      String::from_utf8_lossy(buffer.as_slice()),
      format!(
        "wallet,id,customer,name,currency,balance,usable_balance,active_for_shopping,active_for_withdraw\n\
         main,{w},{c},Main,USD,1500,0,true,false\n\
         other,{w},{c},Main,USD,10.25,0,true,false\n",
        w = WALLET_ID,
        c = CUSTOMER_ID
      )
    )
  }

  #[tokio::test]
  async fn write_transactions_report_success() {
    let mut wallet = Wallet::new(Uuid::new_v4(), "Main".to_string(), "USD", true, true).unwrap();
    let (deposit, _) = wallet.deposit(dec!(1500), "TR1".to_string(), OppositePartyType::Iban).unwrap();
    let expected = format!(
      "wallet,id,type,status,amount,opposite_party_type,opposite_party\n\
       main,{},DEPOSIT,PENDING,1500,IBAN,TR1\n",
      deposit.id()
    );
    let mut buffer = Vec::<u8>::with_capacity(1024);
    let mut writer = CsvReportWriter::new(&mut buffer);

    let result = writer
      .write_transactions_report(
        vec![TransactionReport::new("main".to_string(), deposit)].into_iter(),
      )
      .await;

    assert!(result.is_ok());
    assert_eq!(String::from_utf8_lossy(buffer.as_slice()), expected);
  }
}
