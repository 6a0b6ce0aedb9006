use std::fmt;
use std::str::FromStr;

use super::error::{Result, WalletError};

/// Currencies a wallet can be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
  Try,
  Usd,
  Eur,
}

impl Currency {
  /// Builds a currency from its ISO code. Codes are case sensitive.
  pub fn new(code: &str) -> Result<Self> {
    match code {
      "TRY" => Ok(Currency::Try),
      "USD" => Ok(Currency::Usd),
      "EUR" => Ok(Currency::Eur),
      other => Err(WalletError::InvalidCurrency(other.to_string())),
    }
  }

  pub fn code(&self) -> &'static str {
    match self {
      Currency::Try => "TRY",
      Currency::Usd => "USD",
      Currency::Eur => "EUR",
    }
  }
}

impl FromStr for Currency {
  type Err = WalletError;

  fn from_str(code: &str) -> Result<Self> {
    Currency::new(code)
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}
