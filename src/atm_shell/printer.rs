use std::{fmt, io::Write};

use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::{Transaction, TransactionKind};

/// Renders one history entry the way the ATM screen shows it,
/// e.g. `Transfer to bob: $-40`.
pub struct HistoryLine<'a>(pub &'a Transaction);

impl fmt::Display for HistoryLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tx = self.0;
        match (tx.kind(), tx.counterparty()) {
            (TransactionKind::Deposit, _) => write!(f, "Deposit")?,
            (TransactionKind::Withdrawal, _) => write!(f, "Withdrawal")?,
            (TransactionKind::TransferOut, Some(to)) => write!(f, "Transfer to {to}")?,
            (TransactionKind::TransferIn, Some(from)) => write!(f, "Transfer from {from}")?,
            // never produced by Account: both transfer halves name the other side
            (TransactionKind::TransferOut, None) => write!(f, "Transfer out")?,
            (TransactionKind::TransferIn, None) => write!(f, "Transfer in")?,
        }
        write!(f, ": ${}", tx.amount())
    }
}

#[derive(Debug, Serialize)]
pub struct AccountSummary<'a> {
    pub user: &'a str,
    pub balance: Decimal,
    pub transactions: usize,
}

pub fn print_summary<'a, W>(
    output: &mut W,
    accounts: impl Iterator<Item = AccountSummary<'a>>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in accounts {
        if let Err(err) = writer.serialize(acc) {
            anyhow::bail!("Failed to write account summary: {err}")
        }
    }
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
