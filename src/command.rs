use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::account::UserId;

/// Balance-changing actions a user can request against their own account.
///
/// Crediting the receiving side of a transfer is not a command: it is applied
/// directly once the paired debit succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    Deposit,
    Withdraw,
    TransferOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCommand {
    pub action: AccountAction,
    pub amount: Decimal,
    pub counterparty: Option<UserId>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountCommandError {
    #[error("Amount must be greater than zero for {action:?}, got {amount}")]
    InvalidAmount {
        action: AccountAction,
        amount: Decimal,
    },
}

impl AccountCommand {
    pub fn deposit(amount: Decimal) -> Result<Self, AccountCommandError> {
        Self::parse_command(AccountAction::Deposit, amount, None)
    }

    pub fn withdraw(amount: Decimal) -> Result<Self, AccountCommandError> {
        Self::parse_command(AccountAction::Withdraw, amount, None)
    }

    pub fn transfer_out(amount: Decimal, to: UserId) -> Result<Self, AccountCommandError> {
        Self::parse_command(AccountAction::TransferOut, amount, Some(to))
    }

    fn parse_command(
        action: AccountAction,
        amount: Decimal,
        counterparty: Option<UserId>,
    ) -> Result<Self, AccountCommandError> {
        if amount <= Decimal::zero() {
            return Err(AccountCommandError::InvalidAmount { action, amount });
        }
        Ok(Self {
            action,
            amount,
            counterparty,
        })
    }
}
