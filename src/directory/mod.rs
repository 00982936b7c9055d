use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{Account, AccountError, UserId},
    credential::Pin,
};

pub mod in_memory_directory;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("User `{0}` is already registered")]
    DuplicateUser(UserId),
    #[error("User `{0}` not found")]
    UserNotFound(UserId),
    #[error("Incorrect PIN")]
    IncorrectPin,
    #[error("Recipient `{0}` not found")]
    RecipientNotFound(UserId),
    #[error("Cannot transfer money to your own account")]
    SelfTransfer,
    #[error(transparent)]
    AccountErr(#[from] AccountError),
}

/// Registry of every account known to the ATM.
///
/// Accounts are never removed; the directory lives as long as the process.
pub trait AccountDirectory {
    /// Creates an empty account and returns its freshly generated PIN.
    fn register(&mut self, user_id: UserId) -> Result<Pin, DirectoryError>;

    fn authenticate(&self, user_id: &str, pin: &str) -> Result<&Account, DirectoryError>;

    fn account(&self, user_id: &str) -> Result<&Account, DirectoryError>;

    fn account_mut(&mut self, user_id: &str) -> Result<&mut Account, DirectoryError>;

    /// Checks that `recipient` can receive a transfer from `sender`, before any
    /// amount is known: the recipient must exist and differ from the sender.
    fn check_transfer_target(&self, sender: &str, recipient: &str) -> Result<(), DirectoryError> {
        if self.account(recipient).is_err() {
            return Err(DirectoryError::RecipientNotFound(recipient.to_string()));
        }
        if sender == recipient {
            return Err(DirectoryError::SelfTransfer);
        }
        Ok(())
    }

    /// Moves `amount` from `sender` to `recipient`. Either both sides are
    /// recorded or neither is.
    fn transfer(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: Decimal,
    ) -> Result<(), DirectoryError>;

    fn accounts(&self) -> impl Iterator<Item = &Account>;
}
