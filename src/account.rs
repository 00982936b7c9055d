use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;
use tracing::debug;

use crate::{
    command::{AccountAction, AccountCommand, AccountCommandError},
    credential::Pin,
};

pub type UserId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    TransferOut,
    TransferIn,
}

/// One entry of an account's history. The amount is signed: positive for
/// money coming in, negative for money going out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    kind: TransactionKind,
    amount: Decimal,
    counterparty: Option<UserId>,
}

impl Transaction {
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Decimal,
        counterparty: Option<UserId>,
    ) -> Self {
        Self {
            kind,
            amount,
            counterparty,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The other side of a transfer, `None` for deposits and withdrawals.
    pub fn counterparty(&self) -> Option<&str> {
        self.counterparty.as_deref()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error(transparent)]
    Command(#[from] AccountCommandError),
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Crediting {amount} would overflow the balance")]
    BalanceOverflow { amount: Decimal },
}

/// A registered user's balance and history.
///
/// The balance changes only through [`Account::deposit`], [`Account::withdraw`]
/// and the two transfer halves, so history entries cannot be replayed:
///
/// ```compile_fail
/// use cute_atm::account::Account;
///
/// let mut acc = Account::new("alice".to_string(), "0000".parse().unwrap());
/// acc.deposit(60.into()).unwrap();
/// let entry = acc.history()[0].clone();
/// acc.apply(entry);
/// ```
#[derive(Debug)]
pub struct Account {
    user_id: UserId,
    pin: Pin,
    balance: Decimal,
    history: Vec<Transaction>,
}

impl Account {
    pub fn new(user_id: UserId, pin: Pin) -> Self {
        Self {
            user_id,
            pin,
            balance: Decimal::zero(),
            history: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn verify_pin(&self, candidate: &str) -> bool {
        self.pin.matches(candidate)
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn ensure_can_credit(&self, amount: Decimal) -> Result<(), AccountError> {
        match self.balance.checked_add(amount) {
            Some(_) => Ok(()),
            None => Err(AccountError::BalanceOverflow { amount }),
        }
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<Transaction, AccountError> {
        let command = AccountCommand::deposit(amount)?;
        self.execute(command)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<Transaction, AccountError> {
        let command = AccountCommand::withdraw(amount)?;
        self.execute(command)
    }

    /// Debit side of a transfer. Never touches the receiving account.
    pub fn transfer_out(
        &mut self,
        amount: Decimal,
        to: UserId,
    ) -> Result<Transaction, AccountError> {
        let command = AccountCommand::transfer_out(amount, to)?;
        self.execute(command)
    }

    /// Credit side of a transfer whose debit already succeeded.
    ///
    /// The amount was validated by the paired [`Account::transfer_out`] and the
    /// caller is expected to have checked [`Account::ensure_can_credit`].
    pub fn transfer_in(&mut self, amount: Decimal, from: UserId) -> Transaction {
        let transaction = Transaction::new(TransactionKind::TransferIn, amount, Some(from));
        self.apply(transaction.clone());
        transaction
    }

    pub(crate) fn apply(&mut self, transaction: Transaction) {
        self.balance += transaction.amount;
        debug!(
            user = %self.user_id,
            kind = ?transaction.kind,
            amount = %transaction.amount,
            balance = %self.balance,
            "transaction applied"
        );
        self.history.push(transaction);
    }

    pub(crate) fn handle(&self, command: AccountCommand) -> Result<Transaction, AccountError> {
        match command.action {
            AccountAction::Deposit => {
                self.ensure_can_credit(command.amount)?;
                Ok(Transaction::new(TransactionKind::Deposit, command.amount, None))
            }
            AccountAction::Withdraw | AccountAction::TransferOut => {
                if command.amount > self.balance {
                    return Err(AccountError::InsufficientFunds {
                        requested: command.amount,
                        available: self.balance,
                    });
                }
                let kind = if command.action == AccountAction::Withdraw {
                    TransactionKind::Withdrawal
                } else {
                    TransactionKind::TransferOut
                };
                Ok(Transaction::new(kind, -command.amount, command.counterparty))
            }
        }
    }

    fn execute(&mut self, command: AccountCommand) -> Result<Transaction, AccountError> {
        let transaction = self.handle(command)?;
        self.apply(transaction.clone());
        Ok(transaction)
    }
}
