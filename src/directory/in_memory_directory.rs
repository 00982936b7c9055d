use std::collections::{HashMap, hash_map::Entry};

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    account::{Account, AccountError, UserId},
    command::AccountCommand,
    credential::{Pin, PinGenerator},
};

use super::{AccountDirectory, DirectoryError};

pub struct InMemoryDirectory<P> {
    pins: P,
    accounts: HashMap<UserId, Account>,
}

impl<P: PinGenerator> InMemoryDirectory<P> {
    pub fn new(pins: P) -> Self {
        Self {
            pins,
            accounts: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl<P: PinGenerator> AccountDirectory for InMemoryDirectory<P> {
    fn register(&mut self, user_id: UserId) -> Result<Pin, DirectoryError> {
        let entry = match self.accounts.entry(user_id) {
            Entry::Occupied(entry) => {
                return Err(DirectoryError::DuplicateUser(entry.key().clone()));
            }
            Entry::Vacant(entry) => entry,
        };
        let pin = self.pins.generate();
        info!(user = %entry.key(), "user registered");
        let account = Account::new(entry.key().clone(), pin);
        entry.insert(account);
        Ok(pin)
    }

    fn authenticate(&self, user_id: &str, pin: &str) -> Result<&Account, DirectoryError> {
        let account = self.account(user_id)?;
        if !account.verify_pin(pin) {
            warn!(user = %user_id, "incorrect PIN");
            return Err(DirectoryError::IncorrectPin);
        }
        info!(user = %user_id, "user logged in");
        Ok(account)
    }

    fn account(&self, user_id: &str) -> Result<&Account, DirectoryError> {
        self.accounts
            .get(user_id)
            .ok_or_else(|| DirectoryError::UserNotFound(user_id.to_string()))
    }

    fn account_mut(&mut self, user_id: &str) -> Result<&mut Account, DirectoryError> {
        self.accounts
            .get_mut(user_id)
            .ok_or_else(|| DirectoryError::UserNotFound(user_id.to_string()))
    }

    fn transfer(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: Decimal,
    ) -> Result<(), DirectoryError> {
        self.check_transfer_target(sender, recipient)
            .inspect_err(|err| warn!(%sender, %recipient, %err, "transfer rejected"))?;
        let from = self.account(sender)?;
        let to = self.account(recipient)?;

        let command = AccountCommand::transfer_out(amount, recipient.to_string())
            .map_err(AccountError::from)?;
        let debit = from
            .handle(command)
            .inspect_err(|err| warn!(%sender, %recipient, %err, "transfer rejected"))?;
        // the credit below must not fail once the debit is applied
        to.ensure_can_credit(amount)?;

        self.account_mut(sender)?.apply(debit);
        // present: checked above and accounts are never removed
        self.account_mut(recipient)?.transfer_in(amount, sender.to_string());
        info!(%sender, %recipient, %amount, "transfer completed");
        Ok(())
    }

    fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rust_decimal::{Decimal, prelude::Zero};
    use rust_decimal_macros::dec;

    use crate::{
        account::TransactionKind,
        command::{AccountAction, AccountCommandError},
        credential::RngPinGenerator,
    };

    use super::*;

    /// Hands out a fixed sequence of PINs so tests can log in.
    struct FixedPins(VecDeque<Pin>);

    impl FixedPins {
        fn new(pins: &[&str]) -> Self {
            Self(pins.iter().map(|p| p.parse().unwrap()).collect())
        }
    }

    impl PinGenerator for FixedPins {
        fn generate(&mut self) -> Pin {
            self.0.pop_front().expect("test ran out of PINs")
        }
    }

    fn directory_with(users: &[&str]) -> InMemoryDirectory<FixedPins> {
        let mut directory = InMemoryDirectory::new(FixedPins::new(&["4821", "0007", "9999"]));
        for user in users {
            directory.register(user.to_string()).unwrap();
        }
        directory
    }

    fn snapshot(directory: &InMemoryDirectory<FixedPins>, user: &str) -> (Decimal, usize) {
        let acc = directory.account(user).unwrap();
        (acc.balance(), acc.history().len())
    }

    #[test]
    fn register_returns_generated_pin() {
        let mut directory = InMemoryDirectory::new(FixedPins::new(&["4821", "0007"]));
        assert!(directory.is_empty());

        let pin = directory.register("alice".to_string()).unwrap();
        assert_eq!(pin.to_string(), "4821");
        let pin = directory.register("bob".to_string()).unwrap();
        assert_eq!(pin.to_string(), "0007");
        assert_eq!(directory.len(), 2);

        let alice = directory.account("alice").unwrap();
        assert_eq!(alice.balance(), Decimal::zero());
        assert!(alice.history().is_empty());
    }

    #[test]
    fn duplicate_registration_keeps_existing_account() {
        let mut directory = InMemoryDirectory::new(RngPinGenerator::seeded(3));
        let pin = directory.register("alice".to_string()).unwrap();
        directory.account_mut("alice").unwrap().deposit(dec!(10)).unwrap();

        let err = directory.register("alice".to_string()).unwrap_err();
        assert_eq!(err, DirectoryError::DuplicateUser("alice".to_string()));
        assert_eq!(directory.len(), 1);

        let alice = directory.authenticate("alice", &pin.to_string()).unwrap();
        assert_eq!(alice.balance(), dec!(10));
    }

    #[test]
    fn authenticate() {
        let directory = directory_with(&["alice"]);

        let acc = directory.authenticate("alice", "4821").unwrap();
        assert_eq!(acc.user_id(), "alice");

        assert_eq!(
            directory.authenticate("alice", "4822").unwrap_err(),
            DirectoryError::IncorrectPin
        );
        assert_eq!(
            directory.authenticate("carol", "4821").unwrap_err(),
            DirectoryError::UserNotFound("carol".to_string())
        );
        assert_eq!(
            directory.authenticate("alice", "4821").map(Account::user_id),
            Ok("alice")
        );
    }

    #[test]
    fn transfer_moves_money_between_accounts() {
        let mut directory = directory_with(&["alice", "bob"]);
        directory.account_mut("alice").unwrap().deposit(dec!(100)).unwrap();

        directory.transfer("alice", "bob", dec!(40)).unwrap();

        let alice = directory.account("alice").unwrap();
        assert_eq!(alice.balance(), dec!(60));
        let out = alice.history().last().unwrap();
        assert_eq!(out.kind(), TransactionKind::TransferOut);
        assert_eq!(out.amount(), dec!(-40));
        assert_eq!(out.counterparty(), Some("bob"));

        let bob = directory.account("bob").unwrap();
        assert_eq!(bob.balance(), dec!(40));
        assert_eq!(bob.history().len(), 1);
        assert_eq!(bob.history()[0].kind(), TransactionKind::TransferIn);
        assert_eq!(bob.history()[0].amount(), dec!(40));
        assert_eq!(bob.history()[0].counterparty(), Some("alice"));
    }

    #[test]
    fn failed_transfers_change_nothing() {
        let mut directory = directory_with(&["alice", "bob"]);
        directory.account_mut("alice").unwrap().deposit(dec!(100)).unwrap();
        let before = (snapshot(&directory, "alice"), snapshot(&directory, "bob"));

        let err = directory.transfer("alice", "bob", dec!(100.01)).unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::AccountErr(AccountError::InsufficientFunds { .. })
        ));

        let err = directory.transfer("alice", "bob", Decimal::zero()).unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::AccountErr(AccountError::Command(
                AccountCommandError::InvalidAmount {
                    action: AccountAction::TransferOut,
                    ..
                }
            ))
        ));

        let err = directory.transfer("alice", "carol", dec!(10)).unwrap_err();
        assert_eq!(err, DirectoryError::RecipientNotFound("carol".to_string()));

        let err = directory.transfer("alice", "alice", dec!(10)).unwrap_err();
        assert_eq!(err, DirectoryError::SelfTransfer);

        let err = directory.transfer("mallory", "bob", dec!(10)).unwrap_err();
        assert_eq!(err, DirectoryError::UserNotFound("mallory".to_string()));

        let after = (snapshot(&directory, "alice"), snapshot(&directory, "bob"));
        assert_eq!(before, after);
    }

    #[test]
    fn recipient_is_checked_before_self_transfer() {
        let mut directory = directory_with(&[]);
        let err = directory.transfer("ghost", "ghost", dec!(1)).unwrap_err();
        assert_eq!(err, DirectoryError::RecipientNotFound("ghost".to_string()));
    }

    #[test]
    fn transfer_that_would_overflow_recipient_is_rejected() {
        let mut directory = directory_with(&["alice", "bob"]);
        directory.account_mut("alice").unwrap().deposit(dec!(5)).unwrap();
        directory.account_mut("bob").unwrap().deposit(Decimal::MAX).unwrap();

        let err = directory.transfer("alice", "bob", dec!(5)).unwrap_err();
        assert_eq!(
            err,
            DirectoryError::AccountErr(AccountError::BalanceOverflow { amount: dec!(5) })
        );
        assert_eq!(snapshot(&directory, "alice"), (dec!(5), 1));
        assert_eq!(snapshot(&directory, "bob"), (Decimal::MAX, 1));
    }

    #[test]
    fn overdraft_is_reported_before_recipient_overflow() {
        let mut directory = directory_with(&["alice", "bob"]);
        directory.account_mut("alice").unwrap().deposit(dec!(5)).unwrap();
        directory.account_mut("bob").unwrap().deposit(Decimal::MAX).unwrap();

        let err = directory.transfer("alice", "bob", dec!(10)).unwrap_err();
        assert_eq!(
            err,
            DirectoryError::AccountErr(AccountError::InsufficientFunds {
                requested: dec!(10),
                available: dec!(5),
            })
        );
        assert_eq!(snapshot(&directory, "alice"), (dec!(5), 1));
        assert_eq!(snapshot(&directory, "bob"), (Decimal::MAX, 1));
    }

    #[test]
    fn check_transfer_target() {
        let directory = directory_with(&["alice", "bob"]);

        assert_eq!(directory.check_transfer_target("alice", "bob"), Ok(()));
        assert_eq!(
            directory.check_transfer_target("alice", "carol"),
            Err(DirectoryError::RecipientNotFound("carol".to_string()))
        );
        assert_eq!(
            directory.check_transfer_target("alice", "alice"),
            Err(DirectoryError::SelfTransfer)
        );
        // unknown recipient wins over self-transfer
        assert_eq!(
            directory.check_transfer_target("ghost", "ghost"),
            Err(DirectoryError::RecipientNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn register_deposit_transfer_walkthrough() {
        let mut directory = directory_with(&["alice"]);
        directory.account_mut("alice").unwrap().deposit(dec!(100)).unwrap();
        directory.register("bob".to_string()).unwrap();

        directory.transfer("alice", "bob", dec!(40)).unwrap();
        let err = directory
            .account_mut("alice")
            .unwrap()
            .withdraw(dec!(1000))
            .unwrap_err();
        assert!(matches!(err, AccountError::InsufficientFunds { .. }));

        assert_eq!(directory.account("alice").unwrap().balance(), dec!(60));
        assert_eq!(directory.account("bob").unwrap().balance(), dec!(40));

        let mut users: Vec<_> = directory.accounts().map(Account::user_id).collect();
        users.sort();
        assert_eq!(users, vec!["alice", "bob"]);
    }
}
