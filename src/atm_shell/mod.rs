//! Interactive ATM front-end over the account directory.
//!
//! Generic over input and output so the binary can hand it stdin/stdout and
//! tests can script a whole session from a string.

use std::io::{BufRead, Write};

use anyhow::Result;
use console::Console;
use menu::{MAIN_MENU, MainMenuChoice, SESSION_MENU, SessionMenuChoice};
use printer::{AccountSummary, HistoryLine, print_summary};
use rust_decimal::Decimal;

use crate::{
    account::UserId,
    credential::PinGenerator,
    directory::{AccountDirectory, in_memory_directory::InMemoryDirectory},
};

pub mod console;
pub mod menu;
pub mod printer;

const SELECT: &str = "Select an option: ";
const INVALID_CHOICE: &str = "Invalid choice. Please select a valid option.";
const INVALID_AMOUNT: &str = "Please enter a valid amount.";
const GOODBYE: &str = "Thank you for using the ATM. Goodbye!";

pub struct Service<'w, R, W: 'w, P> {
    pub input: R,
    pub output: &'w mut W,
    pub pins: P,
    /// Dump every account as CSV when the session ends.
    pub summary: bool,
}

/// Whether the caller should keep going or the user asked to leave
/// (or the input ran out).
enum Flow {
    Continue,
    Exit,
}

impl<'w, R, W, P> Service<'w, R, W, P>
where
    R: BufRead,
    W: Write + 'w,
    P: PinGenerator,
{
    pub fn run(self) -> Result<()> {
        let mut directory = InMemoryDirectory::new(self.pins);
        let mut console = Console::new(self.input, self.output);

        loop {
            console.say(MAIN_MENU)?;
            let Some(choice) = console.prompt(SELECT)? else {
                break;
            };
            let flow = match choice.parse::<MainMenuChoice>() {
                Ok(MainMenuChoice::Register) => register(&mut console, &mut directory)?,
                Ok(MainMenuChoice::LogIn) => log_in(&mut console, &mut directory)?,
                Ok(MainMenuChoice::Quit) => Flow::Exit,
                Err(_) => {
                    console.say(INVALID_CHOICE)?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                break;
            }
        }
        console.say(GOODBYE)?;

        if self.summary {
            let mut accounts: Vec<_> = directory.accounts().collect();
            accounts.sort_by(|a, b| a.user_id().cmp(b.user_id()));
            print_summary(
                console.output(),
                accounts.into_iter().map(|acc| AccountSummary {
                    user: acc.user_id(),
                    balance: acc.balance(),
                    transactions: acc.history().len(),
                }),
            )?;
        }
        Ok(())
    }
}

fn register<R, W, D>(console: &mut Console<'_, R, W>, directory: &mut D) -> Result<Flow>
where
    R: BufRead,
    W: Write,
    D: AccountDirectory,
{
    let Some(user_id) = console.prompt("Enter User ID: ")? else {
        return Ok(Flow::Exit);
    };
    if user_id.is_empty() {
        console.say("User ID must not be empty.")?;
        return Ok(Flow::Continue);
    }
    match directory.register(user_id) {
        Ok(pin) => {
            console.say("Registration successful.")?;
            console.say(format_args!("Your PIN is: {pin}"))?;
        }
        Err(err) => console.say(format_args!("{err}."))?,
    }
    Ok(Flow::Continue)
}

fn log_in<R, W, D>(console: &mut Console<'_, R, W>, directory: &mut D) -> Result<Flow>
where
    R: BufRead,
    W: Write,
    D: AccountDirectory,
{
    let Some(user_id) = console.prompt("Enter User ID: ")? else {
        return Ok(Flow::Exit);
    };
    if let Err(err) = directory.account(&user_id) {
        console.say(format_args!("{err}."))?;
        return Ok(Flow::Continue);
    }
    let Some(pin) = console.prompt("Enter PIN: ")? else {
        return Ok(Flow::Exit);
    };
    let user_id = match directory.authenticate(&user_id, &pin) {
        Ok(account) => account.user_id().to_string(),
        Err(err) => {
            console.say(format_args!("{err}."))?;
            return Ok(Flow::Continue);
        }
    };
    console.say("Login successful.")?;
    session(console, directory, user_id)
}

fn session<R, W, D>(
    console: &mut Console<'_, R, W>,
    directory: &mut D,
    user_id: UserId,
) -> Result<Flow>
where
    R: BufRead,
    W: Write,
    D: AccountDirectory,
{
    loop {
        console.say(SESSION_MENU)?;
        let Some(choice) = console.prompt(SELECT)? else {
            return Ok(Flow::Exit);
        };
        let choice = match choice.parse::<SessionMenuChoice>() {
            Ok(choice) => choice,
            Err(_) => {
                console.say(INVALID_CHOICE)?;
                continue;
            }
        };
        match choice {
            SessionMenuChoice::History => {
                let account = directory.account(&user_id)?;
                console.say("Transaction History:")?;
                if account.history().is_empty() {
                    console.say("No transactions yet.")?;
                }
                for tx in account.history() {
                    console.say(HistoryLine(tx))?;
                }
            }
            SessionMenuChoice::Deposit => {
                let Some(amount) = read_amount(console, "Enter deposit amount: $")? else {
                    return Ok(Flow::Exit);
                };
                let Some(amount) = amount else { continue };
                match directory.account_mut(&user_id)?.deposit(amount) {
                    Ok(_) => console.say("Deposit successful.")?,
                    Err(err) => console.say(format_args!("{err}."))?,
                }
            }
            SessionMenuChoice::Withdraw => {
                let Some(amount) = read_amount(console, "Enter withdrawal amount: $")? else {
                    return Ok(Flow::Exit);
                };
                let Some(amount) = amount else { continue };
                match directory.account_mut(&user_id)?.withdraw(amount) {
                    Ok(_) => console.say("Withdrawal successful.")?,
                    Err(err) => console.say(format_args!("{err}."))?,
                }
            }
            SessionMenuChoice::Transfer => {
                let Some(recipient) = console.prompt("Enter recipient's User ID: ")? else {
                    return Ok(Flow::Exit);
                };
                // fail before asking for an amount that cannot go through
                if let Err(err) = directory.check_transfer_target(&user_id, &recipient) {
                    console.say(format_args!("{err}."))?;
                    continue;
                }
                let Some(amount) = read_amount(console, "Enter transfer amount: $")? else {
                    return Ok(Flow::Exit);
                };
                let Some(amount) = amount else { continue };
                match directory.transfer(&user_id, &recipient, amount) {
                    Ok(()) => console.say("Transfer successful.")?,
                    Err(err) => console.say(format_args!("{err}."))?,
                }
            }
            SessionMenuChoice::Balance => {
                let balance = directory.account(&user_id)?.balance();
                console.say(format_args!("Balance: ${balance}"))?;
            }
            SessionMenuChoice::LogOut => {
                console.say("Logged out.")?;
                return Ok(Flow::Continue);
            }
        }
    }
}

/// Outer `None` is end of input, inner `None` is an answer that is not a number.
fn read_amount<R, W>(
    console: &mut Console<'_, R, W>,
    prompt: &str,
) -> Result<Option<Option<Decimal>>>
where
    R: BufRead,
    W: Write,
{
    let Some(answer) = console.prompt(prompt)? else {
        return Ok(None);
    };
    match answer.parse::<Decimal>() {
        Ok(amount) => Ok(Some(Some(amount))),
        Err(_) => {
            console.say(INVALID_AMOUNT)?;
            Ok(Some(None))
        }
    }
}
