use std::str::FromStr;

pub const MAIN_MENU: &str = "\
----------------------------------------
Welcome to the ATM!
----------------------------------------
1. Register
2. Log In
3. Quit";

pub const SESSION_MENU: &str = "\
----------------------------------------
ATM Menu:
1. Transaction History
2. Deposit
3. Withdraw
4. Transfer
5. Check Balance
6. Log Out";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuChoice {
    Register,
    LogIn,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMenuChoice {
    History,
    Deposit,
    Withdraw,
    Transfer,
    Balance,
    LogOut,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidChoice;

impl FromStr for MainMenuChoice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Register),
            "2" => Ok(Self::LogIn),
            "3" => Ok(Self::Quit),
            _ => Err(InvalidChoice),
        }
    }
}

impl FromStr for SessionMenuChoice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::History),
            "2" => Ok(Self::Deposit),
            "3" => Ok(Self::Withdraw),
            "4" => Ok(Self::Transfer),
            "5" => Ok(Self::Balance),
            "6" => Ok(Self::LogOut),
            _ => Err(InvalidChoice),
        }
    }
}
