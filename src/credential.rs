use std::{fmt, str::FromStr};

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use thiserror::Error;

pub const PIN_LENGTH: usize = 4;

/// Four decimal digits, leading zeros allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin([u8; PIN_LENGTH]);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("PIN must be exactly four digits")]
pub struct InvalidPinFormat;

impl Pin {
    pub fn digits(&self) -> [u8; PIN_LENGTH] {
        self.0
    }

    /// Compares raw user input against the credential, without trimming.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.len() == PIN_LENGTH
            && candidate
                .bytes()
                .zip(self.0)
                .all(|(typed, digit)| typed == b'0' + digit)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.0 {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

impl FromStr for Pin {
    type Err = InvalidPinFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != PIN_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidPinFormat);
        }
        let mut digits = [0; PIN_LENGTH];
        for (digit, byte) in digits.iter_mut().zip(bytes) {
            *digit = byte - b'0';
        }
        Ok(Self(digits))
    }
}

/// Source of fresh credentials for newly registered users.
pub trait PinGenerator {
    fn generate(&mut self) -> Pin;
}

/// Draws every digit independently and uniformly from `0..=9`.
#[derive(Debug)]
pub struct RngPinGenerator<R> {
    rng: R,
}

impl<R: RngCore> RngPinGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngPinGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Same seed, same sequence of PINs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> PinGenerator for RngPinGenerator<R> {
    fn generate(&mut self) -> Pin {
        let mut digits = [0; PIN_LENGTH];
        for digit in digits.iter_mut() {
            *digit = self.rng.gen_range(0..10);
        }
        Pin(digits)
    }
}
