/// Per-user ledger: balance plus the append-only transaction history.
/// State changes only through transactions produced by handling commands.
pub mod account;

/// Validated requests against a single account: amounts must be positive.
pub mod command;

/// PINs and the generators that issue them.
pub mod credential;

/// Account directory interface, plus "in memory" implementation.
/// Owns every account and coordinates transfers between two of them.
pub mod directory;

/// Menu-driven front-end used by the `atm` binary. Lives in the library so the
/// integration tests can drive full sessions.
pub mod atm_shell;
