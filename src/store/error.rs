//! Store Error Types
//!
//! Outcomes of the conditional UPDATE statements are tagged variants, not
//! sentinel values, so callers classify by matching instead of comparing
//! error identities.

use thiserror::Error;

/// Errors reported by the wallet store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The wallet row does not exist (zero rows affected by an
    /// unconditional-balance statement, or an empty point read).
    #[error("wallet not found")]
    NotFound,

    /// A debit affected zero rows. The row-count signal cannot tell a
    /// missing wallet from an insufficient balance, so neither can we.
    #[error("insufficient funds or wallet not found")]
    InsufficientFundsOrNotFound,

    /// Anything that went wrong talking to the database. The store never
    /// retries; callers decide.
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    /// True for outcomes decided by the row-count signal rather than by a
    /// failed round trip.
    pub fn is_definitive(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
