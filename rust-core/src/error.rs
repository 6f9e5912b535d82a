// Call-level failures. Every variant is a normal outcome of caller misuse and
// leaves the ledger exactly as it was before the call.

use crate::account::AccountId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("this account has already been registered: [{0}]")]
    AlreadyRegistered(AccountId),
    #[error("account does not exist on this service: [{0}]")]
    NotRegistered(AccountId),
    /// Carries the rejection message configured at evaluation time.
    #[error("{0}")]
    RateLimited(String),
    #[error("only the ledger owner can patch state, not [{0}]")]
    Unauthorized(AccountId),
    #[error("enter a valid rating: multiples of 0.5 between 0 and 5 (got {0})")]
    InvalidRating(f64),
    #[error("you can't rate yourself")]
    SelfRating,
    #[error("unsupported call version {0}")]
    UnsupportedVersion(u8),
}

impl LedgerError {
    /// Stable short code, used by the replay binary's JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::AlreadyRegistered(_) => "already_registered",
            LedgerError::NotRegistered(_) => "not_registered",
            LedgerError::RateLimited(_) => "rate_limited",
            LedgerError::Unauthorized(_) => "unauthorized",
            LedgerError::InvalidRating(_) => "invalid_rating",
            LedgerError::SelfRating => "self_rating",
            LedgerError::UnsupportedVersion(_) => "unsupported_version",
        }
    }
}
