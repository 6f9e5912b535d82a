// Admission gate: decides whether rater -> ratee may rate again at `now`.
// Sliding check against the single most recent event in that direction; the reverse
// direction is never consulted.

use crate::account::AccountId;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::timestamps::TimestampLedger;

pub fn check(
    config: &LedgerConfig,
    timestamps: &TimestampLedger,
    rater: &AccountId,
    ratee: &AccountId,
    now: u64,
) -> Result<(), LedgerError> {
    let Some(interval) = config.voting_interval.as_ref() else {
        return Ok(());
    };
    let Some(last) = timestamps.last(rater, ratee) else {
        return Ok(());
    };

    // A host clock that stepped backwards counts as no time elapsed.
    let elapsed = now.saturating_sub(last);
    if elapsed >= interval.duration {
        Ok(())
    } else {
        Err(LedgerError::RateLimited(interval.rejection_message.clone()))
    }
}

/// Earliest time at which `rater` may rate `ratee` again, if currently limited.
pub fn retry_at(
    config: &LedgerConfig,
    timestamps: &TimestampLedger,
    rater: &AccountId,
    ratee: &AccountId,
    now: u64,
) -> Option<u64> {
    let interval = config.voting_interval.as_ref()?;
    let last = timestamps.last(rater, ratee)?;
    let at = last.saturating_add(interval.duration);
    (at > now).then_some(at)
}
