// Validation: stateless input checks that run before any store is consulted.
use crate::call::Call;
use crate::error::LedgerError;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Multiples of 0.5 between 0 and 5 inclusive. NaN and infinities fail the range test.
pub fn is_valid_rating(rating: f64) -> bool {
    let fract = rating.fract();
    (MIN_RATING..=MAX_RATING).contains(&rating) && (fract == 0.0 || fract == 0.5)
}

pub fn validate_rating(rating: f64) -> Result<(), LedgerError> {
    if is_valid_rating(rating) {
        Ok(())
    } else {
        Err(LedgerError::InvalidRating(rating))
    }
}

/// Envelope check (hard rule): calls must target this protocol version.
pub fn validate_call(call: &Call) -> Result<(), LedgerError> {
    if call.version != crate::PROTOCOL_VERSION {
        return Err(LedgerError::UnsupportedVersion(call.version));
    }
    Ok(())
}
