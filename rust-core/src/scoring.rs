// Rating aggregation (pure, stateless).
// Deterministic: binary64, fixed operation order. Do not reassociate; replicas re-executing
// the same history must agree bit for bit.

/// Every account starts here; treated as the zeroth observation of the running mean.
pub const INITIAL_RATING: f64 = 2.0;

/// Online weighted mean.
///
/// The existing average is weighted by `prior_count + 1` (the initial rating counts as one
/// synthetic observation) against a single remapped contribution `(incoming + 2) / 2`.
/// `prior_count` is the number of ratings already folded in, not counting the initial one.
///
/// ```text
/// contribution = (incoming_rating + 2) / 2
/// next_average = (old_average * (prior_count + 1) + contribution) / (prior_count + 2)
/// ```
pub fn next_average(old_average: f64, prior_count: u64, incoming_rating: f64) -> f64 {
    let weight = prior_count as f64;
    let contribution = (incoming_rating + 2.0) / 2.0;
    ((old_average * (weight + 1.0)) + contribution) / (weight + 2.0)
}

/// Folds an ordered sequence of ratings starting from `INITIAL_RATING`.
pub fn fold_ratings(ratings: &[f64]) -> f64 {
    ratings
        .iter()
        .enumerate()
        .fold(INITIAL_RATING, |avg, (i, r)| next_average(avg, i as u64, *r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_rating_blends_with_initial() {
        assert_eq!(next_average(2.0, 0, 3.0), 2.25);
        assert_eq!(next_average(2.0, 0, 2.0), 2.0);
        assert_eq!(next_average(2.0, 0, 0.0), 1.5);
    }

    #[test]
    fn fold_matches_closed_form_recurrence() {
        let ratings = [1.0, 4.5, 2.0, 0.5, 1.5, 3.0, 5.0];
        let mut expected = 2.0_f64;
        for (i, b) in ratings.iter().enumerate() {
            let i = i as f64;
            expected = ((expected * (i + 1.0)) + (b + 2.0) / 2.0) / (i + 2.0);
        }
        assert_eq!(fold_ratings(&ratings).to_bits(), expected.to_bits());
    }

    #[test]
    fn marginal_effect_shrinks_with_history() {
        let fresh = next_average(2.0, 0, 5.0) - 2.0;
        let seasoned = next_average(2.0, 50, 5.0) - 2.0;
        assert!(seasoned < fresh);
        assert!(seasoned > 0.0);
    }

    #[test]
    fn stays_within_remapped_range() {
        let low = fold_ratings(&[0.0; 64]);
        let high = fold_ratings(&[5.0; 64]);
        assert!(low >= 1.0 && low < 2.0);
        assert!(high > 2.0 && high <= 3.5);
    }

    #[test]
    fn empty_fold_is_initial() {
        assert_eq!(fold_ratings(&[]), INITIAL_RATING);
    }
}
