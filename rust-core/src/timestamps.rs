// Timestamp ledger: most recent rating time per ordered (rater, ratee) pair.
// Only the latest event per direction is kept; (a, b) and (b, a) are independent.

use crate::account::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampEntry {
    pub rater: AccountId,
    pub ratee: AccountId,
    /// Host-supplied time in nanoseconds.
    pub at: u64,
}

/// Answer to a `rating_timestamps(a, b)` query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingTimestamps {
    pub a_to_b: Option<u64>,
    pub b_to_a: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct TimestampLedger {
    // rater -> ratee -> at
    entries: BTreeMap<AccountId, BTreeMap<AccountId, u64>>,
}

impl TimestampLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional overwrite.
    pub fn record(&mut self, rater: &AccountId, ratee: &AccountId, at: u64) {
        self.entries
            .entry(rater.clone())
            .or_default()
            .insert(ratee.clone(), at);
    }

    pub fn last(&self, rater: &AccountId, ratee: &AccountId) -> Option<u64> {
        self.entries.get(rater)?.get(ratee).copied()
    }

    /// Both directions between `a` and `b`. Registration is not consulted.
    pub fn between(&self, a: &AccountId, b: &AccountId) -> RatingTimestamps {
        RatingTimestamps {
            a_to_b: self.last(a, b),
            b_to_a: self.last(b, a),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries ordered by (rater, ratee).
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &AccountId, u64)> {
        self.entries.iter().flat_map(|(rater, row)| {
            row.iter().map(move |(ratee, at)| (rater, ratee, *at))
        })
    }

    pub fn entries(&self) -> Vec<TimestampEntry> {
        self.iter()
            .map(|(rater, ratee, at)| TimestampEntry {
                rater: rater.clone(),
                ratee: ratee.clone(),
                at,
            })
            .collect()
    }

    /// Later duplicates of the same pair overwrite earlier ones, as `record` would.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = TimestampEntry>,
    {
        let mut ledger = Self::new();
        for e in entries {
            ledger.record(&e.rater, &e.ratee, e.at);
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_until_recorded() {
        let ledger = TimestampLedger::new();
        let a = AccountId::from("a");
        let b = AccountId::from("b");
        assert_eq!(ledger.last(&a, &b), None);
        assert_eq!(ledger.between(&a, &b), RatingTimestamps::default());
    }

    #[test]
    fn directions_are_independent() {
        let mut ledger = TimestampLedger::new();
        let a = AccountId::from("a");
        let b = AccountId::from("b");
        ledger.record(&a, &b, 10);

        assert_eq!(
            ledger.between(&a, &b),
            RatingTimestamps {
                a_to_b: Some(10),
                b_to_a: None
            }
        );
        assert_eq!(
            ledger.between(&b, &a),
            RatingTimestamps {
                a_to_b: None,
                b_to_a: Some(10)
            }
        );
    }

    #[test]
    fn record_overwrites() {
        let mut ledger = TimestampLedger::new();
        let a = AccountId::from("a");
        let b = AccountId::from("b");
        ledger.record(&a, &b, 10);
        ledger.record(&a, &b, 7);
        assert_eq!(ledger.last(&a, &b), Some(7));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn entries_are_ordered_by_pair() {
        let mut ledger = TimestampLedger::new();
        let a = AccountId::from("a");
        let b = AccountId::from("b");
        let c = AccountId::from("c");
        ledger.record(&c, &a, 3);
        ledger.record(&a, &c, 2);
        ledger.record(&a, &b, 1);

        let pairs: Vec<(String, String)> = ledger
            .iter()
            .map(|(r, e, _)| (r.to_string(), e.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("c".to_string(), "a".to_string()),
            ]
        );

        let rebuilt = TimestampLedger::from_entries(ledger.entries());
        assert_eq!(rebuilt.entries(), ledger.entries());
    }
}
