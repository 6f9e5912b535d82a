// Account registry: identity -> reputation record.
// Registration is the only transition (Unregistered -> Registered); there is no deletion path.

use crate::error::LedgerError;
use crate::scoring::{INITIAL_RATING, next_average};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque participant identity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_string())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        AccountId(s)
    }
}

/// Reputation record; also the shape returned by status queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub rating: f64,
    pub given: u64,
    /// Includes the implicit self-entry created at registration.
    pub received: u64,
}

impl Default for AccountRecord {
    fn default() -> Self {
        Self {
            rating: INITIAL_RATING, // a 2 simply for existing
            given: 0,
            received: 1,
        }
    }
}

impl AccountRecord {
    /// Ratings received from other accounts (excludes the self-entry).
    pub fn ratings_received(&self) -> u64 {
        self.received.saturating_sub(1)
    }
}

#[derive(Clone, Debug, Default)]
pub struct AccountRegistry {
    records: BTreeMap<AccountId, AccountRecord>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, identity: &AccountId) -> Result<(), LedgerError> {
        if self.records.contains_key(identity) {
            return Err(LedgerError::AlreadyRegistered(identity.clone()));
        }
        self.records
            .insert(identity.clone(), AccountRecord::default());
        Ok(())
    }

    pub fn lookup(&self, identity: &AccountId) -> Result<&AccountRecord, LedgerError> {
        self.records
            .get(identity)
            .ok_or_else(|| LedgerError::NotRegistered(identity.clone()))
    }

    pub fn contains(&self, identity: &AccountId) -> bool {
        self.records.contains_key(identity)
    }

    /// Caller must have validated existence; unknown identities are ignored.
    pub fn apply_given(&mut self, identity: &AccountId) {
        if let Some(record) = self.records.get_mut(identity) {
            record.given = record.given.saturating_add(1);
        }
    }

    /// Folds one incoming rating into the running average, then bumps `received`.
    /// Caller must have validated existence; unknown identities are ignored.
    pub fn apply_received(&mut self, identity: &AccountId, rating: f64) {
        if let Some(record) = self.records.get_mut(identity) {
            record.rating = next_average(record.rating, record.ratings_received(), rating);
            record.received = record.received.saturating_add(1);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &AccountRecord)> {
        self.records.iter()
    }

    /// Rebuilds a registry from persisted entries. Returns the first duplicated identity on conflict.
    pub fn from_entries<I>(entries: I) -> Result<Self, AccountId>
    where
        I: IntoIterator<Item = (AccountId, AccountRecord)>,
    {
        let mut records = BTreeMap::new();
        for (identity, record) in entries {
            if records.contains_key(&identity) {
                return Err(identity);
            }
            records.insert(identity, record);
        }
        Ok(Self { records })
    }
}
