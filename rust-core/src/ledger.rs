// Reputation ledger facade: the only owner and mutator of the account registry, the
// timestamp ledger and the configuration store.
// Each operation runs every fallible check first, then an infallible mutation block, so a
// rejected call leaves all three stores untouched.

use crate::account::{AccountId, AccountRecord, AccountRegistry};
use crate::admission;
use crate::call::{Action, Call, Outcome};
use crate::config::{ConfigStore, GenesisConfig, LedgerConfig, StatePatch};
use crate::digest::{self, Hash};
use crate::error::LedgerError;
use crate::storage::{AccountEntry, PersistedSnapshot, StorageError};
use crate::timestamps::{RatingTimestamps, TimestampLedger};
use crate::validation::{validate_call, validate_rating};
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct ReputationLedger {
    ledger_id: String,
    accounts: AccountRegistry,
    timestamps: TimestampLedger,
    config: ConfigStore,
}

impl ReputationLedger {
    /// Fresh deployment owned by `owner`, rate limiting disabled.
    pub fn new(owner: AccountId) -> Self {
        Self::from_genesis(&GenesisConfig::new(owner))
    }

    pub fn from_genesis(genesis: &GenesisConfig) -> Self {
        Self {
            ledger_id: genesis.ledger_id.clone(),
            accounts: AccountRegistry::new(),
            timestamps: TimestampLedger::new(),
            config: ConfigStore::new(genesis.owner.clone(), genesis.initial_config()),
        }
    }

    pub fn ledger_id(&self) -> &str {
        &self.ledger_id
    }

    pub fn owner(&self) -> &AccountId {
        self.config.owner()
    }

    pub fn config(&self) -> &LedgerConfig {
        self.config.current()
    }

    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    pub fn timestamps(&self) -> &TimestampLedger {
        &self.timestamps
    }

    pub fn register(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        self.accounts.register(caller)?;
        debug!(account = %caller, "registered");
        Ok(())
    }

    /// `caller` rates `target` at host time `now`. Returns the target's updated record.
    pub fn rate(
        &mut self,
        caller: &AccountId,
        target: &AccountId,
        rating: f64,
        now: u64,
    ) -> Result<AccountRecord, LedgerError> {
        validate_rating(rating)?;
        self.accounts.lookup(caller)?;
        self.accounts.lookup(target)?;
        if caller == target {
            return Err(LedgerError::SelfRating);
        }
        if let Err(e) = admission::check(self.config.current(), &self.timestamps, caller, target, now)
        {
            warn!(
                rater = %caller,
                ratee = %target,
                now,
                retry_at = ?admission::retry_at(self.config.current(), &self.timestamps, caller, target, now),
                "rating rejected by admission gate"
            );
            return Err(e);
        }

        // Nothing below can fail.
        self.accounts.apply_given(caller);
        self.accounts.apply_received(target, rating);
        self.timestamps.record(caller, target, now);

        let updated = *self.accounts.lookup(target)?;
        debug!(
            rater = %caller,
            ratee = %target,
            rating,
            new_average = updated.rating,
            received = updated.received,
            "rating applied"
        );
        Ok(updated)
    }

    pub fn status(&self, identity: &AccountId) -> Result<AccountRecord, LedgerError> {
        self.accounts.lookup(identity).copied()
    }

    /// Never fails; timestamps are independent of registration.
    pub fn rating_timestamps(&self, a: &AccountId, b: &AccountId) -> RatingTimestamps {
        self.timestamps.between(a, b)
    }

    pub fn patch_state(&mut self, caller: &AccountId, patch: StatePatch) -> Result<(), LedgerError> {
        match self.config.patch(caller, patch) {
            Ok(()) => {
                debug!(owner = %caller, config = ?self.config.current(), "state patched");
                Ok(())
            }
            Err(e) => {
                warn!(caller = %caller, "unauthorized patch attempt");
                Err(e)
            }
        }
    }

    /// Dispatches one host call.
    pub fn apply(&mut self, call: &Call) -> Result<Outcome, LedgerError> {
        validate_call(call)?;
        let caller = &call.caller;
        match &call.action {
            Action::Register => {
                self.register(caller)?;
                Ok(Outcome::Registered)
            }
            Action::Rate { target, rating } => {
                let record = self.rate(caller, target, *rating, call.timestamp)?;
                Ok(Outcome::Rated(record))
            }
            Action::PatchState(patch) => {
                self.patch_state(caller, patch.clone())?;
                Ok(Outcome::Patched(self.config().clone()))
            }
            Action::Status { account } => Ok(Outcome::Status(self.status(account)?)),
            Action::RatingTimestamps { a, b } => {
                Ok(Outcome::RatingTimestamps(self.rating_timestamps(a, b)))
            }
        }
    }

    /// Merkle root over config, accounts (identity order) and timestamps (pair order).
    pub fn state_root(&self) -> Hash {
        let mut leaves: Vec<Hash> =
            Vec::with_capacity(1 + self.accounts.len() + self.timestamps.len());
        leaves.push(digest::hash_bytes(&digest::config_leaf(
            &self.ledger_id,
            self.owner(),
            self.config(),
        )));
        for (identity, record) in self.accounts.iter() {
            leaves.push(digest::hash_bytes(&digest::account_leaf(identity, record)));
        }
        for (rater, ratee, at) in self.timestamps.iter() {
            leaves.push(digest::hash_bytes(&digest::timestamp_leaf(rater, ratee, at)));
        }
        digest::merkle_root_hashes(&leaves)
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            version: crate::PROTOCOL_VERSION,
            ledger_id: self.ledger_id.clone(),
            owner: self.owner().clone(),
            config: self.config().clone(),
            accounts: self
                .accounts
                .iter()
                .map(|(identity, record)| AccountEntry {
                    identity: identity.clone(),
                    record: *record,
                })
                .collect(),
            timestamps: self.timestamps.entries(),
        }
    }

    pub fn restore(snapshot: PersistedSnapshot) -> Result<Self, StorageError> {
        if snapshot.version != crate::PROTOCOL_VERSION {
            return Err(StorageError::Version {
                found: snapshot.version,
                expected: crate::PROTOCOL_VERSION,
            });
        }
        if let Some(bad) = snapshot.accounts.iter().find(|e| e.record.received == 0) {
            return Err(StorageError::Corrupt(format!(
                "account [{}] has received = 0",
                bad.identity
            )));
        }
        let accounts = AccountRegistry::from_entries(
            snapshot.accounts.into_iter().map(|e| (e.identity, e.record)),
        )
        .map_err(|dup| StorageError::Corrupt(format!("duplicate account [{}]", dup)))?;

        Ok(Self {
            ledger_id: snapshot.ledger_id,
            accounts,
            timestamps: TimestampLedger::from_entries(snapshot.timestamps),
            config: ConfigStore::new(snapshot.owner, snapshot.config),
        })
    }
}
