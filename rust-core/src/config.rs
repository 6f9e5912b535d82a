use crate::account::AccountId;
use crate::error::LedgerError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Minimum spacing between two ratings in the same direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingInterval {
    /// Nanoseconds.
    pub duration: u64,
    #[serde(default = "default_rejection_message")]
    pub rejection_message: String,
}

fn default_rejection_message() -> String {
    "you can't rate this account again so soon".to_string()
}

impl VotingInterval {
    pub fn new(duration: u64, rejection_message: impl Into<String>) -> Self {
        Self {
            duration,
            rejection_message: rejection_message.into(),
        }
    }

    pub fn from_secs(secs: u64, rejection_message: impl Into<String>) -> Self {
        Self::new(secs.saturating_mul(NANOS_PER_SECOND), rejection_message)
    }
}

/// Runtime parameters read on every rating attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// `None` disables rate limiting.
    #[serde(default)]
    pub voting_interval: Option<VotingInterval>,
}

/// A set of configuration replacements.
///
/// Outer `None` leaves the field alone; `Some(None)` (JSON `null`) clears it.
/// Unknown keys are rejected when decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatePatch {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub voting_interval: Option<Option<VotingInterval>>,
}

// Distinguishes an explicit `null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_voting_interval(mut self, interval: VotingInterval) -> Self {
        self.voting_interval = Some(Some(interval));
        self
    }

    pub fn disable_voting_interval(mut self) -> Self {
        self.voting_interval = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.voting_interval.is_none()
    }

    fn apply_to(self, config: &mut LedgerConfig) {
        if let Some(interval) = self.voting_interval {
            config.voting_interval = interval;
        }
    }
}

/// Authorization predicate: only the fixed owner may mutate configuration.
pub fn authorize(caller: &AccountId, owner: &AccountId) -> Result<(), LedgerError> {
    if caller == owner {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized(caller.clone()))
    }
}

/// Owner identity plus the live configuration; `patch` is the only mutation path.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    owner: AccountId,
    current: LedgerConfig,
}

impl ConfigStore {
    pub fn new(owner: AccountId, initial: LedgerConfig) -> Self {
        Self {
            owner,
            current: initial,
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn current(&self) -> &LedgerConfig {
        &self.current
    }

    /// Full replacement of each present key. No effect on recorded timestamps.
    pub fn patch(&mut self, caller: &AccountId, patch: StatePatch) -> Result<(), LedgerError> {
        authorize(caller, &self.owner)?;
        patch.apply_to(&mut self.current);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse genesis json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Deployment-time parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(default = "default_ledger_id")]
    pub ledger_id: String,
    /// Privileged identity allowed to patch state.
    pub owner: AccountId,
    #[serde(default)]
    pub voting_interval: Option<VotingInterval>,
}

fn default_ledger_id() -> String {
    "nosedive".to_string()
}

impl GenesisConfig {
    pub fn new(owner: AccountId) -> Self {
        Self {
            ledger_id: default_ledger_id(),
            owner,
            voting_interval: None,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    pub fn initial_config(&self) -> LedgerConfig {
        LedgerConfig {
            voting_interval: self.voting_interval.clone(),
        }
    }
}
