// Call envelope: one serialized transaction as delivered by the host.
// The host supplies the caller identity and a monotonic timestamp; the ledger never reads a clock.

use crate::account::{AccountId, AccountRecord};
use crate::config::{LedgerConfig, StatePatch};
use crate::timestamps::RatingTimestamps;
use serde::{Deserialize, Serialize};

fn protocol_version() -> u8 {
    crate::PROTOCOL_VERSION
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Call {
    #[serde(default = "protocol_version")]
    pub version: u8,
    pub caller: AccountId,
    /// Nanoseconds, supplied by the host.
    pub timestamp: u64,
    pub action: Action,
}

impl Call {
    pub fn new(caller: impl Into<AccountId>, timestamp: u64, action: Action) -> Self {
        Self {
            version: crate::PROTOCOL_VERSION,
            caller: caller.into(),
            timestamp,
            action,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Register,
    Rate { target: AccountId, rating: f64 },
    PatchState(StatePatch),
    Status { account: AccountId },
    RatingTimestamps { a: AccountId, b: AccountId },
}

impl Action {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Action::Register | Action::Rate { .. } | Action::PatchState(_)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Registered,
    /// Target's record after the rating was folded in.
    Rated(AccountRecord),
    Patched(LedgerConfig),
    Status(AccountRecord),
    RatingTimestamps(RatingTimestamps),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_json_lines() {
        let call: Call = serde_json::from_str(
            r#"{"caller":"carol","timestamp":5,"action":{"rate":{"target":"derek","rating":4.5}}}"#,
        )
        .unwrap();
        assert_eq!(call.version, crate::PROTOCOL_VERSION);
        assert_eq!(
            call.action,
            Action::Rate {
                target: AccountId::from("derek"),
                rating: 4.5
            }
        );
        assert!(call.action.is_mutation());

        let call: Call =
            serde_json::from_str(r#"{"caller":"carol","timestamp":6,"action":"register"}"#)
                .unwrap();
        assert_eq!(call.action, Action::Register);

        let call: Call = serde_json::from_str(
            r#"{"caller":"sys","timestamp":7,"action":{"patch_state":{"voting_interval":null}}}"#,
        )
        .unwrap();
        assert_eq!(
            call.action,
            Action::PatchState(StatePatch::new().disable_voting_interval())
        );
    }

    #[test]
    fn queries_are_not_mutations() {
        let q = Action::Status {
            account: AccountId::from("x"),
        };
        assert!(!q.is_mutation());
    }
}
