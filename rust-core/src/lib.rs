// Reputation ledger: deterministic, in-memory, one atomic transaction per call.

pub mod account;
pub mod admission;
pub mod call;
pub mod config;
pub mod digest;
pub mod error;
pub mod ledger;
pub mod scoring;
pub mod storage;
pub mod timestamps;
pub mod validation;

pub use account::{AccountId, AccountRecord};
pub use call::{Action, Call, Outcome};
pub use config::{GenesisConfig, LedgerConfig, StatePatch, VotingInterval};
pub use error::LedgerError;
pub use ledger::ReputationLedger;
pub use timestamps::RatingTimestamps;

// Call envelope and snapshot format version.
pub const PROTOCOL_VERSION: u8 = 1;

// No randomness or wall clock access; the host injects caller identity and time.

/*
Intentionally avoids:
- async
- threads
- global mutable state
- external IO (outside storage and the replay binary)
*/
