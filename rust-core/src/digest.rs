// State digest: canonical leaf encodings + SHA-256 Merkle root.
// Replicas that applied the same call history must produce the same root.

use crate::account::{AccountId, AccountRecord};
use crate::config::LedgerConfig;
use sha2::{Digest, Sha256};

pub type Hash = [u8; 32];

/// Root of an empty leaf set.
pub const ZERO_HASH: Hash = [0u8; 32];

const TAG_CONFIG: u8 = 0x00;
const TAG_ACCOUNT: u8 = 0x01;
const TAG_TIMESTAMP: u8 = 0x02;

fn put_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u64).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

pub fn hash_bytes(bytes: &[u8]) -> Hash {
    let mut h = Sha256::new();
    h.update(bytes);
    h.finalize().into()
}

pub fn config_leaf(ledger_id: &str, owner: &AccountId, config: &LedgerConfig) -> Vec<u8> {
    let mut out = vec![TAG_CONFIG];
    put_str(&mut out, ledger_id);
    put_str(&mut out, owner.as_str());
    match &config.voting_interval {
        None => out.push(0),
        Some(interval) => {
            out.push(1);
            out.extend_from_slice(&interval.duration.to_le_bytes());
            put_str(&mut out, &interval.rejection_message);
        }
    }
    out
}

/// The rating is encoded by bit pattern, so any drift in float evaluation shows up in the root.
pub fn account_leaf(identity: &AccountId, record: &AccountRecord) -> Vec<u8> {
    let mut out = vec![TAG_ACCOUNT];
    put_str(&mut out, identity.as_str());
    out.extend_from_slice(&record.rating.to_bits().to_le_bytes());
    out.extend_from_slice(&record.given.to_le_bytes());
    out.extend_from_slice(&record.received.to_le_bytes());
    out
}

pub fn timestamp_leaf(rater: &AccountId, ratee: &AccountId, at: u64) -> Vec<u8> {
    let mut out = vec![TAG_TIMESTAMP];
    put_str(&mut out, rater.as_str());
    put_str(&mut out, ratee.as_str());
    out.extend_from_slice(&at.to_le_bytes());
    out
}

/// Pairwise SHA-256 reduction; an odd node is paired with itself.
pub fn merkle_root_hashes(hashes: &[Hash]) -> Hash {
    if hashes.is_empty() {
        return ZERO_HASH;
    }
    let mut level: Vec<Hash> = hashes.to_vec();
    while level.len() > 1 {
        let mut next: Vec<Hash> = Vec::with_capacity(level.len().div_ceil(2));
        let mut i = 0;
        while i < level.len() {
            let a = level[i];
            let b = if i + 1 < level.len() { level[i + 1] } else { level[i] };
            let mut h = Sha256::new();
            h.update(a);
            h.update(b);
            next.push(h.finalize().into());
            i += 2;
        }
        level = next;
    }
    level[0]
}
