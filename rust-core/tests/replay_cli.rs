use nosedive_core::storage::SnapshotStore;
use nosedive_core::{AccountId, ReputationLedger};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

const GENESIS: &str = r#"{
  "ledger_id": "nosedive-test",
  "owner": "sys.near",
  "voting_interval": { "duration": 100, "rejection_message": "too soon" }
}"#;

const CALLS: &str = r#"{"caller":"alice.near","timestamp":1,"action":"register"}
{"caller":"bob.near","timestamp":2,"action":"register"}
{"caller":"alice.near","timestamp":3,"action":"register"}
{"caller":"alice.near","timestamp":4,"action":{"rate":{"target":"bob.near","rating":3.0}}}
{"caller":"alice.near","timestamp":50,"action":{"rate":{"target":"bob.near","rating":3.0}}}
not json

{"caller":"mallory.near","timestamp":60,"action":{"patch_state":{"voting_interval":null}}}
{"caller":"sys.near","timestamp":70,"action":{"patch_state":{"voting_interval":null}}}
{"caller":"alice.near","timestamp":80,"action":{"rate":{"target":"bob.near","rating":5.0}}}
{"caller":"sys.near","timestamp":90,"action":{"status":{"account":"bob.near"}}}
{"caller":"sys.near","timestamp":91,"action":{"rating_timestamps":{"a":"alice.near","b":"bob.near"}}}
"#;

fn replay(dir: &Path, data_dir: &Path) -> Vec<Value> {
    let genesis = dir.join("genesis.json");
    let calls = dir.join("calls.jsonl");
    fs::write(&genesis, GENESIS).unwrap();
    fs::write(&calls, CALLS).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_nosedive-replay"))
        .arg("--genesis")
        .arg(&genesis)
        .arg("--calls")
        .arg(&calls)
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--log-level")
        .arg("warn")
        .output()
        .expect("run replay");
    assert!(
        output.status.success(),
        "replay failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn err_code(v: &Value) -> &str {
    v["err"]["code"].as_str().unwrap_or("")
}

#[test]
fn replay_reports_each_call_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let out = replay(dir.path(), &data_dir);

    // 11 non-blank call lines + state root.
    assert_eq!(out.len(), 12);
    assert_eq!(out[0]["ok"], "registered");
    assert_eq!(err_code(&out[2]), "already_registered");
    assert_eq!(out[3]["ok"]["rated"]["received"], 2);
    assert_eq!(err_code(&out[4]), "rate_limited");
    assert_eq!(out[4]["err"]["message"], "too soon");
    assert_eq!(err_code(&out[5]), "malformed");
    assert_eq!(err_code(&out[6]), "unauthorized");
    assert_eq!(out[7]["ok"]["patched"]["voting_interval"], Value::Null);
    assert_eq!(out[9]["ok"]["status"]["received"], 3);
    assert_eq!(out[10]["ok"]["rating_timestamps"]["a_to_b"], 80);
    assert_eq!(out[10]["ok"]["rating_timestamps"]["b_to_a"], Value::Null);

    let root = out[11]["state_root"].as_str().expect("state root");

    let snap = SnapshotStore::new(&data_dir)
        .unwrap()
        .load()
        .unwrap()
        .expect("snapshot saved");
    let restored = ReputationLedger::restore(snap).unwrap();
    assert_eq!(hex::encode(restored.state_root()), root);

    let bob = restored.status(&AccountId::from("bob.near")).unwrap();
    assert_eq!(bob.received, 3);
    assert_eq!(restored.status(&AccountId::from("alice.near")).unwrap().given, 2);
}

#[test]
fn missing_genesis_flag_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_nosedive-replay"))
        .output()
        .expect("run replay");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing --genesis"));
}
