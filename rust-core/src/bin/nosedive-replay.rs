// Replays JSON-lines calls against a ledger, one result line per call.

use nosedive_core::config::GenesisConfig;
use nosedive_core::storage::SnapshotStore;
use nosedive_core::{Call, ReputationLedger};
use serde_json::json;
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;
use tracing::{Level, info, warn};

struct Args {
    genesis: String,
    calls: Option<String>,
    data_dir: Option<String>,
    log_level: Level,
}

fn parse_args() -> Result<Args, String> {
    let mut genesis: Option<String> = None;
    let mut calls: Option<String> = None;
    let mut data_dir: Option<String> = None;
    let mut log_level = Level::INFO;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--genesis" => genesis = args.next(),
            "--calls" => calls = args.next(),
            "--data-dir" => data_dir = args.next(),
            "--log-level" => {
                let raw = args.next().ok_or("missing value for --log-level")?;
                log_level = raw
                    .parse::<Level>()
                    .map_err(|_| format!("bad log level {}", raw))?;
            }
            _ => return Err(format!("unknown arg {}", arg)),
        }
    }

    Ok(Args {
        genesis: genesis.ok_or("missing --genesis")?,
        calls,
        data_dir,
        log_level,
    })
}

fn run(args: Args) -> Result<(), String> {
    let genesis = GenesisConfig::from_json_file(&args.genesis).map_err(|e| e.to_string())?;

    let store = match &args.data_dir {
        Some(dir) => Some(SnapshotStore::new(dir).map_err(|e| e.to_string())?),
        None => None,
    };

    let mut ledger = match store
        .as_ref()
        .map(|s| s.load())
        .transpose()
        .map_err(|e| e.to_string())?
        .flatten()
    {
        Some(snap) => {
            let ledger = ReputationLedger::restore(snap).map_err(|e| e.to_string())?;
            if ledger.owner() != &genesis.owner || ledger.ledger_id() != genesis.ledger_id {
                return Err("snapshot does not belong to this genesis".into());
            }
            info!(accounts = ledger.accounts().len(), "restored snapshot");
            ledger
        }
        None => ReputationLedger::from_genesis(&genesis),
    };

    let input: Box<dyn BufRead> = match &args.calls {
        Some(path) => Box::new(BufReader::new(
            File::open(path).map_err(|e| format!("{}: {}", path, e))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut applied = 0u64;
    let mut rejected = 0u64;

    for (lineno, line) in input.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        if line.trim().is_empty() {
            continue;
        }
        let result = match serde_json::from_str::<Call>(&line) {
            Ok(call) => match ledger.apply(&call) {
                Ok(outcome) => {
                    applied += 1;
                    json!({ "ok": outcome })
                }
                Err(e) => {
                    rejected += 1;
                    json!({ "err": { "code": e.code(), "message": e.to_string() } })
                }
            },
            Err(e) => {
                warn!(line = lineno + 1, error = %e, "skipping malformed call");
                json!({ "err": { "code": "malformed", "message": e.to_string() } })
            }
        };
        writeln!(out, "{}", result).map_err(|e| e.to_string())?;
    }

    if let Some(store) = &store {
        store.save(&ledger.snapshot()).map_err(|e| e.to_string())?;
        info!(path = %store.path().display(), "snapshot saved");
    }

    let root = hex::encode(ledger.state_root());
    info!(applied, rejected, state_root = %root, "replay finished");
    writeln!(out, "{}", json!({ "state_root": root })).map_err(|e| e.to_string())?;
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "usage: nosedive-replay --genesis <file> [--calls <file>] [--data-dir <dir>] [--log-level <level>]"
            );
            return ExitCode::from(2);
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set logging subscriber: {}", e);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}
