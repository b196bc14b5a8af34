/// SafetyContract — Replay Harness
///
/// Loads a JSON array of call envelopes, replays it twice through the
/// engine, prints every receipt and compares hashes.
///
/// Usage: safety-replay <calls.json> [expected_hash]

use std::fs;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use safety_kernel::calls::CallEnvelope;
use safety_kernel::engine::{Engine, Outcome};
use safety_kernel::hashing::canonical_hash;

fn replay(calls: &[CallEnvelope]) -> Result<Engine, String> {
    let mut engine = Engine::new();
    engine.apply_sequence(calls).map_err(|e| e.to_string())?;
    Ok(engine)
}

fn final_hash(engine: &Engine) -> Result<String, String> {
    engine
        .contract()
        .map(canonical_hash)
        .ok_or_else(|| "no contract deployed".to_string())
}

fn run(path: &str, expected: Option<&str>) -> Result<bool, String> {
    let data = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path, e))?;
    let calls: Vec<CallEnvelope> =
        serde_json::from_str(&data).map_err(|e| format!("failed to parse {}: {}", path, e))?;
    info!(path, calls = calls.len(), "loaded calls");

    // Run 1
    let engine = replay(&calls)?;
    for r in engine.receipts() {
        match &r.outcome {
            Outcome::Committed(ret) => println!(
                "[{:>4}] {} {} -> {:?} ({} events)",
                r.sequence,
                r.caller,
                r.call.name(),
                ret,
                r.events.len()
            ),
            Outcome::Reverted(err) => {
                println!("[{:>4}] {} {} -> reverted {}", r.sequence, r.caller, r.call.name(), err)
            }
        }
    }
    let h1 = final_hash(&engine)?;

    // Run 2 (determinism check)
    let h2 = final_hash(&replay(&calls)?)?;

    let mut ok = true;
    if h1 != h2 {
        println!("  Determinism fail: run1={} run2={}", h1, h2);
        ok = false;
    }
    if let Some(expected) = expected {
        if h1 != expected {
            println!("  Hash mismatch: got={} expected={}", h1, expected);
            ok = false;
        }
    }
    println!("hash={}", h1);
    Ok(ok)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: safety-replay <calls.json> [expected_hash]");
        return ExitCode::from(2);
    };

    match run(path, args.get(2).map(String::as_str)) {
        Ok(true) => {
            println!("[OK] replay checks PASSED.");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("[FAIL] replay checks failed.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
