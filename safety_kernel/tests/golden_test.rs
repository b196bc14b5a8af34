/// Golden determinism test — replays the frozen call stream and
/// asserts the canonical hash matches the permanent v1 value.
///
/// This test must NEVER be modified to match new behavior.
/// If it fails, the kernel has been broken.

use std::fs;

use safety_kernel::calls::CallEnvelope;
use safety_kernel::engine::{Engine, Outcome, Return};
use safety_kernel::errors::ContractError;
use safety_kernel::hashing::canonical_hash;
use safety_kernel::KERNEL_VERSION;

fn load_calls(path: &str) -> Vec<CallEnvelope> {
    let data = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    serde_json::from_str(&data).expect("Failed to parse calls JSON")
}

fn load_expected_hash(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
        .trim()
        .to_string()
}

fn replay(calls: &[CallEnvelope]) -> Engine {
    let mut engine = Engine::new();
    engine.apply_sequence(calls).expect("golden stream must be accepted");
    engine
}

#[test]
fn golden_replay_hash_matches() {
    let calls = load_calls("tests/golden/calls.json");
    let engine = replay(&calls);
    let hash = canonical_hash(engine.contract().expect("deployed"));

    let expected = load_expected_hash("tests/golden/expected_hash.txt");
    assert_eq!(
        hash, expected,
        "GOLDEN TEST FAILED: Kernel v1 replay produced a different hash.\n\
         Got:      {}\n\
         Expected: {}",
        hash, expected
    );
}

#[test]
fn golden_replay_outcomes() {
    let calls = load_calls("tests/golden/calls.json");
    let engine = replay(&calls);
    let outcomes: Vec<&Outcome> = engine.receipts().iter().map(|r| &r.outcome).collect();

    let reverted = |e| Outcome::Reverted(e);
    assert_eq!(outcomes.len(), 17);
    assert_eq!(*outcomes[1], reverted(ContractError::AlreadyInitialized));
    assert_eq!(*outcomes[3], reverted(ContractError::InvalidVersion));
    assert_eq!(*outcomes[4], reverted(ContractError::InvalidVersion));
    assert_eq!(*outcomes[5], reverted(ContractError::Unauthorized));
    assert_eq!(*outcomes[7], Outcome::Committed(Return::Value(4)));
    assert_eq!(*outcomes[11], reverted(ContractError::Unauthorized));
    assert_eq!(*outcomes[12], reverted(ContractError::BadConfirmation));
    assert_eq!(*outcomes[15], Outcome::Committed(Return::Value(111)));
    assert_eq!(
        *outcomes[16],
        Outcome::Committed(Return::Address(calls[16].caller))
    );
}

#[test]
fn golden_replay_is_deterministic() {
    let calls = load_calls("tests/golden/calls.json");

    let h1 = canonical_hash(replay(&calls).contract().expect("deployed"));
    let h2 = canonical_hash(replay(&calls).contract().expect("deployed"));

    assert_eq!(
        h1, h2,
        "DETERMINISM FAILURE: Two replays of the same calls produced different hashes.\n\
         Run 1: {}\n\
         Run 2: {}",
        h1, h2
    );
}

#[test]
fn kernel_version_is_one() {
    assert_eq!(KERNEL_VERSION, 1, "KERNEL_VERSION must be 1 and never change");
}
