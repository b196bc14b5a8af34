//! Replay orchestrator — rebuild a contract from its call log.
//!
//! Delegates all guard logic to the kernel.
//! No shortcuts, no cached state logic.

use safety_kernel::calls::CallEnvelope;
use safety_kernel::contract::SafetyContract;
use safety_kernel::engine::Engine;
use safety_kernel::errors::EngineError;
use safety_kernel::hashing::canonical_hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("call stream never deployed a contract")]
    NothingDeployed,
}

/// Rebuild the contract from a sequence of calls.
///
/// 1. Create a fresh engine
/// 2. Pass each call sequentially to the kernel
/// 3. Return (final_contract, canonical_hash)
///
/// This is a pure function on the call stream — deterministic by
/// the kernel's guarantee.
pub fn rebuild_state(calls: &[CallEnvelope]) -> Result<(SafetyContract, String), ReplayError> {
    let mut engine = Engine::new();
    engine.apply_sequence(calls)?;

    let contract = engine
        .contract()
        .cloned()
        .ok_or(ReplayError::NothingDeployed)?;
    let hash = canonical_hash(&contract);
    Ok((contract, hash))
}

/// Rebuild and return only the canonical hash.
pub fn rebuild_hash(calls: &[CallEnvelope]) -> Result<String, ReplayError> {
    rebuild_state(calls).map(|(_, hash)| hash)
}
