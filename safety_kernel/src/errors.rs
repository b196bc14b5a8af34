/// SafetyContract — Error Kinds
///
/// `ContractError` is what a caller sees when a guarded call aborts.
/// Variants carry no caller or role detail.
///
/// `EngineError` covers envelopes the engine refuses before the
/// contract is consulted at all.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractError {
    /// First-init path invoked when Version >= 1.
    #[error("AlreadyInitialized")]
    AlreadyInitialized,
    /// Requested version not strictly greater than the current one.
    #[error("InvalidVersion")]
    InvalidVersion,
    /// Caller lacks the required owner or role capability.
    #[error("Unauthorized")]
    Unauthorized,
    /// Self-renouncement confirmation does not equal the caller.
    #[error("BadConfirmation")]
    BadConfirmation,
    /// Ownership transfer to the zero address.
    #[error("InvalidOwner")]
    InvalidOwner,
    /// Arithmetic on the protected value left the `StateValue` range.
    #[error("Overflow")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("schema version mismatch: expected {expected}, got {got}")]
    SchemaVersion { expected: u32, got: u32 },
    #[error("sequence violation: expected {expected}, got {got}")]
    Sequence { expected: u64, got: u64 },
    #[error("first call must be deploy, got {0}")]
    NotDeployed(&'static str),
    #[error("deploy can only be the first call")]
    AlreadyDeployed,
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
