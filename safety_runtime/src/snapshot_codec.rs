//! Snapshot Codec — deterministic contract encoder/decoder.
//!
//! Pure codec layer. No side-effects, no timestamps, no envelope.
//!
//! - `encode_snapshot`:  SafetyContract → JSON string
//! - `decode_snapshot`:  JSON string → SafetyContract (strict, no defaults)
//! - `restore_snapshot`: decode + invariant validation
//! - `export_snapshot_to_file` / `import_snapshot_from_file`: file I/O
//! - `snapshot_hash`:    SHA-256 of the encoded JSON (lowercase hex)

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use thiserror::Error;

use safety_kernel::contract::SafetyContract;
use safety_kernel::invariants::validate_invariants;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// All possible snapshot failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("SerializationError: {0}")]
    Serialization(String),
    /// Malformed JSON, missing fields or unknown fields.
    #[error("DeserializationError: {0}")]
    Deserialization(String),
    /// Loaded state violates kernel invariants.
    #[error("InvariantViolation: {0}")]
    InvariantViolation(String),
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Encoder / decoder
// ---------------------------------------------------------------------------

/// Encode a contract to a JSON string. BTreeMaps keep role keys sorted,
/// so identical contracts encode byte-for-byte identically.
pub fn encode_snapshot(contract: &SafetyContract) -> Result<String, SnapshotError> {
    serde_json::to_string(contract).map_err(|e| SnapshotError::Serialization(e.to_string()))
}

/// Decode a JSON string into a contract.
///
/// Strict: `deny_unknown_fields` rejects unexpected fields, missing
/// fields fail. No invariant validation — use `restore_snapshot`.
pub fn decode_snapshot(json: &str) -> Result<SafetyContract, SnapshotError> {
    serde_json::from_str::<SafetyContract>(json)
        .map_err(|e| SnapshotError::Deserialization(e.to_string()))
}

/// Decode and validate invariants immediately.
///
/// This is the safe entry point for loading state from untrusted sources.
pub fn restore_snapshot(json: &str) -> Result<SafetyContract, SnapshotError> {
    let contract = decode_snapshot(json)?;
    validate_invariants(&contract).map_err(SnapshotError::InvariantViolation)?;
    Ok(contract)
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Export a contract to a file. Creates parent directories if needed.
pub fn export_snapshot_to_file(contract: &SafetyContract, path: &Path) -> Result<(), SnapshotError> {
    let json = encode_snapshot(contract)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json.as_bytes())?;
    Ok(())
}

/// Import a contract from a JSON file, validating invariants.
pub fn import_snapshot_from_file(path: &Path) -> Result<SafetyContract, SnapshotError> {
    let content = fs::read_to_string(path)?;
    restore_snapshot(&content)
}

// ---------------------------------------------------------------------------
// Hash
// ---------------------------------------------------------------------------

/// SHA-256 of the serde-derived JSON, NOT the canonical hash from
/// `safety_kernel::hashing`. Used for snapshot file integrity.
pub fn snapshot_hash(contract: &SafetyContract) -> Result<String, SnapshotError> {
    let json = encode_snapshot(contract)?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
