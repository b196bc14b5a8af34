//! Snapshot layer — deterministic canonical snapshots.
//!
//! Snapshots contain canonical JSON + hash for verification.
//! No timestamps in snapshot content.
//!
//! If a snapshot hash doesn't match replay, trigger a full replay.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use safety_kernel::contract::SafetyContract;
use safety_kernel::hashing::{canonical_hash, canonical_serialize};

use crate::snapshot_codec::SnapshotError;

/// Snapshot on-disk format.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Sequence number at which this snapshot was taken.
    pub sequence: u64,
    /// Canonical JSON of the contract (UTF-8).
    pub canonical_json: String,
    /// SHA-256 of the canonical JSON.
    pub hash: String,
    /// Kernel version at snapshot time.
    pub kernel_version: u32,
}

fn snapshot_path(dir: &Path, sequence: u64) -> PathBuf {
    dir.join(format!("snapshot_{:06}.json", sequence))
}

/// Save a deterministic snapshot of the current contract.
pub fn save_snapshot(
    dir: &Path,
    sequence: u64,
    contract: &SafetyContract,
) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(dir)?;

    let canonical_json = String::from_utf8(canonical_serialize(contract))
        .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    let snap = Snapshot {
        sequence,
        canonical_json,
        hash: canonical_hash(contract),
        kernel_version: safety_kernel::KERNEL_VERSION,
    };

    let path = snapshot_path(dir, sequence);
    let content = serde_json::to_string(&snap)
        .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    info!(sequence, path = %path.display(), "saved snapshot");
    Ok(path)
}

/// Load a snapshot at a specific sequence number.
/// Returns None if no snapshot exists at that sequence.
pub fn load_snapshot(dir: &Path, sequence: u64) -> Result<Option<Snapshot>, SnapshotError> {
    let path = snapshot_path(dir, sequence);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let snap: Snapshot = serde_json::from_str(&content)
        .map_err(|e| SnapshotError::Deserialization(e.to_string()))?;
    Ok(Some(snap))
}

/// Load the latest snapshot in a directory.
/// Scans for snapshot_NNNNNN.json files and returns the highest sequence.
pub fn load_latest_snapshot(dir: &Path) -> Result<Option<Snapshot>, SnapshotError> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut best_seq: Option<u64> = None;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let seq = name
            .to_string_lossy()
            .strip_prefix("snapshot_")
            .and_then(|s| s.strip_suffix(".json"))
            .and_then(|s| s.parse::<u64>().ok());
        if let Some(seq) = seq {
            best_seq = Some(best_seq.map_or(seq, |best| best.max(seq)));
        }
    }

    match best_seq {
        Some(seq) => load_snapshot(dir, seq),
        None => Ok(None),
    }
}

/// Verify a snapshot's internal hash consistency.
pub fn verify_snapshot_hash(snap: &Snapshot) -> bool {
    hex::encode(Sha256::digest(snap.canonical_json.as_bytes())) == snap.hash
}
