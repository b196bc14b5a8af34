//! Append-only call log — binary protobuf log.
//!
//! Storage format: length-prefixed protobuf frames.
//!   [4-byte LE length][protobuf bytes][4-byte LE length][protobuf bytes]...
//!
//! Rules:
//!   - Strict append only — no mutation, no deletion, no reordering
//!   - fsync after every write
//!   - Sequence strictly increasing (validated on append)
//!   - Reverted calls are logged too: they consumed a sequence number

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use prost::Message;
use thiserror::Error;
use tracing::{debug, warn};

use crate::proto_types::ProtoCallEnvelope;

/// Frames above this size are treated as corruption.
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum CallLogError {
    #[error("sequence violation in call log: expected {expected}, got {got}")]
    Sequence { expected: u64, got: u64 },
    #[error("invalid frame length {0}")]
    FrameLength(usize),
    #[error("truncated frame: {0}")]
    Truncated(io::Error),
    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Append-only call log backed by a binary file.
pub struct CallLog {
    path: PathBuf,
    last_sequence: u64,
}

impl CallLog {
    /// Open or create a call log at the given path.
    /// Reads existing frames to determine the last sequence number.
    pub fn open(path: &Path) -> Result<Self, CallLogError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let last_sequence = if path.exists() {
            let calls = Self::read_all_from_file(path)?;
            calls.last().map(|c| c.sequence).unwrap_or(0)
        } else {
            0
        };
        debug!(path = %path.display(), last_sequence, "opened call log");

        Ok(Self {
            path: path.to_path_buf(),
            last_sequence,
        })
    }

    /// Append a single call to the log.
    ///
    /// Validates strict sequence ordering.
    /// Writes length-prefixed protobuf and fsyncs.
    pub fn append(&mut self, call: &ProtoCallEnvelope) -> Result<(), CallLogError> {
        let expected = self.last_sequence + 1;
        if call.sequence != expected {
            return Err(CallLogError::Sequence {
                expected,
                got: call.sequence,
            });
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let buf = call.encode_to_vec();
        let len = buf.len() as u32;

        {
            let mut writer = BufWriter::new(&mut file);
            writer.write_all(&len.to_le_bytes())?;
            writer.write_all(&buf)?;
            writer.flush()?;
        }
        file.sync_all()?;

        self.last_sequence = call.sequence;
        Ok(())
    }

    /// Load all calls from the log in sequence order.
    pub fn load_all(&self) -> Result<Vec<ProtoCallEnvelope>, CallLogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        Self::read_all_from_file(&self.path)
    }

    /// Get the last sequence number in the log.
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Read all frames from a file, validating frame integrity.
    fn read_all_from_file(path: &Path) -> Result<Vec<ProtoCallEnvelope>, CallLogError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut calls = Vec::new();
        let mut len_buf = [0u8; 4];

        loop {
            match reader.read_exact(&mut len_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }

            let len = u32::from_le_bytes(len_buf) as usize;
            if len == 0 || len > MAX_FRAME_LEN {
                warn!(path = %path.display(), len, "invalid frame length in call log");
                return Err(CallLogError::FrameLength(len));
            }

            let mut frame = vec![0u8; len];
            reader.read_exact(&mut frame).map_err(|e| {
                warn!(path = %path.display(), frames = calls.len(), "truncated call log");
                CallLogError::Truncated(e)
            })?;

            calls.push(ProtoCallEnvelope::decode(frame.as_slice())?);
        }

        Ok(calls)
    }
}
