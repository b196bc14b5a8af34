//! Session manager — isolated sessions with persist-after-apply semantics.
//!
//! Each session gets its own directory with a call log and snapshots.
//! Concurrency: Mutex for write serialization, no global mutable state.
//!
//! Apply-before-persist order:
//!   1. engine.apply_call(call)  — refused envelopes stop here
//!   2. call_log.append()        — only if step 1 produced a receipt,
//!                                 rolled back in the engine on failure
//!   3. snapshot if interval reached, failures only logged

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{info, warn};

use safety_kernel::calls::CallEnvelope;
use safety_kernel::contract::SafetyContract;
use safety_kernel::engine::{Engine, Receipt};
use safety_kernel::errors::EngineError;
use safety_kernel::hashing::canonical_hash;

use crate::call_log::{CallLog, CallLogError};
use crate::config::{DeploymentConfig, RuntimeConfig};
use crate::proto_bridge::{kernel_to_proto, proto_to_kernel, BridgeError};
use crate::replay::{self, ReplayError};
use crate::snapshot;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    CallLog(#[from] CallLogError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("session lock poisoned")]
    Poisoned,
}

/// An isolated contract instance with its own call log.
pub struct Session {
    session_id: String,
    base_dir: PathBuf,
    engine: Engine,
    call_log: CallLog,
    snapshot_interval: u64,
}

impl Session {
    /// Open (or create) a session in the given base directory, replaying
    /// any calls already in its log.
    ///
    /// Directory structure:
    ///   <base_dir>/<session_id>/calls.log
    ///   <base_dir>/<session_id>/snapshots/
    pub fn new(
        base_dir: &Path,
        session_id: &str,
        snapshot_interval: u64,
    ) -> Result<Self, SessionError> {
        let session_dir = base_dir.join(session_id);
        let call_log = CallLog::open(&session_dir.join("calls.log"))?;

        let mut engine = Engine::new();
        for proto in call_log.load_all()? {
            engine.apply_call(&proto_to_kernel(&proto)?)?;
        }
        info!(
            session_id,
            sequence = engine.last_sequence(),
            "opened session"
        );

        Ok(Self {
            session_id: session_id.to_string(),
            base_dir: session_dir,
            engine,
            call_log,
            snapshot_interval,
        })
    }

    /// Open a session and deploy the contract if the log is empty.
    pub fn open_with_config(config: &RuntimeConfig, session_id: &str) -> Result<Self, SessionError> {
        let mut session = Self::new(&config.data_dir, session_id, config.snapshot_interval)?;
        if session.contract().is_none() && session.current_sequence() == 0 {
            session.deploy(&config.deployment)?;
        }
        Ok(session)
    }

    /// Submit the constructor call.
    pub fn deploy(&mut self, deployment: &DeploymentConfig) -> Result<Receipt, SessionError> {
        self.apply_call(&deployment.deploy_call())
    }

    /// Apply a single call through the kernel, then persist it.
    ///
    /// Reverted calls are persisted too: their sequence number is spent.
    /// If the log append fails the engine is rolled back, so memory never
    /// runs ahead of disk. A failed snapshot does not fail the call.
    pub fn apply_call(&mut self, call: &CallEnvelope) -> Result<Receipt, SessionError> {
        let previous = self.engine.contract().cloned();
        let receipt = self.engine.apply_call(call)?.clone();

        if let Err(e) = self.call_log.append(&kernel_to_proto(call)) {
            self.engine.rollback_last(previous);
            warn!(
                session_id = %self.session_id,
                sequence = call.sequence,
                error = %e,
                "call log append failed, rolled back"
            );
            return Err(e.into());
        }

        if self.snapshot_interval > 0 && call.sequence % self.snapshot_interval == 0 {
            if let Some(contract) = self.engine.contract() {
                if let Err(e) =
                    snapshot::save_snapshot(&self.base_dir.join("snapshots"), call.sequence, contract)
                {
                    warn!(
                        session_id = %self.session_id,
                        sequence = call.sequence,
                        error = %e,
                        "snapshot failed"
                    );
                }
            }
        }

        Ok(receipt)
    }

    /// Full replay from the call log — reset the engine and replay.
    pub fn replay_full(&mut self) -> Result<(SafetyContract, String), SessionError> {
        let calls = self
            .call_log
            .load_all()?
            .iter()
            .map(proto_to_kernel)
            .collect::<Result<Vec<_>, _>>()?;

        let rebuilt = replay::rebuild_state(&calls)?;
        self.engine.replay(&calls)?;
        info!(session_id = %self.session_id, calls = calls.len(), "replayed session");
        Ok(rebuilt)
    }

    pub fn contract(&self) -> Option<&SafetyContract> {
        self.engine.contract()
    }

    pub fn receipts(&self) -> &[Receipt] {
        self.engine.receipts()
    }

    /// Canonical hash of the live contract, `None` before deployment.
    pub fn current_hash(&self) -> Option<String> {
        self.engine.contract().map(canonical_hash)
    }

    pub fn current_sequence(&self) -> u64 {
        self.engine.last_sequence()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Thread-safe session handle. Every call holds the lock from guard
/// check to commit, so calls on one instance never interleave.
pub struct SharedSession {
    inner: Mutex<Session>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Apply a call under the lock.
    pub fn apply_call(&self, call: &CallEnvelope) -> Result<Receipt, SessionError> {
        let mut session = self.inner.lock().map_err(|_| SessionError::Poisoned)?;
        session.apply_call(call)
    }

    /// Apply a call built from the next free sequence number, under the lock.
    pub fn submit(
        &self,
        build: impl FnOnce(u64) -> CallEnvelope,
    ) -> Result<Receipt, SessionError> {
        let mut session = self.inner.lock().map_err(|_| SessionError::Poisoned)?;
        let call = build(session.current_sequence() + 1);
        session.apply_call(&call)
    }

    pub fn current_hash(&self) -> Result<Option<String>, SessionError> {
        let session = self.inner.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(session.current_hash())
    }

    pub fn current_sequence(&self) -> Result<u64, SessionError> {
        let session = self.inner.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(session.current_sequence())
    }

    pub fn into_inner(self) -> Result<Session, SessionError> {
        self.inner.into_inner().map_err(|_| SessionError::Poisoned)
    }
}
