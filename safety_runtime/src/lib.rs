#![forbid(unsafe_code)]

//! SafetyContract — Rust Runtime
//!
//! Wraps the kernel with persistence, replay, snapshots, session
//! management, drift detection and configuration.
//!
//! No guard logic lives here — every call is executed and validated
//! by the kernel.

pub mod config;
pub mod proto_types;
pub mod proto_bridge;
pub mod call_log;
pub mod replay;
pub mod snapshot;
pub mod snapshot_codec;
pub mod session;
pub mod drift;
