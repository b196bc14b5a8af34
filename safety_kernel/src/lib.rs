#![forbid(unsafe_code)]

//! SafetyContract kernel.
//!
//! A single protected value gated by three independent guards:
//! one-shot-then-versioned initialization, single-owner ownership and
//! role-based access control. Pure, sequential and deterministic; the
//! external sequencer is modelled by [`engine::Engine`].

/// Kernel v1. Part of the canonical hash.
pub const KERNEL_VERSION: u32 = 1;

pub mod identity;
pub mod errors;
pub mod events;
pub mod state;
pub mod initialization;
pub mod ownership;
pub mod access;
pub mod contract;
pub mod calls;
pub mod invariants;
pub mod hashing;
pub mod engine;
