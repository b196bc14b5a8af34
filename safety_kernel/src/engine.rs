/// SafetyContract — Engine
///
/// Top-level orchestrator standing in for the external sequencer's
/// executor. Delegates execution to the contract and validates via
/// invariants.
///
/// Strict sequence enforcement, deploy-first.
/// Each call runs against a clone; only a committed, valid clone
/// replaces the live contract.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calls::{Call, CallEnvelope, SCHEMA_VERSION};
use crate::contract::SafetyContract;
use crate::errors::{ContractError, EngineError};
use crate::events::ContractEvent;
use crate::identity::{Address, RoleId, StateValue, Version};
use crate::invariants::{validate_invariants, validate_transition};

/// Value returned by a committed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Return {
    Unit,
    Value(StateValue),
    Version(Version),
    Address(Address),
    Role(RoleId),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Committed(Return),
    Reverted(ContractError),
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed(_))
    }
}

/// Definite result of one sequenced call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub sequence: u64,
    pub caller: Address,
    pub call: Call,
    pub outcome: Outcome,
    pub events: Vec<ContractEvent>,
}

/// Stateful engine wrapping one contract instance.
#[derive(Default)]
pub struct Engine {
    contract: Option<SafetyContract>,
    last_sequence: u64,
    receipts: Vec<Receipt>,
}

impl Engine {
    /// Create a new engine with nothing deployed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The live contract, `None` before the deploy call.
    pub fn contract(&self) -> Option<&SafetyContract> {
        self.contract.as_ref()
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Apply a single call:
    ///   1. Validate schema version (must be 1)
    ///   2. Validate sequence (strictly increasing, no gaps)
    ///   3. Validate deploy-first rule
    ///   4. Execute against a clone of the contract
    ///   5. On commit, validate transition + state invariants, then swap
    ///   6. Record and return the receipt
    ///
    /// A revert is a valid outcome and consumes the sequence number.
    /// An `EngineError` does not.
    pub fn apply_call(&mut self, envelope: &CallEnvelope) -> Result<&Receipt, EngineError> {
        if envelope.schema_version != SCHEMA_VERSION {
            warn!(got = envelope.schema_version, "rejecting call: schema version mismatch");
            return Err(EngineError::SchemaVersion {
                expected: SCHEMA_VERSION,
                got: envelope.schema_version,
            });
        }

        let expected = self.last_sequence + 1;
        if envelope.sequence != expected {
            warn!(expected, got = envelope.sequence, "rejecting call: sequence violation");
            return Err(EngineError::Sequence {
                expected,
                got: envelope.sequence,
            });
        }

        let caller = envelope.caller;
        let (next, result) = match (&self.contract, &envelope.call) {
            (None, Call::Deploy { initial_value, amount }) => {
                match SafetyContract::deploy(caller, *initial_value, *amount) {
                    Ok(contract) => (Some(contract), Ok(Return::Unit)),
                    Err(e) => (None, Err(e)),
                }
            }
            (None, other) => return Err(EngineError::NotDeployed(other.name())),
            (Some(_), Call::Deploy { .. }) => return Err(EngineError::AlreadyDeployed),
            (Some(current), call) => {
                let mut working = current.clone();
                let result = execute(&mut working, &caller, call);
                if result.is_ok() {
                    validate_transition(current, &working, call)
                        .map_err(EngineError::InvariantViolation)?;
                }
                (Some(working), result)
            }
        };

        let (outcome, events) = match result {
            Ok(ret) => {
                let mut contract = next.ok_or_else(|| {
                    EngineError::InvariantViolation("committed call produced no contract".to_string())
                })?;
                validate_invariants(&contract).map_err(EngineError::InvariantViolation)?;
                let events = contract.drain_events();
                self.contract = Some(contract);
                debug!(
                    sequence = envelope.sequence,
                    %caller,
                    call = envelope.call.name(),
                    events = events.len(),
                    "call committed"
                );
                (Outcome::Committed(ret), events)
            }
            Err(err) => {
                warn!(
                    sequence = envelope.sequence,
                    %caller,
                    call = envelope.call.name(),
                    error = %err,
                    "call reverted"
                );
                (Outcome::Reverted(err), Vec::new())
            }
        };

        self.last_sequence = envelope.sequence;
        self.receipts.push(Receipt {
            sequence: envelope.sequence,
            caller,
            call: envelope.call.clone(),
            outcome,
            events,
        });
        Ok(&self.receipts[self.receipts.len() - 1])
    }

    /// Apply an ordered sequence of calls deterministically.
    /// Stops at the first envelope the engine refuses.
    pub fn apply_sequence(&mut self, calls: &[CallEnvelope]) -> Result<(), EngineError> {
        for call in calls {
            self.apply_call(call)?;
        }
        Ok(())
    }

    /// Event-sourced reconstruction: reset and replay.
    pub fn replay(&mut self, calls: &[CallEnvelope]) -> Result<(), EngineError> {
        *self = Self::new();
        self.apply_sequence(calls)
    }

    /// Undo the most recent accepted call, putting `previous` back as the
    /// live contract. `previous` must be the contract as it was before
    /// that call.
    pub fn rollback_last(&mut self, previous: Option<SafetyContract>) -> Option<Receipt> {
        let receipt = self.receipts.pop()?;
        self.last_sequence = receipt.sequence - 1;
        self.contract = previous;
        debug!(sequence = receipt.sequence, call = receipt.call.name(), "rolled back");
        Some(receipt)
    }
}

/// Dispatch one call to the contract. Deploy is handled by the engine.
fn execute(
    contract: &mut SafetyContract,
    caller: &Address,
    call: &Call,
) -> Result<Return, ContractError> {
    let ret = match call {
        Call::Deploy { .. } => return Err(ContractError::AlreadyInitialized),
        Call::Initialize { value } => {
            contract.initialize(*value)?;
            Return::Unit
        }
        Call::Reinitialize { value, version } => {
            contract.reinitialize(caller, *value, *version)?;
            Return::Unit
        }
        Call::TransferOwnership { new_owner } => {
            contract.transfer_ownership(caller, *new_owner)?;
            Return::Unit
        }
        Call::RenounceOwnership => {
            contract.renounce_ownership(caller)?;
            Return::Unit
        }
        Call::GrantRole { role, account } => {
            contract.grant_role(caller, *role, *account)?;
            Return::Unit
        }
        Call::RevokeRole { role, account } => {
            contract.revoke_role(caller, *role, *account)?;
            Return::Unit
        }
        Call::RenounceRole { role, caller_confirmation } => {
            contract.renounce_role(caller, *role, *caller_confirmation)?;
            Return::Unit
        }
        Call::SetRoleAdmin { role, admin_role } => {
            contract.set_role_admin(caller, *role, *admin_role)?;
            Return::Unit
        }
        Call::Owner => Return::Address(contract.owner()),
        Call::HasRole { role, account } => Return::Bool(contract.has_role(role, account)),
        Call::GetRoleAdmin { role } => Return::Role(contract.role_admin(role)),
        Call::A => Return::Value(contract.a()),
        Call::InitializedVersion => Return::Version(contract.initialized_version()),
        Call::Endowment => Return::Value(contract.endowment()),
        Call::Complex { value } => Return::Value(contract.complex(caller, *value)?),
    };
    Ok(ret)
}
