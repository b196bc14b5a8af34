/// SafetyContract — Initialization Guard
///
/// Uninitialized(0) -> Initialized(1) -> Reinitialized(v), v strictly
/// increasing. Every check runs before any write; a rejected
/// transition leaves the state untouched.
///
/// Ownership of `reinitialize` is checked by the caller of this module.

use crate::errors::ContractError;
use crate::events::ContractEvent;
use crate::identity::{StateValue, Version};
use crate::state::ProtectedState;

/// The first-init path. Succeeds only while Version == 0.
pub fn initialize(
    state: &mut ProtectedState,
    value: StateValue,
) -> Result<ContractEvent, ContractError> {
    if state.version != 0 {
        return Err(ContractError::AlreadyInitialized);
    }
    state.value = value;
    state.version = 1;
    Ok(ContractEvent::Initialized { version: 1 })
}

/// Versioned re-initialization. `requested` must exceed the current version.
pub fn reinitialize(
    state: &mut ProtectedState,
    value: StateValue,
    requested: Version,
) -> Result<ContractEvent, ContractError> {
    check_reinitialize(state, requested)?;
    state.value = value;
    state.version = requested;
    Ok(ContractEvent::Initialized { version: requested })
}

/// Version gate for `reinitialize`, without side effects.
pub fn check_reinitialize(
    state: &ProtectedState,
    requested: Version,
) -> Result<(), ContractError> {
    if requested <= state.version {
        return Err(ContractError::InvalidVersion);
    }
    Ok(())
}
