/// SafetyContract — Invariant Checks
///
/// Non-panicking validation. Each check returns `Err(message)` tagged
/// with `[INVARIANT:<name>]` on the first failure.
///
/// State checks run after every committed call and on snapshot restore.
/// Transition checks compare the contract before and after one call.

use crate::calls::Call;
use crate::contract::SafetyContract;
use crate::hashing::canonical_hash;
use crate::identity::RoleId;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run all state checks.
pub fn validate_invariants(contract: &SafetyContract) -> Result<(), String> {
    check_version_initialized(contract)?;
    check_owner_not_zero(contract)?;
    check_no_empty_role_sets(contract)?;
    check_no_default_admin_override(contract)?;
    Ok(())
}

/// Run all transition checks for `call` taking `before` to `after`.
pub fn validate_transition(
    before: &SafetyContract,
    after: &SafetyContract,
    call: &Call,
) -> Result<(), String> {
    check_version_monotonic(before, after)?;
    if call.is_read_only() {
        check_read_only_pure(before, after, call)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// State checks
// ---------------------------------------------------------------------------

fn check_version_initialized(contract: &SafetyContract) -> Result<(), String> {
    if !contract.protected_state().is_initialized() {
        return Err("[INVARIANT:version_initialized] deployed contract has version 0".to_string());
    }
    Ok(())
}

fn check_owner_not_zero(contract: &SafetyContract) -> Result<(), String> {
    if let Some(owner) = contract.ownership().current() {
        if owner.is_zero() {
            return Err(
                "[INVARIANT:owner_not_zero] owner is set to the zero address".to_string(),
            );
        }
    }
    Ok(())
}

fn check_no_empty_role_sets(contract: &SafetyContract) -> Result<(), String> {
    for (role, members) in contract.roles().member_sets() {
        if members.is_empty() {
            return Err(format!(
                "[INVARIANT:no_empty_role_sets] role {} has an empty member set",
                role
            ));
        }
    }
    Ok(())
}

fn check_no_default_admin_override(contract: &SafetyContract) -> Result<(), String> {
    for (role, admin) in contract.roles().admin_overrides() {
        if *admin == RoleId::DEFAULT_ADMIN {
            return Err(format!(
                "[INVARIANT:no_default_admin_override] role {} stores the default admin role",
                role
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transition checks
// ---------------------------------------------------------------------------

fn check_version_monotonic(before: &SafetyContract, after: &SafetyContract) -> Result<(), String> {
    let (v0, v1) = (before.initialized_version(), after.initialized_version());
    if v1 < v0 {
        return Err(format!(
            "[INVARIANT:version_monotonic] version went from {} to {}",
            v0, v1
        ));
    }
    Ok(())
}

fn check_read_only_pure(
    before: &SafetyContract,
    after: &SafetyContract,
    call: &Call,
) -> Result<(), String> {
    if canonical_hash(before) != canonical_hash(after) {
        return Err(format!(
            "[INVARIANT:read_only_calls_pure] {} changed contract state",
            call.name()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Address;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    #[test]
    fn test_fresh_contract_is_valid() {
        let c = SafetyContract::deploy(addr(1), 1, 0).unwrap();
        assert_eq!(validate_invariants(&c), Ok(()));
    }

    #[test]
    fn test_renounced_contract_is_valid() {
        let mut c = SafetyContract::deploy(addr(1), 1, 0).unwrap();
        c.renounce_ownership(&addr(1)).unwrap();
        c.renounce_role(&addr(1), RoleId::DEFAULT_ADMIN, addr(1)).unwrap();
        assert_eq!(validate_invariants(&c), Ok(()));
    }

    #[test]
    fn test_version_regression_is_caught() {
        let before = SafetyContract::deploy(addr(1), 1, 0).unwrap();
        let mut after = before.clone();
        after.reinitialize(&addr(1), 1, 4).unwrap();
        let err = validate_transition(&after, &before, &Call::A).unwrap_err();
        assert!(err.contains("version_monotonic"), "got: {}", err);
    }

    #[test]
    fn test_read_only_mutation_is_caught() {
        let before = SafetyContract::deploy(addr(1), 1, 0).unwrap();
        let mut after = before.clone();
        after.grant_role(&addr(1), RoleId::DEFAULT_ADMIN, addr(2)).unwrap();
        let err = validate_transition(&before, &after, &Call::Complex { value: 1 }).unwrap_err();
        assert!(err.contains("read_only_calls_pure"), "got: {}", err);

        // The same change is fine for a mutating call.
        let grant = Call::GrantRole { role: RoleId::DEFAULT_ADMIN, account: addr(2) };
        assert_eq!(validate_transition(&before, &after, &grant), Ok(()));
    }
}
