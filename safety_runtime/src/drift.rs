//! Drift detection — determinism verification and state comparison.

use std::collections::BTreeSet;

use safety_kernel::calls::CallEnvelope;
use safety_kernel::contract::SafetyContract;
use safety_kernel::identity::{Address, RoleId, StateValue, Version};
use thiserror::Error;

use crate::replay::{self, ReplayError};

#[derive(Debug, Error)]
pub enum DriftError {
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("determinism failure: run 1 = {first}, run 2 = {second}")]
    Nondeterministic { first: String, second: String },
}

/// Verify determinism by replaying the same calls twice and
/// comparing hashes.
pub fn verify_determinism(calls: &[CallEnvelope]) -> Result<String, DriftError> {
    let first = replay::rebuild_hash(calls)?;
    let second = replay::rebuild_hash(calls)?;
    if first != second {
        return Err(DriftError::Nondeterministic { first, second });
    }
    Ok(first)
}

/// Membership change of one role between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDrift {
    pub role: RoleId,
    pub added: Vec<Address>,
    pub removed: Vec<Address>,
    pub admin_a: RoleId,
    pub admin_b: RoleId,
}

/// Structured drift report between two contract states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftReport {
    pub value_a: StateValue,
    pub value_b: StateValue,
    pub version_a: Version,
    pub version_b: Version,
    pub version_delta: u64,
    pub owner_a: Address,
    pub owner_b: Address,
    pub owner_changed: bool,
    pub roles: Vec<RoleDrift>,
}

impl DriftReport {
    /// True if the two states are indistinguishable.
    pub fn is_empty(&self) -> bool {
        self.value_a == self.value_b
            && self.version_a == self.version_b
            && !self.owner_changed
            && self.roles.is_empty()
    }
}

pub fn compare_states(a: &SafetyContract, b: &SafetyContract) -> DriftReport {
    let all_roles: BTreeSet<RoleId> = a
        .roles()
        .roles()
        .into_iter()
        .chain(b.roles().roles())
        .collect();

    let mut roles = Vec::new();
    for role in all_roles {
        let members_a: BTreeSet<&Address> = a.roles().members(&role).collect();
        let members_b: BTreeSet<&Address> = b.roles().members(&role).collect();
        let added: Vec<Address> = members_b.difference(&members_a).map(|m| **m).collect();
        let removed: Vec<Address> = members_a.difference(&members_b).map(|m| **m).collect();
        let (admin_a, admin_b) = (a.role_admin(&role), b.role_admin(&role));

        if !added.is_empty() || !removed.is_empty() || admin_a != admin_b {
            roles.push(RoleDrift {
                role,
                added,
                removed,
                admin_a,
                admin_b,
            });
        }
    }

    let (version_a, version_b) = (a.initialized_version(), b.initialized_version());
    DriftReport {
        value_a: a.a(),
        value_b: b.a(),
        version_a,
        version_b,
        version_delta: version_b.saturating_sub(version_a),
        owner_a: a.owner(),
        owner_b: b.owner(),
        owner_changed: a.ownership().current() != b.ownership().current(),
        roles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    #[test]
    fn identical_states_have_no_drift() {
        let c = SafetyContract::deploy(addr(1), 1, 0).unwrap();
        assert!(compare_states(&c, &c.clone()).is_empty());
    }

    #[test]
    fn drift_captures_roles_owner_and_version() {
        let a = SafetyContract::deploy(addr(1), 1, 0).unwrap();
        let mut b = a.clone();
        b.grant_role(&addr(1), RoleId::DEFAULT_ADMIN, addr(2)).unwrap();
        b.renounce_role(&addr(1), RoleId::DEFAULT_ADMIN, addr(1)).unwrap();
        b.reinitialize(&addr(1), 9, 4).unwrap();
        b.renounce_ownership(&addr(1)).unwrap();

        let report = compare_states(&a, &b);
        assert_eq!((report.value_a, report.value_b), (1, 9));
        assert_eq!(report.version_delta, 3);
        assert!(report.owner_changed);
        assert_eq!(report.owner_b, Address::ZERO);
        assert_eq!(report.roles.len(), 1);
        assert_eq!(report.roles[0].added, vec![addr(2)]);
        assert_eq!(report.roles[0].removed, vec![addr(1)]);
    }
}
