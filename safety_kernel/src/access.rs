/// SafetyContract — Role Registry
///
/// Role id -> member set. Each role has an admin role (default:
/// role 0) whose members may grant and revoke it. Empty member sets
/// and default admin entries are never stored, so two registries
/// with the same memberships compare equal.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::ContractError;
use crate::events::ContractEvent;
use crate::identity::{Address, RoleId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleRegistry {
    members: BTreeMap<RoleId, BTreeSet<Address>>,
    admins: BTreeMap<RoleId, RoleId>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        self.members
            .get(role)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    pub fn check_role(&self, role: &RoleId, account: &Address) -> Result<(), ContractError> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }

    pub fn role_admin(&self, role: &RoleId) -> RoleId {
        self.admins.get(role).copied().unwrap_or(RoleId::DEFAULT_ADMIN)
    }

    /// True if `account` holds the admin role of `role`.
    pub fn is_admin_of(&self, role: &RoleId, account: &Address) -> bool {
        self.has_role(&self.role_admin(role), account)
    }

    /// Ungated insert. Returns an event only when membership changed.
    pub fn grant(
        &mut self,
        role: RoleId,
        account: Address,
        sender: Address,
    ) -> Option<ContractEvent> {
        if !self.members.entry(role).or_default().insert(account) {
            return None;
        }
        Some(ContractEvent::RoleGranted { role, account, sender })
    }

    /// Ungated removal. Returns an event only when membership changed.
    pub fn revoke(
        &mut self,
        role: RoleId,
        account: Address,
        sender: Address,
    ) -> Option<ContractEvent> {
        let set = self.members.get_mut(&role)?;
        if !set.remove(&account) {
            return None;
        }
        if set.is_empty() {
            self.members.remove(&role);
        }
        Some(ContractEvent::RoleRevoked { role, account, sender })
    }

    /// Caller drops its own membership. Confirmation is checked before
    /// membership is consulted.
    pub fn renounce(
        &mut self,
        role: RoleId,
        caller: Address,
        confirmation: Address,
    ) -> Result<Option<ContractEvent>, ContractError> {
        if confirmation != caller {
            return Err(ContractError::BadConfirmation);
        }
        Ok(self.revoke(role, caller, caller))
    }

    pub fn set_role_admin(&mut self, role: RoleId, admin_role: RoleId) -> ContractEvent {
        let previous_admin_role = self.role_admin(&role);
        if admin_role == RoleId::DEFAULT_ADMIN {
            self.admins.remove(&role);
        } else {
            self.admins.insert(role, admin_role);
        }
        ContractEvent::RoleAdminChanged {
            role,
            previous_admin_role,
            new_admin_role: admin_role,
        }
    }

    /// Members of `role`, sorted.
    pub fn members(&self, role: &RoleId) -> impl Iterator<Item = &Address> {
        self.members.get(role).into_iter().flatten()
    }

    /// Every role with a member or an admin override, sorted.
    pub fn roles(&self) -> BTreeSet<RoleId> {
        self.members.keys().chain(self.admins.keys()).copied().collect()
    }

    pub(crate) fn member_sets(&self) -> &BTreeMap<RoleId, BTreeSet<Address>> {
        &self.members
    }

    pub(crate) fn admin_overrides(&self) -> &BTreeMap<RoleId, RoleId> {
        &self.admins
    }
}
