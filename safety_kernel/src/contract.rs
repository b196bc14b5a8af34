/// SafetyContract — Composed Contract
///
/// One protected state with three independent gates consulted
/// explicitly by each operation:
///   - initialization (version gate)
///   - ownership      (single owner)
///   - access         (role membership)
///
/// Every operation checks all of its gates before its first write,
/// so a failing call returns `Err` with the contract unchanged.
/// Methods take `&mut self`: exclusive, non-reentrant access per call.

use serde::{Deserialize, Serialize};

use crate::access::RoleRegistry;
use crate::errors::ContractError;
use crate::events::ContractEvent;
use crate::identity::{Address, RoleId, StateValue, Version};
use crate::initialization;
use crate::ownership::OwnershipRegistry;
use crate::state::ProtectedState;

/// Role consulted by `complex`.
pub const COMPLEX_ROLE: RoleId = RoleId::DEFAULT_ADMIN;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SafetyContract {
    state: ProtectedState,
    ownership: OwnershipRegistry,
    roles: RoleRegistry,
    /// Opaque amount attached at construction. Never interpreted.
    endowment: u128,
    #[serde(skip)]
    pending_events: Vec<ContractEvent>,
}

impl SafetyContract {
    /// Construct: run the first-init path with `initial_value`, make
    /// `deployer` the owner and a member of the default role.
    pub fn deploy(
        deployer: Address,
        initial_value: StateValue,
        amount: u128,
    ) -> Result<Self, ContractError> {
        let mut state = ProtectedState::uninitialized();
        let init = initialization::initialize(&mut state, initial_value)?;
        let (ownership, transferred) = OwnershipRegistry::new(deployer)?;
        let mut roles = RoleRegistry::new();
        let granted = roles.grant(RoleId::DEFAULT_ADMIN, deployer, deployer);

        let mut pending_events = vec![transferred];
        pending_events.extend(granted);
        pending_events.push(init);

        Ok(Self {
            state,
            ownership,
            roles,
            endowment: amount,
            pending_events,
        })
    }

    // ── Initialization ─────────────────────────────────────────────

    /// Always fails after construction: deploy already ran first-init.
    pub fn initialize(&mut self, value: StateValue) -> Result<(), ContractError> {
        let event = initialization::initialize(&mut self.state, value)?;
        self.emit(event);
        Ok(())
    }

    pub fn reinitialize(
        &mut self,
        caller: &Address,
        value: StateValue,
        version: Version,
    ) -> Result<(), ContractError> {
        self.ownership.check_owner(caller)?;
        let event = initialization::reinitialize(&mut self.state, value, version)?;
        self.emit(event);
        Ok(())
    }

    // ── Ownership ──────────────────────────────────────────────────

    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        let event = self.ownership.transfer(caller, new_owner)?;
        self.emit(event);
        Ok(())
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<(), ContractError> {
        let event = self.ownership.renounce(caller)?;
        self.emit(event);
        Ok(())
    }

    /// Current owner, `Address::ZERO` once renounced.
    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    // ── Roles ──────────────────────────────────────────────────────

    /// Owner or a member of the role's admin role may administer it.
    fn check_admin(&self, caller: &Address, role: &RoleId) -> Result<(), ContractError> {
        if self.ownership.is_owner(caller) || self.roles.is_admin_of(role, caller) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }

    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: RoleId,
        account: Address,
    ) -> Result<(), ContractError> {
        self.check_admin(caller, &role)?;
        if let Some(event) = self.roles.grant(role, account, *caller) {
            self.emit(event);
        }
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: RoleId,
        account: Address,
    ) -> Result<(), ContractError> {
        self.check_admin(caller, &role)?;
        if let Some(event) = self.roles.revoke(role, account, *caller) {
            self.emit(event);
        }
        Ok(())
    }

    pub fn renounce_role(
        &mut self,
        caller: &Address,
        role: RoleId,
        caller_confirmation: Address,
    ) -> Result<(), ContractError> {
        if let Some(event) = self.roles.renounce(role, *caller, caller_confirmation)? {
            self.emit(event);
        }
        Ok(())
    }

    /// Owner-gated: change which role administers `role`.
    pub fn set_role_admin(
        &mut self,
        caller: &Address,
        role: RoleId,
        admin_role: RoleId,
    ) -> Result<(), ContractError> {
        self.ownership.check_owner(caller)?;
        let event = self.roles.set_role_admin(role, admin_role);
        self.emit(event);
        Ok(())
    }

    pub fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        self.roles.has_role(role, account)
    }

    pub fn role_admin(&self, role: &RoleId) -> RoleId {
        self.roles.role_admin(role)
    }

    // ── State ──────────────────────────────────────────────────────

    /// The governed value `a`.
    pub fn a(&self) -> StateValue {
        self.state.value()
    }

    pub fn initialized_version(&self) -> Version {
        self.state.version()
    }

    pub fn endowment(&self) -> u128 {
        self.endowment
    }

    /// `a + value` for members of the default role. Never mutates.
    pub fn complex(&self, caller: &Address, value: StateValue) -> Result<StateValue, ContractError> {
        self.roles.check_role(&COMPLEX_ROLE, caller)?;
        self.state
            .value()
            .checked_add(value)
            .ok_or(ContractError::Overflow)
    }

    pub fn protected_state(&self) -> &ProtectedState {
        &self.state
    }

    pub fn ownership(&self) -> &OwnershipRegistry {
        &self.ownership
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    // ── Events ─────────────────────────────────────────────────────

    fn emit(&mut self, event: ContractEvent) {
        self.pending_events.push(event);
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn deployed() -> SafetyContract {
        let mut c = SafetyContract::deploy(addr(1), 1, 0).unwrap();
        c.drain_events();
        c
    }

    #[test]
    fn test_deploy_runs_first_init() {
        let mut c = SafetyContract::deploy(addr(1), 1, 5).unwrap();
        assert_eq!((c.a(), c.initialized_version()), (1, 1));
        assert_eq!(c.owner(), addr(1));
        assert!(c.has_role(&COMPLEX_ROLE, &addr(1)));
        assert_eq!(c.endowment(), 5);

        let names: Vec<_> = c.drain_events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["OwnershipTransferred", "RoleGranted", "Initialized"]);
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn test_deploy_by_zero_address_fails() {
        assert_eq!(
            SafetyContract::deploy(Address::ZERO, 1, 0),
            Err(ContractError::InvalidOwner)
        );
    }

    #[test]
    fn test_reinitialize_checks_owner_before_version() {
        let mut c = deployed();
        // Non-owner with a bad version still sees Unauthorized.
        assert_eq!(c.reinitialize(&addr(2), 5, 0), Err(ContractError::Unauthorized));
        assert_eq!(c.reinitialize(&addr(1), 5, 1), Err(ContractError::InvalidVersion));
        assert_eq!(c, deployed());
    }

    #[test]
    fn test_failed_calls_emit_nothing() {
        let mut c = deployed();
        let _ = c.initialize(2);
        let _ = c.transfer_ownership(&addr(2), addr(3));
        let _ = c.grant_role(&addr(2), COMPLEX_ROLE, addr(2));
        let _ = c.renounce_role(&addr(2), COMPLEX_ROLE, addr(1));
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn test_owner_administers_roles_without_membership() {
        let mut c = deployed();
        c.renounce_role(&addr(1), COMPLEX_ROLE, addr(1)).unwrap();
        assert!(!c.has_role(&COMPLEX_ROLE, &addr(1)));
        c.grant_role(&addr(1), COMPLEX_ROLE, addr(2)).unwrap();
        assert!(c.has_role(&COMPLEX_ROLE, &addr(2)));
    }

    #[test]
    fn test_admin_role_member_administers_roles() {
        let mut c = deployed();
        c.grant_role(&addr(1), COMPLEX_ROLE, addr(2)).unwrap();
        c.transfer_ownership(&addr(1), addr(9)).unwrap();
        // addr(2) is not owner but holds role 0, the default admin role.
        c.grant_role(&addr(2), RoleId::from_index(3), addr(4)).unwrap();
        c.revoke_role(&addr(2), COMPLEX_ROLE, addr(1)).unwrap();
        assert!(c.has_role(&RoleId::from_index(3), &addr(4)));
        assert!(!c.has_role(&COMPLEX_ROLE, &addr(1)));
        assert_eq!(
            c.grant_role(&addr(4), COMPLEX_ROLE, addr(4)),
            Err(ContractError::Unauthorized)
        );
    }

    #[test]
    fn test_set_role_admin_is_owner_gated() {
        let mut c = deployed();
        let r1 = RoleId::from_index(1);
        let r2 = RoleId::from_index(2);
        assert_eq!(c.set_role_admin(&addr(2), r1, r2), Err(ContractError::Unauthorized));

        c.set_role_admin(&addr(1), r1, r2).unwrap();
        c.grant_role(&addr(1), r2, addr(5)).unwrap();
        c.grant_role(&addr(5), r1, addr(6)).unwrap();
        assert!(c.has_role(&r1, &addr(6)));
        assert_eq!(c.role_admin(&r1), r2);
    }

    #[test]
    fn test_complex_is_pure() {
        let c = deployed();
        assert_eq!(c.complex(&addr(1), 2), Ok(3));
        assert_eq!(c.complex(&addr(1), 2), Ok(3));
        assert_eq!(c, deployed());
    }

    #[test]
    fn test_complex_overflow() {
        let c = deployed();
        assert_eq!(c.complex(&addr(1), u128::MAX), Err(ContractError::Overflow));
        assert_eq!(c.complex(&addr(1), u128::MAX - 1), Ok(u128::MAX));
    }
}
