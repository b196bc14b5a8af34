/// SafetyContract — Ownership Registry
///
/// At most one owner. Once renounced, every owner-gated operation
/// fails for every caller; there is no recovery path.

use serde::{Deserialize, Serialize};

use crate::errors::ContractError;
use crate::events::ContractEvent;
use crate::identity::Address;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnershipRegistry {
    owner: Option<Address>,
}

impl OwnershipRegistry {
    /// Registry owned by `initial`; emits the zero -> initial transfer.
    pub fn new(initial: Address) -> Result<(Self, ContractEvent), ContractError> {
        if initial.is_zero() {
            return Err(ContractError::InvalidOwner);
        }
        let event = ContractEvent::OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: initial,
        };
        Ok((Self { owner: Some(initial) }, event))
    }

    /// Current owner, or `Address::ZERO` when renounced.
    pub fn owner(&self) -> Address {
        self.owner.unwrap_or(Address::ZERO)
    }

    pub fn current(&self) -> Option<Address> {
        self.owner
    }

    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner.as_ref() == Some(caller)
    }

    pub fn check_owner(&self, caller: &Address) -> Result<(), ContractError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }

    pub fn transfer(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<ContractEvent, ContractError> {
        self.check_owner(caller)?;
        if new_owner.is_zero() {
            return Err(ContractError::InvalidOwner);
        }
        Ok(self.set(Some(new_owner)))
    }

    pub fn renounce(&mut self, caller: &Address) -> Result<ContractEvent, ContractError> {
        self.check_owner(caller)?;
        Ok(self.set(None))
    }

    fn set(&mut self, next: Option<Address>) -> ContractEvent {
        let previous_owner = self.owner();
        self.owner = next;
        ContractEvent::OwnershipTransferred {
            previous_owner,
            new_owner: self.owner(),
        }
    }
}
