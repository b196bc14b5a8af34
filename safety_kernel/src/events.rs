/// SafetyContract — Emitted Events
///
/// Events are pure data describing a committed mutation.
/// Reverted calls emit nothing.

use serde::{Deserialize, Serialize};

use crate::identity::{Address, RoleId, Version};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractEvent {
    Initialized {
        version: Version,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
    RoleGranted {
        role: RoleId,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: RoleId,
        account: Address,
        sender: Address,
    },
    RoleAdminChanged {
        role: RoleId,
        previous_admin_role: RoleId,
        new_admin_role: RoleId,
    },
}

impl ContractEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ContractEvent::Initialized { .. } => "Initialized",
            ContractEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
            ContractEvent::RoleGranted { .. } => "RoleGranted",
            ContractEvent::RoleRevoked { .. } => "RoleRevoked",
            ContractEvent::RoleAdminChanged { .. } => "RoleAdminChanged",
        }
    }
}
