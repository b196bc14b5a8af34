/// SafetyContract — Call Definitions
///
/// Calls are pure data: the operation and its arguments, wrapped in an
/// envelope carrying the caller and the sequence number assigned by
/// the external sequencer. They contain no execution logic.
///
/// Schema version is locked at 1.

use serde::{Deserialize, Serialize};

use crate::identity::{Address, RoleId, StateValue, Version};

pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    /// Constructor. Must be the first call and only the first call.
    Deploy { initial_value: StateValue, amount: u128 },
    Initialize { value: StateValue },
    Reinitialize { value: StateValue, version: Version },
    TransferOwnership { new_owner: Address },
    RenounceOwnership,
    GrantRole { role: RoleId, account: Address },
    RevokeRole { role: RoleId, account: Address },
    RenounceRole { role: RoleId, caller_confirmation: Address },
    SetRoleAdmin { role: RoleId, admin_role: RoleId },
    Owner,
    HasRole { role: RoleId, account: Address },
    GetRoleAdmin { role: RoleId },
    A,
    InitializedVersion,
    Endowment,
    Complex { value: StateValue },
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Deploy { .. } => "deploy",
            Call::Initialize { .. } => "initialize",
            Call::Reinitialize { .. } => "reinitialize",
            Call::TransferOwnership { .. } => "transfer_ownership",
            Call::RenounceOwnership => "renounce_ownership",
            Call::GrantRole { .. } => "grant_role",
            Call::RevokeRole { .. } => "revoke_role",
            Call::RenounceRole { .. } => "renounce_role",
            Call::SetRoleAdmin { .. } => "set_role_admin",
            Call::Owner => "owner",
            Call::HasRole { .. } => "has_role",
            Call::GetRoleAdmin { .. } => "get_role_admin",
            Call::A => "a",
            Call::InitializedVersion => "initialized_version",
            Call::Endowment => "endowment",
            Call::Complex { .. } => "complex",
        }
    }

    /// Calls that may never change contract state.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Call::Owner
                | Call::HasRole { .. }
                | Call::GetRoleAdmin { .. }
                | Call::A
                | Call::InitializedVersion
                | Call::Endowment
                | Call::Complex { .. }
        )
    }
}

/// One sequenced call against one contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallEnvelope {
    pub sequence: u64,
    pub caller: Address,
    pub call: Call,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl CallEnvelope {
    pub fn new(sequence: u64, caller: Address, call: Call) -> Self {
        Self {
            sequence,
            caller,
            call,
            schema_version: SCHEMA_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_json_shape() {
        let json = r#"{
            "sequence": 3,
            "caller": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "call": { "reinitialize": { "value": 111, "version": 2 } }
        }"#;
        let env: CallEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.sequence, 3);
        assert_eq!(env.schema_version, SCHEMA_VERSION);
        assert_eq!(env.call, Call::Reinitialize { value: 111, version: 2 });
        assert_eq!(env.call.name(), "reinitialize");
    }

    #[test]
    fn test_unit_calls_are_bare_strings() {
        let json = r#"{"sequence":9,"caller":"0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266","call":"renounce_ownership"}"#;
        let env: CallEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.call, Call::RenounceOwnership);
        assert!(!env.call.is_read_only());
    }

    #[test]
    fn test_read_only_classification() {
        assert!(Call::Complex { value: 1 }.is_read_only());
        assert!(Call::A.is_read_only());
        assert!(!Call::Initialize { value: 1 }.is_read_only());
        assert!(!Call::Deploy { initial_value: 1, amount: 0 }.is_read_only());
    }
}
