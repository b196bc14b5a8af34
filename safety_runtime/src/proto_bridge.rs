//! Proto ↔ Kernel conversion bridge.
//!
//! Converts between protobuf wire types (proto_types.rs) and the
//! kernel's `CallEnvelope`. Kernel → proto is total; proto → kernel
//! rejects frames with missing messages, bad identities or
//! non-decimal quantities.

use safety_kernel::calls::{Call, CallEnvelope};
use safety_kernel::identity::{Address, IdentityError, RoleId};
use thiserror::Error;

use crate::proto_types::*;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("call envelope has no call")]
    MissingCall,
    #[error("call has no kind")]
    MissingKind,
    #[error("bad {field}: {source}")]
    Identity {
        field: &'static str,
        #[source]
        source: IdentityError,
    },
    #[error("bad {field}: {value:?} is not a decimal u128")]
    Quantity { field: &'static str, value: String },
}

fn address(field: &'static str, bytes: &[u8]) -> Result<Address, BridgeError> {
    Address::from_slice(bytes).map_err(|source| BridgeError::Identity { field, source })
}

fn role(field: &'static str, bytes: &[u8]) -> Result<RoleId, BridgeError> {
    RoleId::from_slice(bytes).map_err(|source| BridgeError::Identity { field, source })
}

/// Digits only, so every quantity has exactly one wire form.
fn quantity(field: &'static str, s: &str) -> Result<u128, BridgeError> {
    let bad = || BridgeError::Quantity {
        field,
        value: s.to_string(),
    };
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    s.parse().map_err(|_| bad())
}

/// Convert a protobuf envelope to the kernel's `CallEnvelope`.
pub fn proto_to_kernel(proto: &ProtoCallEnvelope) -> Result<CallEnvelope, BridgeError> {
    let kind = proto
        .call
        .as_ref()
        .ok_or(BridgeError::MissingCall)?
        .kind
        .as_ref()
        .ok_or(BridgeError::MissingKind)?;

    let call = match kind {
        CallKind::Deploy(d) => Call::Deploy {
            initial_value: quantity("initial_value", &d.initial_value)?,
            amount: quantity("amount", &d.amount)?,
        },
        CallKind::Initialize(i) => Call::Initialize {
            value: quantity("value", &i.value)?,
        },
        CallKind::Reinitialize(r) => Call::Reinitialize {
            value: quantity("value", &r.value)?,
            version: r.version,
        },
        CallKind::TransferOwnership(t) => Call::TransferOwnership {
            new_owner: address("new_owner", &t.new_owner)?,
        },
        CallKind::RenounceOwnership(_) => Call::RenounceOwnership,
        CallKind::GrantRole(ra) => Call::GrantRole {
            role: role("role", &ra.role)?,
            account: address("account", &ra.account)?,
        },
        CallKind::RevokeRole(ra) => Call::RevokeRole {
            role: role("role", &ra.role)?,
            account: address("account", &ra.account)?,
        },
        CallKind::RenounceRole(ra) => Call::RenounceRole {
            role: role("role", &ra.role)?,
            caller_confirmation: address("caller_confirmation", &ra.account)?,
        },
        CallKind::SetRoleAdmin(s) => Call::SetRoleAdmin {
            role: role("role", &s.role)?,
            admin_role: role("admin_role", &s.admin_role)?,
        },
        CallKind::Owner(_) => Call::Owner,
        CallKind::HasRole(ra) => Call::HasRole {
            role: role("role", &ra.role)?,
            account: address("account", &ra.account)?,
        },
        CallKind::GetRoleAdmin(r) => Call::GetRoleAdmin {
            role: role("role", &r.role)?,
        },
        CallKind::A(_) => Call::A,
        CallKind::InitializedVersion(_) => Call::InitializedVersion,
        CallKind::Endowment(_) => Call::Endowment,
        CallKind::Complex(c) => Call::Complex {
            value: quantity("value", &c.value)?,
        },
    };

    Ok(CallEnvelope {
        sequence: proto.sequence,
        caller: address("caller", &proto.caller)?,
        call,
        schema_version: proto.schema_version,
    })
}

fn role_account(role: &RoleId, account: &Address) -> RoleAccount {
    RoleAccount {
        role: role.as_bytes().to_vec(),
        account: account.as_bytes().to_vec(),
    }
}

/// Convert a kernel `CallEnvelope` to its protobuf form.
pub fn kernel_to_proto(envelope: &CallEnvelope) -> ProtoCallEnvelope {
    let kind = match &envelope.call {
        Call::Deploy { initial_value, amount } => CallKind::Deploy(Deploy {
            initial_value: initial_value.to_string(),
            amount: amount.to_string(),
        }),
        Call::Initialize { value } => CallKind::Initialize(Initialize {
            value: value.to_string(),
        }),
        Call::Reinitialize { value, version } => CallKind::Reinitialize(Reinitialize {
            value: value.to_string(),
            version: *version,
        }),
        Call::TransferOwnership { new_owner } => CallKind::TransferOwnership(TransferOwnership {
            new_owner: new_owner.as_bytes().to_vec(),
        }),
        Call::RenounceOwnership => CallKind::RenounceOwnership(Empty {}),
        Call::GrantRole { role, account } => CallKind::GrantRole(role_account(role, account)),
        Call::RevokeRole { role, account } => CallKind::RevokeRole(role_account(role, account)),
        Call::RenounceRole { role, caller_confirmation } => {
            CallKind::RenounceRole(role_account(role, caller_confirmation))
        }
        Call::SetRoleAdmin { role, admin_role } => CallKind::SetRoleAdmin(SetRoleAdmin {
            role: role.as_bytes().to_vec(),
            admin_role: admin_role.as_bytes().to_vec(),
        }),
        Call::Owner => CallKind::Owner(Empty {}),
        Call::HasRole { role, account } => CallKind::HasRole(role_account(role, account)),
        Call::GetRoleAdmin { role } => CallKind::GetRoleAdmin(RoleOnly {
            role: role.as_bytes().to_vec(),
        }),
        Call::A => CallKind::A(Empty {}),
        Call::InitializedVersion => CallKind::InitializedVersion(Empty {}),
        Call::Endowment => CallKind::Endowment(Empty {}),
        Call::Complex { value } => CallKind::Complex(Complex {
            value: value.to_string(),
        }),
    };

    ProtoCallEnvelope {
        sequence: envelope.sequence,
        caller: envelope.caller.as_bytes().to_vec(),
        schema_version: envelope.schema_version,
        call: Some(ProtoCall { kind: Some(kind) }),
    }
}
