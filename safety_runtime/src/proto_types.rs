//! Hand-written protobuf types for the call envelope wire format.
//!
//! Uses prost derive macros for encode/decode without prost-build.
//! Identities travel as raw bytes (20 / 32), u128 quantities as
//! decimal strings.

use prost::Message;

// ── Call Envelope ──────────────────────────────────────────────

#[derive(Clone, PartialEq, Message)]
pub struct ProtoCallEnvelope {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub caller: Vec<u8>,
    #[prost(uint32, tag = "3")]
    pub schema_version: u32,
    #[prost(message, optional, tag = "4")]
    pub call: Option<ProtoCall>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ProtoCall {
    #[prost(
        oneof = "CallKind",
        tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16"
    )]
    pub kind: Option<CallKind>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum CallKind {
    #[prost(message, tag = "1")]
    Deploy(Deploy),
    #[prost(message, tag = "2")]
    Initialize(Initialize),
    #[prost(message, tag = "3")]
    Reinitialize(Reinitialize),
    #[prost(message, tag = "4")]
    TransferOwnership(TransferOwnership),
    #[prost(message, tag = "5")]
    RenounceOwnership(Empty),
    #[prost(message, tag = "6")]
    GrantRole(RoleAccount),
    #[prost(message, tag = "7")]
    RevokeRole(RoleAccount),
    #[prost(message, tag = "8")]
    RenounceRole(RoleAccount),
    #[prost(message, tag = "9")]
    SetRoleAdmin(SetRoleAdmin),
    #[prost(message, tag = "10")]
    Owner(Empty),
    #[prost(message, tag = "11")]
    HasRole(RoleAccount),
    #[prost(message, tag = "12")]
    GetRoleAdmin(RoleOnly),
    #[prost(message, tag = "13")]
    A(Empty),
    #[prost(message, tag = "14")]
    InitializedVersion(Empty),
    #[prost(message, tag = "15")]
    Endowment(Empty),
    #[prost(message, tag = "16")]
    Complex(Complex),
}

// ── Payloads ───────────────────────────────────────────────────

#[derive(Clone, PartialEq, Message)]
pub struct Empty {}

#[derive(Clone, PartialEq, Message)]
pub struct Deploy {
    #[prost(string, tag = "1")]
    pub initial_value: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct Initialize {
    #[prost(string, tag = "1")]
    pub value: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct Reinitialize {
    #[prost(string, tag = "1")]
    pub value: String,
    #[prost(uint64, tag = "2")]
    pub version: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct TransferOwnership {
    #[prost(bytes = "vec", tag = "1")]
    pub new_owner: Vec<u8>,
}

/// Shared by grant, revoke, renounce (account = confirmation) and has_role.
#[derive(Clone, PartialEq, Message)]
pub struct RoleAccount {
    #[prost(bytes = "vec", tag = "1")]
    pub role: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub account: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct RoleOnly {
    #[prost(bytes = "vec", tag = "1")]
    pub role: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SetRoleAdmin {
    #[prost(bytes = "vec", tag = "1")]
    pub role: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub admin_role: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Complex {
    #[prost(string, tag = "1")]
    pub value: String,
}
