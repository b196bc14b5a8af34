/// SafetyContract — Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 hashing.
///
/// Rules:
///   - Field order: kernel_version, value, version, owner, endowment, roles
///   - u128 quantities as decimal strings
///   - owner is null once renounced
///   - Roles sorted by id, members sorted, each role with its admin role
///   - UTF-8 JSON, no whitespace

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::contract::SafetyContract;
use crate::KERNEL_VERSION;

/// Canonical serialization of the contract to UTF-8 JSON bytes.
pub fn canonical_serialize(contract: &SafetyContract) -> Vec<u8> {
    // Display of a Value cannot fail.
    build_canonical_value(contract).to_string().into_bytes()
}

/// SHA-256 of canonical serialization. Lowercase hex string.
pub fn canonical_hash(contract: &SafetyContract) -> String {
    let bytes = canonical_serialize(contract);
    hex::encode(Sha256::digest(&bytes))
}

fn build_canonical_value(contract: &SafetyContract) -> Value {
    let registry = contract.roles();

    let mut roles_list: Vec<Value> = Vec::new();
    for role in registry.roles() {
        let mut role_map = Map::new();
        role_map.insert("role".to_string(), Value::String(role.to_string()));
        role_map.insert(
            "admin".to_string(),
            Value::String(registry.role_admin(&role).to_string()),
        );
        role_map.insert(
            "members".to_string(),
            Value::Array(
                registry
                    .members(&role)
                    .map(|a| Value::String(a.to_string()))
                    .collect(),
            ),
        );
        roles_list.push(Value::Object(role_map));
    }

    let owner = match contract.ownership().current() {
        Some(addr) => Value::String(addr.to_string()),
        None => Value::Null,
    };

    let mut root = Map::new();
    root.insert(
        "kernel_version".to_string(),
        Value::Number(KERNEL_VERSION.into()),
    );
    root.insert("value".to_string(), Value::String(contract.a().to_string()));
    root.insert(
        "version".to_string(),
        Value::Number(contract.initialized_version().into()),
    );
    root.insert("owner".to_string(), owner);
    root.insert(
        "endowment".to_string(),
        Value::String(contract.endowment().to_string()),
    );
    root.insert("roles".to_string(), Value::Array(roles_list));

    Value::Object(root)
}
