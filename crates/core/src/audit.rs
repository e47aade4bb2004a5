//! Tamper-evident audit hash chain.
//!
//! Each block hashes a canonical JSON payload (`content_hash`), links it to
//! the previous block (`hash = sha256("{previous}:{content}")`) and signs the
//! link with an HMAC secret. Verification replays the chain from genesis.

use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::Value;

use crate::hashing::{hmac_sha256_hex, sha256_hex};
use crate::types::Timestamp;

/// Action names recorded in the chain.
pub mod action_types {
    pub const CREATE_USER: &str = "CREATE_USER";
    pub const UPDATE_USER: &str = "UPDATE_USER";
    pub const CREATE_DEVICE: &str = "CREATE_DEVICE";
    pub const UPDATE_DEVICE: &str = "UPDATE_DEVICE";
    pub const GRANT_INVENTORY_ACCESS: &str = "GRANT_INVENTORY_ACCESS";
    pub const REVOKE_INVENTORY_ACCESS: &str = "REVOKE_INVENTORY_ACCESS";
    pub const BACKUP: &str = "BACKUP";
    pub const CLOSE_TICKET: &str = "CLOSE_TICKET";
}

/// `previous_hash` of the first block.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Render a timestamp the way it is stored in the chain.
pub fn audit_timestamp(at: Timestamp) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The hashed content of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditPayload {
    pub action: String,
    pub entity_id: String,
    pub user_id: String,
    pub timestamp: String,
    pub data: Value,
}

impl AuditPayload {
    /// Canonical JSON: object keys sorted at every depth, no whitespace.
    pub fn canonical_json(&self) -> String {
        let value = serde_json::json!({
            "action": self.action,
            "entity_id": self.entity_id,
            "user_id": self.user_id,
            "timestamp": self.timestamp,
            "data": self.data,
        });
        canonical_json(&value)
    }

    pub fn content_hash(&self) -> String {
        sha256_hex(self.canonical_json().as_bytes())
    }
}

/// Serialize a JSON value with object keys in lexicographic order regardless
/// of how `serde_json` was compiled.
pub fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}:{}", Value::String(k.clone()), canonical_json(&map[k])))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

/// Hash and signature material for a new block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SealedBlock {
    pub hash: String,
    pub content_hash: String,
    pub previous_hash: String,
    pub signature: String,
}

pub fn chain_hash(previous_hash: &str, content_hash: &str) -> String {
    sha256_hex(format!("{previous_hash}:{content_hash}").as_bytes())
}

pub fn sign(secret: &str, hash: &str) -> String {
    hmac_sha256_hex(secret.as_bytes(), hash.as_bytes())
}

/// Seal `payload` onto a chain whose head is `previous_hash`.
pub fn seal(previous_hash: &str, payload: &AuditPayload, secret: &str) -> SealedBlock {
    let content_hash = payload.content_hash();
    let hash = chain_hash(previous_hash, &content_hash);
    let signature = sign(secret, &hash);
    SealedBlock {
        hash,
        content_hash,
        previous_hash: previous_hash.to_string(),
        signature,
    }
}

/// Check that `signature` is the HMAC of `hash` under `secret`.
pub fn signature_matches(secret: &str, hash: &str, signature: &str) -> bool {
    sign(secret, hash) == signature
}

/// A stored block as seen by the verifier.
#[derive(Debug, Clone)]
pub struct StoredBlock {
    pub block_number: i64,
    pub hash: String,
    pub signature: String,
    pub payload: AuditPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorruptedBlock {
    pub block_number: i64,
    pub hash: String,
    pub expected_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainVerification {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_blocks: usize,
    pub corrupted_blocks: Vec<CorruptedBlock>,
}

/// Replay the chain in block order and report every block whose stored hash
/// or signature differs from the recomputed one.
///
/// Linking continues from the *stored* hash so a single tampered block is
/// reported once instead of poisoning every successor.
pub fn verify_chain(blocks: &[StoredBlock], secret: &str) -> ChainVerification {
    if blocks.is_empty() {
        return ChainVerification {
            valid: true,
            message: Some("Cadena vacía".into()),
            total_blocks: 0,
            corrupted_blocks: Vec::new(),
        };
    }

    let mut previous_hash = GENESIS_HASH.to_string();
    let mut corrupted = Vec::new();

    for block in blocks {
        let expected_hash = chain_hash(&previous_hash, &block.payload.content_hash());
        let expected_signature = sign(secret, &expected_hash);

        if block.hash != expected_hash || block.signature != expected_signature {
            corrupted.push(CorruptedBlock {
                block_number: block.block_number,
                hash: block.hash.clone(),
                expected_hash,
            });
        }
        previous_hash = block.hash.clone();
    }

    ChainVerification {
        valid: corrupted.is_empty(),
        message: None,
        total_blocks: blocks.len(),
        corrupted_blocks: corrupted,
    }
}

/// Keys whose values never enter the chain.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "api_key",
    "authorization",
    "credential",
];

/// Replace the value of any key containing a [`SENSITIVE_FIELDS`] entry with
/// `"[REDACTED]"`, recursively. Boolean and null values are kept so flags
/// such as `password_reset` stay readable.
pub fn redact_sensitive_fields(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                let is_flag = matches!(val, Value::Bool(_) | Value::Null);
                if !is_flag && SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(key.clone(), Value::String("[REDACTED]".to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(redact_sensitive_fields).collect()),
        other => other.clone(),
    }
}
