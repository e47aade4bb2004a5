//! Audit chain blocks. Immutable once written.

use gemelli_core::audit::{AuditPayload, StoredBlock};
use gemelli_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuditBlock {
    pub id: DbId,
    pub block_number: i64,
    pub hash: String,
    pub content_hash: String,
    pub previous_hash: String,
    pub signature: String,
    pub action: String,
    pub entity_id: String,
    pub user_id: String,
    pub timestamp: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

impl AuditBlock {
    /// The payload that was hashed into `content_hash`.
    pub fn payload(&self) -> AuditPayload {
        AuditPayload {
            action: self.action.clone(),
            entity_id: self.entity_id.clone(),
            user_id: self.user_id.clone(),
            timestamp: self.timestamp.clone(),
            data: self.metadata.clone(),
        }
    }

    pub fn to_stored_block(&self) -> StoredBlock {
        StoredBlock {
            block_number: self.block_number,
            hash: self.hash.clone(),
            signature: self.signature.clone(),
            payload: self.payload(),
        }
    }
}

/// An event to append to the chain.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub action: String,
    pub entity_id: String,
    pub user_id: String,
    /// Sensitive keys are redacted before hashing.
    pub metadata: serde_json::Value,
}

impl NewAuditEvent {
    pub fn new(
        action: impl Into<String>,
        entity_id: impl ToString,
        user_id: impl ToString,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            action: action.into(),
            entity_id: entity_id.to_string(),
            user_id: user_id.to_string(),
            metadata,
        }
    }
}
