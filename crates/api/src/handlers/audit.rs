//! Handlers for `/audit` (hash-chain registration and verification).

use axum::extract::{Path, State};
use axum::Json;
use gemelli_core::audit::{signature_matches, verify_chain, ChainVerification, StoredBlock};
use gemelli_core::error::CoreError;
use gemelli_db::models::audit::AuditBlock;
use gemelli_db::repositories::AuditChainRepo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit_log::record_audit_event;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireItStaff;
use crate::response::ListResponse;
use crate::state::AppState;

/// Request body for `POST /audit/hash`.
#[derive(Debug, Deserialize)]
pub struct AuditEventRequest {
    pub action: String,
    pub entity_id: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct AuditEventResponse {
    pub hash: String,
    pub signature: String,
    pub block_number: i64,
    pub message: &'static str,
}

/// Result of checking a single block's signature.
#[derive(Debug, Serialize)]
pub struct HashVerification {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AuditBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// POST /audit/hash
pub async fn register_event(
    State(state): State<AppState>,
    RequireItStaff(user): RequireItStaff,
    Json(input): Json<AuditEventRequest>,
) -> AppResult<Json<AuditEventResponse>> {
    let action = input.action.trim();
    let entity_id = input.entity_id.trim();
    if action.is_empty() || entity_id.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "action y entity_id son requeridos".into(),
        )));
    }

    let metadata = input
        .metadata
        .unwrap_or_else(|| Value::Object(Default::default()));
    let block = record_audit_event(&state, action, entity_id, user.id, metadata).await?;

    Ok(Json(AuditEventResponse {
        hash: block.hash,
        signature: block.signature,
        block_number: block.block_number,
        message: "Evento registrado en cadena de auditoría",
    }))
}

/// GET /audit/verify/{hash}
///
/// Public. Checks the stored signature of one block against the configured
/// secret.
pub async fn verify_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> AppResult<Json<HashVerification>> {
    let Some(block) = AuditChainRepo::find_by_hash(&state.pool, &hash).await? else {
        return Ok(Json(HashVerification {
            valid: false,
            message: Some("Hash no encontrado"),
            data: None,
            verified: None,
        }));
    };

    let valid = signature_matches(&state.config.audit_secret, &block.hash, &block.signature);
    Ok(Json(HashVerification {
        valid,
        message: None,
        data: Some(block),
        verified: Some(valid),
    }))
}

/// GET /audit/chain/verify
pub async fn verify_full_chain(
    State(state): State<AppState>,
    RequireItStaff(_user): RequireItStaff,
) -> AppResult<Json<ChainVerification>> {
    let blocks: Vec<StoredBlock> = AuditChainRepo::list_ordered(&state.pool)
        .await?
        .iter()
        .map(AuditBlock::to_stored_block)
        .collect();

    let result = verify_chain(&blocks, &state.config.audit_secret);
    if !result.valid {
        tracing::warn!(
            corrupted = result.corrupted_blocks.len(),
            total = result.total_blocks,
            "Audit chain verification failed"
        );
    }
    Ok(Json(result))
}

/// GET /audit/entity/{entity_id}
pub async fn entity_history(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(entity_id): Path<String>,
) -> AppResult<Json<ListResponse<AuditBlock>>> {
    let blocks = AuditChainRepo::list_for_entity(&state.pool, &entity_id).await?;
    Ok(Json(ListResponse::new(blocks)))
}
