//! Appending handler events to the audit chain.

use gemelli_core::types::DbId;
use gemelli_db::models::audit::{AuditBlock, NewAuditEvent};
use gemelli_db::repositories::AuditChainRepo;
use serde_json::Value;
use sqlx::PgConnection;

use crate::error::AppResult;
use crate::state::AppState;

/// Seal a standalone event onto the chain with the configured secret.
pub async fn record_audit_event(
    state: &AppState,
    action: &str,
    entity_id: impl ToString,
    user_id: DbId,
    metadata: Value,
) -> AppResult<AuditBlock> {
    let event = NewAuditEvent::new(action, entity_id, user_id, metadata);
    let block = AuditChainRepo::append(&state.pool, &event, &state.config.audit_secret).await?;
    tracing::info!(
        action = %block.action,
        entity_id = %block.entity_id,
        block_number = block.block_number,
        "Audit event recorded"
    );
    Ok(block)
}

/// Seal the audit block of a mutation inside the mutation's transaction.
///
/// Failures propagate, and the caller drops the transaction, so the rows
/// written by the mutation are rolled back together with the block.
pub async fn record_audit_event_in(
    conn: &mut PgConnection,
    state: &AppState,
    action: &str,
    entity_id: impl ToString,
    user_id: DbId,
    metadata: Value,
) -> AppResult<AuditBlock> {
    let event = NewAuditEvent::new(action, entity_id, user_id, metadata);
    let block = AuditChainRepo::append_in(conn, &event, &state.config.audit_secret).await?;
    tracing::debug!(
        action = %block.action,
        entity_id = %block.entity_id,
        block_number = block.block_number,
        "Audit block staged"
    );
    Ok(block)
}
