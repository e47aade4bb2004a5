//! Repository for the `audit_chain` table.
//!
//! Appends take a transaction-scoped advisory lock so the head lookup and
//! the insert of the next block cannot interleave with another writer. The
//! lock is held until the surrounding transaction ends.

use chrono::Utc;
use gemelli_core::audit::{
    audit_timestamp, redact_sensitive_fields, seal, AuditPayload, GENESIS_HASH,
};
use sqlx::{PgConnection, PgPool};

use crate::models::audit::{AuditBlock, NewAuditEvent};

/// Advisory lock key serializing chain appends.
pub const AUDIT_CHAIN_LOCK_ID: i64 = 731_904_266;

const COLUMNS: &str = "id, block_number, hash, content_hash, previous_hash, signature, action, \
                       entity_id, user_id, \"timestamp\", metadata, created_at";

pub struct AuditChainRepo;

impl AuditChainRepo {
    /// Seal `event` onto the head of the chain in its own transaction.
    pub async fn append(
        pool: &PgPool,
        event: &NewAuditEvent,
        secret: &str,
    ) -> Result<AuditBlock, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let block = Self::append_in(&mut tx, event, secret).await?;
        tx.commit().await?;
        Ok(block)
    }

    /// Seal `event` onto the head of the chain inside the caller's
    /// transaction. The block is only visible once that transaction commits.
    pub async fn append_in(
        conn: &mut PgConnection,
        event: &NewAuditEvent,
        secret: &str,
    ) -> Result<AuditBlock, sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(AUDIT_CHAIN_LOCK_ID)
            .execute(&mut *conn)
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_chain")
            .fetch_one(&mut *conn)
            .await?;
        let previous_hash: Option<String> =
            sqlx::query_scalar("SELECT hash FROM audit_chain ORDER BY block_number DESC LIMIT 1")
                .fetch_optional(&mut *conn)
                .await?;
        let previous_hash = previous_hash.unwrap_or_else(|| GENESIS_HASH.to_string());

        let payload = AuditPayload {
            action: event.action.clone(),
            entity_id: event.entity_id.clone(),
            user_id: event.user_id.clone(),
            timestamp: audit_timestamp(Utc::now()),
            data: redact_sensitive_fields(&event.metadata),
        };
        let sealed = seal(&previous_hash, &payload, secret);

        let query = format!(
            "INSERT INTO audit_chain (block_number, hash, content_hash, previous_hash, signature, \
                                      action, entity_id, user_id, \"timestamp\", metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let block = sqlx::query_as::<_, AuditBlock>(&query)
            .bind(count + 1)
            .bind(&sealed.hash)
            .bind(&sealed.content_hash)
            .bind(&sealed.previous_hash)
            .bind(&sealed.signature)
            .bind(&payload.action)
            .bind(&payload.entity_id)
            .bind(&payload.user_id)
            .bind(&payload.timestamp)
            .bind(&payload.data)
            .fetch_one(&mut *conn)
            .await?;

        tracing::debug!(
            block_number = block.block_number,
            action = %block.action,
            entity_id = %block.entity_id,
            "Audit block appended",
        );
        Ok(block)
    }

    /// Every block in chain order.
    pub async fn list_ordered(pool: &PgPool) -> Result<Vec<AuditBlock>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_chain ORDER BY block_number ASC");
        sqlx::query_as::<_, AuditBlock>(&query).fetch_all(pool).await
    }

    pub async fn find_by_hash(pool: &PgPool, hash: &str) -> Result<Option<AuditBlock>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_chain WHERE hash = $1");
        sqlx::query_as::<_, AuditBlock>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Blocks recorded for an entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_id: &str,
    ) -> Result<Vec<AuditBlock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_chain WHERE entity_id = $1 ORDER BY block_number DESC"
        );
        sqlx::query_as::<_, AuditBlock>(&query)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
