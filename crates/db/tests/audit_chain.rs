//! The audit chain persisted through `AuditChainRepo`.

use gemelli_core::audit::{verify_chain, GENESIS_HASH};
use gemelli_db::models::audit::{AuditBlock, NewAuditEvent};
use gemelli_db::repositories::AuditChainRepo;
use serde_json::json;
use sqlx::PgPool;

const SECRET: &str = "test-audit-secret";

fn stored(blocks: &[AuditBlock]) -> Vec<gemelli_core::audit::StoredBlock> {
    blocks.iter().map(AuditBlock::to_stored_block).collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn appended_blocks_link_and_verify(pool: PgPool) {
    let first = AuditChainRepo::append(
        &pool,
        &NewAuditEvent::new("CREATE_DEVICE", "dev-1", "user-1", json!({"type": "PC"})),
        SECRET,
    )
    .await
    .unwrap();
    let second = AuditChainRepo::append(
        &pool,
        &NewAuditEvent::new("UPDATE_DEVICE", "dev-1", "user-1", json!({"changes": {}})),
        SECRET,
    )
    .await
    .unwrap();

    assert_eq!(first.block_number, 1);
    assert_eq!(first.previous_hash, GENESIS_HASH);
    assert_eq!(second.block_number, 2);
    assert_eq!(second.previous_hash, first.hash);

    let chain = AuditChainRepo::list_ordered(&pool).await.unwrap();
    let result = verify_chain(&stored(&chain), SECRET);
    assert!(result.valid);
    assert_eq!(result.total_blocks, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sensitive_metadata_is_redacted(pool: PgPool) {
    let block = AuditChainRepo::append(
        &pool,
        &NewAuditEvent::new("UPDATE_USER", "u-1", "admin", json!({"password": "hunter22"})),
        SECRET,
    )
    .await
    .unwrap();
    assert_eq!(block.metadata["password"], "[REDACTED]");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tampering_in_storage_is_detected(pool: PgPool) {
    for i in 0..3 {
        AuditChainRepo::append(
            &pool,
            &NewAuditEvent::new("BACKUP", format!("dev-{i}"), "user-1", json!({})),
            SECRET,
        )
        .await
        .unwrap();
    }

    sqlx::query("UPDATE audit_chain SET metadata = '{\"forged\": true}' WHERE block_number = 2")
        .execute(&pool)
        .await
        .unwrap();

    let chain = AuditChainRepo::list_ordered(&pool).await.unwrap();
    let result = verify_chain(&stored(&chain), SECRET);
    assert!(!result.valid);
    assert_eq!(result.corrupted_blocks.len(), 1);
    assert_eq!(result.corrupted_blocks[0].block_number, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_appends_do_not_fork(pool: PgPool) {
    let mut handles = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            AuditChainRepo::append(
                &pool,
                &NewAuditEvent::new("BACKUP", format!("dev-{i}"), "user-1", json!({})),
                SECRET,
            )
            .await
            .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let chain = AuditChainRepo::list_ordered(&pool).await.unwrap();
    let numbers: Vec<i64> = chain.iter().map(|b| b.block_number).collect();
    assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
    assert!(verify_chain(&stored(&chain), SECRET).valid);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entity_history_is_newest_first(pool: PgPool) {
    for action in ["CREATE_DEVICE", "UPDATE_DEVICE"] {
        AuditChainRepo::append(&pool, &NewAuditEvent::new(action, "dev-9", "u", json!({})), SECRET)
            .await
            .unwrap();
    }
    let history = AuditChainRepo::list_for_entity(&pool, "dev-9").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].action, "UPDATE_DEVICE");

    let found = AuditChainRepo::find_by_hash(&pool, &history[1].hash).await.unwrap();
    assert_eq!(found.map(|b| b.block_number), Some(1));
}
