mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::*;
use gemelli_core::roles::Role;
use gemelli_db::repositories::AuditChainRepo;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

fn new_user_body(org_unit_id: Uuid) -> serde_json::Value {
    json!({
        "nombre": "  Carla Ruiz ",
        "email": "Carla@Colegio.edu",
        "password": "secreto123",
        "rol": "TI",
        "org_unit_id": org_unit_id,
    })
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_lead_is_forbidden(pool: PgPool) {
    let ti = seed_user(&pool, "ti@colegio.edu", Role::Ti, None).await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/admin/users", &token_for(ti)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Permisos insuficientes");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lead_lists_users_and_org_units(pool: PgPool) {
    let org = seed_org_unit(&pool, "Secundaria").await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, Some(org)).await;
    seed_user_raw_role(&pool, "director@colegio.edu", "director").await;
    let app = build_test_app(pool);
    let token = token_for(lead);

    let json = body_json(get_auth(app.clone(), "/admin/users", &token).await).await;
    assert_eq!(json["count"], 2);
    let roles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["rol"].as_str().unwrap())
        .collect();
    assert!(roles.contains(&"DIRECTOR"));

    let json = body_json(get_auth(app, "/admin/org-units", &token).await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["nombre"], "Secundaria");
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_mirrors_profile_and_audits(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let identity = Arc::new(FakeIdentity::default());
    let app = build_test_app_with(pool.clone(), identity.clone());

    let response = post_json_auth(
        app,
        "/admin/users",
        new_user_body(org),
        &token_for(lead),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "carla@colegio.edu");
    assert_eq!(json["data"]["nombre"], "Carla Ruiz");
    assert_eq!(json["data"]["rol"], "TI");
    assert_eq!(json["data"]["org_unit_nombre"], "Primaria");

    let created = identity.created.lock().unwrap().clone();
    assert_eq!(created[0].user_metadata["full_name"], "Carla Ruiz");
    assert_eq!(created[0].user_metadata["active"], true);

    let user_id = json["data"]["id"].as_str().unwrap();
    let history = AuditChainRepo::list_for_entity(&pool, user_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "CREATE_USER");
    assert_eq!(history[0].user_id, lead.to_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_with_taken_email_is_409(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    seed_user(&pool, "carla@colegio.edu", Role::Docente, None).await;
    let identity = Arc::new(FakeIdentity::default());
    let app = build_test_app_with(pool, identity.clone());

    let response = post_json_auth(
        app,
        "/admin/users",
        new_user_body(org),
        &token_for(lead),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "El correo electrónico ya está registrado"
    );
    assert!(identity.created.lock().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_validates_input(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let app = build_test_app(pool);
    let token = token_for(lead);

    let mut body = new_user_body(org);
    body["email"] = json!("no-es-correo");
    let response = post_json_auth(app.clone(), "/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"], "Correo electrónico inválido");

    let mut body = new_user_body(org);
    body["password"] = json!("corta");
    let response = post_json_auth(app, "/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn identity_failure_on_create_is_400(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let identity = Arc::new(FakeIdentity::default());
    *identity.reject_create.lock().unwrap() = Some("Email rate limit exceeded".into());
    let app = build_test_app_with(pool, identity);

    let response = post_json_auth(
        app,
        "/admin/users",
        new_user_body(org),
        &token_for(lead),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(message.starts_with("No se pudo crear el usuario en Supabase"));
    assert!(message.contains("Email rate limit exceeded"));
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_without_changes_is_400(pool: PgPool) {
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let target = seed_user(&pool, "docente@colegio.edu", Role::Docente, None).await;
    let app = build_test_app(pool);

    let response = patch_json_auth(
        app,
        &format!("/admin/users/{target}"),
        json!({}),
        &token_for(lead),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "No se proporcionaron cambios para actualizar"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_unknown_user_is_404(pool: PgPool) {
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let app = build_test_app(pool);

    let response = patch_json_auth(
        app,
        &format!("/admin/users/{}", Uuid::new_v4()),
        json!({"activo": false}),
        &token_for(lead),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Usuario no encontrado");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_syncs_identity_and_redacts_password(pool: PgPool) {
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let target = seed_user(&pool, "docente@colegio.edu", Role::Docente, None).await;
    let identity = Arc::new(FakeIdentity::default());
    let app = build_test_app_with(pool.clone(), identity.clone());

    let response = patch_json_auth(
        app,
        &format!("/admin/users/{target}"),
        json!({"rol": "DIRECTOR", "password": "nueva-clave-1"}),
        &token_for(lead),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["rol"], "DIRECTOR");

    let updates = identity.updated.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, target);
    assert_eq!(updates[0].1.password.as_deref(), Some("nueva-clave-1"));
    assert_eq!(
        updates[0].1.user_metadata.as_ref().unwrap()["role"],
        "DIRECTOR"
    );

    let history = AuditChainRepo::list_for_entity(&pool, &target.to_string())
        .await
        .unwrap();
    assert_eq!(history[0].action, "UPDATE_USER");
    assert_eq!(history[0].metadata["password_reset"], true);
    assert_eq!(history[0].metadata["rol"], "DIRECTOR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn explicit_null_clears_org_unit(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let target = seed_user(&pool, "docente@colegio.edu", Role::Docente, Some(org)).await;
    let app = build_test_app(pool);
    let token = token_for(lead);
    let uri = format!("/admin/users/{target}");

    let response = patch_json_auth(app.clone(), &uri, json!({"activo": false}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["org_unit_id"], json!(org));
    assert_eq!(json["data"]["activo"], false);

    let response = patch_json_auth(app, &uri, json!({"org_unit_id": null}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["org_unit_id"].is_null());
    assert!(json["data"]["org_unit_nombre"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_audit_write_removes_new_account(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    reject_audit_inserts(&pool).await;
    let identity = Arc::new(FakeIdentity::default());
    let app = build_test_app_with(pool.clone(), identity.clone());

    let response =
        post_json_auth(app, "/admin/users", new_user_body(org), &token_for(lead)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(identity.created.lock().unwrap().len(), 1);
    assert_eq!(identity.deleted.lock().unwrap().len(), 1);
    assert_eq!(count_rows(&pool, "users").await, 1);
}
