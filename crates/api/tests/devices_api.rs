mod common;

use axum::http::StatusCode;
use common::*;
use gemelli_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

fn laptop_body() -> serde_json::Value {
    json!({
        "nombre": "Laptop Sala 3",
        "tipo": "LAPTOP",
        "estado": "ACTIVO",
        "ubicacion": "Sala 3",
        "marca": "Lenovo",
        "specs": {
            "procesador": "Intel i5",
            "memoria_capacidad": "8GB",
            "disco_tipo": "",
            "teclado": {"nombre": "Logitech K120", "serial": ""},
        },
    })
}

/// Create a device as `token` and return its id.
async fn create_device(app: axum::Router, token: &str, body: serde_json::Value) -> String {
    let response = post_json_auth(app, "/inventory/devices", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Create and CV
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_device_stamps_creator_unit_and_history(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let ti = seed_user(&pool, "ti@colegio.edu", Role::Ti, Some(org)).await;
    let app = build_test_app(pool);
    let token = token_for(ti);

    let response =
        post_json_auth(app.clone(), "/inventory/devices", laptop_body(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["message"], "Dispositivo creado exitosamente");
    assert_eq!(created["data"]["org_unit_id"], org.to_string());
    assert_eq!(created["data"]["creado_por"], ti.to_string());
    let id = created["data"]["id"].as_str().unwrap();

    let response = get_auth(app, &format!("/inventory/devices/{id}/cv"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cv = body_json(response).await;

    assert_eq!(cv["device"]["nombre"], "Laptop Sala 3");
    assert_eq!(cv["specs"]["cpu"], "Intel i5");
    assert_eq!(cv["specs"]["ram_capacidad"], "8GB");
    assert!(cv["specs"]["disco"].is_null());
    assert_eq!(cv["specs"]["perifericos"]["teclado"], json!({"nombre": "Logitech K120"}));

    let logs = cv["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["tipo"], "OTRO");
    assert_eq!(logs[0]["descripcion"], "Dispositivo creado por ti");

    let audit = cv["audit"].as_array().unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0]["action"], "CREATE_DEVICE");
    assert_eq!(audit[0]["metadata"]["type"], "LAPTOP");
    assert!(cv["backups"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_specs_store_no_row(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let ti = seed_user(&pool, "ti@colegio.edu", Role::Ti, Some(org)).await;
    let app = build_test_app(pool);
    let token = token_for(ti);

    let mut body = laptop_body();
    body["specs"] = json!({"procesador": "", "mouse": {"nombre": ""}});
    let id = create_device(app.clone(), &token, body).await;

    let cv = body_json(get_auth(app, &format!("/inventory/devices/{id}/cv"), &token).await).await;
    assert!(cv["specs"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn docente_cannot_create_without_grant(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let docente = seed_user(&pool, "docente@colegio.edu", Role::Docente, Some(org)).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/inventory/devices",
        laptop_body(),
        &token_for(docente),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Permisos insuficientes");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn granted_docente_can_create(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let docente = seed_user(&pool, "docente@colegio.edu", Role::Docente, Some(org)).await;
    let app = build_test_app(pool);

    let grant = post_json_auth(
        app.clone(),
        "/inventory/permissions",
        json!({"email": "docente@colegio.edu"}),
        &token_for(lead),
    )
    .await;
    assert_eq!(grant.status(), StatusCode::CREATED);

    create_device(app, &token_for(docente), laptop_body()).await;
}

// ---------------------------------------------------------------------------
// Org-unit scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_scoped_to_org_unit_except_for_lead(pool: PgPool) {
    let primaria = seed_org_unit(&pool, "Primaria").await;
    let secundaria = seed_org_unit(&pool, "Secundaria").await;
    let ti_a = seed_user(&pool, "ti-a@colegio.edu", Role::Ti, Some(primaria)).await;
    let ti_b = seed_user(&pool, "ti-b@colegio.edu", Role::Ti, Some(secundaria)).await;
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let app = build_test_app(pool);

    create_device(app.clone(), &token_for(ti_a), laptop_body()).await;
    let mut printer = laptop_body();
    printer["nombre"] = json!("Impresora Secretaría");
    printer["tipo"] = json!("IMPRESORA");
    printer["estado"] = json!("REPARACIÓN");
    create_device(app.clone(), &token_for(ti_b), printer).await;

    let json =
        body_json(get_auth(app.clone(), "/inventory/devices", &token_for(ti_a)).await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["nombre"], "Laptop Sala 3");

    let json =
        body_json(get_auth(app.clone(), "/inventory/devices", &token_for(lead)).await).await;
    assert_eq!(json["count"], 2);

    let json = body_json(
        get_auth(
            app,
            "/inventory/devices?estado=REPARACI%C3%93N",
            &token_for(lead),
        )
        .await,
    )
    .await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["tipo"], "IMPRESORA");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn device_in_other_unit_is_not_found(pool: PgPool) {
    let primaria = seed_org_unit(&pool, "Primaria").await;
    let secundaria = seed_org_unit(&pool, "Secundaria").await;
    let ti_a = seed_user(&pool, "ti-a@colegio.edu", Role::Ti, Some(primaria)).await;
    let ti_b = seed_user(&pool, "ti-b@colegio.edu", Role::Ti, Some(secundaria)).await;
    let app = build_test_app(pool);

    let id = create_device(app.clone(), &token_for(ti_a), laptop_body()).await;

    let response = get_auth(
        app.clone(),
        &format!("/inventory/devices/{id}/cv"),
        &token_for(ti_b),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Dispositivo no encontrado");

    let response = put_json_auth(
        app,
        &format!("/inventory/devices/{id}"),
        json!({"estado": "RETIRADO"}),
        &token_for(ti_b),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_applies_changes_and_records_history(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let ti = seed_user(&pool, "ti@colegio.edu", Role::Ti, Some(org)).await;
    let app = build_test_app(pool);
    let token = token_for(ti);

    let id = create_device(app.clone(), &token, laptop_body()).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/inventory/devices/{id}"),
        json!({"estado": "REPARACIÓN", "ubicacion": "Taller"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Dispositivo actualizado");
    assert_eq!(json["data"]["estado"], "REPARACIÓN");
    assert_eq!(json["data"]["ubicacion"], "Taller");
    assert_eq!(json["data"]["marca"], "Lenovo");
    assert!(json["data"]["actualizado_en"].is_string());

    let cv = body_json(get_auth(app, &format!("/inventory/devices/{id}/cv"), &token).await).await;
    assert_eq!(cv["logs"].as_array().unwrap().len(), 2);
    let latest = &cv["audit"][0];
    assert_eq!(latest["action"], "UPDATE_DEVICE");
    assert_eq!(latest["metadata"]["changes"]["ubicacion"], "Taller");
    assert!(latest["metadata"]["changes"]["actualizado_en"].is_string());
    assert!(latest["metadata"]["changes"].get("nombre").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_unknown_device_is_404(pool: PgPool) {
    let lead = seed_user(&pool, "lider@colegio.edu", Role::LiderTi, None).await;
    let app = build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/inventory/devices/{}", Uuid::new_v4()),
        json!({"nombre": "X"}),
        &token_for(lead),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_audit_write_leaves_no_device(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let ti = seed_user(&pool, "ti@colegio.edu", Role::Ti, Some(org)).await;
    reject_audit_inserts(&pool).await;
    let app = build_test_app(pool.clone());
    let token = token_for(ti);

    for _ in 0..2 {
        let response =
            post_json_auth(app.clone(), "/inventory/devices", laptop_body(), &token).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Error interno del servidor");
    }

    assert_eq!(count_rows(&pool, "devices").await, 0);
    assert_eq!(count_rows(&pool, "device_specs").await, 0);
    assert_eq!(count_rows(&pool, "device_logs").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_audit_write_keeps_device_unchanged(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let ti = seed_user(&pool, "ti@colegio.edu", Role::Ti, Some(org)).await;
    let app = build_test_app(pool.clone());
    let token = token_for(ti);
    let id = create_device(app.clone(), &token, laptop_body()).await;

    reject_audit_inserts(&pool).await;
    let response = put_json_auth(
        app.clone(),
        &format!("/inventory/devices/{id}"),
        json!({"ubicacion": "Taller"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let cv = body_json(get_auth(app, &format!("/inventory/devices/{id}/cv"), &token).await).await;
    assert_eq!(cv["device"]["ubicacion"], "Sala 3");
    assert!(cv["device"]["actualizado_en"].is_null());
    assert_eq!(cv["logs"].as_array().unwrap().len(), 1);
}
