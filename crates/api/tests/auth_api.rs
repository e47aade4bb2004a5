mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::*;
use gemelli_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Token extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_without_header_is_401() {
    let app = build_test_app(lazy_pool());
    let response = get(app, "/auth/profile").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Falta el encabezado Authorization");
}

#[tokio::test]
async fn garbage_token_is_401() {
    let app = build_test_app(lazy_pool());
    let response = get_auth(app, "/auth/profile", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Token inválido o expirado");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_without_profile_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(app, "/auth/profile", &token_for(Uuid::new_v4())).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Usuario no autenticado");
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_returns_normalized_role(pool: PgPool) {
    let id = seed_user_raw_role(&pool, "lider@colegio.edu", "líder ti").await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/auth/profile", &token_for(id)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["rol"], "LIDER_TI");
    assert_eq!(json["email"], "lider@colegio.edu");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_stored_role_is_422(pool: PgPool) {
    let id = seed_user_raw_role(&pool, "raro@colegio.edu", "invitado").await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/auth/profile", &token_for(id)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Rol en Supabase inválido: invitado");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_includes_org_unit_name(pool: PgPool) {
    let org = seed_org_unit(&pool, "Primaria").await;
    let id = seed_user(&pool, "docente@colegio.edu", Role::Docente, Some(org)).await;
    let app = build_test_app(pool);

    let json = body_json(get_auth(app, "/auth/profile", &token_for(id)).await).await;
    assert_eq!(json["rol"], "DOCENTE");
    assert_eq!(json["org_unit_nombre"], "Primaria");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_valid_credentials_returns_tokens(pool: PgPool) {
    let id = seed_user(&pool, "ti@colegio.edu", Role::Ti, None).await;
    let identity = Arc::new(FakeIdentity::with_account("ti@colegio.edu", "secreto123", id));
    let app = build_test_app_with(pool, identity);

    let response = post_json(
        app.clone(),
        "/auth/login",
        json!({"email": " TI@Colegio.edu ", "password": "secreto123"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], id.to_string());
    let token = json["access_token"].as_str().unwrap().to_string();

    let profile = get_auth(app, "/auth/profile", &token).await;
    assert_eq!(profile.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let identity = Arc::new(FakeIdentity::with_account(
        "ti@colegio.edu",
        "secreto123",
        Uuid::new_v4(),
    ));
    let app = build_test_app_with(lazy_pool(), identity);

    let response = post_json(
        app,
        "/auth/login",
        json!({"email": "ti@colegio.edu", "password": "otra-clave"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Credenciales inválidas");
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let app = build_test_app(lazy_pool());
    let response = post_json(
        app.clone(),
        "/auth/login",
        json!({"email": "  ", "password": "x"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "El email es requerido");

    let response = post_json(
        app,
        "/auth/login",
        json!({"email": "a@b.co", "password": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "La contraseña es requerida");
}
