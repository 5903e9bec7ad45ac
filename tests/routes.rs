mod common;

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use client_crud_api::routes::app_router;
use serde_json::{Value, json};
use sqlx::SqlitePool;

/// Full application stack: routing, middleware and path normalization.
fn make_app_server(pool: SqlitePool) -> TestServer {
    let app = app_router(common::create_test_state(pool));
    TestServer::new(ServiceExt::<Request>::into_make_service(app)).unwrap()
}

#[sqlx::test]
async fn test_trailing_slash_is_accepted(pool: SqlitePool) {
    let server = make_app_server(pool);

    let created = server
        .post("/clients/")
        .json(&common::sample_client_json())
        .await;
    created.assert_status(axum::http::StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    server.get("/clients/").await.assert_status_ok();
    server
        .get(&format!("/clients/{id}/"))
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_full_lifecycle(pool: SqlitePool) {
    let server = make_app_server(pool);

    server.get("/health").await.assert_status_ok();

    let id = server
        .post("/clients")
        .json(&common::sample_client_json())
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();

    let updated = server
        .put(&format!("/clients/{id}"))
        .json(&json!({ "revenu_estime_mois": 4100 }))
        .await
        .json::<Value>();
    assert_eq!(updated["client_situation"]["revenu_estime_mois"], 4100);

    server
        .delete(&format!("/clients/{id}"))
        .await
        .assert_status_ok();
    server
        .get(&format!("/clients/{id}"))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_unknown_route(pool: SqlitePool) {
    let server = make_app_server(pool);

    server.get("/contrats").await.assert_status_not_found();
}
