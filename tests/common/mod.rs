#![allow(dead_code)]

use client_crud_api::application::services::ClientService;
use client_crud_api::infrastructure::persistence::{Database, SqliteClientRepository};
use client_crud_api::state::AppState;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::Arc;

pub const TEST_PAGE_LIMIT: u32 = 100;

pub fn create_test_repository(pool: SqlitePool) -> Arc<SqliteClientRepository> {
    let database = Arc::new(Database::from_pool(pool));
    Arc::new(SqliteClientRepository::new(database))
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    let repository = create_test_repository(pool);
    let client_service = Arc::new(ClientService::new(repository));
    AppState::new(client_service, TEST_PAGE_LIMIT)
}

/// A full create payload with two contracts.
pub fn sample_client_json() -> Value {
    json!({
        "date_creation_compte": "2024-03-15",
        "client_meta": {
            "age": 34,
            "poids": 72.5,
            "niveau_etude": "master",
            "smoker": false,
            "nb_enfants": 2,
            "quotient_caf": 850.0,
            "situation_familiale": "marié(e)"
        },
        "client_situation": {
            "revenu_estime_mois": 3200,
            "risque_personnel": 0.35,
            "loyer_mensuel": 900.0
        },
        "contrats": [
            { "montant_pret": 15000.0 },
            { "montant_pret": 4000.0 }
        ]
    })
}

/// Inserts a client with one contract directly through SQL and returns its id.
pub async fn insert_test_client(pool: &SqlitePool, age: i32) -> i64 {
    let id: i64 = sqlx::query_scalar("INSERT INTO clients (date_creation_compte) VALUES (NULL) RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO clients_meta (age, poids, niveau_etude, smoker, nb_enfants, quotient_caf, client_id)
         VALUES (?, 70.0, 'bac', 0, 0, 0.0, ?)",
    )
    .bind(age)
    .bind(id)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO clients_situation (revenu_estime_mois, risque_personnel, client_id)
         VALUES (2000, 0.5, ?)",
    )
    .bind(id)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO contrats (montant_pret, client_id) VALUES (1000.0, ?)")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();

    id
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    sqlx::query_scalar(&sql).fetch_one(pool).await.unwrap()
}

/// Row counts of all four tables, in schema order.
pub async fn all_counts(pool: &SqlitePool) -> [i64; 4] {
    [
        count_rows(pool, "clients").await,
        count_rows(pool, "clients_meta").await,
        count_rows(pool, "clients_situation").await,
        count_rows(pool, "contrats").await,
    ]
}
