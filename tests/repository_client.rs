mod common;

use chrono::NaiveDate;
use client_crud_api::domain::entities::{
    ClientMetaPatch, ClientPatch, ClientSituationPatch, MaritalStatus, NewClient, NewClientMeta,
    NewClientSituation, NewContrat,
};
use client_crud_api::domain::repositories::ClientRepository;
use client_crud_api::error::AppError;
use sqlx::SqlitePool;

fn new_client(age: i32, contrats: &[f64]) -> NewClient {
    NewClient {
        date_creation_compte: NaiveDate::from_ymd_opt(2024, 1, 10),
        client_meta: NewClientMeta {
            age,
            poids: 68.0,
            niveau_etude: "licence".to_string(),
            smoker: true,
            nb_enfants: 1,
            quotient_caf: 620.0,
            situation_familiale: Some(MaritalStatus::CivilUnion),
        },
        client_situation: NewClientSituation {
            revenu_estime_mois: 2800,
            risque_personnel: 0.25,
            loyer_mensuel: Some(750.0),
        },
        contrats: contrats
            .iter()
            .map(|&montant_pret| NewContrat { montant_pret })
            .collect(),
    }
}

// ─── CREATE / READ ───────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_and_find(pool: SqlitePool) {
    let repo = common::create_test_repository(pool.clone());

    let created = repo.create(new_client(41, &[5000.0, 700.0])).await.unwrap();

    assert!(created.id > 0);
    let meta = created.client_meta.as_ref().unwrap();
    assert_eq!(meta.age, 41);
    assert_eq!(meta.situation_familiale, Some(MaritalStatus::CivilUnion));
    assert_eq!(created.contrats.len(), 2);
    assert_eq!(created.contrats[0].montant_pret, 5000.0);

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found, created);

    assert_eq!(common::all_counts(&pool).await, [1, 1, 1, 2]);
}

#[sqlx::test]
async fn test_find_missing_returns_none(pool: SqlitePool) {
    let repo = common::create_test_repository(pool);

    assert!(repo.find_by_id(999).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_create_failure_leaves_nothing_behind(pool: SqlitePool) {
    let repo = common::create_test_repository(pool.clone());

    // SQLite stores NaN as NULL, which violates NOT NULL on montant_pret.
    let err = repo.create(new_client(30, &[f64::NAN])).await.unwrap_err();

    assert!(matches!(err, AppError::Persistence { .. }));
    assert_eq!(common::all_counts(&pool).await, [0, 0, 0, 0]);
}

#[sqlx::test]
async fn test_list_orders_by_id_and_pages(pool: SqlitePool) {
    let first = common::insert_test_client(&pool, 20).await;
    let second = common::insert_test_client(&pool, 30).await;
    let third = common::insert_test_client(&pool, 40).await;

    let repo = common::create_test_repository(pool);

    let all = repo.list(0, 100).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first, second, third]);

    let page = repo.list(1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, second);

    assert!(repo.list(10, 5).await.unwrap().is_empty());
}

// ─── UPDATE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_update_merges_single_field(pool: SqlitePool) {
    let repo = common::create_test_repository(pool);
    let created = repo.create(new_client(41, &[5000.0])).await.unwrap();

    let patch = ClientPatch {
        client_meta: ClientMetaPatch {
            poids: Some(80.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let updated = repo.update(created.id, patch).await.unwrap();

    let before = created.client_meta.unwrap();
    let after = updated.client_meta.unwrap();
    assert_eq!(after.poids, 80.0);
    assert_eq!(after.age, before.age);
    assert_eq!(after.niveau_etude, before.niveau_etude);
    assert_eq!(after.situation_familiale, before.situation_familiale);
    assert_eq!(updated.client_situation, created.client_situation);
    assert_eq!(updated.contrats, created.contrats);
    assert_eq!(updated.date_creation_compte, created.date_creation_compte);
}

#[sqlx::test]
async fn test_update_clears_nullable_fields(pool: SqlitePool) {
    let repo = common::create_test_repository(pool);
    let created = repo.create(new_client(41, &[])).await.unwrap();

    let patch = ClientPatch {
        date_creation_compte: Some(None),
        client_meta: ClientMetaPatch {
            situation_familiale: Some(None),
            ..Default::default()
        },
        client_situation: ClientSituationPatch {
            loyer_mensuel: Some(None),
            ..Default::default()
        },
        ..Default::default()
    };
    let updated = repo.update(created.id, patch).await.unwrap();

    assert!(updated.date_creation_compte.is_none());
    assert!(updated.client_meta.unwrap().situation_familiale.is_none());
    assert!(updated.client_situation.unwrap().loyer_mensuel.is_none());
}

#[sqlx::test]
async fn test_update_replaces_contrats(pool: SqlitePool) {
    let repo = common::create_test_repository(pool.clone());
    let created = repo.create(new_client(41, &[5000.0, 700.0])).await.unwrap();

    let patch = ClientPatch {
        contrats: Some(vec![NewContrat { montant_pret: 123.0 }]),
        ..Default::default()
    };
    let updated = repo.update(created.id, patch).await.unwrap();

    assert_eq!(updated.contrats.len(), 1);
    assert_eq!(updated.contrats[0].montant_pret, 123.0);
    assert_eq!(common::count_rows(&pool, "contrats").await, 1);
}

#[sqlx::test]
async fn test_update_missing_client(pool: SqlitePool) {
    let repo = common::create_test_repository(pool);

    let err = repo.update(42, ClientPatch::default()).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound { .. }));
}

#[sqlx::test]
async fn test_update_failure_rolls_back(pool: SqlitePool) {
    let repo = common::create_test_repository(pool);
    let created = repo.create(new_client(41, &[5000.0])).await.unwrap();

    let patch = ClientPatch {
        client_meta: ClientMetaPatch {
            age: Some(99),
            ..Default::default()
        },
        contrats: Some(vec![NewContrat {
            montant_pret: f64::NAN,
        }]),
        ..Default::default()
    };
    assert!(repo.update(created.id, patch).await.is_err());

    let reloaded = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(reloaded, created);
}

#[sqlx::test]
async fn test_update_without_meta_record_fails(pool: SqlitePool) {
    let id: i64 = sqlx::query_scalar("INSERT INTO clients DEFAULT VALUES RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();
    let repo = common::create_test_repository(pool);

    let patch = ClientPatch {
        client_meta: ClientMetaPatch {
            age: Some(50),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = repo.update(id, patch).await.unwrap_err();

    assert!(matches!(err, AppError::Persistence { .. }));
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_delete_cascades_to_children(pool: SqlitePool) {
    let keep = common::insert_test_client(&pool, 25).await;
    let gone = common::insert_test_client(&pool, 55).await;
    let repo = common::create_test_repository(pool.clone());

    repo.delete(gone).await.unwrap();

    assert!(repo.find_by_id(gone).await.unwrap().is_none());
    assert!(repo.find_by_id(keep).await.unwrap().is_some());
    assert_eq!(common::all_counts(&pool).await, [1, 1, 1, 1]);
}

#[sqlx::test]
async fn test_delete_missing_client(pool: SqlitePool) {
    let repo = common::create_test_repository(pool);

    let err = repo.delete(7).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound { .. }));
}

// ─── BULK / DIAGNOSTICS ──────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_many_stores_every_client(pool: SqlitePool) {
    let repo = common::create_test_repository(pool.clone());

    let stored = repo
        .create_many(vec![new_client(20, &[100.0]), new_client(21, &[200.0])])
        .await
        .unwrap();

    assert_eq!(stored, 2);
    assert_eq!(common::all_counts(&pool).await, [2, 2, 2, 2]);
}

#[sqlx::test]
async fn test_create_many_is_all_or_nothing(pool: SqlitePool) {
    let repo = common::create_test_repository(pool.clone());

    let result = repo
        .create_many(vec![new_client(20, &[100.0]), new_client(21, &[f64::NAN])])
        .await;

    assert!(result.is_err());
    assert_eq!(common::all_counts(&pool).await, [0, 0, 0, 0]);
}

#[sqlx::test]
async fn test_table_counts_and_ping(pool: SqlitePool) {
    common::insert_test_client(&pool, 33).await;
    let repo = common::create_test_repository(pool);

    repo.ping().await.unwrap();

    let counts = repo.table_counts().await.unwrap();
    assert_eq!(
        counts,
        vec![
            ("clients", 1),
            ("clients_meta", 1),
            ("clients_situation", 1),
            ("contrats", 1),
        ]
    );
}

#[sqlx::test]
async fn test_closed_database_fails_cleanly(pool: SqlitePool) {
    use client_crud_api::infrastructure::persistence::{Database, SqliteClientRepository};
    use std::sync::Arc;

    let database = Arc::new(Database::from_pool(pool));
    let repo = SqliteClientRepository::new(database.clone());

    database.close().await;

    assert!(database.is_closed());
    assert!(matches!(
        repo.ping().await.unwrap_err(),
        AppError::Persistence { .. }
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_serialized() {
    use client_crud_api::config::Config;
    use client_crud_api::infrastructure::persistence::{Database, SqliteClientRepository};
    use std::sync::Arc;
    use tokio::task::JoinSet;

    const CLIENTS: i32 = 8;
    const ROUNDS: i32 = 20;

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        database_url: format!("sqlite://{}", dir.path().join("clients.db").display()),
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        log_dir: None,
        default_page_limit: 100,
        db_max_connections: CLIENTS as u32,
        db_connect_timeout: 30,
        db_idle_timeout: 600,
        db_max_lifetime: 1800,
    };

    let database = Arc::new(Database::connect(&config).await.unwrap());
    database.migrate().await.unwrap();
    let repo = Arc::new(SqliteClientRepository::new(database.clone()));

    let mut ids = Vec::new();
    for age in 0..CLIENTS {
        ids.push(repo.create(new_client(age, &[100.0])).await.unwrap().id);
    }

    for round in 0..ROUNDS {
        let mut tasks = JoinSet::new();
        for &id in &ids {
            let repo = repo.clone();
            tasks.spawn(async move {
                let patch = ClientPatch {
                    client_meta: ClientMetaPatch {
                        age: Some(round),
                        ..Default::default()
                    },
                    ..Default::default()
                };
                repo.update(id, patch).await
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap().unwrap();
        }
    }

    for id in ids {
        let client = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(client.client_meta.unwrap().age, ROUNDS - 1);
    }

    database.close().await;
}
