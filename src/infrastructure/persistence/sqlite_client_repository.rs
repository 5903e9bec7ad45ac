//! SQLite implementation of the client repository.

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::SqliteConnection;
use std::sync::Arc;

use super::database::{Database, finish};
use crate::domain::entities::{
    Client, ClientMeta, ClientPatch, ClientSituation, Contrat, MaritalStatus, NewClient,
    NewContrat,
};
use crate::domain::repositories::ClientRepository;
use crate::error::AppError;

const TABLES: [&str; 4] = ["clients", "clients_meta", "clients_situation", "contrats"];

/// SQLite repository for the client aggregate.
///
/// Children are stored in their own tables and joined back by `client_id`.
/// Deleting a client relies on `ON DELETE CASCADE` to remove them.
pub struct SqliteClientRepository {
    db: Arc<Database>,
}

impl SqliteClientRepository {
    /// Creates a new repository on top of a database handle.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Returns the SQLite library version.
    pub async fn version(&self) -> Result<String, AppError> {
        let mut conn = self.db.acquire().await?;
        let version: String = sqlx::query_scalar("SELECT sqlite_version()")
            .fetch_one(&mut *conn)
            .await?;
        Ok(version)
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: i64,
    date_creation_compte: Option<NaiveDate>,
}

#[derive(sqlx::FromRow)]
struct ClientMetaRow {
    id: i64,
    age: i32,
    poids: f64,
    niveau_etude: String,
    smoker: bool,
    nb_enfants: i32,
    quotient_caf: f64,
    situation_familiale: Option<String>,
}

impl TryFrom<ClientMetaRow> for ClientMeta {
    type Error = AppError;

    fn try_from(r: ClientMetaRow) -> Result<Self, Self::Error> {
        let situation_familiale = r
            .situation_familiale
            .as_deref()
            .map(str::parse::<MaritalStatus>)
            .transpose()
            .map_err(|e| {
                AppError::internal(
                    "Stored marital status is invalid",
                    json!({ "meta_id": r.id, "reason": e.to_string() }),
                )
            })?;

        Ok(ClientMeta {
            id: r.id,
            age: r.age,
            poids: r.poids,
            niveau_etude: r.niveau_etude,
            smoker: r.smoker,
            nb_enfants: r.nb_enfants,
            quotient_caf: r.quotient_caf,
            situation_familiale,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClientSituationRow {
    id: i64,
    revenu_estime_mois: i64,
    risque_personnel: f64,
    loyer_mensuel: Option<f64>,
}

impl From<ClientSituationRow> for ClientSituation {
    fn from(r: ClientSituationRow) -> Self {
        ClientSituation {
            id: r.id,
            revenu_estime_mois: r.revenu_estime_mois,
            risque_personnel: r.risque_personnel,
            loyer_mensuel: r.loyer_mensuel,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ContratRow {
    id: i64,
    montant_pret: f64,
}

impl From<ContratRow> for Contrat {
    fn from(r: ContratRow) -> Self {
        Contrat {
            id: r.id,
            montant_pret: r.montant_pret,
        }
    }
}

/// Resolves the children of a client row.
async fn load_client(conn: &mut SqliteConnection, row: ClientRow) -> Result<Client, AppError> {
    let meta = sqlx::query_as::<_, ClientMetaRow>(
        r#"
        SELECT id, age, poids, niveau_etude, smoker, nb_enfants, quotient_caf, situation_familiale
        FROM clients_meta
        WHERE client_id = ?
        "#,
    )
    .bind(row.id)
    .fetch_optional(&mut *conn)
    .await?;

    let situation = sqlx::query_as::<_, ClientSituationRow>(
        r#"
        SELECT id, revenu_estime_mois, risque_personnel, loyer_mensuel
        FROM clients_situation
        WHERE client_id = ?
        "#,
    )
    .bind(row.id)
    .fetch_optional(&mut *conn)
    .await?;

    let contrats = sqlx::query_as::<_, ContratRow>(
        "SELECT id, montant_pret FROM contrats WHERE client_id = ? ORDER BY id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Client {
        id: row.id,
        date_creation_compte: row.date_creation_compte,
        client_meta: meta.map(ClientMeta::try_from).transpose()?,
        client_situation: situation.map(ClientSituation::from),
        contrats: contrats.into_iter().map(Contrat::from).collect(),
    })
}

async fn fetch_client(conn: &mut SqliteConnection, id: i64) -> Result<Option<Client>, AppError> {
    let row = sqlx::query_as::<_, ClientRow>(
        "SELECT id, date_creation_compte FROM clients WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(load_client(conn, row).await?)),
        None => Ok(None),
    }
}

async fn insert_contrats(
    conn: &mut SqliteConnection,
    client_id: i64,
    contrats: &[NewContrat],
) -> Result<(), AppError> {
    for contrat in contrats {
        sqlx::query("INSERT INTO contrats (montant_pret, client_id) VALUES (?, ?)")
            .bind(contrat.montant_pret)
            .bind(client_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Inserts the client row and all children, returning the new client id.
async fn insert_client(conn: &mut SqliteConnection, new: &NewClient) -> Result<i64, AppError> {
    let client_id: i64 = sqlx::query_scalar(
        "INSERT INTO clients (date_creation_compte) VALUES (?) RETURNING id",
    )
    .bind(new.date_creation_compte)
    .fetch_one(&mut *conn)
    .await?;

    let meta = &new.client_meta;
    sqlx::query(
        r#"
        INSERT INTO clients_meta
            (age, poids, niveau_etude, smoker, nb_enfants, quotient_caf, situation_familiale, client_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(meta.age)
    .bind(meta.poids)
    .bind(&meta.niveau_etude)
    .bind(meta.smoker)
    .bind(meta.nb_enfants)
    .bind(meta.quotient_caf)
    .bind(meta.situation_familiale.map(|s| s.as_str()))
    .bind(client_id)
    .execute(&mut *conn)
    .await?;

    let situation = &new.client_situation;
    sqlx::query(
        r#"
        INSERT INTO clients_situation
            (revenu_estime_mois, risque_personnel, loyer_mensuel, client_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(situation.revenu_estime_mois)
    .bind(situation.risque_personnel)
    .bind(situation.loyer_mensuel)
    .bind(client_id)
    .execute(&mut *conn)
    .await?;

    insert_contrats(conn, client_id, &new.contrats).await?;

    Ok(client_id)
}

/// Merges `patch` into the stored aggregate and writes the touched tables.
async fn apply_patch(
    conn: &mut SqliteConnection,
    id: i64,
    patch: ClientPatch,
) -> Result<Client, AppError> {
    let mut client = fetch_client(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("client not found", json!({ "id": id })))?;

    if let Some(date) = patch.date_creation_compte {
        sqlx::query("UPDATE clients SET date_creation_compte = ? WHERE id = ?")
            .bind(date)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    if !patch.client_meta.is_empty() {
        let meta = client.client_meta.as_mut().ok_or_else(|| {
            AppError::persistence(
                StatusCode::INTERNAL_SERVER_ERROR,
                "client has no client_meta record to update",
                json!({ "id": id }),
            )
        })?;
        meta.apply(patch.client_meta);

        sqlx::query(
            r#"
            UPDATE clients_meta SET
                age = ?, poids = ?, niveau_etude = ?, smoker = ?,
                nb_enfants = ?, quotient_caf = ?, situation_familiale = ?
            WHERE id = ?
            "#,
        )
        .bind(meta.age)
        .bind(meta.poids)
        .bind(&meta.niveau_etude)
        .bind(meta.smoker)
        .bind(meta.nb_enfants)
        .bind(meta.quotient_caf)
        .bind(meta.situation_familiale.map(|s| s.as_str()))
        .bind(meta.id)
        .execute(&mut *conn)
        .await?;
    }

    if !patch.client_situation.is_empty() {
        let situation = client.client_situation.as_mut().ok_or_else(|| {
            AppError::persistence(
                StatusCode::INTERNAL_SERVER_ERROR,
                "client has no client_situation record to update",
                json!({ "id": id }),
            )
        })?;
        situation.apply(patch.client_situation);

        sqlx::query(
            r#"
            UPDATE clients_situation SET
                revenu_estime_mois = ?, risque_personnel = ?, loyer_mensuel = ?
            WHERE id = ?
            "#,
        )
        .bind(situation.revenu_estime_mois)
        .bind(situation.risque_personnel)
        .bind(situation.loyer_mensuel)
        .bind(situation.id)
        .execute(&mut *conn)
        .await?;
    }

    if let Some(contrats) = patch.contrats {
        sqlx::query("DELETE FROM contrats WHERE client_id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        insert_contrats(conn, id, &contrats).await?;
    }

    fetch_client(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("client not found", json!({ "id": id })))
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn create(&self, new_client: NewClient) -> Result<Client, AppError> {
        let mut tx = self.db.begin().await?;

        let result = match insert_client(&mut tx, &new_client).await {
            Ok(id) => fetch_client(&mut tx, id).await.and_then(|client| {
                client.ok_or_else(|| {
                    AppError::internal("Created client vanished", json!({ "id": id }))
                })
            }),
            Err(e) => Err(e),
        };

        finish(tx, result).await
    }

    async fn create_many(&self, new_clients: Vec<NewClient>) -> Result<u64, AppError> {
        let mut tx = self.db.begin().await?;

        let mut result = Ok(0u64);
        for new_client in &new_clients {
            if let Err(e) = insert_client(&mut tx, new_client).await {
                result = Err(e);
                break;
            }
            result = result.map(|n| n + 1);
        }

        finish(tx, result).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Client>, AppError> {
        let mut conn = self.db.acquire().await?;
        fetch_client(&mut conn, id).await
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Client>, AppError> {
        let mut conn = self.db.acquire().await?;

        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, date_creation_compte
            FROM clients
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&mut *conn)
        .await?;

        let mut clients = Vec::with_capacity(rows.len());
        for row in rows {
            clients.push(load_client(&mut conn, row).await?);
        }

        Ok(clients)
    }

    async fn update(&self, id: i64, patch: ClientPatch) -> Result<Client, AppError> {
        let mut tx = self.db.begin().await?;
        let result = apply_patch(&mut tx, id, patch).await;
        finish(tx, result).await
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)
            .and_then(|done| {
                if done.rows_affected() == 0 {
                    Err(AppError::not_found("client not found", json!({ "id": id })))
                } else {
                    Ok(())
                }
            });

        finish(tx, result).await
    }

    async fn table_counts(&self) -> Result<Vec<(&'static str, i64)>, AppError> {
        let mut conn = self.db.acquire().await?;

        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            let count: i64 = sqlx::query_scalar(&sql)
                .fetch_one(&mut *conn)
                .await?;
            counts.push((table, count));
        }

        Ok(counts)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.db.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
