//! Bulk client import from CSV.

use serde::Deserialize;
use serde_json::json;
use std::io::Read;
use std::sync::Arc;

use crate::domain::entities::{
    MaritalStatus, NewClient, NewClientMeta, NewClientSituation, NewContrat,
};
use crate::domain::repositories::ClientRepository;
use crate::error::AppError;

/// One line of the import file.
///
/// `nb_enfants` and `quotient_caf` may be missing from older exports.
#[derive(Debug, Deserialize)]
struct CsvRow {
    age: i32,
    poids: f64,
    niveau_etude: String,
    smoker: String,
    #[serde(default)]
    nb_enfants: Option<i32>,
    #[serde(default)]
    quotient_caf: Option<f64>,
    #[serde(default)]
    situation_familiale: Option<String>,
    revenu_estime_mois: i64,
    risque_personnel: f64,
    #[serde(default)]
    loyer_mensuel: Option<f64>,
    montant_pret: f64,
}

impl CsvRow {
    fn into_new_client(self, line: usize) -> Result<NewClient, AppError> {
        let situation_familiale = match self.situation_familiale.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => Some(label.parse::<MaritalStatus>().map_err(|e| {
                AppError::bad_request(
                    format!("Invalid situation_familiale on row {line}"),
                    json!({ "row": line, "reason": e.to_string() }),
                )
            })?),
        };

        Ok(NewClient {
            date_creation_compte: None,
            client_meta: NewClientMeta {
                age: self.age,
                poids: self.poids,
                niveau_etude: self.niveau_etude,
                smoker: self.smoker.trim().eq_ignore_ascii_case("oui"),
                nb_enfants: self.nb_enfants.unwrap_or(0),
                quotient_caf: self.quotient_caf.unwrap_or(0.0),
                situation_familiale,
            },
            client_situation: NewClientSituation {
                revenu_estime_mois: self.revenu_estime_mois,
                risque_personnel: self.risque_personnel,
                loyer_mensuel: self.loyer_mensuel,
            },
            contrats: vec![NewContrat {
                montant_pret: self.montant_pret,
            }],
        })
    }
}

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub rows_read: usize,
    pub clients_stored: u64,
}

/// Service loading clients in bulk from a CSV export.
///
/// Each row becomes one client with one meta record, one situation record and
/// one contract. The whole file is parsed before anything is written, and all
/// clients are inserted in a single transaction.
pub struct ImportService<R: ClientRepository> {
    repository: Arc<R>,
}

impl<R: ClientRepository> ImportService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Parses `reader` as CSV with a header line and stores every row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming the first malformed row; nothing
    /// is stored in that case.
    /// Returns [`AppError::Persistence`] if the database rejects the batch.
    pub async fn import_csv<Rd: Read>(&self, reader: Rd) -> Result<ImportReport, AppError> {
        let new_clients = parse_csv(reader).inspect_err(|e| {
            tracing::error!(error = %e, "CSV import rejected");
        })?;
        let rows_read = new_clients.len();
        tracing::info!(rows = rows_read, "{} rows read, inserting", rows_read);

        let clients_stored = self
            .repository
            .create_many(new_clients)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "CSV import failed, rolled back"))?;

        tracing::info!(clients = clients_stored, "{} clients imported", clients_stored);

        Ok(ImportReport {
            rows_read,
            clients_stored,
        })
    }
}

fn parse_csv<Rd: Read>(reader: Rd) -> Result<Vec<NewClient>, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut new_clients = Vec::new();
    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1, first data row is row 1.
        let line = index + 1;
        let row = record.map_err(|e| {
            AppError::bad_request(
                format!("Malformed CSV row {line}"),
                json!({ "row": line, "reason": e.to_string() }),
            )
        })?;
        new_clients.push(row.into_new_client(line)?);
    }

    Ok(new_clients)
}
