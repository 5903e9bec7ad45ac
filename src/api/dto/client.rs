//! DTOs for the client endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::application::services::{CreateClientInput, UpdateClientInput};
use crate::domain::entities::{
    Client, ClientMeta, ClientMetaPatch, ClientSituation, ClientSituationPatch, Contrat,
    MaritalStatus, NewClientMeta, NewClientSituation, NewContrat,
};
use crate::error::AppError;

/// Request body for `POST /clients`.
///
/// ```json
/// {
///   "date_creation_compte": "2024-01-31",
///   "client_meta": {"age": 30, "poids": 70.5, "niveau_etude": "bac", "smoker": false,
///                   "nb_enfants": 0, "quotient_caf": 400.0},
///   "client_situation": {"revenu_estime_mois": 2000, "risque_personnel": 0.1},
///   "contrats": [{"montant_pret": 5000.0}]
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateClientRequest {
    /// Account creation date as `YYYY-MM-DD`; parsed by the service.
    #[serde(default)]
    pub date_creation_compte: Option<String>,

    #[validate(nested)]
    pub client_meta: ClientMetaPayload,

    #[validate(nested)]
    pub client_situation: ClientSituationPayload,

    #[serde(default)]
    #[validate(nested)]
    pub contrats: Vec<ContratPayload>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClientMetaPayload {
    #[validate(range(min = 0, max = 150))]
    pub age: i32,
    #[validate(range(min = 0.0))]
    pub poids: f64,
    #[validate(length(min = 1, max = 100))]
    pub niveau_etude: String,
    pub smoker: bool,
    #[validate(range(min = 0))]
    pub nb_enfants: i32,
    #[validate(range(min = 0.0))]
    pub quotient_caf: f64,
    #[serde(default)]
    pub situation_familiale: Option<MaritalStatus>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClientSituationPayload {
    #[validate(range(min = 0))]
    pub revenu_estime_mois: i64,
    pub risque_personnel: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub loyer_mensuel: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ContratPayload {
    #[validate(range(min = 0.0))]
    pub montant_pret: f64,
}

impl From<ContratPayload> for NewContrat {
    fn from(p: ContratPayload) -> Self {
        NewContrat {
            montant_pret: p.montant_pret,
        }
    }
}

impl From<CreateClientRequest> for CreateClientInput {
    fn from(r: CreateClientRequest) -> Self {
        let meta = r.client_meta;
        let situation = r.client_situation;

        CreateClientInput {
            date_creation_compte: r.date_creation_compte,
            client_meta: NewClientMeta {
                age: meta.age,
                poids: meta.poids,
                niveau_etude: meta.niveau_etude,
                smoker: meta.smoker,
                nb_enfants: meta.nb_enfants,
                quotient_caf: meta.quotient_caf,
                situation_familiale: meta.situation_familiale,
            },
            client_situation: NewClientSituation {
                revenu_estime_mois: situation.revenu_estime_mois,
                risque_personnel: situation.risque_personnel,
                loyer_mensuel: situation.loyer_mensuel,
            },
            contrats: r.contrats.into_iter().map(NewContrat::from).collect(),
        }
    }
}

/// Request body for `PUT /clients/{id}`.
///
/// Every field is optional and only provided fields change. Meta and situation
/// fields can be sent inside `client_meta` / `client_situation` or flat at the
/// top level, since their names are unique across the schema. Sending the
/// same field both ways is rejected.
///
/// # Nullable fields
///
/// For `date_creation_compte`, `situation_familiale` and `loyer_mensuel`:
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear the value
/// - **Value** → set it
///
/// `contrats`, when present, replaces the whole contract list.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateClientRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub date_creation_compte: Option<Option<String>>,

    #[validate(nested)]
    pub client_meta: Option<ClientMetaPatchPayload>,

    #[validate(nested)]
    pub client_situation: Option<ClientSituationPatchPayload>,

    #[validate(nested)]
    pub contrats: Option<Vec<ContratPayload>>,

    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    #[validate(range(min = 0.0))]
    pub poids: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub niveau_etude: Option<String>,
    pub smoker: Option<bool>,
    #[validate(range(min = 0))]
    pub nb_enfants: Option<i32>,
    #[validate(range(min = 0.0))]
    pub quotient_caf: Option<f64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub situation_familiale: Option<Option<MaritalStatus>>,

    #[validate(range(min = 0))]
    pub revenu_estime_mois: Option<i64>,
    pub risque_personnel: Option<f64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(range(min = 0.0))]
    pub loyer_mensuel: Option<Option<f64>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClientMetaPatchPayload {
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    #[validate(range(min = 0.0))]
    pub poids: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub niveau_etude: Option<String>,
    pub smoker: Option<bool>,
    #[validate(range(min = 0))]
    pub nb_enfants: Option<i32>,
    #[validate(range(min = 0.0))]
    pub quotient_caf: Option<f64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub situation_familiale: Option<Option<MaritalStatus>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClientSituationPatchPayload {
    #[validate(range(min = 0))]
    pub revenu_estime_mois: Option<i64>,
    pub risque_personnel: Option<f64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(range(min = 0.0))]
    pub loyer_mensuel: Option<Option<f64>>,
}

/// Chooses between the flat and the nested spelling of one field.
fn pick<T>(field: &'static str, flat: Option<T>, nested: Option<T>) -> Result<Option<T>, AppError> {
    match (flat, nested) {
        (Some(_), Some(_)) => Err(AppError::bad_request(
            format!("Field {field} is given both at top level and in its nested object"),
            json!({ "field": field }),
        )),
        (flat, nested) => Ok(flat.or(nested)),
    }
}

impl UpdateClientRequest {
    /// Merges flat and nested fields into a single update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is given twice.
    pub fn into_input(self) -> Result<UpdateClientInput, AppError> {
        let meta = self.client_meta.unwrap_or_default();
        let situation = self.client_situation.unwrap_or_default();

        Ok(UpdateClientInput {
            date_creation_compte: self.date_creation_compte,
            client_meta: ClientMetaPatch {
                age: pick("age", self.age, meta.age)?,
                poids: pick("poids", self.poids, meta.poids)?,
                niveau_etude: pick("niveau_etude", self.niveau_etude, meta.niveau_etude)?,
                smoker: pick("smoker", self.smoker, meta.smoker)?,
                nb_enfants: pick("nb_enfants", self.nb_enfants, meta.nb_enfants)?,
                quotient_caf: pick("quotient_caf", self.quotient_caf, meta.quotient_caf)?,
                situation_familiale: pick(
                    "situation_familiale",
                    self.situation_familiale,
                    meta.situation_familiale,
                )?,
            },
            client_situation: ClientSituationPatch {
                revenu_estime_mois: pick(
                    "revenu_estime_mois",
                    self.revenu_estime_mois,
                    situation.revenu_estime_mois,
                )?,
                risque_personnel: pick(
                    "risque_personnel",
                    self.risque_personnel,
                    situation.risque_personnel,
                )?,
                loyer_mensuel: pick("loyer_mensuel", self.loyer_mensuel, situation.loyer_mensuel)?,
            },
            contrats: self
                .contrats
                .map(|contrats| contrats.into_iter().map(NewContrat::from).collect()),
        })
    }
}

/// JSON representation of a client with its children.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: i64,
    pub date_creation_compte: Option<NaiveDate>,
    pub client_meta: Option<ClientMetaResponse>,
    pub client_situation: Option<ClientSituationResponse>,
    pub contrats: Vec<ContratResponse>,
}

#[derive(Debug, Serialize)]
pub struct ClientMetaResponse {
    pub id: i64,
    pub age: i32,
    pub poids: f64,
    pub niveau_etude: String,
    pub smoker: bool,
    pub nb_enfants: i32,
    pub quotient_caf: f64,
    pub situation_familiale: Option<MaritalStatus>,
}

#[derive(Debug, Serialize)]
pub struct ClientSituationResponse {
    pub id: i64,
    pub revenu_estime_mois: i64,
    pub risque_personnel: f64,
    pub loyer_mensuel: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ContratResponse {
    pub id: i64,
    pub montant_pret: f64,
}

impl From<ClientMeta> for ClientMetaResponse {
    fn from(m: ClientMeta) -> Self {
        ClientMetaResponse {
            id: m.id,
            age: m.age,
            poids: m.poids,
            niveau_etude: m.niveau_etude,
            smoker: m.smoker,
            nb_enfants: m.nb_enfants,
            quotient_caf: m.quotient_caf,
            situation_familiale: m.situation_familiale,
        }
    }
}

impl From<ClientSituation> for ClientSituationResponse {
    fn from(s: ClientSituation) -> Self {
        ClientSituationResponse {
            id: s.id,
            revenu_estime_mois: s.revenu_estime_mois,
            risque_personnel: s.risque_personnel,
            loyer_mensuel: s.loyer_mensuel,
        }
    }
}

impl From<Contrat> for ContratResponse {
    fn from(c: Contrat) -> Self {
        ContratResponse {
            id: c.id,
            montant_pret: c.montant_pret,
        }
    }
}

impl From<Client> for ClientResponse {
    fn from(c: Client) -> Self {
        ClientResponse {
            id: c.id,
            date_creation_compte: c.date_creation_compte,
            client_meta: c.client_meta.map(ClientMetaResponse::from),
            client_situation: c.client_situation.map(ClientSituationResponse::from),
            contrats: c.contrats.into_iter().map(ContratResponse::from).collect(),
        }
    }
}

/// Body returned by `DELETE /clients/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteClientResponse {
    pub detail: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_field_update() {
        let req: UpdateClientRequest = serde_json::from_str(r#"{"poids": 80.0}"#).unwrap();
        let input = req.into_input().unwrap();

        assert_eq!(input.client_meta.poids, Some(80.0));
        assert_eq!(input.client_meta.age, None);
        assert!(input.client_situation.is_empty());
        assert!(input.contrats.is_none());
        assert!(input.date_creation_compte.is_none());
    }

    #[test]
    fn test_nested_partial_update() {
        let req: UpdateClientRequest = serde_json::from_str(
            r#"{"client_situation": {"loyer_mensuel": null}, "client_meta": {"smoker": true}}"#,
        )
        .unwrap();
        let input = req.into_input().unwrap();

        assert_eq!(input.client_situation.loyer_mensuel, Some(None));
        assert_eq!(input.client_situation.revenu_estime_mois, None);
        assert_eq!(input.client_meta.smoker, Some(true));
    }

    #[test]
    fn test_same_field_flat_and_nested_is_rejected() {
        let req: UpdateClientRequest =
            serde_json::from_str(r#"{"age": 31, "client_meta": {"age": 32}}"#).unwrap();

        let err = req.into_input().unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(serde_json::from_str::<UpdateClientRequest>(r#"{"nom": "x"}"#).is_err());
        assert!(
            serde_json::from_str::<UpdateClientRequest>(r#"{"client_meta": {"height": 1.8}}"#)
                .is_err()
        );
    }

    #[test]
    fn test_date_absent_null_and_value() {
        let absent: UpdateClientRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.date_creation_compte, None);

        let null: UpdateClientRequest =
            serde_json::from_str(r#"{"date_creation_compte": null}"#).unwrap();
        assert_eq!(null.date_creation_compte, Some(None));

        let set: UpdateClientRequest =
            serde_json::from_str(r#"{"date_creation_compte": "2024-05-01"}"#).unwrap();
        assert_eq!(set.date_creation_compte, Some(Some("2024-05-01".to_string())));
    }

    #[test]
    fn test_update_request_rejects_negative_rent() {
        let flat: UpdateClientRequest =
            serde_json::from_str(r#"{"loyer_mensuel": -500.0}"#).unwrap();
        assert!(flat.validate().is_err());

        let nested: UpdateClientRequest =
            serde_json::from_str(r#"{"client_situation": {"loyer_mensuel": -1.0}}"#).unwrap();
        assert!(nested.validate().is_err());

        let cleared: UpdateClientRequest =
            serde_json::from_str(r#"{"loyer_mensuel": null}"#).unwrap();
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateClientRequest = serde_json::from_str(
            r#"{
                "client_meta": {"age": -1, "poids": 70.5, "niveau_etude": "bac", "smoker": false,
                                "nb_enfants": 0, "quotient_caf": 400.0},
                "client_situation": {"revenu_estime_mois": 2000, "risque_personnel": 0.1},
                "contrats": [{"montant_pret": 5000}]
            }"#,
        )
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_invalid_marital_status() {
        let result = serde_json::from_str::<CreateClientRequest>(
            r#"{
                "client_meta": {"age": 30, "poids": 70.5, "niveau_etude": "bac", "smoker": false,
                                "nb_enfants": 0, "quotient_caf": 400.0,
                                "situation_familiale": "married"},
                "client_situation": {"revenu_estime_mois": 2000, "risque_personnel": 0.1}
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_response_shape() {
        let client = Client {
            id: 4,
            date_creation_compte: NaiveDate::from_ymd_opt(2023, 12, 1),
            client_meta: None,
            client_situation: Some(ClientSituation {
                id: 9,
                revenu_estime_mois: 1800,
                risque_personnel: 0.3,
                loyer_mensuel: Some(500.0),
            }),
            contrats: vec![Contrat {
                id: 11,
                montant_pret: 2500.0,
            }],
        };

        let value = serde_json::to_value(ClientResponse::from(client)).unwrap();

        assert_eq!(value["id"], 4);
        assert_eq!(value["date_creation_compte"], "2023-12-01");
        assert!(value["client_meta"].is_null());
        assert_eq!(value["client_situation"]["id"], 9);
        assert_eq!(value["contrats"][0]["montant_pret"], 2500.0);
    }
}
