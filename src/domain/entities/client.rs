//! Client aggregate: a client with its profile, situation and loan contracts.

use chrono::NaiveDate;

use super::MaritalStatus;

/// A client together with the records it owns.
///
/// `client_meta` and `client_situation` are one-to-one children, `contrats` is
/// one-to-many. All children are removed when the client is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i64,
    pub date_creation_compte: Option<NaiveDate>,
    pub client_meta: Option<ClientMeta>,
    pub client_situation: Option<ClientSituation>,
    pub contrats: Vec<Contrat>,
}

/// Personal profile of a client (`clients_meta`).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMeta {
    pub id: i64,
    pub age: i32,
    pub poids: f64,
    pub niveau_etude: String,
    pub smoker: bool,
    pub nb_enfants: i32,
    pub quotient_caf: f64,
    pub situation_familiale: Option<MaritalStatus>,
}

impl ClientMeta {
    /// Overwrites every field present in `patch`.
    pub fn apply(&mut self, patch: ClientMetaPatch) {
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(poids) = patch.poids {
            self.poids = poids;
        }
        if let Some(niveau_etude) = patch.niveau_etude {
            self.niveau_etude = niveau_etude;
        }
        if let Some(smoker) = patch.smoker {
            self.smoker = smoker;
        }
        if let Some(nb_enfants) = patch.nb_enfants {
            self.nb_enfants = nb_enfants;
        }
        if let Some(quotient_caf) = patch.quotient_caf {
            self.quotient_caf = quotient_caf;
        }
        if let Some(situation_familiale) = patch.situation_familiale {
            self.situation_familiale = situation_familiale;
        }
    }
}

/// Financial situation of a client (`clients_situation`).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSituation {
    pub id: i64,
    pub revenu_estime_mois: i64,
    pub risque_personnel: f64,
    pub loyer_mensuel: Option<f64>,
}

impl ClientSituation {
    /// Overwrites every field present in `patch`.
    pub fn apply(&mut self, patch: ClientSituationPatch) {
        if let Some(revenu_estime_mois) = patch.revenu_estime_mois {
            self.revenu_estime_mois = revenu_estime_mois;
        }
        if let Some(risque_personnel) = patch.risque_personnel {
            self.risque_personnel = risque_personnel;
        }
        if let Some(loyer_mensuel) = patch.loyer_mensuel {
            self.loyer_mensuel = loyer_mensuel;
        }
    }
}

/// A loan contract held by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Contrat {
    pub id: i64,
    pub montant_pret: f64,
}

/// Input data for creating a client and all of its children at once.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub date_creation_compte: Option<NaiveDate>,
    pub client_meta: NewClientMeta,
    pub client_situation: NewClientSituation,
    pub contrats: Vec<NewContrat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClientMeta {
    pub age: i32,
    pub poids: f64,
    pub niveau_etude: String,
    pub smoker: bool,
    pub nb_enfants: i32,
    pub quotient_caf: f64,
    pub situation_familiale: Option<MaritalStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClientSituation {
    pub revenu_estime_mois: i64,
    pub risque_personnel: f64,
    pub loyer_mensuel: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewContrat {
    pub montant_pret: f64,
}

/// Partial update of a client.
///
/// `None` leaves a field unchanged. For nullable columns the inner option
/// distinguishes "set to null" (`Some(None)`) from "set to value".
/// `contrats`, when present, replaces the whole contract list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub date_creation_compte: Option<Option<NaiveDate>>,
    pub client_meta: ClientMetaPatch,
    pub client_situation: ClientSituationPatch,
    pub contrats: Option<Vec<NewContrat>>,
}

impl ClientPatch {
    pub fn is_empty(&self) -> bool {
        self.date_creation_compte.is_none()
            && self.client_meta.is_empty()
            && self.client_situation.is_empty()
            && self.contrats.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientMetaPatch {
    pub age: Option<i32>,
    pub poids: Option<f64>,
    pub niveau_etude: Option<String>,
    pub smoker: Option<bool>,
    pub nb_enfants: Option<i32>,
    pub quotient_caf: Option<f64>,
    pub situation_familiale: Option<Option<MaritalStatus>>,
}

impl ClientMetaPatch {
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.poids.is_none()
            && self.niveau_etude.is_none()
            && self.smoker.is_none()
            && self.nb_enfants.is_none()
            && self.quotient_caf.is_none()
            && self.situation_familiale.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientSituationPatch {
    pub revenu_estime_mois: Option<i64>,
    pub risque_personnel: Option<f64>,
    pub loyer_mensuel: Option<Option<f64>>,
}

impl ClientSituationPatch {
    pub fn is_empty(&self) -> bool {
        self.revenu_estime_mois.is_none()
            && self.risque_personnel.is_none()
            && self.loyer_mensuel.is_none()
    }
}
