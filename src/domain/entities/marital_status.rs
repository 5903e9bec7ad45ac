//! Marital status of a client (`situation_familiale`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of marital statuses accepted by the API and the database.
///
/// The serialized form is the French label stored in
/// `clients_meta.situation_familiale`; the table carries a matching `CHECK`
/// constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[serde(rename = "marié(e)")]
    Married,
    #[serde(rename = "célibataire")]
    Single,
    #[serde(rename = "veuf(ve)")]
    Widowed,
    #[serde(rename = "divorcé(e)")]
    Divorced,
    #[serde(rename = "pacsé(e)")]
    CivilUnion,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 5] = [
        MaritalStatus::Married,
        MaritalStatus::Single,
        MaritalStatus::Widowed,
        MaritalStatus::Divorced,
        MaritalStatus::CivilUnion,
    ];

    /// Label used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Married => "marié(e)",
            MaritalStatus::Single => "célibataire",
            MaritalStatus::Widowed => "veuf(ve)",
            MaritalStatus::Divorced => "divorcé(e)",
            MaritalStatus::CivilUnion => "pacsé(e)",
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label is not one of the known statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown marital status '{0}'")]
pub struct UnknownMaritalStatus(pub String);

impl FromStr for MaritalStatus {
    type Err = UnknownMaritalStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaritalStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownMaritalStatus(s.to_string()))
    }
}
