//! Offset pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// `?skip=&limit=` query parameters for list endpoints.
///
/// Negative or non-numeric values are rejected by the extractor.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub skip: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ListParams {
    /// Returns `(skip, limit)` for SQL queries.
    ///
    /// # Defaults
    ///
    /// - `skip`: 0
    /// - `limit`: `default_limit`
    pub fn skip_limit(&self, default_limit: u32) -> (i64, i64) {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(default_limit);
        (i64::from(skip), i64::from(limit))
    }
}
