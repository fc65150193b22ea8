//! Count variants query
//!
//! Number of stored variant records at one chromosome/position, across all
//! ingested files.

use serde::{Deserialize, Serialize};
use vcfdb_common::{Locus, VcfdbError};

use crate::db::{DbError, VariantStore};
use crate::error::AppError;

/// Raw `chr`/`pos` query parameters. Kept as strings so that validation
/// errors come from us rather than from the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocusQuery {
    pub chr: Option<String>,
    pub pos: Option<String>,
}

impl LocusQuery {
    pub fn validate(&self) -> Result<Locus, VcfdbError> {
        Locus::from_params(self.chr.as_deref(), self.pos.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountVariantsResponse {
    pub chr: String,
    pub pos: i64,
    pub count: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum CountVariantsError {
    #[error("{0}")]
    Validation(#[from] VcfdbError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<CountVariantsError> for AppError {
    fn from(err: CountVariantsError) -> Self {
        match err {
            CountVariantsError::Validation(e) => e.into(),
            CountVariantsError::Database(e) => e.into(),
        }
    }
}

pub async fn handle(
    store: &VariantStore,
    query: LocusQuery,
) -> Result<CountVariantsResponse, CountVariantsError> {
    let locus = query.validate()?;
    let count = store.query_by_position(&locus).await?;

    Ok(CountVariantsResponse {
        chr: locus.chromosome,
        pos: locus.position,
        count,
    })
}
