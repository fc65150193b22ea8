//! Variant summary query
//!
//! Occurrence count at a locus split by genotype, together with the number of
//! files ingested so far.

use serde::{Deserialize, Serialize};
use vcfdb_common::VcfdbError;

use super::count_variants::LocusQuery;
use crate::db::{DbError, VariantStore};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSummaryResponse {
    pub chr: String,
    pub pos: i64,
    pub count: i64,
    pub distinct_files: i64,
    /// Records whose genotype is exactly `0/1`
    pub heterozygous: i64,
    /// Records whose genotype is exactly `1/1`
    pub homozygous: i64,
    pub other_genotypes: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum VariantSummaryError {
    #[error("{0}")]
    Validation(#[from] VcfdbError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<VariantSummaryError> for AppError {
    fn from(err: VariantSummaryError) -> Self {
        match err {
            VariantSummaryError::Validation(e) => e.into(),
            VariantSummaryError::Database(e) => e.into(),
        }
    }
}

pub async fn handle(
    store: &VariantStore,
    query: LocusQuery,
) -> Result<VariantSummaryResponse, VariantSummaryError> {
    let locus = query.validate()?;
    let breakdown = store.query_genotype_breakdown(&locus).await?;
    let distinct_files = store.distinct_file_count().await?;

    Ok(VariantSummaryResponse {
        chr: locus.chromosome,
        pos: locus.position,
        count: breakdown.total,
        distinct_files,
        heterozygous: breakdown.heterozygous,
        homozygous: breakdown.homozygous,
        other_genotypes: breakdown.other,
    })
}
