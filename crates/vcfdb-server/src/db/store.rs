//! File registry and variant record storage
//!
//! [`VariantStore`] is the only component that touches the `files` and
//! `records` tables. Writes that belong to one source file go through a single
//! transaction so a failed file leaves no partial rows behind.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use tracing::debug;
use vcfdb_common::{GenotypeClass, Locus};

use super::{DbError, DbResult};

/// Rows per multi-row INSERT. Six binds per row keeps each statement well
/// under SQLite's bound-parameter limit.
const INSERT_CHUNK_SIZE: usize = 1_000;

/// One ingested source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRecord {
    pub file_id: String,
    pub file_name: String,
    pub version: Option<String>,
}

/// One stored variant row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantRecord {
    pub record_id: i64,
    pub chromosome: String,
    pub position: i64,
    pub reference_allele: String,
    pub alternate_allele: String,
    pub genotype_field: Option<String>,
    pub file_id: String,
}

/// Variant values as parsed from a source file, before they have an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRow {
    pub chromosome: String,
    pub position: i64,
    pub reference_allele: String,
    pub alternate_allele: String,
    pub genotype_field: Option<String>,
}

/// Occurrence counts at one locus, split by genotype
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeBreakdown {
    pub heterozygous: i64,
    pub homozygous: i64,
    pub other: i64,
    pub total: i64,
}

impl GenotypeBreakdown {
    fn add(&mut self, class: GenotypeClass, count: i64) {
        match class {
            GenotypeClass::Heterozygous => self.heterozygous += count,
            GenotypeClass::Homozygous => self.homozygous += count,
            GenotypeClass::Other => self.other += count,
        }
        self.total += count;
    }
}

/// Storage handle over a SQLite pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct VariantStore {
    pool: SqlitePool,
}

impl VariantStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Existence check by identifier
    pub async fn exists(&self, file_id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM files WHERE file_id = ?1")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn get(&self, file_id: &str) -> DbResult<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            "SELECT file_id, file_name, version FROM files WHERE file_id = ?1",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Register a new file and write its variants in one transaction.
    ///
    /// Returns the number of variant rows written. Nothing is committed when
    /// this errors, including when fewer rows were written than supplied.
    pub async fn bulk_insert(&self, file: &FileRecord, rows: &[VariantRow]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO files (file_id, file_name, version) VALUES (?1, ?2, ?3)")
            .bind(&file.file_id)
            .bind(&file.file_name)
            .bind(&file.version)
            .execute(&mut *tx)
            .await?;

        let mut written = 0;
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO records (chromosome, position, reference_allele, \
                 alternate_allele, genotype_field, file_id) ",
            );

            query_builder.push_values(chunk, |mut b, row| {
                b.push_bind(&row.chromosome)
                    .push_bind(row.position)
                    .push_bind(&row.reference_allele)
                    .push_bind(&row.alternate_allele)
                    .push_bind(&row.genotype_field)
                    .push_bind(&file.file_id);
            });

            written += query_builder.build().execute(&mut *tx).await?.rows_affected();
        }

        ensure_written(rows.len(), written)?;
        tx.commit().await?;

        debug!(file_id = %file.file_id, rows = written, "Inserted file and variant records");
        Ok(written)
    }

    /// Overwrite a file's existing variants in place and update its version.
    ///
    /// `pairs` couples an existing `record_id` with the freshly parsed values
    /// for it; see [`VariantStore::record_ids`] for how ids are ordered.
    /// Returns the number of variant rows updated.
    pub async fn bulk_update(
        &self,
        file_id: &str,
        version: &str,
        pairs: &[(i64, VariantRow)],
    ) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;

        let mut updated = 0;
        for (record_id, row) in pairs {
            updated += update_record(&mut tx, file_id, *record_id, row).await?;
        }
        ensure_written(pairs.len(), updated)?;

        sqlx::query("UPDATE files SET version = ?1 WHERE file_id = ?2")
            .bind(version)
            .bind(file_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(file_id, version, rows = updated, "Updated variant records in place");
        Ok(updated)
    }

    /// Identifiers of a file's variants in their original insertion order
    pub async fn record_ids(&self, file_id: &str) -> DbResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            "SELECT record_id FROM records WHERE file_id = ?1 ORDER BY record_id",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    pub async fn variant_count(&self, file_id: &str) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE file_id = ?1")
            .bind(file_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of stored variants at a locus, across all files
    pub async fn query_by_position(&self, locus: &Locus) -> DbResult<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM records WHERE chromosome = ?1 AND position = ?2",
        )
        .bind(&locus.chromosome)
        .bind(locus.position)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn query_genotype_breakdown(&self, locus: &Locus) -> DbResult<GenotypeBreakdown> {
        let groups: Vec<(Option<String>, i64)> = sqlx::query_as(
            r#"
            SELECT genotype_field, COUNT(*)
            FROM records
            WHERE chromosome = ?1 AND position = ?2
            GROUP BY genotype_field
            "#,
        )
        .bind(&locus.chromosome)
        .bind(locus.position)
        .fetch_all(&self.pool)
        .await?;

        let mut breakdown = GenotypeBreakdown::default();
        for (genotype_field, count) in groups {
            breakdown.add(GenotypeClass::classify(genotype_field.as_deref()), count);
        }
        Ok(breakdown)
    }

    /// Every stored variant at a locus, oldest first
    pub async fn variants_at(&self, locus: &Locus) -> DbResult<Vec<VariantRecord>> {
        let records = sqlx::query_as::<_, VariantRecord>(
            r#"
            SELECT record_id, chromosome, position, reference_allele, alternate_allele,
                   genotype_field, file_id
            FROM records
            WHERE chromosome = ?1 AND position = ?2
            ORDER BY record_id
            "#,
        )
        .bind(&locus.chromosome)
        .bind(locus.position)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Number of registered source files
    pub async fn distinct_file_count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn ensure_written(expected: usize, written: u64) -> DbResult<()> {
    let expected = expected as u64;
    if written < expected || written == 0 {
        return Err(DbError::ShortWrite { expected, written });
    }
    Ok(())
}

async fn update_record(
    tx: &mut Transaction<'_, Sqlite>,
    file_id: &str,
    record_id: i64,
    row: &VariantRow,
) -> DbResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE records
        SET chromosome = ?1, position = ?2, reference_allele = ?3,
            alternate_allele = ?4, genotype_field = ?5
        WHERE record_id = ?6 AND file_id = ?7
        "#,
    )
    .bind(&row.chromosome)
    .bind(row.position)
    .bind(&row.reference_allele)
    .bind(&row.alternate_allele)
    .bind(&row.genotype_field)
    .bind(record_id)
    .bind(file_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}
