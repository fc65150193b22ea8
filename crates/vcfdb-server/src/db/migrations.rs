//! In-process schema versioning
//!
//! Migrations are compiled in and applied in ascending version order. Each one
//! runs in its own transaction and is recorded in `schema_migrations` once it
//! commits, so a second run is a no-op. The statements themselves are written
//! with `IF NOT EXISTS` so that re-applying one against a database that already
//! has the objects is harmless.

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{DbError, DbResult};

/// A single schema step
#[derive(Debug)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

const CREATE_BOOKKEEPING: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
)
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_files_and_records",
        statements: &[
            r#"
            CREATE TABLE IF NOT EXISTS files (
                file_id TEXT PRIMARY KEY NOT NULL,
                file_name TEXT NOT NULL UNIQUE,
                version TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS records (
                record_id INTEGER PRIMARY KEY AUTOINCREMENT,
                chromosome TEXT NOT NULL,
                position INTEGER NOT NULL,
                reference_allele TEXT NOT NULL,
                alternate_allele TEXT NOT NULL,
                genotype_field TEXT,
                file_id TEXT NOT NULL REFERENCES files(file_id) ON DELETE CASCADE
            )
            "#,
        ],
    },
    Migration {
        version: 2,
        name: "index_records_lookup",
        statements: &[
            "CREATE INDEX IF NOT EXISTS idx_records_locus ON records(chromosome, position)",
            "CREATE INDEX IF NOT EXISTS idx_records_file_id ON records(file_id)",
        ],
    },
];

/// Highest version in the compiled migration list
pub const LATEST_SCHEMA_VERSION: i64 = 2;

/// Apply every pending migration. Returns the schema version afterwards.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<i64> {
    sqlx::query(CREATE_BOOKKEEPING).execute(pool).await?;

    let current = current_schema_version(pool).await?.unwrap_or(0);
    if current > LATEST_SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "database schema version {current} is newer than supported {LATEST_SCHEMA_VERSION}"
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let mut tx = pool.begin().await?;

        for statement in migration.statements {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(version = migration.version, name = migration.name, "Applied schema migration");
    }

    let version = current_schema_version(pool).await?.unwrap_or(0);
    debug!(version, "Schema is up to date");
    Ok(version)
}

/// Latest applied schema version, or `None` on a database that has never
/// been migrated.
pub async fn current_schema_version(pool: &SqlitePool) -> DbResult<Option<i64>> {
    let has_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if has_table == 0 {
        return Ok(None);
    }

    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;

    Ok(version)
}
