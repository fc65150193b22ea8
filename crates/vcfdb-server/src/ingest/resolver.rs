//! Identity and version resolution
//!
//! Decides what the engine should do with a file from its id alone, before
//! any rows are read.

use tracing::debug;

use super::models::FileState;
use crate::db::{DbResult, VariantStore, LATEST_SCHEMA_VERSION};

/// Look up `file_id` and compare its stored version with `active_version`
pub async fn resolve(
    store: &VariantStore,
    file_id: &str,
    active_version: &str,
) -> DbResult<FileState> {
    let existing = store.get(file_id).await?;
    let state = FileState::classify(existing.as_ref(), active_version);
    debug!(file_id, active_version, ?state, "Resolved file state");
    Ok(state)
}

/// Version tag derived from a schema version
pub fn schema_version_tag(schema_version: i64) -> String {
    format!("schema-v{schema_version}")
}

/// The version tag stamped on files written by this process: the explicit
/// override when one is configured, otherwise the applied schema version.
///
/// A database that was never migrated falls back to the compiled schema
/// version, which is what it will have once migrations run.
pub async fn resolve_ingest_version(
    store: &VariantStore,
    override_version: Option<&str>,
) -> DbResult<String> {
    if let Some(version) = override_version {
        return Ok(version.to_string());
    }

    let schema = crate::db::current_schema_version(store.pool())
        .await?
        .unwrap_or(LATEST_SCHEMA_VERSION);
    Ok(schema_version_tag(schema))
}
