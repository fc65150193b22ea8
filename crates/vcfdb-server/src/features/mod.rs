//! Feature modules implementing the vcfdb HTTP API
//!
//! Each feature is a vertical slice with its own queries and routes:
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//!
//! # Features
//!
//! - **variants**: occurrence counts and genotype breakdowns at a locus

pub mod variants;

use axum::Router;

use crate::config::AuthConfig;
use crate::db::VariantStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub store: VariantStore,
}

/// Creates the router with all feature routes mounted at the root.
///
/// The authenticated `/variant` route is only mounted when an API key is
/// configured.
pub fn router(state: FeatureState, auth: &AuthConfig) -> Router<()> {
    let mut router = variants::public_routes();

    if let Some(key) = auth.api_key.as_deref() {
        router = router.merge(variants::protected_routes(key));
    }

    router.with_state(state.store)
}
