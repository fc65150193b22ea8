pub mod count_variants;
pub mod variant_summary;

pub use count_variants::{CountVariantsError, CountVariantsResponse, LocusQuery};
pub use variant_summary::{VariantSummaryError, VariantSummaryResponse};
