use serde::Deserialize;

// Create/update bodies deserialize directly into the catalog input types
// (`ProductDraft`, `ProductPatch`); only route-local parameters live here.

/// Query parameters for the recommended-products route.
#[derive(Debug, Deserialize)]
pub struct RecommendedQuery {
    pub count: Option<usize>,
}
