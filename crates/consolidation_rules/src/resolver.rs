//! Reference resolution against externally owned catalogs.
//!
//! Region, supplier-config and enrichment-dataset ids are opaque strings.
//! Whether they exist is answered by a [`ReferenceResolver`], always in the
//! scope of an explicit [`ResolutionContext`] rather than any global
//! "selected advertiser" state.

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Request-scoped context for reference resolution.
///
/// # Examples
///
/// ```
/// use consolidation_rules::ResolutionContext;
///
/// let context = ResolutionContext::new("planet_art_demo");
/// assert_eq!(context.advertiser(), "planet_art_demo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionContext {
    advertiser: String,
}

impl ResolutionContext {
    /// Create a context for the given advertiser.
    pub fn new(advertiser: impl Into<String>) -> Self {
        Self {
            advertiser: advertiser.into(),
        }
    }

    /// The advertiser on whose behalf references are resolved.
    pub fn advertiser(&self) -> &str {
        &self.advertiser
    }
}

/// Answers whether an id exists in the relevant external catalog.
///
/// Implementations are backed by the advertiser, supplier-config and
/// dataset stores. Resolution is a yes/no question: lookups that fail for
/// infrastructure reasons should answer `false` and log the cause.
pub trait ReferenceResolver: Send + Sync {
    /// Returns true if the region belongs to the context's advertiser.
    fn resolve_region(&self, context: &ResolutionContext, region_ref: &str) -> bool;

    /// Returns true if the supplier config exists and is not deleted.
    fn resolve_supplier_config(&self, context: &ResolutionContext, supplier_config_ref: &str)
        -> bool;

    /// Returns true if the enrichment dataset exists.
    fn resolve_enrichment_dataset(&self, context: &ResolutionContext, dataset_ref: &str) -> bool;
}

/// Resolver that accepts every reference.
///
/// Useful when only the structural checks of validation are wanted, for
/// example when no catalog is available to an offline tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveResolver;

impl ReferenceResolver for PermissiveResolver {
    fn resolve_region(&self, _context: &ResolutionContext, _region_ref: &str) -> bool {
        true
    }

    fn resolve_supplier_config(
        &self,
        _context: &ResolutionContext,
        _supplier_config_ref: &str,
    ) -> bool {
        true
    }

    fn resolve_enrichment_dataset(&self, _context: &ResolutionContext, _dataset_ref: &str) -> bool {
        true
    }
}
