//! In-memory reference catalog.
//!
//! Snapshot of the advertiser, supplier-config and enrichment-dataset
//! stores, loadable from TOML. Soft-deleted entries are kept in the
//! snapshot but never resolve. A supplier config's `active` flag does not
//! affect resolution.
//!
//! # Examples
//!
//! ```toml
//! [[advertisers]]
//! id = "planet_art_demo"
//!
//! [[advertisers.regions]]
//! id = "US"
//! countries = ["us"]
//!
//! [[supplier_configs]]
//! id = "appsflyer-1"
//! connector_type = "appsflyer"
//!
//! [[enrichment_datasets]]
//! id = "s3_data_import"
//! name = "Cost And Attribution"
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ConsolidationError, ConsolidationResult};
use crate::resolver::{ReferenceResolver, ResolutionContext};

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;

/// Snapshot of the external catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    #[serde(default)]
    pub advertisers: Vec<AdvertiserEntry>,

    #[serde(default)]
    pub supplier_configs: Vec<SupplierConfigEntry>,

    #[serde(default)]
    pub enrichment_datasets: Vec<EnrichmentDatasetEntry>,
}

/// An advertiser and the regions it operates in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertiserEntry {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub deleted: bool,

    #[serde(default)]
    pub regions: Vec<RegionEntry>,
}

/// A region of an advertiser, grouping a set of countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Lower-case ISO country codes.
    #[serde(default)]
    pub countries: Vec<String>,

    #[serde(default)]
    pub rest_of_world: bool,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub deleted: bool,
}

/// Kind of raw-event source behind a supplier config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    Appsflyer,
    S3,
    Supermetrics,
    Singular,
    Branch,
    Gcs,
}

/// A data supplier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierConfigEntry {
    pub id: String,

    pub connector_type: ConnectorType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_name: Option<String>,

    /// Owning advertiser. Configs without an owner are shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertiser: Option<String>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub deleted: bool,
}

/// An enrichment dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentDatasetEntry {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ReferenceCatalog {
    /// Parse a catalog from TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::Serialization` if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> ConsolidationResult<Self> {
        toml::from_str(content).map_err(|e| ConsolidationError::Serialization {
            reason: e.to_string(),
        })
    }

    /// The advertiser with the given id, if it is active and not deleted.
    pub fn advertiser(&self, id: &str) -> Option<&AdvertiserEntry> {
        self.advertisers
            .iter()
            .find(|a| a.id == id && a.active && !a.deleted)
    }

    /// The supplier config with the given id, unless it is soft-deleted.
    pub fn supplier_config(&self, id: &str) -> Option<&SupplierConfigEntry> {
        self.supplier_configs
            .iter()
            .find(|s| s.id == id && !s.deleted)
    }
}

impl ReferenceResolver for ReferenceCatalog {
    fn resolve_region(&self, context: &ResolutionContext, region_ref: &str) -> bool {
        let found = self.advertiser(context.advertiser()).is_some_and(|advertiser| {
            advertiser
                .regions
                .iter()
                .any(|r| r.id == region_ref && r.active && !r.deleted)
        });
        debug!(advertiser = context.advertiser(), region_ref, found, "Resolved region");
        found
    }

    fn resolve_supplier_config(
        &self,
        context: &ResolutionContext,
        supplier_config_ref: &str,
    ) -> bool {
        let found = self.supplier_config(supplier_config_ref).is_some_and(|s| {
            s.advertiser
                .as_deref()
                .map_or(true, |owner| owner == context.advertiser())
        });
        debug!(
            advertiser = context.advertiser(),
            supplier_config_ref, found, "Resolved supplier config"
        );
        found
    }

    fn resolve_enrichment_dataset(&self, _context: &ResolutionContext, dataset_ref: &str) -> bool {
        self.enrichment_datasets.iter().any(|d| d.id == dataset_ref)
    }
}
