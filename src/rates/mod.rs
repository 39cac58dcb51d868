//! Rate tables: base rates by product/gender/age and per-product loadings

mod table;
mod loading;
mod sheet;
pub mod loader;

pub use table::{age_key, AgeRates, Gender, RateTable, AGE_KEY_COUNT, MAX_AGE_KEY};
pub use loading::{LoadingTable, DEFAULT_LOADING_RATE};
pub use sheet::{RateSheet, RateSheetRow};
pub use loader::LoadedRates;

use crate::error::RateTableError;
use std::collections::BTreeMap;
use std::path::Path;

/// Container for every table the calculator reads.
///
/// Built once at startup and shared by reference; nothing mutates it after
/// construction.
#[derive(Debug, Clone)]
pub struct RateTables {
    base: RateTable,
    loading: LoadingTable,
    product_names: BTreeMap<String, String>,
}

impl RateTables {
    /// Built-in education endowment tables
    pub fn default_pricing() -> Self {
        let product_names = [
            ("1", "Education Endowment Plan A"),
            ("2", "Education Endowment Plan B"),
        ]
        .into_iter()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect();

        Self {
            base: RateTable::builtin(),
            loading: LoadingTable::builtin(),
            product_names,
        }
    }

    /// Load tables from CSV files in the default location (data/rates/)
    pub fn from_csv() -> Result<Self, RateTableError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_RATES_PATH))
    }

    /// Load tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, RateTableError> {
        Ok(Self::from_loaded(LoadedRates::load_from(path)?))
    }

    pub fn from_loaded(loaded: LoadedRates) -> Self {
        Self {
            base: loaded.base_rates,
            loading: loaded.loading_rates,
            product_names: loaded.product_names,
        }
    }

    /// Assemble tables built in code. Loadings for products without base
    /// rates are refused.
    pub fn new(base: RateTable, loading: LoadingTable) -> Result<Self, RateTableError> {
        if let Some(orphan) = loading.product_ids().find(|id| !base.contains_product(id)) {
            return Err(RateTableError::OrphanLoadingRate(orphan.to_string()));
        }
        Ok(Self {
            base,
            loading,
            product_names: BTreeMap::new(),
        })
    }

    pub fn with_product_name(mut self, product_id: &str, name: &str) -> Self {
        self.product_names
            .insert(product_id.to_string(), name.to_string());
        self
    }

    pub fn base(&self) -> &RateTable {
        &self.base
    }

    pub fn loading(&self) -> &LoadingTable {
        &self.loading
    }

    pub fn contains_product(&self, product_id: &str) -> bool {
        self.base.contains_product(product_id)
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.base.product_ids()
    }

    pub fn product_name(&self, product_id: &str) -> Option<&str> {
        self.product_names.get(product_id).map(String::as_str)
    }

    /// Base rate for an entry age, clamped to the highest age key
    pub fn base_rate(&self, product_id: &str, gender: Gender, entry_age: i32) -> Option<f64> {
        self.base.rate(product_id, gender, age_key(entry_age))
    }

    /// Loading rate for a product, with the default fallback
    pub fn loading_rate(&self, product_id: &str) -> f64 {
        self.loading.rate(product_id)
    }

    /// Every rate of one product laid out for display
    pub fn rate_sheet(&self, product_id: &str) -> Option<RateSheet> {
        RateSheet::build(self, product_id)
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::default_pricing()
    }
}
