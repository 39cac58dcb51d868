//! Per-product loading (surcharge) rates

use super::table::check_rate;
use crate::error::RateTableError;
use std::collections::BTreeMap;

/// Loading rate applied to products with no explicit entry
pub const DEFAULT_LOADING_RATE: f64 = 0.0001;

/// Loading rates by product id with a fallback for unlisted products
#[derive(Debug, Clone)]
pub struct LoadingTable {
    rates: BTreeMap<String, f64>,
    fallback: f64,
}

impl Default for LoadingTable {
    fn default() -> Self {
        Self {
            rates: BTreeMap::new(),
            fallback: DEFAULT_LOADING_RATE,
        }
    }
}

impl LoadingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in loadings: Plan A 0.01%, Plan B 0.008%
    pub fn builtin() -> Self {
        let rates = [("1", 0.0001), ("2", 0.00008)]
            .into_iter()
            .map(|(id, rate)| (id.to_string(), rate))
            .collect();

        Self {
            rates,
            fallback: DEFAULT_LOADING_RATE,
        }
    }

    pub fn insert(&mut self, product_id: &str, rate: f64) -> Result<(), RateTableError> {
        if product_id.is_empty() {
            return Err(RateTableError::EmptyProductId);
        }
        check_rate(product_id, rate)?;
        if self.rates.contains_key(product_id) {
            return Err(RateTableError::DuplicateProduct(product_id.to_string()));
        }
        self.rates.insert(product_id.to_string(), rate);
        Ok(())
    }

    /// Loading rate for a product, falling back to the default when unlisted
    pub fn rate(&self, product_id: &str) -> f64 {
        self.explicit(product_id).unwrap_or(self.fallback)
    }

    /// Loading rate only if the product is listed
    pub fn explicit(&self, product_id: &str) -> Option<f64> {
        self.rates.get(product_id).copied()
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub(crate) fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}
