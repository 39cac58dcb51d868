//! Flattened view of one product's rates

use super::{Gender, RateTables};
use serde::Serialize;

/// One (gender, age key) entry of a rate sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSheetRow {
    pub gender: Gender,
    pub age_key: u8,
    pub base_rate: f64,
    /// Base rate plus the product's loading
    pub total_rate: f64,
}

/// All rates of a product, ordered by gender (M, F) then age key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSheet {
    pub product_id: String,
    pub product_name: Option<String>,
    pub loading_rate: f64,
    pub rows: Vec<RateSheetRow>,
}

impl RateSheet {
    pub(super) fn build(tables: &RateTables, product_id: &str) -> Option<Self> {
        if !tables.contains_product(product_id) {
            return None;
        }

        let loading_rate = tables.loading_rate(product_id);
        let mut rows = Vec::new();

        for gender in [Gender::Male, Gender::Female] {
            let Some(rates) = tables.base().age_rates(product_id, gender) else {
                continue;
            };
            for (age_key, rate) in rates.iter().enumerate() {
                if let Some(base_rate) = *rate {
                    rows.push(RateSheetRow {
                        gender,
                        age_key: age_key as u8,
                        base_rate,
                        total_rate: base_rate + loading_rate,
                    });
                }
            }
        }

        Some(Self {
            product_id: product_id.to_string(),
            product_name: tables.product_name(product_id).map(str::to_string),
            loading_rate,
            rows,
        })
    }
}
