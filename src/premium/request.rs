//! Premium request as supplied by the quote form

use serde::{Deserialize, Serialize};

/// The five raw inputs of a quote.
///
/// Numeric fields are already parsed; gender and product stay as the
/// submitted strings so that validation can reject bad codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumRequest {
    pub product_id: String,

    /// "M" or "F"
    pub gender: String,

    pub entry_age: i32,

    /// Validated but not used in the rate lookup
    pub insurance_period: i32,

    pub insured_amount: f64,
}

impl PremiumRequest {
    pub fn new(
        product_id: impl Into<String>,
        gender: impl Into<String>,
        entry_age: i32,
        insurance_period: i32,
        insured_amount: f64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            gender: gender.into(),
            entry_age,
            insurance_period,
            insured_amount,
        }
    }
}
