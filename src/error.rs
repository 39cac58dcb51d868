//! Error types for rate tables, input validation and premium calculation

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a premium request is rejected before any rate is looked up.
///
/// The `Display` text is the message shown to the person filling in the
/// quote, so each variant names the field and its accepted range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please select a product")]
    UnknownProduct { product_id: String },

    #[error("Please select a valid gender (M or F)")]
    InvalidGender { gender: String },

    #[error("Entry age must be between {min} and {max}")]
    EntryAgeOutOfRange { age: i32, min: i32, max: i32 },

    #[error("Insurance period must be between {min} and {max} years")]
    InsurancePeriodOutOfRange { period: i32, min: i32, max: i32 },

    #[error("Insured amount must be greater than 0 and at most {max}")]
    InsuredAmountOutOfRange { amount: f64, max: f64 },
}

/// Failure taxonomy of the premium calculator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PremiumError {
    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    #[error("No rate found for the specified conditions")]
    RateNotFound {
        product_id: String,
        gender: String,
        age_key: u8,
    },

    #[error("An error occurred during calculation: {0}")]
    ComputationFault(String),
}

/// Errors raised while building or loading rate tables
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Rate {rate} for product {product_id} is outside [0, 1)")]
    RateOutOfRange { product_id: String, rate: f64 },

    #[error("Unknown gender code '{0}' (expected M or F)")]
    UnknownGender(String),

    #[error("Age key {age_key} for product {product_id} exceeds the maximum age key {max}")]
    AgeKeyOutOfRange { product_id: String, age_key: u8, max: u8 },

    #[error("Loading rate given for product {0} which has no base rates")]
    OrphanLoadingRate(String),

    #[error("Product id must not be empty")]
    EmptyProductId,

    #[error("Duplicate rate for product {product_id}, gender {gender}, age key {age_key}")]
    DuplicateRate {
        product_id: String,
        gender: String,
        age_key: u8,
    },

    #[error("Product {0} is listed more than once")]
    DuplicateProduct(String),

    #[error("No base rates found in {0}")]
    EmptyRateTable(PathBuf),
}

/// Errors parsing a batch range such as `0-5`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Range '{0}' must be in the form number-number")]
    Malformed(String),

    #[error("Range start {start} is greater than end {end}")]
    Inverted { start: i32, end: i32 },

    #[error("Range value {value} is outside {min}..={max}")]
    OutOfBounds { value: i32, min: i32, max: i32 },
}
