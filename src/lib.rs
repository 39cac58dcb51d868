//! Premium Estimator - rate lookup and premium estimation for education endowment products
//!
//! This library provides:
//! - Base and loading rate tables (built-in or loaded from CSV)
//! - Input validation for quote requests
//! - A total premium calculator returning a breakdown or a tagged failure
//! - Batch grids over entry-age and insurance-period ranges
//! - Currency and rate formatting for display

pub mod error;
pub mod rates;
pub mod premium;
pub mod format;

// Re-export commonly used types
pub use error::{PremiumError, RangeError, RateTableError, ValidationError};
pub use rates::{Gender, LoadingTable, RateSheet, RateTable, RateTables};
pub use premium::{
    calculate_premium, FailureKind, PremiumBreakdown, PremiumCalculator, PremiumRequest,
    PremiumResult, ValidationLimits,
};
pub use format::{format_currency, format_rate};
