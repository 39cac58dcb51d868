//! Premium requests, validation, calculation and batch grids

mod request;
mod validation;
mod calculator;
pub mod batch;

pub use request::PremiumRequest;
pub use validation::{validate_inputs, ValidatedRequest, ValidationLimits};
pub use calculator::{
    calculate_premium, FailureKind, PremiumBreakdown, PremiumCalculator, PremiumResult,
};
pub use batch::{batch_calculate, parse_range, BatchCell, BatchReport};
