//! Premium calculator: validate, resolve rates, multiply
//!
//! The calculator never panics and never returns a bare error to its
//! caller: `calculate` folds every failure into a `PremiumResult`.

use super::validation::{validate_inputs, ValidatedRequest, ValidationLimits};
use super::PremiumRequest;
use crate::error::{PremiumError, ValidationError};
use crate::rates::{age_key, Gender, RateTables};
use serde::Serialize;

/// Successful premium estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumBreakdown {
    /// insured_amount * total_rate
    pub annual_premium: f64,
    /// annual_premium / 12, unrounded
    pub monthly_premium: f64,
    pub base_rate: f64,
    pub loading_rate: f64,
    /// base_rate + loading_rate
    pub total_rate: f64,
    /// Echo of the requested amount
    pub insured_amount: f64,
}

/// Category of a failed estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    RateNotFound,
    ComputationFault,
}

/// Outcome of a premium calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PremiumResult {
    Success(PremiumBreakdown),
    Failure {
        #[serde(rename = "errorKind")]
        kind: FailureKind,
        #[serde(rename = "errorMessage")]
        message: String,
    },
}

impl PremiumResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PremiumResult::Success(_))
    }

    pub fn breakdown(&self) -> Option<&PremiumBreakdown> {
        match self {
            PremiumResult::Success(breakdown) => Some(breakdown),
            PremiumResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PremiumResult::Success(_) => None,
            PremiumResult::Failure { message, .. } => Some(message),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            PremiumResult::Success(_) => None,
            PremiumResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<PremiumBreakdown, PremiumError>> for PremiumResult {
    fn from(result: Result<PremiumBreakdown, PremiumError>) -> Self {
        match result {
            Ok(breakdown) => PremiumResult::Success(breakdown),
            Err(err) => {
                let kind = match err {
                    PremiumError::InvalidInput(_) => FailureKind::InvalidInput,
                    PremiumError::RateNotFound { .. } => FailureKind::RateNotFound,
                    PremiumError::ComputationFault(_) => FailureKind::ComputationFault,
                };
                PremiumResult::Failure {
                    kind,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Stateless premium calculator over borrowed rate tables
#[derive(Debug, Clone, Copy)]
pub struct PremiumCalculator<'a> {
    tables: &'a RateTables,
    limits: ValidationLimits,
}

impl<'a> PremiumCalculator<'a> {
    /// Calculator with the default validation limits
    pub fn new(tables: &'a RateTables) -> Self {
        Self::with_limits(tables, ValidationLimits::default())
    }

    pub fn with_limits(tables: &'a RateTables, limits: ValidationLimits) -> Self {
        Self { tables, limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Run only the input rules
    pub fn validate<'r>(
        &self,
        request: &'r PremiumRequest,
    ) -> Result<ValidatedRequest<'r>, ValidationError> {
        validate_inputs(self.tables, &self.limits, request)
    }

    /// Base rate for the clamped entry age, or `RateNotFound` when the
    /// product/gender/age combination has no entry
    pub fn resolve_base_rate(
        &self,
        product_id: &str,
        gender: Gender,
        entry_age: i32,
    ) -> Result<f64, PremiumError> {
        self.tables
            .base_rate(product_id, gender, entry_age)
            .ok_or_else(|| PremiumError::RateNotFound {
                product_id: product_id.to_string(),
                gender: gender.code().to_string(),
                age_key: age_key(entry_age),
            })
    }

    /// Loading rate for the product, with the default fallback
    pub fn resolve_loading_rate(&self, product_id: &str) -> f64 {
        self.tables.loading_rate(product_id)
    }

    /// Calculate, keeping the failure as a typed error
    pub fn try_calculate(&self, request: &PremiumRequest) -> Result<PremiumBreakdown, PremiumError> {
        let valid = self.validate(request)?;
        let base_rate = self.resolve_base_rate(valid.product_id, valid.gender, valid.entry_age)?;
        let loading_rate = self.resolve_loading_rate(valid.product_id);

        compute_breakdown(valid.insured_amount, base_rate, loading_rate)
    }

    /// Calculate and fold every failure into the result
    pub fn calculate(&self, request: &PremiumRequest) -> PremiumResult {
        let result = self.try_calculate(request);

        match &result {
            Err(PremiumError::ComputationFault(reason)) => {
                log::warn!("Premium calculation fault for {:?}: {}", request, reason);
            }
            Err(err) => {
                log::debug!("Premium request rejected: {}", err);
            }
            Ok(_) => {}
        }

        result.into()
    }
}

/// Calculate with default limits over the given tables
pub fn calculate_premium(tables: &RateTables, request: &PremiumRequest) -> PremiumResult {
    PremiumCalculator::new(tables).calculate(request)
}

fn compute_breakdown(
    insured_amount: f64,
    base_rate: f64,
    loading_rate: f64,
) -> Result<PremiumBreakdown, PremiumError> {
    let total_rate = base_rate + loading_rate;
    let annual_premium = insured_amount * total_rate;
    let monthly_premium = annual_premium / 12.0;

    if !annual_premium.is_finite() || !monthly_premium.is_finite() || !total_rate.is_finite() {
        return Err(PremiumError::ComputationFault(format!(
            "non-finite premium (amount {}, total rate {})",
            insured_amount, total_rate
        )));
    }

    Ok(PremiumBreakdown {
        annual_premium,
        monthly_premium,
        base_rate,
        loading_rate,
        total_rate,
        insured_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{LoadingTable, RateTable};
    use approx::assert_relative_eq;

    #[test]
    fn test_plan_a_male_age_2() {
        let tables = RateTables::default_pricing();
        let request = PremiumRequest::new("1", "M", 2, 10, 1_000_000.0);

        let result = calculate_premium(&tables, &request);
        let b = result.breakdown().expect("expected success");

        assert_eq!(b.base_rate, 0.0011);
        assert_eq!(b.loading_rate, 0.0001);
        assert_relative_eq!(b.total_rate, 0.0012, max_relative = 1e-12);
        assert_relative_eq!(b.annual_premium, 1200.0, max_relative = 1e-12);
        assert_relative_eq!(b.monthly_premium, 100.0, max_relative = 1e-12);
        assert_eq!(b.insured_amount, 1_000_000.0);
    }

    #[test]
    fn test_plan_b_female_age_5() {
        let tables = RateTables::default_pricing();
        let request = PremiumRequest::new("2", "F", 5, 20, 5_000_000.0);

        let result = calculate_premium(&tables, &request);
        let b = result.breakdown().expect("expected success");

        assert_eq!(b.base_rate, 0.00065);
        assert_eq!(b.loading_rate, 0.00008);
        assert_relative_eq!(b.total_rate, 0.00073, max_relative = 1e-12);
        assert_relative_eq!(b.annual_premium, 3650.0, max_relative = 1e-12);
        assert_relative_eq!(b.monthly_premium, 304.1666666666667, max_relative = 1e-12);
    }

    #[test]
    fn test_monthly_is_annual_over_twelve() {
        let tables = RateTables::default_pricing();
        let calculator = PremiumCalculator::new(&tables);
        let request = PremiumRequest::new("1", "F", 3, 15, 2_345_678.0);

        let b = calculator.try_calculate(&request).unwrap();
        assert_eq!(b.monthly_premium, b.annual_premium / 12.0);
        assert_eq!(b.total_rate, b.base_rate + b.loading_rate);
        assert_eq!(b.annual_premium, 2_345_678.0 * b.total_rate);
    }

    #[test]
    fn test_unknown_product_is_invalid_input() {
        let tables = RateTables::default_pricing();
        let result = calculate_premium(&tables, &PremiumRequest::new("3", "M", 2, 10, 1e6));

        assert_eq!(result.failure_kind(), Some(FailureKind::InvalidInput));
        assert_eq!(result.error_message(), Some("Please select a product"));
    }

    #[test]
    fn test_zero_amount_is_invalid_input() {
        let tables = RateTables::default_pricing();
        let result = calculate_premium(&tables, &PremiumRequest::new("1", "M", 2, 10, 0.0));

        assert_eq!(result.failure_kind(), Some(FailureKind::InvalidInput));
        assert!(result.error_message().unwrap().contains("Insured amount"));
    }

    #[test]
    fn test_out_of_range_inputs_are_invalid() {
        let tables = RateTables::default_pricing();
        let calculator = PremiumCalculator::new(&tables);

        let requests = [
            PremiumRequest::new("1", "X", 2, 10, 1e6),
            PremiumRequest::new("1", "M", 101, 10, 1e6),
            PremiumRequest::new("1", "M", -1, 10, 1e6),
            PremiumRequest::new("1", "M", 2, 0, 1e6),
            PremiumRequest::new("1", "M", 2, 51, 1e6),
            PremiumRequest::new("1", "M", 2, 10, 1e9 + 1.0),
            PremiumRequest::new("1", "M", 2, 10, f64::NAN),
        ];

        for request in &requests {
            assert_eq!(
                calculator.calculate(request).failure_kind(),
                Some(FailureKind::InvalidInput),
                "expected rejection of {:?}",
                request
            );
        }
    }

    #[test]
    fn test_ages_from_five_use_age_five_rate() {
        let tables = RateTables::default_pricing();
        let calculator = PremiumCalculator::new(&tables);

        for (product, gender) in [("1", "M"), ("1", "F"), ("2", "M"), ("2", "F")] {
            let age_5 = tables
                .base()
                .rate(product, Gender::from_code(gender).unwrap(), 5)
                .unwrap();
            for age in 5..=100 {
                let request = PremiumRequest::new(product, gender, age, 10, 1e6);
                let b = calculator.try_calculate(&request).unwrap();
                assert_eq!(b.base_rate, age_5);
            }
        }
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let tables = RateTables::default_pricing();
        let calculator = PremiumCalculator::new(&tables);
        let request = PremiumRequest::new("2", "M", 4, 30, 7_500_000.0);

        assert_eq!(calculator.calculate(&request), calculator.calculate(&request));

        let bad = PremiumRequest::new("2", "M", 4, 30, -1.0);
        assert_eq!(calculator.calculate(&bad), calculator.calculate(&bad));
    }

    #[test]
    fn test_missing_gender_table_is_rate_not_found() {
        let mut base = RateTable::new();
        base.insert("7", Gender::Male, 0, 0.002).unwrap();
        let tables = RateTables::new(base, LoadingTable::new()).unwrap();

        let result = calculate_premium(&tables, &PremiumRequest::new("7", "F", 0, 10, 1e6));
        assert_eq!(result.failure_kind(), Some(FailureKind::RateNotFound));
        assert_eq!(
            result.error_message(),
            Some("No rate found for the specified conditions")
        );
    }

    #[test]
    fn test_missing_age_key_is_rate_not_found() {
        let mut base = RateTable::new();
        base.insert("7", Gender::Male, 0, 0.002).unwrap();
        let tables = RateTables::new(base, LoadingTable::new()).unwrap();
        let calculator = PremiumCalculator::new(&tables);

        let err = calculator
            .try_calculate(&PremiumRequest::new("7", "M", 40, 10, 1e6))
            .unwrap_err();
        assert_eq!(
            err,
            PremiumError::RateNotFound {
                product_id: "7".to_string(),
                gender: "M".to_string(),
                age_key: 5,
            }
        );
    }

    #[test]
    fn test_product_without_loading_uses_default() {
        let mut base = RateTable::new();
        base.insert("7", Gender::Female, 1, 0.002).unwrap();
        let tables = RateTables::new(base, LoadingTable::new()).unwrap();

        let result = calculate_premium(&tables, &PremiumRequest::new("7", "F", 1, 10, 1e6));
        let b = result.breakdown().unwrap();
        assert_eq!(b.loading_rate, crate::rates::DEFAULT_LOADING_RATE);
        assert_relative_eq!(b.annual_premium, 2100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_non_finite_result_is_computation_fault() {
        let err = compute_breakdown(f64::INFINITY, 0.001, 0.0001).unwrap_err();
        assert!(matches!(err, PremiumError::ComputationFault(_)));

        let result: PremiumResult = Err(err).into();
        assert_eq!(result.failure_kind(), Some(FailureKind::ComputationFault));
        assert!(result
            .error_message()
            .unwrap()
            .starts_with("An error occurred during calculation"));
    }

    #[test]
    fn test_result_serialization() {
        let tables = RateTables::default_pricing();

        let ok = calculate_premium(&tables, &PremiumRequest::new("1", "M", 2, 10, 1e6));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["baseRate"], 0.0011);
        assert_eq!(json["insuredAmount"], 1e6);

        let failed = calculate_premium(&tables, &PremiumRequest::new("3", "M", 2, 10, 1e6));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["errorKind"], "invalid_input");
        assert_eq!(json["errorMessage"], "Please select a product");
        assert!(json.get("kind").is_none());
    }
}
