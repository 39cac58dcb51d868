//! Input validation for premium requests
//!
//! Rules are checked in order and the first failure wins:
//! product, gender, entry age, insurance period, insured amount.

use super::PremiumRequest;
use crate::error::ValidationError;
use crate::rates::{Gender, RateTables};
use std::ops::RangeInclusive;

/// Accepted ranges for the numeric inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationLimits {
    pub min_entry_age: i32,
    pub max_entry_age: i32,
    pub min_insurance_period: i32,
    pub max_insurance_period: i32,
    /// Upper bound (inclusive) on the insured amount; the lower bound is
    /// always exclusive zero
    pub max_insured_amount: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_entry_age: 0,
            max_entry_age: 100,
            min_insurance_period: 1,
            max_insurance_period: 50,
            max_insured_amount: 1_000_000_000.0,
        }
    }
}

impl ValidationLimits {
    pub fn entry_ages(&self) -> RangeInclusive<i32> {
        self.min_entry_age..=self.max_entry_age
    }

    pub fn insurance_periods(&self) -> RangeInclusive<i32> {
        self.min_insurance_period..=self.max_insurance_period
    }

    /// NaN fails both comparisons and is rejected
    pub fn accepts_amount(&self, amount: f64) -> bool {
        amount > 0.0 && amount <= self.max_insured_amount
    }
}

/// A request that passed every rule, with gender decoded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest<'a> {
    pub product_id: &'a str,
    pub gender: Gender,
    pub entry_age: i32,
    pub insurance_period: i32,
    pub insured_amount: f64,
}

/// Validate a request against the tables and limits
pub fn validate_inputs<'a>(
    tables: &RateTables,
    limits: &ValidationLimits,
    request: &'a PremiumRequest,
) -> Result<ValidatedRequest<'a>, ValidationError> {
    let product_id = request.product_id.as_str();
    if product_id.is_empty() || !tables.contains_product(product_id) {
        return Err(ValidationError::UnknownProduct {
            product_id: request.product_id.clone(),
        });
    }

    let gender = Gender::from_code(&request.gender).ok_or_else(|| ValidationError::InvalidGender {
        gender: request.gender.clone(),
    })?;

    if !limits.entry_ages().contains(&request.entry_age) {
        return Err(ValidationError::EntryAgeOutOfRange {
            age: request.entry_age,
            min: limits.min_entry_age,
            max: limits.max_entry_age,
        });
    }

    if !limits.insurance_periods().contains(&request.insurance_period) {
        return Err(ValidationError::InsurancePeriodOutOfRange {
            period: request.insurance_period,
            min: limits.min_insurance_period,
            max: limits.max_insurance_period,
        });
    }

    if !limits.accepts_amount(request.insured_amount) {
        return Err(ValidationError::InsuredAmountOutOfRange {
            amount: request.insured_amount,
            max: limits.max_insured_amount,
        });
    }

    Ok(ValidatedRequest {
        product_id,
        gender,
        entry_age: request.entry_age,
        insurance_period: request.insurance_period,
        insured_amount: request.insured_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(request: PremiumRequest) -> Result<(), ValidationError> {
        let tables = RateTables::default_pricing();
        validate_inputs(&tables, &ValidationLimits::default(), &request).map(|_| ())
    }

    #[test]
    fn test_valid_request() {
        let tables = RateTables::default_pricing();
        let request = PremiumRequest::new("1", "F", 0, 1, 1.0);
        let valid = validate_inputs(&tables, &ValidationLimits::default(), &request).unwrap();

        assert_eq!(valid.product_id, "1");
        assert_eq!(valid.gender, Gender::Female);
    }

    #[test]
    fn test_product_rules() {
        assert!(matches!(
            check(PremiumRequest::new("", "M", 2, 10, 1e6)),
            Err(ValidationError::UnknownProduct { .. })
        ));
        assert!(matches!(
            check(PremiumRequest::new("3", "M", 2, 10, 1e6)),
            Err(ValidationError::UnknownProduct { .. })
        ));
    }

    #[test]
    fn test_gender_rules() {
        for gender in ["", "m", "X", "Male", " M"] {
            assert!(matches!(
                check(PremiumRequest::new("1", gender, 2, 10, 1e6)),
                Err(ValidationError::InvalidGender { .. })
            ));
        }
    }

    #[test]
    fn test_entry_age_bounds() {
        assert!(check(PremiumRequest::new("1", "M", 0, 10, 1e6)).is_ok());
        assert!(check(PremiumRequest::new("1", "M", 100, 10, 1e6)).is_ok());
        for age in [-1, 101, i32::MIN, i32::MAX] {
            assert!(matches!(
                check(PremiumRequest::new("1", "M", age, 10, 1e6)),
                Err(ValidationError::EntryAgeOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_insurance_period_bounds() {
        assert!(check(PremiumRequest::new("1", "M", 2, 1, 1e6)).is_ok());
        assert!(check(PremiumRequest::new("1", "M", 2, 50, 1e6)).is_ok());
        for period in [0, -5, 51] {
            assert!(matches!(
                check(PremiumRequest::new("1", "M", 2, period, 1e6)),
                Err(ValidationError::InsurancePeriodOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_insured_amount_bounds() {
        assert!(check(PremiumRequest::new("1", "M", 2, 10, 1e9)).is_ok());
        assert!(check(PremiumRequest::new("1", "M", 2, 10, 0.01)).is_ok());
        for amount in [0.0, -1.0, 1e9 + 1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                check(PremiumRequest::new("1", "M", 2, 10, amount)),
                Err(ValidationError::InsuredAmountOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_first_failure_wins() {
        // Every field is bad; the product message is reported
        let err = check(PremiumRequest::new("9", "Z", -1, 0, 0.0)).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownProduct { .. }));

        // Product fixed; gender is next
        let err = check(PremiumRequest::new("1", "Z", -1, 0, 0.0)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidGender { .. }));

        let err = check(PremiumRequest::new("1", "M", -1, 0, 0.0)).unwrap_err();
        assert!(matches!(err, ValidationError::EntryAgeOutOfRange { .. }));

        let err = check(PremiumRequest::new("1", "M", 1, 0, 0.0)).unwrap_err();
        assert!(matches!(err, ValidationError::InsurancePeriodOutOfRange { .. }));
    }

    #[test]
    fn test_custom_limits() {
        let tables = RateTables::default_pricing();
        let limits = ValidationLimits {
            max_entry_age: 15,
            ..Default::default()
        };
        let request = PremiumRequest::new("1", "M", 16, 10, 1e6);
        let err = validate_inputs(&tables, &limits, &request).unwrap_err();

        assert_eq!(err.to_string(), "Entry age must be between 0 and 15");
    }
}
