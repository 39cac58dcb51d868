//! Batch premium grid over entry-age and insurance-period ranges

use super::{PremiumCalculator, PremiumRequest, PremiumResult};
use crate::error::RangeError;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Parse a range written as `start-end`.
///
/// Both sides are optional digit runs; an empty side takes the matching
/// end of `bounds`, so `-` is the whole of `bounds` and `3-` is
/// `3..=bounds.end()`. Explicit sides outside `bounds` are rejected.
pub fn parse_range(input: &str, bounds: RangeInclusive<i32>) -> Result<RangeInclusive<i32>, RangeError> {
    let malformed = || RangeError::Malformed(input.to_string());

    let (start, end) = input.split_once('-').ok_or_else(malformed)?;
    if !start.bytes().all(|b| b.is_ascii_digit()) || !end.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let side = |text: &str, default: i32| -> Result<i32, RangeError> {
        if text.is_empty() {
            Ok(default)
        } else {
            text.parse().map_err(|_| malformed())
        }
    };

    let start = side(start, *bounds.start())?;
    let end = side(end, *bounds.end())?;
    for value in [start, end] {
        if !bounds.contains(&value) {
            return Err(RangeError::OutOfBounds {
                value,
                min: *bounds.start(),
                max: *bounds.end(),
            });
        }
    }
    if start > end {
        return Err(RangeError::Inverted { start, end });
    }

    Ok(start..=end)
}

/// One (age, period) point of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCell {
    pub entry_age: i32,
    pub insurance_period: i32,
    pub result: PremiumResult,
}

/// Results of a batch run, ages outer and periods inner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub product_id: String,
    pub gender: String,
    pub insured_amount: f64,
    pub cells: Vec<BatchCell>,
    pub successes: usize,
    pub failures: usize,
}

impl BatchReport {
    pub fn cell(&self, entry_age: i32, insurance_period: i32) -> Option<&BatchCell> {
        self.cells
            .iter()
            .find(|c| c.entry_age == entry_age && c.insurance_period == insurance_period)
    }
}

/// Run the calculator for every (age, period) pair.
/// A failing cell is recorded and the batch carries on.
pub fn batch_calculate(
    calculator: &PremiumCalculator<'_>,
    product_id: &str,
    gender: &str,
    ages: RangeInclusive<i32>,
    periods: RangeInclusive<i32>,
    insured_amount: f64,
) -> BatchReport {
    let mut cells = Vec::new();

    for entry_age in ages {
        for insurance_period in periods.clone() {
            let request = PremiumRequest::new(
                product_id,
                gender,
                entry_age,
                insurance_period,
                insured_amount,
            );
            cells.push(BatchCell {
                entry_age,
                insurance_period,
                result: calculator.calculate(&request),
            });
        }
    }

    let successes = cells.iter().filter(|c| c.result.is_success()).count();
    let failures = cells.len() - successes;

    log::debug!(
        "Batch for product {} ({}): {} cells, {} failed",
        product_id,
        gender,
        cells.len(),
        failures
    );

    BatchReport {
        product_id: product_id.to_string(),
        gender: gender.to_string(),
        insured_amount,
        cells,
        successes,
        failures,
    }
}
