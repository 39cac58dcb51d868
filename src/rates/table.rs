//! Base rate table keyed by product, gender and entry age

use crate::error::RateTableError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Highest age key present in the table; older entry ages reuse this row
pub const MAX_AGE_KEY: u8 = 5;

/// Number of age keys per gender (0..=MAX_AGE_KEY)
pub const AGE_KEY_COUNT: usize = MAX_AGE_KEY as usize + 1;

/// Gender of the insured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Parse the single-letter code used on the quote form.
    /// Only the exact codes "M" and "F" are accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Clamp an entry age to the age key used for lookup.
/// Negative ages clamp to 0; they never pass validation anyway.
pub fn age_key(entry_age: i32) -> u8 {
    entry_age.clamp(0, MAX_AGE_KEY as i32) as u8
}

/// Rates for one gender, indexed by age key
pub type AgeRates = [Option<f64>; AGE_KEY_COUNT];

/// Base rates by product id, then gender, then age key
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    products: BTreeMap<String, HashMap<Gender, AgeRates>>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in education endowment rates
    pub fn builtin() -> Self {
        let mut products: BTreeMap<String, HashMap<Gender, AgeRates>> = BTreeMap::new();

        for (product_id, gender, rates) in BUILTIN_BASE_RATES {
            products
                .entry(product_id.to_string())
                .or_default()
                .insert(gender, rates.map(Some));
        }

        Self { products }
    }

    /// Insert a single rate, checking the table invariants.
    /// Each (product, gender, age key) may be set only once.
    pub fn insert(
        &mut self,
        product_id: &str,
        gender: Gender,
        age_key: u8,
        rate: f64,
    ) -> Result<(), RateTableError> {
        if product_id.is_empty() {
            return Err(RateTableError::EmptyProductId);
        }
        if age_key > MAX_AGE_KEY {
            return Err(RateTableError::AgeKeyOutOfRange {
                product_id: product_id.to_string(),
                age_key,
                max: MAX_AGE_KEY,
            });
        }
        check_rate(product_id, rate)?;

        let slot = &mut self
            .products
            .entry(product_id.to_string())
            .or_default()
            .entry(gender)
            .or_insert([None; AGE_KEY_COUNT])[age_key as usize];
        if slot.is_some() {
            return Err(RateTableError::DuplicateRate {
                product_id: product_id.to_string(),
                gender: gender.code().to_string(),
                age_key,
            });
        }
        *slot = Some(rate);
        Ok(())
    }

    pub fn contains_product(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    /// Product ids in ascending order
    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.products.keys().map(String::as_str)
    }

    /// Rates for a product/gender pair, if that pair has a table
    pub fn age_rates(&self, product_id: &str, gender: Gender) -> Option<&AgeRates> {
        self.products.get(product_id)?.get(&gender)
    }

    /// Look up a rate by exact age key (no clamping)
    pub fn rate(&self, product_id: &str, gender: Gender, age_key: u8) -> Option<f64> {
        self.age_rates(product_id, gender)?
            .get(age_key as usize)
            .copied()
            .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Rates must be finite fractions in [0, 1)
pub(crate) fn check_rate(product_id: &str, rate: f64) -> Result<f64, RateTableError> {
    if (0.0..1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(RateTableError::RateOutOfRange {
            product_id: product_id.to_string(),
            rate,
        })
    }
}

const BUILTIN_BASE_RATES: [(&str, Gender, [f64; AGE_KEY_COUNT]); 4] = [
    // Plan A
    ("1", Gender::Male, [0.0012, 0.00115, 0.0011, 0.00105, 0.0010, 0.00095]),
    ("1", Gender::Female, [0.0011, 0.00105, 0.0010, 0.00095, 0.0009, 0.00085]),
    // Plan B
    ("2", Gender::Male, [0.0010, 0.00095, 0.0009, 0.00085, 0.0008, 0.00075]),
    ("2", Gender::Female, [0.0009, 0.00085, 0.0008, 0.00075, 0.0007, 0.00065]),
];
