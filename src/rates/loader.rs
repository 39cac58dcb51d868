//! CSV-based rate table loader
//!
//! Loads rate tables from CSV files in data/rates/:
//! - products.csv: ProductId,ProductName
//! - base_rates.csv: ProductId,Gender,Age,Rate
//! - loading_rates.csv: ProductId,LoadingRate

use super::{Gender, LoadingTable, RateTable};
use crate::error::RateTableError;
use csv::Reader;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Default path to the rates directory
pub const DEFAULT_RATES_PATH: &str = "data/rates";

#[derive(Debug, serde::Deserialize)]
struct ProductRow {
    #[serde(rename = "ProductId")]
    product_id: String,
    #[serde(rename = "ProductName")]
    product_name: String,
}

#[derive(Debug, serde::Deserialize)]
struct BaseRateRow {
    #[serde(rename = "ProductId")]
    product_id: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "Rate")]
    rate: f64,
}

#[derive(Debug, serde::Deserialize)]
struct LoadingRateRow {
    #[serde(rename = "ProductId")]
    product_id: String,
    #[serde(rename = "LoadingRate")]
    loading_rate: f64,
}

fn open(path: &Path) -> Result<Reader<std::fs::File>, RateTableError> {
    let file = std::fs::File::open(path).map_err(|source| RateTableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Reader::from_reader(file))
}

fn csv_err(path: &Path) -> impl Fn(csv::Error) -> RateTableError + '_ {
    move |source| RateTableError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Load product display names
pub fn load_product_names<R: Read>(
    reader: &mut Reader<R>,
    path: &Path,
) -> Result<BTreeMap<String, String>, RateTableError> {
    let mut names = BTreeMap::new();

    for result in reader.deserialize() {
        let row: ProductRow = result.map_err(csv_err(path))?;
        if row.product_id.is_empty() {
            return Err(RateTableError::EmptyProductId);
        }
        if names.contains_key(&row.product_id) {
            return Err(RateTableError::DuplicateProduct(row.product_id));
        }
        names.insert(row.product_id, row.product_name);
    }

    Ok(names)
}

/// Load base rates into a table; an empty file is an error
pub fn load_base_rates<R: Read>(
    reader: &mut Reader<R>,
    path: &Path,
) -> Result<RateTable, RateTableError> {
    let mut table = RateTable::new();

    for result in reader.deserialize() {
        let row: BaseRateRow = result.map_err(csv_err(path))?;
        let gender = Gender::from_code(row.gender.trim())
            .ok_or_else(|| RateTableError::UnknownGender(row.gender.clone()))?;
        table.insert(&row.product_id, gender, row.age, row.rate)?;
    }

    if table.is_empty() {
        return Err(RateTableError::EmptyRateTable(path.to_path_buf()));
    }

    Ok(table)
}

/// Load loading rates; every listed product must already have base rates
pub fn load_loading_rates<R: Read>(
    reader: &mut Reader<R>,
    path: &Path,
    base: &RateTable,
) -> Result<LoadingTable, RateTableError> {
    let mut loading = LoadingTable::new();

    for result in reader.deserialize() {
        let row: LoadingRateRow = result.map_err(csv_err(path))?;
        if !base.contains_product(&row.product_id) {
            return Err(RateTableError::OrphanLoadingRate(row.product_id));
        }
        loading.insert(&row.product_id, row.loading_rate)?;
    }

    Ok(loading)
}

/// Raw tables loaded from a rates directory
#[derive(Debug, Clone)]
pub struct LoadedRates {
    pub product_names: BTreeMap<String, String>,
    pub base_rates: RateTable,
    pub loading_rates: LoadingTable,
}

impl LoadedRates {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, RateTableError> {
        Self::load_from(Path::new(DEFAULT_RATES_PATH))
    }

    /// Load all tables from a specific directory
    pub fn load_from(dir: &Path) -> Result<Self, RateTableError> {
        let products_path = dir.join("products.csv");
        let base_path = dir.join("base_rates.csv");
        let loading_path = dir.join("loading_rates.csv");

        let product_names = load_product_names(&mut open(&products_path)?, &products_path)?;
        let base_rates = load_base_rates(&mut open(&base_path)?, &base_path)?;
        let loading_rates =
            load_loading_rates(&mut open(&loading_path)?, &loading_path, &base_rates)?;

        log::info!(
            "Loaded rates for {} products from {}",
            base_rates.product_ids().count(),
            dir.display()
        );

        Ok(Self {
            product_names,
            base_rates,
            loading_rates,
        })
    }
}
