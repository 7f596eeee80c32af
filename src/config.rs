use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InvoiceError, Result};

/// Default config file, resolved relative to the current directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// The full settings file. Loaded once per run, immutable afterwards.
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub from_company: CompanySection,
    pub to_company: CompanySection,
    pub bank: BankSection,
    pub business: BusinessSection,
    pub style: StyleSection,
}

#[derive(Debug, Deserialize)]
pub struct CompanySection {
    pub name: String,
    pub street: String,
    pub city: String,
    pub postcode: String,
    pub vat_number: String,
}

#[derive(Debug, Deserialize)]
pub struct BankSection {
    pub name: String,
    pub account_name: String,
    pub sort_code: String,
    pub account_number: String,
}

#[derive(Debug, Deserialize)]
pub struct BusinessSection {
    /// VAT rate as a fraction, e.g. 0.2 for 20%.
    pub vat_rate: f64,
    pub daily_rate: f64,
    pub payment_terms_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct StyleSection {
    pub primary_color: String,
}

/// Load the settings file, defaulting to `config.yaml` when no path is given.
/// Either the whole `Settings` object parses or the load fails.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };

    if !path.exists() {
        return Err(InvoiceError::ConfigFileNotFound(path));
    }

    let content = fs::read_to_string(&path)?;
    serde_yaml::from_str(&content).map_err(|e| InvoiceError::ConfigParse { path, source: e })
}
