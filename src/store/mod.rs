pub mod disk;
pub mod memory;

use crate::core::model::{ExchangeRate, Price};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Price and rate records as read by `import`.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct RecordsFile {
    #[serde(default)]
    pub prices: Vec<Price>,
    #[serde(default)]
    pub rates: Vec<ExchangeRate>,
}

impl RecordsFile {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read records file: {}", path.as_ref().display())
        })?;
        let records: Self = serde_yaml::from_str(&contents).with_context(|| {
            format!("Failed to parse records file: {}", path.as_ref().display())
        })?;
        debug!(
            "Read {} prices and {} rates from {}",
            records.prices.len(),
            records.rates.len(),
            path.as_ref().display()
        );
        Ok(records)
    }

    pub fn len(&self) -> usize {
        self.prices.len() + self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
