use crate::core::model::{ExchangeRate, Price};
use crate::store::memory::MemoryStore;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PRICES: &str = "prices";
const RATES: &str = "rates";

/// Durable record store on a fjall keyspace.
///
/// Records are keyed by identifier and date, so writing a second record for
/// the same date replaces the first.
pub struct DiskStore {
    keyspace: Keyspace,
    prices: PartitionHandle,
    rates: PartitionHandle,
}

/// Length-prefixed parts followed by the date, so no identifier can spill
/// into the next part of the key.
fn record_key(parts: &[&str], date: NaiveDate) -> String {
    let mut key = String::new();
    for part in parts {
        key.push_str(&format!("{}:{part}/", part.len()));
    }
    key.push_str(&date.to_string());
    key
}

fn price_key(price: &Price) -> String {
    record_key(&[price.instrument.as_str()], price.date)
}

fn rate_key(rate: &ExchangeRate) -> String {
    record_key(&[rate.from.as_str(), rate.to.as_str()], rate.date)
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path.join("records"))
            .open()
            .with_context(|| format!("Failed to open record store at {}", path.display()))?;
        let prices = keyspace
            .open_partition(PRICES, PartitionCreateOptions::default())
            .context("Failed to open prices partition")?;
        let rates = keyspace
            .open_partition(RATES, PartitionCreateOptions::default())
            .context("Failed to open rates partition")?;
        debug!("Opened record store at {}", path.display());

        Ok(Self {
            keyspace,
            prices,
            rates,
        })
    }

    pub fn put_price(&self, price: &Price) -> Result<()> {
        let key = price_key(price);
        self.prices
            .insert(key.as_bytes(), serde_json::to_vec(price)?)
            .with_context(|| format!("Failed to store price {key}"))?;
        debug!("Store PUT price {key}");
        Ok(())
    }

    pub fn put_rate(&self, rate: &ExchangeRate) -> Result<()> {
        let key = rate_key(rate);
        self.rates
            .insert(key.as_bytes(), serde_json::to_vec(rate)?)
            .with_context(|| format!("Failed to store rate {key}"))?;
        debug!("Store PUT rate {key}");
        Ok(())
    }

    /// Flushes pending writes to disk.
    pub fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist record store")
    }

    /// Reads every stored record into memory.
    pub fn load_snapshot(&self) -> Result<MemoryStore> {
        let mut snapshot = MemoryStore::new();

        for item in self.prices.iter() {
            let (key, value) = item.context("Failed to read prices partition")?;
            let price: Price = serde_json::from_slice(&value).with_context(|| {
                format!("Corrupt price record {}", String::from_utf8_lossy(&key))
            })?;
            snapshot.insert_price(price);
        }
        for item in self.rates.iter() {
            let (key, value) = item.context("Failed to read rates partition")?;
            let rate: ExchangeRate = serde_json::from_slice(&value).with_context(|| {
                format!("Corrupt rate record {}", String::from_utf8_lossy(&key))
            })?;
            snapshot.insert_rate(rate);
        }

        debug!(
            "Loaded {} prices and {} rates from record store",
            snapshot.price_count(),
            snapshot.rate_count()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::MarketData;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn price(instrument: &str, d: u32, value: f64) -> Price {
        Price {
            instrument: instrument.to_string(),
            date: date(d),
            value,
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn test_disk_store_get_put() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        // Initially, store is empty
        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot.price_count(), 0);

        store.put_price(&price("AAPL", 1, 180.0)).unwrap();
        store.put_price(&price("AAPL", 2, 185.0)).unwrap();
        store
            .put_rate(&ExchangeRate {
                from: "USD".to_string(),
                to: "EUR".to_string(),
                date: date(1),
                rate: 0.9,
            })
            .unwrap();

        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot.price_count(), 2);
        assert_eq!(snapshot.rate_count(), 1);
        assert_eq!(snapshot.latest_price("AAPL").map(|p| p.value), Some(185.0));
    }

    #[test]
    fn test_disk_store_overwrites_same_date() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        store.put_price(&price("AAPL", 1, 180.0)).unwrap();
        store.put_price(&price("AAPL", 1, 181.0)).unwrap();

        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot.price_count(), 1);
        assert_eq!(snapshot.latest_price("AAPL").map(|p| p.value), Some(181.0));
    }

    #[test]
    fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store.put_price(&price("AAPL", 3, 190.0)).unwrap();
            store.persist().unwrap();
        }

        let store = DiskStore::open(dir.path()).unwrap();
        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot.price_history("AAPL").len(), 1);
    }

    #[test]
    fn test_rate_keys_do_not_collide() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();
        let rate = |from: &str, to: &str, value: f64| ExchangeRate {
            from: from.to_string(),
            to: to.to_string(),
            date: date(1),
            rate: value,
        };

        store.put_rate(&rate("A/B", "C", 1.5)).unwrap();
        store.put_rate(&rate("A", "B/C", 2.5)).unwrap();

        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot.rate_count(), 2);
        assert_eq!(snapshot.latest_rate("A/B", "C").map(|r| r.value), Some(1.5));
        assert_eq!(snapshot.latest_rate("A", "B/C").map(|r| r.value), Some(2.5));
    }
}
