use super::ui;
use crate::store::RecordsFile;
use crate::store::disk::DiskStore;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Writes every price and rate from `file` into `store`. Records for a date
/// that is already stored replace the stored one.
pub fn run(store: &DiskStore, file: &Path) -> Result<()> {
    let records = RecordsFile::load_from_path(file)?;
    if records.is_empty() {
        println!("No records found in {}.", file.display());
        return Ok(());
    }

    let pb = ui::new_progress_bar(records.len() as u64, true)?;
    pb.set_message("Importing records...");
    for price in &records.prices {
        store.put_price(price)?;
        pb.inc(1);
    }
    for rate in &records.rates {
        store.put_rate(rate)?;
        pb.inc(1);
    }
    store.persist()?;
    pb.finish_and_clear();

    info!(
        "Imported {} prices and {} rates from {}",
        records.prices.len(),
        records.rates.len(),
        file.display()
    );
    println!(
        "Imported {} prices and {} rates.",
        records.prices.len(),
        records.rates.len()
    );
    Ok(())
}
