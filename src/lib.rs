pub mod cli;
pub mod core;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{Anonymizer, ReportPeriod, ValuationScope, Valuator};
use crate::store::disk::DiskStore;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    Import { file: PathBuf },
    Summary { period: ReportPeriod },
    Series { period: ReportPeriod, scope: ValuationScope },
    Compare { period: ReportPeriod },
    Gold { period: ReportPeriod },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>, anonymize: bool) -> Result<()> {
    info!("aurum starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = DiskStore::open(&config.default_data_path()?)?;
    if let AppCommand::Import { file } = &command {
        return cli::import::run(&store, file);
    }

    let market = store.load_snapshot()?;
    let portfolio = config.portfolio();
    let anonymizer = anonymize
        .then(|| Anonymizer::new(config.anonymize.seed, config.anonymize.envelope()));
    let today = chrono::Local::now().date_naive();
    let mut valuator =
        Valuator::new(&portfolio, &market, &config.currency).with_anonymizer(anonymizer.as_ref());

    match command {
        AppCommand::Import { .. } => Ok(()),
        AppCommand::Summary { period } => cli::summary::run(&mut valuator, period, today),
        AppCommand::Series { period, scope } => {
            cli::series::run(&mut valuator, &scope, period, today)
        }
        AppCommand::Compare { period } => cli::compare::run(
            &mut valuator,
            &market,
            config.benchmark.as_deref(),
            period,
            today,
        ),
        AppCommand::Gold { period } => cli::gold::run(
            &mut valuator,
            &portfolio,
            &market,
            config.gold.as_deref(),
            period,
            today,
        ),
    }
}
