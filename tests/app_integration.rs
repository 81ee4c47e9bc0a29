use chrono::{Duration, Local};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

use aurum::AppCommand;
use aurum::core::{ReportPeriod, ValuationScope};

mod test_utils {
    use super::*;

    /// Writes a config whose record store lives inside `dir`.
    pub fn write_config(dir: &Path, extra: &str) -> String {
        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
currency: "EUR"
accounts:
  - id: broker
    name: "Broker"
categories:
  - id: equity
    name: "Equity"
instruments:
  - id: "AAPL"
    name: "Apple"
    currency: "USD"
    category: equity
  - id: "IWDA"
    name: "MSCI World"
    currency: "EUR"
    category: equity
  - id: "XAU-G"
    name: "Gold gram"
    currency: "EUR"
holdings:
  - account: broker
    instrument: "AAPL"
    quantity: 10
  - account: broker
    instrument: "IWDA"
    quantity: 5
data_path: "{}"
{extra}
"#,
            dir.join("data").display()
        );
        fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path.to_str().unwrap().to_string()
    }

    /// Writes a records file with prices over the last week.
    pub fn write_records(dir: &Path) -> std::path::PathBuf {
        let today = Local::now().date_naive();
        let week_ago = today - Duration::days(7);
        let records = format!(
            r#"
prices:
  - {{ instrument: "AAPL", date: {week_ago}, value: 180.0, currency: "USD" }}
  - {{ instrument: "AAPL", date: {today}, value: 190.0, currency: "USD" }}
  - {{ instrument: "IWDA", date: {week_ago}, value: 80.0 }}
  - {{ instrument: "IWDA", date: {today}, value: 82.0 }}
  - {{ instrument: "XAU-G", date: {week_ago}, value: 60.0 }}
  - {{ instrument: "XAU-G", date: {today}, value: 61.0 }}
rates:
  - {{ from: USD, to: EUR, date: {week_ago}, rate: 0.9 }}
"#
        );
        let path = dir.join("records.yaml");
        fs::write(&path, records).expect("Failed to write records file");
        path
    }
}

#[test_log::test]
fn test_full_app_flow() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(
        temp_dir.path(),
        "benchmark: \"IWDA\"\ngold: \"XAU-G\"",
    );
    let records = test_utils::write_records(temp_dir.path());

    let result = aurum::run_command(
        AppCommand::Import { file: records },
        Some(config_path.as_str()),
        false,
    );
    assert!(result.is_ok(), "Import failed with: {:?}", result.err());

    let commands = vec![
        AppCommand::Summary {
            period: ReportPeriod::OneWeek,
        },
        AppCommand::Series {
            period: ReportPeriod::OneMonth,
            scope: ValuationScope::Portfolio,
        },
        AppCommand::Series {
            period: ReportPeriod::Max,
            scope: ValuationScope::Category("equity".to_string()),
        },
        AppCommand::Compare {
            period: ReportPeriod::OneMonth,
        },
        AppCommand::Gold {
            period: ReportPeriod::OneMonth,
        },
    ];
    for command in commands {
        let result = aurum::run_command(command, Some(config_path.as_str()), false);
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }

    info!("Running anonymized summary");
    let result = aurum::run_command(
        AppCommand::Summary {
            period: ReportPeriod::OneWeek,
        },
        Some(config_path.as_str()),
        true,
    );
    assert!(result.is_ok(), "Anonymized summary failed with: {:?}", result.err());
}

#[test_log::test]
fn test_compare_without_benchmark_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), "");

    let result = aurum::run_command(
        AppCommand::Compare {
            period: ReportPeriod::OneMonth,
        },
        Some(config_path.as_str()),
        false,
    );
    let err = result.expect_err("Compare without a benchmark should fail");
    assert!(err.to_string().contains("benchmark"));

    let result = aurum::run_command(
        AppCommand::Gold {
            period: ReportPeriod::OneMonth,
        },
        Some(config_path.as_str()),
        false,
    );
    assert!(result.is_err());
}

#[test_log::test]
fn test_missing_config_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.yaml");

    let result = aurum::run_command(
        AppCommand::Summary {
            period: ReportPeriod::OneDay,
        },
        Some(missing.to_str().unwrap()),
        false,
    );
    assert!(result.is_err());
}
