//! Symbolic reporting periods and their cutoff dates.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ReportPeriod {
    OneDay,
    OneWeek,
    OneMonth,
    OneYear,
    YearToDate,
    Max,
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ReportPeriod::OneDay => "1D",
                ReportPeriod::OneWeek => "1W",
                ReportPeriod::OneMonth => "1M",
                ReportPeriod::OneYear => "1Y",
                ReportPeriod::YearToDate => "YTD",
                ReportPeriod::Max => "MAX",
            }
        )
    }
}

impl ReportPeriod {
    /// First date covered by the period when evaluated on `today`. Also the
    /// reference date for "previous value" comparisons.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        match self {
            ReportPeriod::OneDay => today - Duration::days(1),
            ReportPeriod::OneWeek => today - Duration::days(7),
            ReportPeriod::OneMonth => today
                .checked_sub_months(Months::new(1))
                .unwrap_or(NaiveDate::MIN),
            ReportPeriod::OneYear => today
                .checked_sub_months(Months::new(12))
                .unwrap_or(NaiveDate::MIN),
            ReportPeriod::YearToDate => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(NaiveDate::MIN)
            }
            ReportPeriod::Max => NaiveDate::MIN,
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1D" => Ok(ReportPeriod::OneDay),
            "1W" => Ok(ReportPeriod::OneWeek),
            "1M" => Ok(ReportPeriod::OneMonth),
            "1Y" => Ok(ReportPeriod::OneYear),
            "YTD" => Ok(ReportPeriod::YearToDate),
            "MAX" | "ALL" => Ok(ReportPeriod::Max),
            _ => Err(anyhow::anyhow!("Invalid report period: {}", s)),
        }
    }
}
