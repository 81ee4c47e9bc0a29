//! Date-aligned valuation of holdings in the reporting currency.
use crate::core::anonymize::Anonymizer;
use crate::core::currency::CurrencyConverter;
use crate::core::market::MarketData;
use crate::core::model::{
    ConversionStatus, Instrument, ValuationPoint, ValuationSeries, percent_change,
};
use crate::core::period::ReportPeriod;
use crate::core::portfolio::{Portfolio, ValuationScope};
use crate::core::price_index::{PriceIndex, PricePoint};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

/// Current and reference value of one instrument within a scope.
#[derive(Debug, Clone)]
pub struct HoldingDetail {
    pub identifier: String,
    pub name: String,
    pub currency: String,
    pub quantity: f64,
    pub price: Option<PricePoint>,
    pub reference_price: Option<PricePoint>,
    pub value: Option<f64>,
    pub reference_value: Option<f64>,
    pub change_pct: Option<f64>,
    pub weight: Option<f64>,
    pub status: ConversionStatus,
}

/// Scope totals in the reporting currency. A total is `None` when any
/// instrument in the scope lacks a price for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotals {
    pub period: ReportPeriod,
    pub current: Option<f64>,
    pub previous: Option<f64>,
    pub change_pct: Option<f64>,
    pub status: ConversionStatus,
}

struct Participant<'p> {
    instrument: &'p Instrument,
    quantity: f64,
    index: PriceIndex,
}

/// Values holdings over time.
///
/// Each call to [`Valuator::series`], [`Valuator::totals`] or
/// [`Valuator::holding_details`] is one computation and starts with a fresh
/// rate cache. Build one `Valuator` per concurrent computation.
pub struct Valuator<'a> {
    portfolio: &'a Portfolio,
    market: &'a dyn MarketData,
    converter: CurrencyConverter<'a>,
    anonymizer: Option<&'a Anonymizer>,
}

impl<'a> Valuator<'a> {
    pub fn new(
        portfolio: &'a Portfolio,
        market: &'a dyn MarketData,
        reporting_currency: &str,
    ) -> Self {
        Self {
            portfolio,
            market,
            converter: CurrencyConverter::new(market, reporting_currency),
            anonymizer: None,
        }
    }

    /// Substitutes held quantities through `anonymizer` before valuing.
    pub fn with_anonymizer(mut self, anonymizer: Option<&'a Anonymizer>) -> Self {
        self.anonymizer = anonymizer;
        self
    }

    pub fn reporting_currency(&self) -> &str {
        self.converter.reporting_currency()
    }

    fn participants(&self, scope: &ValuationScope) -> Vec<Participant<'a>> {
        let portfolio = self.portfolio;
        portfolio
            .quantities(scope)
            .into_iter()
            .filter(|(_, quantity)| *quantity > 0.0)
            .filter_map(|(id, quantity)| {
                let instrument = portfolio.instrument(&id)?;
                let quantity = match self.anonymizer {
                    Some(anonymizer) => {
                        anonymizer.quantity(&id, self.market.latest_price(&id).map(|p| p.value))
                    }
                    None => quantity,
                };
                Some(Participant {
                    instrument,
                    quantity,
                    index: self.market.price_index(&id),
                })
            })
            .filter(|p| p.quantity > 0.0)
            .collect()
    }

    /// Sum of all participants, or `None` as soon as one of them has no price
    /// from `resolve`. `resolve` also picks the date each value is converted
    /// at. `on` only labels the diagnostics.
    fn aggregate_on<F>(
        &mut self,
        participants: &[Participant<'_>],
        on: NaiveDate,
        resolve: F,
    ) -> Option<(f64, ConversionStatus)>
    where
        F: Fn(&Participant<'_>) -> Option<(PricePoint, NaiveDate)>,
    {
        let mut prices = Vec::with_capacity(participants.len());
        for participant in participants {
            match resolve(participant) {
                Some(resolved) => prices.push(resolved),
                None => {
                    debug!(
                        "Dropping {on}: no price for {}",
                        participant.instrument.id
                    );
                    return None;
                }
            }
        }

        let mut total = 0.0;
        let mut status = ConversionStatus::Native;
        for (participant, (price, convert_at)) in participants.iter().zip(prices) {
            let converted = self.converter.to_reporting_currency(
                participant.quantity * price.value,
                Some(&participant.instrument.currency),
                convert_at,
            );
            total += converted.value;
            status = status.max(converted.status);
        }
        Some((total, status))
    }

    /// Value series of `scope` from `since` onwards.
    ///
    /// The series starts no earlier than the date from which every instrument
    /// in the scope has a price, and contains only dates on which all of them
    /// resolve to a price. Dates with a non-positive total are left out.
    pub fn series(&mut self, scope: &ValuationScope, since: NaiveDate) -> ValuationSeries {
        self.converter.clear();
        let participants = self.participants(scope);
        if participants.is_empty() {
            debug!("No holdings with a positive quantity in {scope}");
            return ValuationSeries::default();
        }

        let Some(common_start) = common_start(&participants) else {
            debug!("Missing price history in {scope}, no series");
            return ValuationSeries::default();
        };
        let start = since.max(common_start);

        let dates: BTreeSet<NaiveDate> = participants
            .iter()
            .flat_map(|p| p.index.dates_from(start))
            .collect();
        debug!(
            "Valuing {scope} over {} dates from {start} with {} instruments",
            dates.len(),
            participants.len()
        );

        let mut series = ValuationSeries::default();
        for date in dates {
            let Some((total, status)) = self.aggregate_on(&participants, date, |p| {
                p.index.on_or_before(date).map(|price| (price, date))
            }) else {
                continue;
            };
            if total > 0.0 {
                series.points.push(ValuationPoint { date, value: total });
                series.status = series.status.max(status);
            }
        }
        series
    }

    /// Current total of `scope` as of `today` and its total at the reference
    /// point of `period`.
    ///
    /// Reference values are converted at the date of the reference price, so
    /// they agree with [`Valuator::series`] on that date. For
    /// [`ReportPeriod::Max`] the reference is the first date of the series.
    pub fn totals(
        &mut self,
        scope: &ValuationScope,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> PeriodTotals {
        self.converter.clear();
        let participants = self.participants(scope);
        let mut totals = PeriodTotals {
            period,
            current: None,
            previous: None,
            change_pct: None,
            status: ConversionStatus::Native,
        };
        if participants.is_empty() {
            return totals;
        }

        if let Some((current, status)) = self.aggregate_on(&participants, today, |p| {
            p.index.on_or_before(today).map(|price| (price, today))
        }) {
            totals.current = Some(current);
            totals.status = totals.status.max(status);
        }

        let market = self.market;
        let first_date = common_start(&participants);
        if let Some((previous, status)) =
            self.aggregate_on(&participants, period.cutoff(today), |p| {
                reference_price(market, &p.instrument.id, period, today, first_date)
                    .map(|price| (price, price.date))
            })
        {
            totals.previous = Some(previous);
            totals.status = totals.status.max(status);
        }

        if let (Some(previous), Some(current)) = (totals.previous, totals.current) {
            totals.change_pct = percent_change(previous, current);
        }
        totals
    }

    /// Per-instrument current and reference values for `scope`. For
    /// [`ReportPeriod::Max`] each instrument is compared with its own first
    /// price.
    pub fn holding_details(
        &mut self,
        scope: &ValuationScope,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Vec<HoldingDetail> {
        self.converter.clear();
        let participants = self.participants(scope);
        let mut details = Vec::with_capacity(participants.len());
        let mut total = 0.0;
        let mut all_valid = true;

        for participant in &participants {
            let instrument = participant.instrument;
            let price = self.market.price_on_or_before(&instrument.id, today);
            let reference = reference_price(
                self.market,
                &instrument.id,
                period,
                today,
                participant.index.earliest().map(|p| p.date),
            );
            let mut status = ConversionStatus::Native;

            let value = price.map(|p| {
                let converted = self.converter.to_reporting_currency(
                    participant.quantity * p.value,
                    Some(&instrument.currency),
                    today,
                );
                status = status.max(converted.status);
                converted.value
            });
            let reference_value = reference.map(|p| {
                let converted = self.converter.to_reporting_currency(
                    participant.quantity * p.value,
                    Some(&instrument.currency),
                    p.date,
                );
                status = status.max(converted.status);
                converted.value
            });

            match value {
                Some(v) => total += v,
                None => all_valid = false,
            }

            details.push(HoldingDetail {
                identifier: instrument.id.clone(),
                name: instrument.name.clone(),
                currency: instrument.currency.clone(),
                quantity: participant.quantity,
                price,
                reference_price: reference,
                value,
                reference_value,
                change_pct: match (reference_value, value) {
                    (Some(from), Some(to)) => percent_change(from, to),
                    _ => None,
                },
                weight: None,
                status,
            });
        }

        if all_valid && total > 0.0 {
            for detail in &mut details {
                detail.weight = detail.value.map(|v| v / total * 100.0);
            }
        }
        details
    }
}

/// First date on which every participant has a price, `None` if any of them
/// has no history at all.
fn common_start(participants: &[Participant<'_>]) -> Option<NaiveDate> {
    participants
        .iter()
        .map(|p| p.index.earliest().map(|e| e.date))
        .try_fold(NaiveDate::MIN, |start, earliest| Some(start.max(earliest?)))
}

/// Price an instrument is compared against for `period`. For a single day
/// this is the last price strictly before the current one, for the full
/// history the price on `first_date`, otherwise the price on or before the
/// period cutoff.
fn reference_price(
    market: &dyn MarketData,
    instrument: &str,
    period: ReportPeriod,
    today: NaiveDate,
    first_date: Option<NaiveDate>,
) -> Option<PricePoint> {
    match period {
        ReportPeriod::OneDay => market
            .price_on_or_before(instrument, today)
            .and_then(|current| market.price_before(instrument, current.date)),
        ReportPeriod::Max => first_date.and_then(|date| market.price_on_or_before(instrument, date)),
        _ => market.price_on_or_before(instrument, period.cutoff(today)),
    }
}
