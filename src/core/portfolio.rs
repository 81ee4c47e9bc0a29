//! Instruments, accounts, categories and holdings with identifier lookups.

use crate::core::model::{Account, Category, Holding, Instrument};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Which holdings a valuation sums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuationScope {
    Portfolio,
    Category(String),
    Account(String),
    Holding(String),
}

impl std::fmt::Display for ValuationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValuationScope::Portfolio => write!(f, "portfolio"),
            ValuationScope::Category(id) => write!(f, "category {id}"),
            ValuationScope::Account(id) => write!(f, "account {id}"),
            ValuationScope::Holding(id) => write!(f, "holding {id}"),
        }
    }
}

/// Owns every record and resolves the references between them by index.
///
/// Holdings that point at unknown accounts or instruments, and instruments
/// that point at unknown categories, are kept out with a warning.
#[derive(Debug, Default, Clone)]
pub struct Portfolio {
    instruments: Vec<Instrument>,
    accounts: Vec<Account>,
    categories: Vec<Category>,
    holdings: Vec<Holding>,
    instrument_idx: HashMap<String, usize>,
    account_idx: HashMap<String, usize>,
    category_idx: HashMap<String, usize>,
}

impl Portfolio {
    pub fn new(
        instruments: Vec<Instrument>,
        accounts: Vec<Account>,
        categories: Vec<Category>,
        holdings: Vec<Holding>,
    ) -> Self {
        let mut portfolio = Portfolio::default();

        for category in categories {
            if portfolio.category_idx.contains_key(&category.id) {
                warn!("Duplicate category {}, keeping the first", category.id);
                continue;
            }
            portfolio
                .category_idx
                .insert(category.id.clone(), portfolio.categories.len());
            portfolio.categories.push(category);
        }

        for account in accounts {
            if portfolio.account_idx.contains_key(&account.id) {
                warn!("Duplicate account {}, keeping the first", account.id);
                continue;
            }
            portfolio
                .account_idx
                .insert(account.id.clone(), portfolio.accounts.len());
            portfolio.accounts.push(account);
        }

        for mut instrument in instruments {
            if portfolio.instrument_idx.contains_key(&instrument.id) {
                warn!("Duplicate instrument {}, keeping the first", instrument.id);
                continue;
            }
            if let Some(category) = &instrument.category {
                if !portfolio.category_idx.contains_key(category) {
                    warn!(
                        "Instrument {} refers to unknown category {}",
                        instrument.id, category
                    );
                    instrument.category = None;
                }
            }
            portfolio
                .instrument_idx
                .insert(instrument.id.clone(), portfolio.instruments.len());
            portfolio.instruments.push(instrument);
        }

        for holding in holdings {
            if !portfolio.account_idx.contains_key(&holding.account) {
                warn!(
                    "Skipping holding of {}: unknown account {}",
                    holding.instrument, holding.account
                );
                continue;
            }
            if !portfolio.instrument_idx.contains_key(&holding.instrument) {
                warn!(
                    "Skipping holding in {}: unknown instrument {}",
                    holding.account, holding.instrument
                );
                continue;
            }
            portfolio.holdings.push(holding);
        }

        portfolio
    }

    pub fn instrument(&self, id: &str) -> Option<&Instrument> {
        self.instrument_idx.get(id).map(|&i| &self.instruments[i])
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.account_idx.get(id).map(|&i| &self.accounts[i])
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.category_idx.get(id).map(|&i| &self.categories[i])
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Total quantity of `instrument` across all accounts.
    pub fn total_quantity(&self, instrument: &str) -> f64 {
        self.holdings
            .iter()
            .filter(|h| h.instrument == instrument)
            .map(|h| h.quantity)
            .sum()
    }

    /// Summed quantity per instrument for the holdings inside `scope`,
    /// ordered by instrument id.
    pub fn quantities(&self, scope: &ValuationScope) -> BTreeMap<String, f64> {
        let mut quantities = BTreeMap::new();
        if let ValuationScope::Holding(id) = scope {
            let quantity = self.total_quantity(id);
            if quantity != 0.0 {
                quantities.insert(id.clone(), quantity);
            }
            return quantities;
        }
        for holding in self.holdings.iter().filter(|h| self.in_scope(h, scope)) {
            *quantities.entry(holding.instrument.clone()).or_insert(0.0) += holding.quantity;
        }
        quantities
    }

    fn in_scope(&self, holding: &Holding, scope: &ValuationScope) -> bool {
        match scope {
            ValuationScope::Portfolio => true,
            ValuationScope::Account(id) => &holding.account == id,
            ValuationScope::Holding(id) => &holding.instrument == id,
            ValuationScope::Category(id) => self
                .instrument(&holding.instrument)
                .and_then(|i| i.category.as_ref())
                .is_some_and(|category| category == id),
        }
    }
}
