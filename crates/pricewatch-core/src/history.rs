//! Process-lifetime price history.
//!
//! The scraper itself holds nothing between calls; the caller feeds each
//! [`SearchResult`] into a [`PriceHistory`] to build per-product time
//! series. Everything lives in memory; there is no durable store.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{SearchResult, Source};

/// One observed price point for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HistoryKey {
    query: String,
    source: Source,
    product_id: String,
}

/// In-memory time series of observed prices, keyed by
/// (query, source, product id).
#[derive(Debug, Default)]
pub struct PriceHistory {
    series: HashMap<HistoryKey, Vec<PriceObservation>>,
}

impl PriceHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one observation per record in `result`, dated by the result's
    /// timestamp. A second observation for the same product on the same day
    /// overwrites the earlier one rather than appending.
    pub fn record(&mut self, query: &str, result: &SearchResult) {
        let date = result.timestamp.date_naive();
        for (source, records) in &result.results {
            for record in records {
                let key = HistoryKey {
                    query: query.to_owned(),
                    source: *source,
                    product_id: record.id.clone(),
                };
                let observations = self.series.entry(key).or_default();
                let observation = PriceObservation {
                    date,
                    price: record.price,
                };
                match observations.last_mut() {
                    Some(last) if last.date == date => *last = observation,
                    _ => observations.push(observation),
                }
            }
        }
    }

    /// The observation series for one product, oldest first.
    #[must_use]
    pub fn series(&self, query: &str, source: Source, product_id: &str) -> &[PriceObservation] {
        let key = HistoryKey {
            query: query.to_owned(),
            source,
            product_id: product_id.to_owned(),
        };
        self.series.get(&key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn tracked_products(&self) -> usize {
        self.series.len()
    }
}
