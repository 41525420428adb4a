//! Normalized product records and the per-search aggregate result.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Source;

/// One product listing, normalized from a single search-result card.
///
/// Constructed once per scrape pass and immutable afterwards. Records from
/// different sources are never merged: the same physical product listed on
/// two retailers stays two records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Source-scoped identifier, derived from the product URL where the
    /// source's URL pattern allows it, else a generated surrogate. Stable
    /// across repeated scrapes of the same listing so price history can be
    /// correlated.
    pub id: String,
    /// Display name. Never empty — nameless cards are dropped at parse time.
    pub name: String,
    /// Current price in the source's native currency.
    pub price: f64,
    /// Pre-discount price. Always `>= price` (clamped during assembly).
    pub original_price: f64,
    /// Integer percentage in `0..=100`.
    pub discount_percent: u8,
    /// Star rating in `0.0..=5.0`; `0.0` when absent or unparseable.
    pub rating: f64,
    /// `0` when absent or unparseable.
    pub review_count: u64,
    /// Absolute product page URL.
    pub url: String,
    /// Product image URL; empty string when unavailable.
    pub image_url: String,
    pub source: Source,
}

/// Derives a discount percentage from a price pair.
///
/// `round((original - price) / original * 100)` when `original > price`
/// and both are positive; `0` otherwise. Used only when the card carries no
/// explicit discount element.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn discount_from_prices(price: f64, original_price: f64) -> u8 {
    if original_price > price && price > 0.0 && original_price > 0.0 {
        let pct = ((original_price - price) / original_price * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

/// The unified result of one aggregated search: per-source record lists in
/// page order, stamped with the scrape wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Records keyed by source. Every configured source has an entry, empty
    /// when that source yielded nothing.
    pub results: BTreeMap<Source, Vec<ProductRecord>>,
    pub timestamp: DateTime<Utc>,
    /// Advisory message set when every source came back empty. The caller
    /// decides whether that is a user-facing error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    /// An all-empty result for the given sources, stamped now.
    #[must_use]
    pub fn empty(sources: &[Source]) -> Self {
        Self {
            results: sources.iter().map(|s| (*s, Vec::new())).collect(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_rounds_to_nearest_integer() {
        // (1999 - 1299) / 1999 * 100 = 35.017... -> 35
        assert_eq!(discount_from_prices(1299.0, 1999.0), 35);
    }

    #[test]
    fn discount_zero_when_no_markdown() {
        assert_eq!(discount_from_prices(500.0, 500.0), 0);
        assert_eq!(discount_from_prices(500.0, 400.0), 0);
    }

    #[test]
    fn discount_zero_for_non_positive_prices() {
        assert_eq!(discount_from_prices(0.0, 100.0), 0);
        assert_eq!(discount_from_prices(100.0, 0.0), 0);
    }

    #[test]
    fn discount_never_exceeds_100() {
        assert_eq!(discount_from_prices(0.01, 1_000_000.0), 100);
    }

    #[test]
    fn empty_result_has_entry_per_source_and_timestamp() {
        let result = SearchResult::empty(&Source::ALL);
        assert_eq!(result.results.len(), Source::ALL.len());
        assert!(result.is_empty());
        assert!(result.results.values().all(Vec::is_empty));
    }

    #[test]
    fn error_field_omitted_from_json_when_absent() {
        let result = SearchResult::empty(&[Source::Amazon]);
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"amazon\""));
    }
}
