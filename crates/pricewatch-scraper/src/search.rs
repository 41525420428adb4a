//! Multi-source search aggregation.
//!
//! One [`Aggregator`] owns a scraper per configured retailer and visits
//! them sequentially, collecting per-source record lists into a single
//! [`SearchResult`]. A source failing is never fatal to the search: its
//! entry is simply empty. Only when every source comes back empty is an
//! advisory message attached.

use chrono::Utc;
use pricewatch_core::{SearchResult, Source};

use crate::scrape::SourceScraper;
use crate::sources::SourceSpec;
use crate::transport::Transport;

/// Queries shorter than this are rejected without touching the network.
const MIN_QUERY_CHARS: usize = 2;

/// Advisory attached when no source yields a single record.
const EMPTY_SEARCH_MESSAGE: &str = "no products found from any source";

pub struct Aggregator {
    scrapers: Vec<SourceScraper>,
}

impl Aggregator {
    /// Builds the default retailer set, all sharing one transport pool.
    #[must_use]
    pub fn new(transport: &Transport) -> Self {
        let scrapers = SourceSpec::all()
            .into_iter()
            .map(|spec| SourceScraper::new(spec, transport.clone()))
            .collect();
        Self { scrapers }
    }

    /// Builds an aggregator over an explicit scraper set, in visit order.
    #[must_use]
    pub fn from_scrapers(scrapers: Vec<SourceScraper>) -> Self {
        Self { scrapers }
    }

    fn sources(&self) -> Vec<Source> {
        self.scrapers.iter().map(|s| s.spec().source).collect()
    }

    /// Runs one aggregated search across every configured source.
    ///
    /// Sources are visited sequentially in configuration order so that
    /// rate-limit pressure on any one retailer stays serialized. Sources
    /// marked load-shed are skipped entirely unless an earlier source
    /// already produced records.
    pub async fn search(&self, query: &str, limit: usize, mobile: bool) -> SearchResult {
        let query = query.trim();
        let sources = self.sources();

        if query.chars().count() < MIN_QUERY_CHARS {
            tracing::debug!(query, "query below minimum length, skipping search");
            return SearchResult::empty(&sources);
        }

        let mut result = SearchResult::empty(&sources);
        for scraper in &self.scrapers {
            let spec = scraper.spec();
            if spec.load_shed && result.total_records() == 0 {
                tracing::debug!(
                    source = %spec.source,
                    "load-shedding: no results yet from primary sources"
                );
                continue;
            }

            let records = scraper.scrape(query, limit, mobile).await;
            tracing::info!(
                source = %spec.source,
                query,
                count = records.len(),
                "source scrape finished"
            );
            result.results.insert(spec.source, records);
        }

        result.timestamp = Utc::now();
        if result.is_empty() {
            result.error = Some(EMPTY_SEARCH_MESSAGE.to_owned());
        }
        result
    }
}
