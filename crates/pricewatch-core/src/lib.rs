use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod history;
pub mod record;

pub use history::{PriceHistory, PriceObservation};
pub use record::{discount_from_prices, ProductRecord, SearchResult};

/// A retailer whose search results are scraped.
///
/// Order matters: [`Source::ALL`] is the fixed order in which the aggregator
/// visits sources, and `Ord` on this enum matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Amazon,
    Flipkart,
    Meesho,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Amazon, Source::Flipkart, Source::Meesho];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Amazon => "amazon",
            Source::Flipkart => "flipkart",
            Source::Meesho => "meesho",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown source \"{0}\" (expected amazon, flipkart, or meesho)")]
pub struct ParseSourceError(String);

impl FromStr for Source {
    type Err = ParseSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amazon" => Ok(Source::Amazon),
            "flipkart" => Ok(Source::Flipkart),
            "meesho" => Ok(Source::Meesho),
            other => Err(ParseSourceError(other.to_owned())),
        }
    }
}
