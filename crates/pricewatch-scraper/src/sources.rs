//! Per-retailer scraping configuration.
//!
//! Each retailer's quirks — URL variants, selector cascades, sponsored-card
//! markers, ID-extraction patterns, tier order — live here as data. One
//! parameterized [`crate::SourceScraper`] consumes these specs; there is no
//! per-retailer scraping code.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pricewatch_core::Source;

use crate::cascade::FieldCascade;

/// One fallback strategy in a source's ordered fetch chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Headless-browser render (JS-heavy pages, softer bot defenses).
    Render,
    /// Plain HTTP fetch through the transport layer.
    Http,
}

/// Characters left bare when encoding a search query into a URL.
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Static configuration for one retailer.
///
/// All fields are compiled-in data; the only runtime-mutable piece is the
/// base URL, overridable so tests can point a spec at a local mock server.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub source: Source,
    base_url: String,
    /// Fallback chain, tried in order.
    pub tiers: &'static [Tier],
    /// Candidate search paths (desktop), `{query}` substituted URL-encoded.
    search_paths: &'static [&'static str],
    /// Alternate candidate paths for the mobile variant.
    mobile_search_paths: &'static [&'static str],
    pub card_selectors: &'static [&'static str],
    /// A match inside a card marks it as a sponsored/ad placement.
    pub sponsored_selectors: &'static [&'static str],
    /// Literal text anywhere in the card that marks it sponsored.
    pub sponsored_text: Option<&'static str>,
    pub name: FieldCascade,
    pub link: FieldCascade,
    pub price: FieldCascade,
    pub original_price: FieldCascade,
    pub discount: FieldCascade,
    pub rating: FieldCascade,
    pub reviews: FieldCascade,
    pub image: FieldCascade,
    /// Card attribute carrying the product ID directly, tried first.
    pub id_attr: Option<&'static str>,
    /// URL patterns with the ID in capture group 1, tried in order.
    pub id_patterns: &'static [&'static str],
    /// Pattern substitution upgrading image URLs to a higher-res variant.
    pub image_upgrade: Option<(&'static str, &'static str)>,
    /// Load-shedding: skip this source unless an earlier one yielded
    /// results. Reserved for fragile/expensive targets.
    pub load_shed: bool,
}

impl SourceSpec {
    /// Amazon India search results.
    #[must_use]
    pub fn amazon() -> Self {
        Self {
            source: Source::Amazon,
            base_url: "https://www.amazon.in".to_owned(),
            tiers: &[Tier::Render, Tier::Http],
            search_paths: &[
                "/s?k={query}",
                "/s?rh=k%3A{query}",
                "/s/ref=nb_sb_noss?field-keywords={query}",
            ],
            mobile_search_paths: &["/gp/aw/s?k={query}"],
            card_selectors: &[
                "div[data-component-type='s-search-result']",
                "div.s-result-item",
            ],
            sponsored_selectors: &[
                ".s-sponsored-label-info-icon",
                "span.puis-sponsored-label-text",
            ],
            sponsored_text: Some("Sponsored"),
            name: FieldCascade::text(&["h2 a span", "h2 span", "span.a-text-normal"]),
            link: FieldCascade::attr(&["h2 a", "a.a-link-normal.s-no-outline"], "href"),
            price: FieldCascade::text(&[
                "span.a-price > span.a-offscreen",
                "span.a-price-whole",
            ]),
            original_price: FieldCascade::text(&[
                "span.a-price.a-text-price > span.a-offscreen",
                "span.a-text-price",
            ]),
            discount: FieldCascade::text(&[]),
            rating: FieldCascade::text(&["span.a-icon-alt"]),
            reviews: FieldCascade::text(&["span.a-size-base.s-underline-text"]),
            image: FieldCascade::attr(&["img.s-image"], "src"),
            id_attr: Some("data-asin"),
            id_patterns: &[r"/dp/([A-Z0-9]{10})", r"/gp/product/([A-Z0-9]{10})"],
            image_upgrade: Some((r"_AC_UL\d+_", "_AC_UL500_")),
            load_shed: false,
        }
    }

    /// Flipkart search results.
    #[must_use]
    pub fn flipkart() -> Self {
        Self {
            source: Source::Flipkart,
            base_url: "https://www.flipkart.com".to_owned(),
            tiers: &[Tier::Render, Tier::Http],
            search_paths: &["/search?q={query}"],
            mobile_search_paths: &["/search?q={query}&marketplace=FLIPKART"],
            card_selectors: &["div._1AtVbE", "div._4ddWXP", "div._2kHMtA"],
            sponsored_selectors: &[],
            sponsored_text: Some("Sponsored"),
            name: FieldCascade::text(&["div._4rR01T", "a.s1Q9rs", "a.IRpwTa"]),
            link: FieldCascade::attr(&["a._1fQZEK", "a._2rpwqI", "a.s1Q9rs"], "href"),
            price: FieldCascade::text(&["div._30jeq3"]),
            original_price: FieldCascade::text(&["div._3I9_wc"]),
            discount: FieldCascade::text(&["div._3Ay6Sb"]),
            rating: FieldCascade::text(&["div._3LWZlK"]),
            reviews: FieldCascade::text(&["span._2_R_DZ"]),
            image: FieldCascade::attr(&["img._396cs4", "img._2r_T1I"], "src"),
            id_attr: None,
            id_patterns: &[r"/p/([a-zA-Z0-9]+)", r"pid=([a-zA-Z0-9]+)"],
            image_upgrade: None,
            load_shed: false,
        }
    }

    /// Meesho search results. HTTP-only and load-shed: only scraped when a
    /// primary source already yielded something.
    #[must_use]
    pub fn meesho() -> Self {
        Self {
            source: Source::Meesho,
            base_url: "https://www.meesho.com".to_owned(),
            tiers: &[Tier::Http],
            search_paths: &["/search?q={query}"],
            mobile_search_paths: &["/search?q={query}"],
            card_selectors: &[
                "div[data-testid='product-card']",
                "a[href*='/product/']",
            ],
            sponsored_selectors: &["span[data-testid='sponsored-tag']"],
            sponsored_text: None,
            name: FieldCascade::text(&[
                "p[data-testid='product-name']",
                "div.product-name",
                "h4",
            ]),
            link: FieldCascade::attr(&["a[href*='/product/']"], "href"),
            price: FieldCascade::text(&[
                "h5[data-testid='product-price']",
                "span.actual-price",
                "h5",
            ]),
            original_price: FieldCascade::text(&[
                "span[data-testid='product-strike-price']",
                "span.strike-price",
            ]),
            discount: FieldCascade::text(&["span[data-testid='product-discount']"]),
            rating: FieldCascade::text(&["span.catalog-rating", "span.rating"]),
            reviews: FieldCascade::text(&["span.catalog-reviews"]),
            image: FieldCascade::attr(&["img"], "src"),
            id_attr: None,
            id_patterns: &[r"/product/([a-zA-Z0-9-]+)"],
            image_upgrade: None,
            load_shed: true,
        }
    }

    /// All configured retailers in aggregation order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        vec![Self::amazon(), Self::flipkart(), Self::meesho()]
    }

    /// Points this spec at a different origin. Test hook — search paths and
    /// selector cascades are unchanged.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Candidate search URLs for `query`, in fallback order.
    #[must_use]
    pub fn search_urls(&self, query: &str, mobile: bool) -> Vec<String> {
        let encoded = utf8_percent_encode(query, QUERY_SAFE).to_string();
        let paths = if mobile {
            self.mobile_search_paths
        } else {
            self.search_paths
        };
        paths
            .iter()
            .map(|path| format!("{}{}", self.base_url(), path.replace("{query}", &encoded)))
            .collect()
    }

    /// Extracts the source-scoped product ID from a product URL.
    #[must_use]
    pub fn id_from_url(&self, url: &str) -> Option<String> {
        for pattern in self.id_patterns {
            let re = regex::Regex::new(pattern).expect("valid ID pattern");
            if let Some(captures) = re.captures(url) {
                if let Some(m) = captures.get(1) {
                    return Some(m.as_str().to_owned());
                }
            }
        }
        None
    }

    /// Resolves a possibly-relative href against this source's origin.
    #[must_use]
    pub fn resolve_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_owned()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url(), href)
        } else {
            format!("{}/{}", self.base_url(), href)
        }
    }
}
