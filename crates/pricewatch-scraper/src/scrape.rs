//! Parameterized per-source scraper.
//!
//! One `SourceScraper` serves every retailer; the retailer's quirks come in
//! through its [`SourceSpec`]. The fetch side walks the spec's tier chain
//! (render, then plain HTTP) across candidate URL variants; the parse side
//! runs the selector cascades over whichever body was fetched first.
//! `scrape` never errors — total failure for a source is an empty list.

use pricewatch_core::{discount_from_prices, ProductRecord};
use scraper::{ElementRef, Html, Selector};

use crate::cascade::{
    extract_field, parse_discount_percent, parse_price, parse_rating, parse_review_count,
    select_cards,
};
use crate::error::ScrapeError;
use crate::render::Renderer;
use crate::sources::{SourceSpec, Tier};
use crate::transport::{looks_like_challenge, Transport};

pub struct SourceScraper {
    spec: SourceSpec,
    transport: Transport,
    renderer: Renderer,
}

impl SourceScraper {
    #[must_use]
    pub fn new(spec: SourceSpec, transport: Transport) -> Self {
        Self {
            spec,
            transport,
            renderer: Renderer::new(),
        }
    }

    #[must_use]
    pub fn spec(&self) -> &SourceSpec {
        &self.spec
    }

    /// Scrapes search results for `query`, returning at most `limit`
    /// accepted records in page order. An empty list signals total failure
    /// for this source; no error ever escapes.
    pub async fn scrape(&self, query: &str, limit: usize, mobile: bool) -> Vec<ProductRecord> {
        let urls = self.spec.search_urls(query, mobile);

        for tier in self.spec.tiers {
            for url in &urls {
                match self.fetch_via(*tier, url).await {
                    Ok(html) => {
                        tracing::debug!(
                            source = %self.spec.source,
                            url,
                            tier = ?tier,
                            "fetched search results"
                        );
                        return self.parse_records(&html, limit);
                    }
                    Err(ScrapeError::RendererUnavailable { reason }) => {
                        tracing::debug!(
                            source = %self.spec.source,
                            reason,
                            "render tier unavailable — degrading to next tier"
                        );
                        break;
                    }
                    Err(ScrapeError::ChallengeDetected { .. }) => {
                        tracing::warn!(
                            source = %self.spec.source,
                            url,
                            tier = ?tier,
                            "bot challenge served — falling through to next tier"
                        );
                        break;
                    }
                    Err(err) => {
                        tracing::debug!(
                            source = %self.spec.source,
                            url,
                            tier = ?tier,
                            error = %err,
                            "fetch failed — trying next URL variant"
                        );
                    }
                }
            }
        }

        tracing::warn!(source = %self.spec.source, query, "every tier and URL variant failed");
        Vec::new()
    }

    async fn fetch_via(&self, tier: Tier, url: &str) -> Result<String, ScrapeError> {
        match tier {
            Tier::Render => {
                let html = self.renderer.render(url).await?;
                // The renderer checks markers itself, but a rendered body
                // can still carry an inline challenge frame.
                if looks_like_challenge(&html) {
                    return Err(ScrapeError::ChallengeDetected {
                        url: url.to_owned(),
                    });
                }
                Ok(html)
            }
            Tier::Http => self.transport.fetch(url).await,
        }
    }

    /// Parses a fetched results page into accepted records, capped at
    /// `limit`. Sponsored cards are excluded before field extraction; cards
    /// lacking a name or a positive price are dropped and counted only.
    fn parse_records(&self, html: &str, limit: usize) -> Vec<ProductRecord> {
        let doc = Html::parse_document(html);
        let cards = select_cards(&doc, self.spec.card_selectors);

        let mut records: Vec<ProductRecord> = Vec::new();
        let mut rejected = 0usize;
        let mut sponsored = 0usize;

        for card in cards {
            if records.len() >= limit {
                break;
            }
            if self.is_sponsored(card) {
                sponsored += 1;
                continue;
            }
            match self.record_from_card(card, records.len()) {
                Some(record) => records.push(record),
                None => rejected += 1,
            }
        }

        tracing::debug!(
            source = %self.spec.source,
            accepted = records.len(),
            rejected,
            sponsored,
            "parsed result cards"
        );
        records
    }

    fn is_sponsored(&self, card: ElementRef<'_>) -> bool {
        for candidate in self.spec.sponsored_selectors {
            let Ok(selector) = Selector::parse(candidate) else {
                continue;
            };
            if card.select(&selector).next().is_some() {
                return true;
            }
        }
        if let Some(marker) = self.spec.sponsored_text {
            if card.text().any(|t| t.contains(marker)) {
                return true;
            }
        }
        false
    }

    /// Assembles one record from a card, or `None` when the card lacks the
    /// mandatory fields (non-empty name, positive price).
    fn record_from_card(&self, card: ElementRef<'_>, index: usize) -> Option<ProductRecord> {
        let spec = &self.spec;

        let name = extract_field(card, &spec.name)?;

        // Some layouts make the whole card the anchor (Meesho's grid), so
        // the card's own href is the last link candidate. The link is
        // treated as mandatory alongside name and price: without a product
        // URL the record has no ID source and nothing to verify or revisit.
        let href = extract_field(card, &spec.link)
            .or_else(|| card.value().attr("href").map(str::to_owned))?;
        let url = spec.resolve_url(&href);

        let price = extract_field(card, &spec.price).map_or(0.0, |t| parse_price(&t));
        if price <= 0.0 {
            return None;
        }

        // Clamp: a strike-through lower than the selling price is bad data.
        let original_price = extract_field(card, &spec.original_price)
            .map_or(price, |t| parse_price(&t))
            .max(price);

        // Explicit discount badge first, else derive from the price pair.
        let discount_percent = extract_field(card, &spec.discount)
            .and_then(|t| parse_discount_percent(&t))
            .unwrap_or_else(|| discount_from_prices(price, original_price));

        let rating = extract_field(card, &spec.rating).map_or(0.0, |t| parse_rating(&t));
        let review_count =
            extract_field(card, &spec.reviews).map_or(0, |t| parse_review_count(&t));

        let image_url = extract_field(card, &spec.image)
            .map(|u| self.upgrade_image(&u))
            .unwrap_or_default();

        let id = spec
            .id_attr
            .and_then(|attr| card.value().attr(attr))
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .or_else(|| spec.id_from_url(&url))
            .unwrap_or_else(|| format!("{}-{}", spec.source, index));

        Some(ProductRecord {
            id,
            name,
            price,
            original_price,
            discount_percent,
            rating,
            review_count,
            url,
            image_url,
            source: spec.source,
        })
    }

    fn upgrade_image(&self, url: &str) -> String {
        match self.spec.image_upgrade {
            Some((pattern, replacement)) => {
                let re = regex::Regex::new(pattern).expect("valid image pattern");
                re.replace(url, replacement).into_owned()
            }
            None => url.to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
