//! Selector-cascade extraction over parsed HTML.
//!
//! Card discovery and every per-field extraction run the same "ordered
//! candidates, first match wins" routine, parameterized per source and
//! field. Retailers rotate their markup frequently; the cascades carry each
//! known layout variant as data so a changed class name costs one list
//! entry, not new code. Missing fields yield documented defaults and never
//! abort a card.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

/// Ordered candidate selectors for one field, optionally reading an
/// attribute instead of text content.
#[derive(Debug, Clone, Copy)]
pub struct FieldCascade {
    pub selectors: &'static [&'static str],
    /// `None` reads trimmed text content; `Some(name)` reads the attribute.
    pub attr: Option<&'static str>,
}

impl FieldCascade {
    #[must_use]
    pub const fn text(selectors: &'static [&'static str]) -> Self {
        Self {
            selectors,
            attr: None,
        }
    }

    #[must_use]
    pub const fn attr(selectors: &'static [&'static str], attr: &'static str) -> Self {
        Self {
            selectors,
            attr: Some(attr),
        }
    }
}

/// Finds product card elements using an ordered candidate list.
///
/// Every candidate selector's matches are unioned in candidate order with
/// deduplication by element identity, so overlapping strategies (a broad
/// fallback after a specific one) keep first-seen page order and never
/// yield the same card twice.
#[must_use]
pub fn select_cards<'a>(doc: &'a Html, card_selectors: &[&str]) -> Vec<ElementRef<'a>> {
    let mut seen: HashSet<_> = HashSet::new();
    let mut cards = Vec::new();
    for candidate in card_selectors {
        let Ok(selector) = Selector::parse(candidate) else {
            tracing::debug!(candidate, "skipping unparseable card selector");
            continue;
        };
        for element in doc.select(&selector) {
            if seen.insert(element.id()) {
                cards.push(element);
            }
        }
    }
    cards
}

/// Extracts one field from a card: the first candidate selector yielding
/// non-empty text (or the configured attribute) wins. All-candidates-miss
/// returns `None`; the record layer substitutes the documented default.
#[must_use]
pub fn extract_field(card: ElementRef<'_>, cascade: &FieldCascade) -> Option<String> {
    for candidate in cascade.selectors {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        for element in card.select(&selector) {
            let value = match cascade.attr {
                Some(attr) => element.value().attr(attr).unwrap_or_default().to_owned(),
                None => element.text().collect::<String>(),
            };
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_owned());
            }
        }
    }
    None
}

/// Parses a price string like `"₹1,299"` or `"₹1,299.00"` to a float.
///
/// Strips everything except digits and `.`; a failed parse yields 0.
#[must_use]
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0).max(0.0)
}

/// Parses a rating from text like `"4.3 out of 5 stars"` or `"3.9"`.
///
/// First decimal-or-integer number wins, clamped to `0.0..=5.0`;
/// unmatched yields 0.
#[must_use]
pub fn parse_rating(text: &str) -> f64 {
    let re = regex::Regex::new(r"\d+(?:\.\d+)?").expect("valid regex");
    re.find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map_or(0.0, |r| r.clamp(0.0, 5.0))
}

/// Parses a review count from text like `"(12,483)"` or `"1,204 Reviews"`.
///
/// Strips all non-digits; unmatched yields 0.
#[must_use]
pub fn parse_review_count(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Parses an explicit discount badge like `"35% off"`.
///
/// Returns `None` when no integer-percent pattern is present, so the caller
/// can fall back to deriving the discount from the price pair.
#[must_use]
pub fn parse_discount_percent(text: &str) -> Option<u8> {
    let re = regex::Regex::new(r"(\d+)\s*%").expect("valid regex");
    let captured = re.captures(text)?.get(1)?.as_str();
    let pct: u64 = captured.parse().ok()?;
    Some(u8::try_from(pct.min(100)).expect("clamped to 100"))
}

#[cfg(test)]
#[path = "cascade_test.rs"]
mod tests;
