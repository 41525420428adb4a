use super::*;

const FIXTURE: &str = r#"
<html><body>
  <div class="grid">
    <div class="card" id="c1">
      <h2><a href="/dp/B0AAAA1111"><span>Steel Water Bottle 1L</span></a></h2>
      <span class="price">₹1,299</span>
      <span class="strike">₹1,999</span>
    </div>
    <div class="card alt" id="c2">
      <h2><a href="/dp/B0BBBB2222"><span>Copper Bottle 900ml</span></a></h2>
      <span class="price">₹849</span>
    </div>
    <div class="promo" id="c3">
      <h2><a href="/dp/B0CCCC3333"><span>Bottle Cleaning Brush</span></a></h2>
      <span class="price">₹199</span>
    </div>
  </div>
</body></html>
"#;

// -------------------------------------------------------------------------
// select_cards
// -------------------------------------------------------------------------

#[test]
fn first_selector_finds_cards_in_page_order() {
    let doc = Html::parse_document(FIXTURE);
    let cards = select_cards(&doc, &["div.card"]);
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].value().attr("id"), Some("c1"));
    assert_eq!(cards[1].value().attr("id"), Some("c2"));
}

#[test]
fn later_strategies_are_unioned_with_dedup() {
    let doc = Html::parse_document(FIXTURE);
    // "div.card" matches c1+c2; "div.alt" re-matches c2; "div.promo" adds c3.
    let cards = select_cards(&doc, &["div.card", "div.alt", "div.promo"]);
    let ids: Vec<_> = cards
        .iter()
        .map(|c| c.value().attr("id").unwrap())
        .collect();
    assert_eq!(ids, ["c1", "c2", "c3"], "dedup keeps first-seen order");
}

#[test]
fn unmatched_selectors_yield_no_cards() {
    let doc = Html::parse_document(FIXTURE);
    assert!(select_cards(&doc, &["div.widget", "section.results"]).is_empty());
}

#[test]
fn repeated_parses_yield_identical_order() {
    // Order preservation: same fixture, same selector list, same sequence.
    let doc = Html::parse_document(FIXTURE);
    let first: Vec<_> = select_cards(&doc, &["div.promo", "div.card"])
        .iter()
        .map(|c| c.value().attr("id").unwrap().to_owned())
        .collect();
    for _ in 0..5 {
        let again: Vec<_> = select_cards(&doc, &["div.promo", "div.card"])
            .iter()
            .map(|c| c.value().attr("id").unwrap().to_owned())
            .collect();
        assert_eq!(again, first);
    }
}

// -------------------------------------------------------------------------
// extract_field
// -------------------------------------------------------------------------

fn first_card(doc: &Html) -> ElementRef<'_> {
    let sel = Selector::parse("div.card").unwrap();
    doc.select(&sel).next().unwrap()
}

#[test]
fn first_matching_candidate_wins() {
    let doc = Html::parse_document(FIXTURE);
    let card = first_card(&doc);
    let cascade = FieldCascade::text(&["span.missing", "span.price"]);
    assert_eq!(extract_field(card, &cascade).as_deref(), Some("₹1,299"));
}

#[test]
fn attribute_cascade_reads_attr_not_text() {
    let doc = Html::parse_document(FIXTURE);
    let card = first_card(&doc);
    let cascade = FieldCascade::attr(&["h2 a"], "href");
    assert_eq!(
        extract_field(card, &cascade).as_deref(),
        Some("/dp/B0AAAA1111")
    );
}

#[test]
fn all_candidates_missing_returns_none_every_time() {
    let doc = Html::parse_document(FIXTURE);
    let card = first_card(&doc);
    let cascade = FieldCascade::text(&["span.rating", "div.stars"]);
    // No randomness in failure paths.
    for _ in 0..10 {
        assert_eq!(extract_field(card, &cascade), None);
    }
}

#[test]
fn whitespace_only_text_does_not_win() {
    let html = r"<div class='c'><span class='a'>   </span><span class='b'>real</span></div>";
    let doc = Html::parse_document(html);
    let sel = Selector::parse("div.c").unwrap();
    let card = doc.select(&sel).next().unwrap();
    let cascade = FieldCascade::text(&["span.a", "span.b"]);
    assert_eq!(extract_field(card, &cascade).as_deref(), Some("real"));
}

// -------------------------------------------------------------------------
// numeric normalization
// -------------------------------------------------------------------------

#[test]
fn price_strips_currency_and_thousands_separators() {
    assert!((parse_price("₹1,299") - 1299.0).abs() < f64::EPSILON);
    assert!((parse_price("₹1,999.00") - 1999.0).abs() < f64::EPSILON);
    assert!((parse_price("849") - 849.0).abs() < f64::EPSILON);
}

#[test]
fn price_keeps_every_dot_including_abbreviations() {
    // Only digits and '.' survive the strip, so "Rs." leaves a leading dot.
    assert!((parse_price("Rs. 849") - 0.849).abs() < f64::EPSILON);
}

#[test]
fn unparseable_price_defaults_to_zero() {
    assert!(parse_price("").abs() < f64::EPSILON);
    assert!(parse_price("price unavailable").abs() < f64::EPSILON);
    // Indian-format lakh separators collapse to plain digits.
    assert!((parse_price("₹1,29,999") - 129_999.0).abs() < f64::EPSILON);
}

#[test]
fn rating_takes_first_number_and_clamps() {
    assert!((parse_rating("4.3 out of 5 stars") - 4.3).abs() < f64::EPSILON);
    assert!((parse_rating("3") - 3.0).abs() < f64::EPSILON);
    assert!((parse_rating("9.9") - 5.0).abs() < f64::EPSILON, "clamped to 5");
    assert!(parse_rating("no ratings yet").abs() < f64::EPSILON);
}

#[test]
fn review_count_strips_non_digits() {
    assert_eq!(parse_review_count("(12,483)"), 12_483);
    assert_eq!(parse_review_count("1,204 Reviews"), 1204);
    assert_eq!(parse_review_count("be the first to review"), 0);
}

#[test]
fn explicit_discount_badge_parses_integer_percent() {
    assert_eq!(parse_discount_percent("35% off"), Some(35));
    assert_eq!(parse_discount_percent("(70 % OFF)"), Some(70));
    assert_eq!(parse_discount_percent("special price"), None);
    assert_eq!(parse_discount_percent("150% off"), Some(100), "clamped");
}
