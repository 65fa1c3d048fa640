//! Small text helpers shared by the brand and description extractors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{PROMO_LEAD_PATTERN, PROMO_TAIL_PATTERN};

static PROMO_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(PROMO_LEAD_PATTERN).unwrap());
static PROMO_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(PROMO_TAIL_PATTERN).unwrap());

/// Collapse runs of whitespace (including newlines and nbsp) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove "Looking to buy ..." / "... WhatsApp Us ..." style sales copy and
/// trailing sentence punctuation, leaving the product phrase itself.
pub fn strip_promotional(phrase: &str) -> String {
    let collapsed = collapse_whitespace(phrase);
    let without_lead = PROMO_LEAD.replace(&collapsed, "");
    let without_tail = PROMO_TAIL.replace(&without_lead, "");
    without_tail
        .trim()
        .trim_end_matches(['?', '!', '.', ',', ';', ':'])
        .trim()
        .to_string()
}
