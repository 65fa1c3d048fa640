use once_cell::sync::Lazy;
use regex::Regex;

use crate::pipeline::text::strip_promotional;

static LONG_DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{5,}").unwrap());
static FOUR_DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
static REFERENCE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:ref|reference)[.:#]?$").unwrap());

/// Words that introduce a dial, colour or strap qualifier.
const QUALIFIER_WORDS: &[&str] = &["with", "w/"];

enum Segment<'a> {
    Keep,
    /// The token ends the retained segment; its text before an inline
    /// separator is kept.
    KeepPrefixThenStop(&'a str),
    Stop,
}

/// Derives a short brand+series description from a raw listing phrase.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptionComposer;

impl DescriptionComposer {
    pub fn new() -> Self {
        Self
    }

    /// Leading brand and collection words of the phrase, without reference
    /// numbers, qualifiers or sales copy. A phrase with no recognizable
    /// separator comes back whole.
    pub fn compose(&self, phrase: &str) -> String {
        let cleaned = strip_promotional(phrase);

        let mut kept: Vec<&str> = Vec::new();
        let mut separated = false;
        for token in cleaned.split(' ') {
            match classify(token) {
                Segment::Keep => kept.push(token),
                Segment::KeepPrefixThenStop(prefix) => {
                    if !prefix.is_empty() {
                        kept.push(prefix);
                    }
                    separated = true;
                    break;
                }
                Segment::Stop => {
                    separated = true;
                    break;
                }
            }
        }

        if !separated || kept.is_empty() {
            return cleaned;
        }

        kept.join(" ")
            .trim_end_matches([',', ';', ':', '-'])
            .trim()
            .to_string()
    }
}

fn classify(token: &str) -> Segment<'_> {
    let lower = token.to_lowercase();

    if (!token.is_empty() && token.chars().all(|c| matches!(c, '-' | '–' | '—' | '|')))
        || QUALIFIER_WORDS.contains(&lower.as_str())
        || REFERENCE_MARKER_RE.is_match(token)
        || is_reference_number(token)
    {
        return Segment::Stop;
    }

    match token.find([',', '|', '(']) {
        Some(at) => Segment::KeepPrefixThenStop(&token[..at]),
        None => Segment::Keep,
    }
}

/// Five or more digits in a row (116600, PAM01312), or four digits mixed
/// with letters or `/ . -` (5711/1A-010, 03.9300.3620/51.I001). Model
/// numbers such as "300M", "1950" or "4000" stay in the description.
fn is_reference_number(token: &str) -> bool {
    LONG_DIGIT_RUN_RE.is_match(token)
        || (FOUR_DIGIT_RUN_RE.is_match(token)
            && token
                .chars()
                .any(|c| c.is_alphabetic() || matches!(c, '/' | '.' | '-')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(phrase: &str) -> String {
        DescriptionComposer::new().compose(phrase)
    }

    #[test]
    fn test_cuts_at_reference_number() {
        assert_eq!(
            compose("Rolex Datejust Jubilee 278384RBR with a Pink dial"),
            "Rolex Datejust Jubilee"
        );
        assert_eq!(compose("Patek Philippe Nautilus 5711/1A-010"), "Patek Philippe Nautilus");
    }

    #[test]
    fn test_cuts_at_colour_qualifier_and_markers() {
        assert_eq!(
            compose("Omega Speedmaster Professional with Blue Dial"),
            "Omega Speedmaster Professional"
        );
        assert_eq!(compose("Tudor Black Bay Ref. M79230B"), "Tudor Black Bay");
        assert_eq!(compose("Cartier Santos - Medium"), "Cartier Santos");
        assert_eq!(compose("Hublot Big Bang (Full Set)"), "Hublot Big Bang");
        assert_eq!(compose("Hublot Big Bang(Full Set)"), "Hublot Big Bang");
    }

    #[test]
    fn test_model_numbers_stay_in_series() {
        assert_eq!(
            compose("Omega Seamaster Diver 300M Blue Dial"),
            "Omega Seamaster Diver 300M Blue Dial"
        );
        assert_eq!(compose("Omega Seamaster 300 Heritage"), "Omega Seamaster 300 Heritage");
        assert_eq!(compose("Panerai Luminor 1950 PAM01312"), "Panerai Luminor 1950");
        assert_eq!(compose("Rolex Sea-Dweller 4000 116600"), "Rolex Sea-Dweller 4000");
    }

    #[test]
    fn test_reference_number_shapes() {
        for token in ["116600", "278384RBR", "5711/1A-010", "5167A", "03.9300.3620/51.I001"] {
            assert!(is_reference_number(token), "{token}");
        }
        for token in ["300M", "1950", "4000", "50th", "Sea-Dweller", "II"] {
            assert!(!is_reference_number(token), "{token}");
        }
    }

    #[test]
    fn test_cuts_at_inline_comma() {
        assert_eq!(compose("Rolex Explorer II, Polar Dial"), "Rolex Explorer II");
    }

    #[test]
    fn test_no_separator_returns_phrase_unchanged() {
        assert_eq!(
            compose("Audemars Piguet Royal Oak 50th Anniversary Strap"),
            "Audemars Piguet Royal Oak 50th Anniversary Strap"
        );
    }

    #[test]
    fn test_strips_promotional_wrappers() {
        assert_eq!(
            compose("Looking to buy a Rolex Daytona 116500LN? WhatsApp Us for the best price!"),
            "Rolex Daytona"
        );
    }

    #[test]
    fn test_leading_reference_keeps_whole_phrase() {
        assert_eq!(compose("126610LN Submariner Date"), "126610LN Submariner Date");
        assert_eq!(compose("   "), "");
    }
}
