use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::constants::{YEAR_MAX, YEAR_MIN};
use crate::error::ExtractionIssue;
use crate::types::{CandidateSource, ExtractionCandidate, LocatedFields};

/// Year-bearing sources, primary first. The first source yielding a valid
/// year wins.
const YEAR_SOURCES: [CandidateSource; 3] = [
    CandidateSource::DateOfPurchase,
    CandidateSource::StructuredData,
    CandidateSource::FreeTextYear,
];

/// Full dates seen on product pages and in JSON-LD.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d/%m/%Y",
];

/// Month-and-year values ("May 2024") are parsed with a day prepended.
const MONTH_YEAR_FORMATS: &[&str] = &["%d %B %Y", "%d %b %Y"];

static FOUR_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedYear {
    pub year: i32,
    pub source: CandidateSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearResolution {
    pub resolved: Option<ResolvedYear>,
    /// Candidates discarded for falling outside the accepted range.
    pub rejected: Vec<ExtractionIssue>,
}

impl YearResolution {
    pub fn year(&self) -> Option<i32> {
        self.resolved.map(|r| r.year)
    }
}

/// Derives a validated year from located candidates.
#[derive(Debug, Default, Clone, Copy)]
pub struct YearExtractor;

impl YearExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, fields: &LocatedFields) -> YearResolution {
        let mut rejected = Vec::new();
        let resolved = YEAR_SOURCES
            .iter()
            .find_map(|&source| self.first_valid(fields, source, &mut rejected));

        YearResolution { resolved, rejected }
    }

    fn first_valid(
        &self,
        fields: &LocatedFields,
        source: CandidateSource,
        rejected: &mut Vec<ExtractionIssue>,
    ) -> Option<ResolvedYear> {
        for candidate in fields.for_source(source) {
            let Some(year) = candidate_year(candidate) else {
                debug!(source = ?source, text = %candidate.matched_text, "No year in candidate");
                continue;
            };

            if is_valid_year(year) {
                debug!(source = ?source, year, "Accepted year");
                return Some(ResolvedYear { year, source });
            }

            debug!(source = ?source, year, "Discarding out-of-range year");
            rejected.push(ExtractionIssue::OutOfRangeValue { origin: source, value: year });
        }
        None
    }
}

pub fn is_valid_year(year: i32) -> bool {
    (YEAR_MIN..=YEAR_MAX).contains(&year)
}

fn candidate_year(candidate: &ExtractionCandidate) -> Option<i32> {
    match candidate.source {
        CandidateSource::DateOfPurchase | CandidateSource::StructuredData => {
            year_from_date_text(&candidate.matched_text)
        }
        CandidateSource::FreeTextYear => candidate.matched_text.trim().parse().ok(),
        CandidateSource::BrandModelPhrase => None,
    }
}

/// Year of a free-form date value: a real date parse first, then the first
/// standalone four-digit token.
pub fn year_from_date_text(text: &str) -> Option<i32> {
    let text = text.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.year());
        }
    }

    let with_day = format!("1 {text}");
    for format in MONTH_YEAR_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&with_day, format) {
            return Some(date.year());
        }
    }

    FOUR_DIGIT_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|token| token.as_str().parse().ok())
}
