// Field extraction pipeline: locate candidates, then derive year, brand and
// description from them.

pub mod brand;
pub mod description;
pub mod locator;
pub mod text;
pub mod year;

use once_cell::sync::Lazy;
use tracing::{debug, instrument};

use crate::config::ExtractionConfig;
use crate::error::{ExtractionIssue, Result};
use crate::types::{CandidateSource, NormalizedRecord, RawListing};

pub use brand::{BrandMatch, BrandMatchKind, BrandNormalizer};
pub use description::DescriptionComposer;
pub use locator::FieldLocator;
pub use year::{ResolvedYear, YearExtractor, YearResolution};

static DEFAULT_PIPELINE: Lazy<ExtractionPipeline> = Lazy::new(ExtractionPipeline::new);

/// Extract one listing with the built-in brand tables.
pub fn extract(listing: &RawListing) -> NormalizedRecord {
    DEFAULT_PIPELINE.extract(listing)
}

/// A record together with how it was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: NormalizedRecord,
    pub year_source: Option<CandidateSource>,
    pub brand_kind: Option<BrandMatchKind>,
    pub issues: Vec<ExtractionIssue>,
}

/// Runs the extractors over one listing at a time. Holds only compiled
/// patterns, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ExtractionPipeline {
    locator: FieldLocator,
    years: YearExtractor,
    brands: BrandNormalizer,
    descriptions: DescriptionComposer,
}

impl ExtractionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            brands: BrandNormalizer::with_extra_brands(
                &config.extra_multi_word_brands,
                &config.extra_single_word_brands,
            )?,
            ..Self::default()
        })
    }

    pub fn extract(&self, listing: &RawListing) -> NormalizedRecord {
        self.extract_with_report(listing).record
    }

    #[instrument(skip_all)]
    pub fn extract_with_report(&self, listing: &RawListing) -> Extraction {
        if listing.is_blank() {
            debug!("Blank listing, emitting empty record");
            return Extraction {
                record: NormalizedRecord::default(),
                year_source: None,
                brand_kind: None,
                issues: vec![ExtractionIssue::EmptyListing],
            };
        }

        let fields = self.locator.locate(listing);
        let mut issues = Vec::new();

        let resolution = self.years.extract(&fields);
        issues.extend(resolution.rejected.iter().cloned());
        if resolution.resolved.is_none() {
            issues.push(ExtractionIssue::AbsentField { field: "year" });
        }

        let (brand, description, brand_kind) =
            match fields.first(CandidateSource::BrandModelPhrase) {
                Some(candidate) => {
                    let phrase = candidate.matched_text.as_str();
                    let matched = self.brands.normalize(phrase);
                    if matched.kind == BrandMatchKind::Fallback {
                        issues.push(ExtractionIssue::UnrecognizedPattern {
                            phrase: phrase.to_string(),
                        });
                    }
                    (matched.brand, self.descriptions.compose(phrase), Some(matched.kind))
                }
                None => {
                    issues.push(ExtractionIssue::AbsentField {
                        field: CandidateSource::BrandModelPhrase.field_name(),
                    });
                    (String::new(), String::new(), None)
                }
            };

        let record = NormalizedRecord {
            brand,
            description,
            year: resolution.year(),
        };
        debug!(
            brand = %record.brand,
            year = ?record.year,
            issues = issues.len(),
            "Extracted listing"
        );

        Extraction {
            record,
            year_source: resolution.resolved.map(|r| r.source),
            brand_kind,
            issues,
        }
    }
}
