use serde::{Deserialize, Serialize};

/// One fetched product page plus the card text it was linked from on the
/// listing page. Both parts may be HTML or plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub page_html: String,
    pub snippet: String,
}

impl RawListing {
    pub fn new(page_html: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            page_html: page_html.into(),
            snippet: snippet.into(),
        }
    }

    /// True when neither the page nor the snippet carries any content.
    pub fn is_blank(&self) -> bool {
        self.page_html.trim().is_empty() && self.snippet.trim().is_empty()
    }
}

/// Logical field a candidate was located for.
///
/// Declaration order is source priority: candidates sort by this first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CandidateSource {
    DateOfPurchase,
    StructuredData,
    FreeTextYear,
    BrandModelPhrase,
}

impl CandidateSource {
    pub fn field_name(&self) -> &'static str {
        match self {
            CandidateSource::DateOfPurchase => "date_of_purchase",
            CandidateSource::StructuredData => "structured_data",
            CandidateSource::FreeTextYear => "free_text_year",
            CandidateSource::BrandModelPhrase => "brand_model_phrase",
        }
    }
}

/// A located, unvalidated substring proposed as the value of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCandidate {
    pub source: CandidateSource,
    pub matched_text: String,
    /// Byte offset for pattern searches over text; element or block index for
    /// selector searches (headings, meta tags, JSON-LD scripts).
    pub position: usize,
}

impl ExtractionCandidate {
    pub fn new(source: CandidateSource, matched_text: impl Into<String>, position: usize) -> Self {
        Self {
            source,
            matched_text: matched_text.into(),
            position,
        }
    }
}

/// Every candidate found for one listing, ordered by source priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatedFields {
    candidates: Vec<ExtractionCandidate>,
}

impl LocatedFields {
    pub fn new(mut candidates: Vec<ExtractionCandidate>) -> Self {
        // Stable sort keeps the locator's search order within a source.
        candidates.sort_by_key(|c| c.source);
        Self { candidates }
    }

    pub fn all(&self) -> &[ExtractionCandidate] {
        &self.candidates
    }

    pub fn for_source(&self, source: CandidateSource) -> impl Iterator<Item = &ExtractionCandidate> {
        self.candidates.iter().filter(move |c| c.source == source)
    }

    pub fn first(&self, source: CandidateSource) -> Option<&ExtractionCandidate> {
        self.for_source(source).next()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// The normalized attributes of one listing, as handed to the serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub brand: String,
    pub description: String,
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_absent_year_as_null() {
        let record = NormalizedRecord {
            brand: "ROLEX".to_string(),
            description: "Rolex Datejust Jubilee".to_string(),
            year: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "brand": "ROLEX",
                "description": "Rolex Datejust Jubilee",
                "year": null
            })
        );
    }

    #[test]
    fn test_record_reads_back_from_json_lines() {
        let record: NormalizedRecord =
            serde_json::from_str(r#"{"brand": "OMEGA", "description": "Omega Seamaster 300 Heritage", "year": 1957}"#)
                .unwrap();
        assert_eq!(record.year, Some(1957));

        let without_year: NormalizedRecord =
            serde_json::from_str(r#"{"brand": "", "description": "", "year": null}"#).unwrap();
        assert_eq!(without_year, NormalizedRecord::default());
    }

    #[test]
    fn test_located_fields_orders_by_source_not_position() {
        let fields = LocatedFields::new(vec![
            ExtractionCandidate::new(CandidateSource::FreeTextYear, "1999", 3),
            ExtractionCandidate::new(CandidateSource::DateOfPurchase, "May 2024", 120),
            ExtractionCandidate::new(CandidateSource::FreeTextYear, "2001", 1),
        ]);

        let sources: Vec<_> = fields.all().iter().map(|c| c.source).collect();
        assert_eq!(
            sources,
            vec![
                CandidateSource::DateOfPurchase,
                CandidateSource::FreeTextYear,
                CandidateSource::FreeTextYear
            ]
        );
        // Within a source the located order survives.
        let free: Vec<_> = fields
            .for_source(CandidateSource::FreeTextYear)
            .map(|c| c.matched_text.as_str())
            .collect();
        assert_eq!(free, vec!["1999", "2001"]);
    }

    #[test]
    fn test_blank_listing() {
        assert!(RawListing::new("  \n", "").is_blank());
        assert!(!RawListing::new("", "<h2>Rolex</h2>").is_blank());
    }
}
