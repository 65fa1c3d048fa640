use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;
use tracing::debug;

use crate::constants::{DATE_OF_PURCHASE_LABEL, STRUCTURED_YEAR_PROPERTIES};
use crate::pipeline::text::collapse_whitespace;
use crate::types::{CandidateSource, ExtractionCandidate, LocatedFields, RawListing};

static H2_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());
static PRODUCT_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1.product_title").unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static OG_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static META_DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static LD_JSON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// "Date of Purchase:" followed by the rest of its line. An empty label
/// captures nothing rather than the next line.
static DATE_OF_PURCHASE_RE: Lazy<Regex> = Lazy::new(|| {
    let label = DATE_OF_PURCHASE_LABEL
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!(r"(?i)\b{label}\b[ \t:]*([^\n]*\S)")).unwrap()
});

/// Labeled year phrases, tried before bare year tokens.
static LABELED_YEAR_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\byear\b[:\s]*(\d{4})\b",
        r"(?i)\b(\d{4})\s*model\b",
        r"(?i)\bcirca\s*(\d{4})\b",
        r"(?i)\bmanufactured\s+in\s+(\d{4})\b",
        r"(?i)\bproduction\s+year[:\s]*(\d{4})\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static YEAR_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line of visible text.
const BLOCK_TAGS: &[&str] = &[
    "html", "head", "title", "body", "address", "article", "aside", "blockquote", "dd", "div",
    "dl", "dt", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "th",
    "thead", "tr", "ul",
];

/// Finds candidate substrings for every logical field of a listing.
///
/// Nothing is validated here; a listing with no recognizable content simply
/// produces no candidates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldLocator;

impl FieldLocator {
    pub fn new() -> Self {
        Self
    }

    pub fn locate(&self, listing: &RawListing) -> LocatedFields {
        let page = Html::parse_document(&listing.page_html);
        let snippet = Html::parse_fragment(&listing.snippet);
        let page_text = visible_text(page.root_element());

        let mut candidates = Vec::new();
        self.locate_date_of_purchase(&page_text, &mut candidates);
        self.locate_structured_data(&page, &mut candidates);
        self.locate_free_text_years(&page_text, &mut candidates);
        self.locate_brand_model_phrases(&snippet, &page, &mut candidates);

        debug!(candidates = candidates.len(), "Located listing fields");
        LocatedFields::new(candidates)
    }

    fn locate_date_of_purchase(&self, page_text: &str, out: &mut Vec<ExtractionCandidate>) {
        for captures in DATE_OF_PURCHASE_RE.captures_iter(page_text) {
            if let Some(value) = captures.get(1) {
                out.push(ExtractionCandidate::new(
                    CandidateSource::DateOfPurchase,
                    value.as_str().trim(),
                    value.start(),
                ));
            }
        }
    }

    fn locate_structured_data(&self, page: &Html, out: &mut Vec<ExtractionCandidate>) {
        for (index, script) in page.select(&LD_JSON_SELECTOR).enumerate() {
            let content = script.text().collect::<String>();
            let content = content
                .trim()
                .trim_start_matches("<![CDATA[")
                .trim_end_matches("]]>")
                .trim();

            match serde_json::from_str::<Value>(content) {
                Ok(value) => collect_structured_values(&value, index, out),
                Err(e) => debug!(block = index, error = %e, "Skipping unparseable JSON-LD block"),
            }
        }
    }

    fn locate_free_text_years(&self, page_text: &str, out: &mut Vec<ExtractionCandidate>) {
        for pattern in LABELED_YEAR_RES.iter() {
            for captures in pattern.captures_iter(page_text) {
                if let Some(year) = captures.get(1) {
                    out.push(ExtractionCandidate::new(
                        CandidateSource::FreeTextYear,
                        year.as_str(),
                        year.start(),
                    ));
                }
            }
        }

        for token in YEAR_TOKEN_RE.find_iter(page_text) {
            out.push(ExtractionCandidate::new(
                CandidateSource::FreeTextYear,
                token.as_str(),
                token.start(),
            ));
        }
    }

    fn locate_brand_model_phrases(
        &self,
        snippet: &Html,
        page: &Html,
        out: &mut Vec<ExtractionCandidate>,
    ) {
        let mut phrases: Vec<String> = Vec::new();

        // The listing card's heading carries the brand and model.
        match snippet.select(&H2_SELECTOR).next() {
            Some(heading) => phrases.push(element_text(heading)),
            None => {
                let text = visible_text(snippet.root_element());
                if let Some(line) = text.lines().map(str::trim).find(|l| !l.is_empty()) {
                    phrases.push(collapse_whitespace(line));
                }
            }
        }

        phrases.extend(page.select(&PRODUCT_TITLE_SELECTOR).next().map(element_text));
        phrases.extend(page.select(&H1_SELECTOR).next().map(element_text));
        phrases.extend(meta_content(page, &OG_TITLE_SELECTOR));
        phrases.extend(meta_content(page, &META_DESCRIPTION_SELECTOR));

        let mut seen: Vec<String> = Vec::new();
        for (index, phrase) in phrases.into_iter().enumerate() {
            if phrase.is_empty() || seen.contains(&phrase) {
                continue;
            }
            seen.push(phrase.clone());
            out.push(ExtractionCandidate::new(
                CandidateSource::BrandModelPhrase,
                phrase,
                index,
            ));
        }
    }
}

/// Text a reader would see: text nodes outside script-like elements, one
/// line per block element. Inline runs inside the same block share a line.
fn visible_text(root: ElementRef) -> String {
    let mut text = String::new();
    let mut current_block = None;
    for node in root.descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };

        let mut hidden = false;
        let mut block = None;
        for ancestor in node.ancestors() {
            let Node::Element(element) = ancestor.value() else {
                continue;
            };
            if HIDDEN_TAGS.contains(&element.name()) {
                hidden = true;
                break;
            }
            if block.is_none() && BLOCK_TAGS.contains(&element.name()) {
                block = Some(ancestor.id());
            }
        }

        let trimmed = fragment.trim();
        if hidden || trimmed.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(if block == current_block { ' ' } else { '\n' });
        }
        text.push_str(trimmed);
        current_block = block;
    }
    text
}

fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn meta_content(page: &Html, selector: &Selector) -> Option<String> {
    page.select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(collapse_whitespace)
}

fn collect_structured_values(value: &Value, index: usize, out: &mut Vec<ExtractionCandidate>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_structured_values(item, index, out);
            }
        }
        Value::Object(map) => {
            for property in STRUCTURED_YEAR_PROPERTIES {
                let text = match map.get(*property) {
                    Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => continue,
                };
                out.push(ExtractionCandidate::new(CandidateSource::StructuredData, text, index));
            }
            if let Some(graph) = map.get("@graph") {
                collect_structured_values(graph, index, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(fields: &LocatedFields, source: CandidateSource) -> Vec<String> {
        fields
            .for_source(source)
            .map(|c| c.matched_text.clone())
            .collect()
    }

    #[test]
    fn test_locates_date_of_purchase_across_text_nodes() {
        let listing = RawListing::new(
            "<ul><li><strong>Date of Purchase:</strong> May 2024</li><li>Box &amp; Papers</li></ul>",
            "",
        );

        let fields = FieldLocator::new().locate(&listing);
        assert_eq!(texts(&fields, CandidateSource::DateOfPurchase), vec!["May 2024"]);
    }

    #[test]
    fn test_empty_date_of_purchase_does_not_take_next_line() {
        let listing = RawListing::new(
            "<ul><li><strong>Date of Purchase:</strong></li><li>Last serviced 2021</li></ul>",
            "",
        );

        let fields = FieldLocator::new().locate(&listing);
        assert!(texts(&fields, CandidateSource::DateOfPurchase).is_empty());
        assert_eq!(texts(&fields, CandidateSource::FreeTextYear), vec!["2021"]);
    }

    #[test]
    fn test_inline_runs_share_a_line() {
        let page = Html::parse_document(
            "<div><p>Released in <b>1999</b>.</p><p>Box</p><span>and papers</span></div>",
        );

        assert_eq!(
            visible_text(page.root_element()),
            "Released in 1999 .\nBox\nand papers"
        );
    }

    #[test]
    fn test_locates_structured_data_properties_in_order() {
        let listing = RawListing::new(
            r#"<html><head><script type="application/ld+json">
                {"@context": "https://schema.org", "@graph": [
                    {"@type": "Product", "description": "Full set from 2019", "releaseDate": "2018-03-01"}
                ]}
            </script>
            <script type="application/ld+json">{ not json </script></head><body></body></html>"#,
            "",
        );

        let fields = FieldLocator::new().locate(&listing);
        assert_eq!(
            texts(&fields, CandidateSource::StructuredData),
            vec!["2018-03-01", "Full set from 2019"]
        );
    }

    #[test]
    fn test_free_text_ignores_script_contents() {
        let listing = RawListing::new(
            "<body><script>var built = 2011;</script><p>This reference was released in 1999.</p></body>",
            "",
        );

        let fields = FieldLocator::new().locate(&listing);
        assert_eq!(texts(&fields, CandidateSource::FreeTextYear), vec!["1999"]);
    }

    #[test]
    fn test_labeled_year_precedes_bare_tokens() {
        let listing = RawListing::new(
            "<p>Serviced in 2015. Production year: 2009</p>",
            "",
        );

        let fields = FieldLocator::new().locate(&listing);
        let years = texts(&fields, CandidateSource::FreeTextYear);
        assert_eq!(years.first().map(String::as_str), Some("2009"));
        assert!(years.contains(&"2015".to_string()));
    }

    #[test]
    fn test_brand_phrase_prefers_snippet_heading() {
        let listing = RawListing::new(
            r#"<html><head><meta property="og:title" content="Rolex Datejust | Shop"></head>
               <body><h1 class="product_title">Rolex Datejust 41</h1></body></html>"#,
            r#"<li class="latest-single-product"><h2>Rolex  Datejust
                Jubilee 278384RBR</h2><h3>278384RBR</h3></li>"#,
        );

        let fields = FieldLocator::new().locate(&listing);
        assert_eq!(
            texts(&fields, CandidateSource::BrandModelPhrase),
            vec!["Rolex Datejust Jubilee 278384RBR", "Rolex Datejust 41", "Rolex Datejust | Shop"]
        );
    }

    #[test]
    fn test_plain_text_snippet_uses_first_line() {
        let listing = RawListing::new("", "\n  Omega Speedmaster Moonwatch\nSGD 9,800\n");

        let fields = FieldLocator::new().locate(&listing);
        assert_eq!(
            fields.first(CandidateSource::BrandModelPhrase).map(|c| c.matched_text.as_str()),
            Some("Omega Speedmaster Moonwatch")
        );
    }

    #[test]
    fn test_empty_listing_locates_nothing() {
        let fields = FieldLocator::new().locate(&RawListing::default());
        assert!(fields.is_empty());
    }
}
