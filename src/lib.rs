pub mod config;
pub mod constants;
pub mod error;
pub mod harness;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use error::{ExtractionIssue, Result, ScraperError};
pub use pipeline::{extract, Extraction, ExtractionPipeline};
pub use types::{CandidateSource, ExtractionCandidate, LocatedFields, NormalizedRecord, RawListing};
