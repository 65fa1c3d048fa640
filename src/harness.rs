//! File-based harness around the pipeline: turns saved pages into listings
//! and listings into records. Fetching and pagination happen elsewhere.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::pipeline::ExtractionPipeline;
use crate::types::{NormalizedRecord, RawListing};

pub const SNIPPET_SUFFIX: &str = ".snippet.html";

/// Read a page and optional snippet file into a listing.
pub fn load_listing(page: &Path, snippet: Option<&Path>) -> Result<RawListing> {
    let page_html = fs::read_to_string(page)?;
    let snippet = match snippet {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };
    Ok(RawListing::new(page_html, snippet))
}

/// Page files in `dir` (`*.html`, not snippets), sorted by file name, each
/// paired with its `<stem>.snippet.html` sibling when present.
pub fn discover_listings(dir: &Path) -> Result<Vec<(PathBuf, Option<PathBuf>)>> {
    let mut pages: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            name.ends_with(".html") && !name.ends_with(SNIPPET_SUFFIX)
        })
        .collect();
    pages.sort();

    Ok(pages
        .into_iter()
        .map(|page| {
            let stem = page.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            let snippet = page.with_file_name(format!("{stem}{SNIPPET_SUFFIX}"));
            let snippet = snippet.is_file().then_some(snippet);
            (page, snippet)
        })
        .collect())
}

/// Extract every listing in `dir`. Unreadable files are logged and skipped.
pub fn extract_dir(pipeline: &ExtractionPipeline, dir: &Path) -> Result<Vec<NormalizedRecord>> {
    let listings = discover_listings(dir)?;
    info!(count = listings.len(), dir = %dir.display(), "Extracting listings");

    let mut records = Vec::with_capacity(listings.len());
    for (page, snippet) in listings {
        match load_listing(&page, snippet.as_deref()) {
            Ok(listing) => records.push(pipeline.extract(&listing)),
            Err(e) => warn!(page = %page.display(), error = %e, "Skipping unreadable listing"),
        }
    }

    info!(records = records.len(), "Extraction finished");
    Ok(records)
}
