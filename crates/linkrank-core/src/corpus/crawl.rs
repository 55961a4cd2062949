//! Corpus construction from a directory of HTML pages.
//!
//! Every `*.html` file directly inside the directory is a page; its id is
//! the file name. Outbound links come from `<a ... href="...">` anchors.
//! Self-links and links to files outside the corpus are dropped before the
//! [`Corpus`] is validated, so a crawled corpus always satisfies the corpus
//! invariants (apart from being empty, which is reported as an error).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::corpus::Corpus;

/// File extension that marks a page.
const PAGE_EXTENSION: &str = "html";

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\s+(?:[^>]*?)href="([^"]*)""#).expect("anchor pattern is valid")
});

/// Extract the distinct `href` targets of every anchor in `html`.
#[must_use]
pub fn extract_links(html: &str) -> BTreeSet<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Crawl `dir` and build a [`Corpus`] of its HTML pages.
///
/// The directory is not walked recursively. Entries whose names are not
/// valid UTF-8 are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the directory or one of its pages cannot be read, or
/// if the directory contains no pages.
#[instrument]
pub fn crawl(dir: &Path) -> Result<Corpus> {
    let mut pages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read corpus directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping page with non UTF-8 file name");
            continue;
        };

        let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let mut links = extract_links(&String::from_utf8_lossy(&bytes));
        links.remove(name);

        debug!(page = name, links = links.len(), "crawled page");
        pages.insert(name.to_string(), links);
    }

    // Only keep links to other pages in the corpus.
    let known: BTreeSet<String> = pages.keys().cloned().collect();
    for links in pages.values_mut() {
        links.retain(|target| known.contains(target));
    }

    let corpus = Corpus::from_links(pages)
        .with_context(|| format!("No usable corpus in {}", dir.display()))?;

    info!(
        pages = corpus.page_count(),
        links = corpus.link_count(),
        dangling = corpus.dangling_pages().len(),
        "corpus crawled"
    );

    Ok(corpus)
}
