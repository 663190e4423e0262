//! The loader module reads crawl output into classified [`PageRecord`]s.
//!
//! Two encodings of the same records are accepted: one JSON object per line,
//! or objects concatenated on a single line with no separator.

use std::path::Path;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::RuleSet;
use crate::error::LoadError;
use crate::page::{CrawlRecord, PageRecord};

static CONCATENATION_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\}\s*\{").expect("Failed to compile concatenation regex"));

/// Physical layout of a crawl file.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CrawlEncoding {
    LineDelimited,
    Concatenated,
}

/// Pages of a crawl plus what was dropped on the way.
#[derive(Debug)]
pub struct LoadedCrawl {
    pub pages: Vec<PageRecord>,
    /// Malformed lines skipped in line-delimited mode.
    pub skipped_lines: usize,
    pub encoding: CrawlEncoding,
}

/// Reads and loads a crawl file.
///
/// # Errors
///
/// Returns an error if the file can't be read, or if it holds concatenated
/// objects and one of them is not valid JSON.
pub fn load_file(path: &Path, rules: &RuleSet) -> Result<LoadedCrawl, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let crawl = load_str(&source, rules)?;
    info!(
        "Loaded {} pages from {} ({} skipped)",
        crawl.pages.len(),
        path.display(),
        crawl.skipped_lines
    );
    Ok(crawl)
}

/// Loads a crawl from its text.
///
/// Text with newlines is read line by line and malformed lines are skipped
/// with a warning. Newline-free text is split into concatenated objects, and
/// any malformed object fails the whole load.
///
/// # Errors
///
/// Returns [`LoadError::Concatenated`] if a concatenated object is not valid
/// JSON.
pub fn load_str(source: &str, rules: &RuleSet) -> Result<LoadedCrawl, LoadError> {
    let content = source.trim();

    if content.contains('\n') {
        Ok(load_lines(content, rules))
    } else {
        load_concatenated(content, rules)
    }
}

fn load_lines(content: &str, rules: &RuleSet) -> LoadedCrawl {
    let mut pages = Vec::new();
    let mut skipped_lines = 0;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<CrawlRecord>(line) {
            Ok(record) => pages.push(PageRecord::classified(record, rules)),
            Err(err) => {
                warn!("Invalid JSON on line {}: {err}", index + 1);
                skipped_lines += 1;
            }
        }
    }

    LoadedCrawl {
        pages,
        skipped_lines,
        encoding: CrawlEncoding::LineDelimited,
    }
}

fn load_concatenated(content: &str, rules: &RuleSet) -> Result<LoadedCrawl, LoadError> {
    let spans = split_concatenated(content);
    debug!("Found {} concatenated JSON objects", spans.len());

    let pages = spans
        .into_iter()
        .enumerate()
        .map(|(index, span)| {
            serde_json::from_str::<CrawlRecord>(span)
                .map(|record| PageRecord::classified(record, rules))
                .map_err(|source| LoadError::Concatenated { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LoadedCrawl {
        pages,
        skipped_lines: 0,
        encoding: CrawlEncoding::Concatenated,
    })
}

/// Splits `{...}{...}` into its objects at each closing/opening brace pair.
pub fn split_concatenated(content: &str) -> Vec<&str> {
    if content.is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut start = 0;
    for boundary in CONCATENATION_BOUNDARY.find_iter(content) {
        let end = boundary.start() + 1;
        spans.extend(content.get(start..end));
        start = end;
    }
    spans.extend(content.get(start..));

    spans
}
