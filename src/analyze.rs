//! The analyze module aggregates the classified pages of one site into a
//! [`WebsiteAnalysis`]: page type histogram, main content, contacts, key
//! information, navigation structure and a content summary.

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use url::Url;

use crate::config::{Settings, WebsiteTypeSettings};
use crate::constants::{
    ABOUT, HOMEPAGE, KEY_PHRASE_STOP_WORDS, MAIN_CONTENT_LIMIT, MAX_WEBSITE_SPECIFIC_MATCHES,
    NO_MAIN_CONTENT, UNKNOWN_PAGE_TYPE,
};
use crate::extract::{ContactDetails, extract_first};
use crate::page::PageRecord;
use crate::summarize::{SummaryGenerator, SummarySource, truncate_chars};

static KEY_PHRASE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]{4,}\b").expect("Failed to compile key phrase regex"));

/// Site-wide figures of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInformation {
    pub total_words: usize,
    /// The page with the most words, first one on ties.
    #[serde(skip)]
    pub largest_page: PageRecord,
    /// Greatest `fetched_at` string of the crawl.
    pub last_updated: String,
    /// Pages fetched with HTTP 200.
    pub successful_pages: usize,
    pub key_phrases: Vec<String>,
    /// Matches of the selected website type's content patterns, per field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_specific: Option<IndexMap<String, Vec<String>>>,
}

/// Complete analysis of one crawled site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteAnalysis {
    pub domain: String,
    pub total_pages: usize,
    /// Page count per label, in order of first appearance.
    pub page_types: IndexMap<String, usize>,
    pub main_content: String,
    pub key_information: KeyInformation,
    pub contact_info: ContactDetails,
    /// Distinct labels other than `unknown`, in order of first appearance.
    pub navigation_structure: IndexSet<String>,
    pub content_summary: String,
    pub summary_source: SummarySource,
}

/// Shared data for analysing a site.
pub struct WebsiteAnalyzer<'a> {
    pub settings: &'a Settings,
    pub generator: &'a SummaryGenerator,
    /// Name of the website type whose extension is applied, if any.
    pub website_type: Option<&'a str>,
}

impl<'a> WebsiteAnalyzer<'a> {
    pub fn new(settings: &'a Settings, generator: &'a SummaryGenerator) -> Self {
        WebsiteAnalyzer {
            settings,
            generator,
            website_type: None,
        }
    }

    pub fn with_website_type(mut self, website_type: &'a str) -> Self {
        self.website_type = Some(website_type);
        self
    }

    /// Analyses the pages of one site. Returns `None` for an empty list.
    pub async fn analyze(&self, pages: &[PageRecord]) -> Option<WebsiteAnalysis> {
        let (first, _) = pages.split_first()?;

        let domain = domain_of(first.url());
        let page_types = page_type_histogram(pages);
        let main_content = truncate_main_content(main_content(pages));
        let all_text = pages
            .iter()
            .map(PageRecord::text)
            .collect::<Vec<_>>()
            .join(" ");
        let contact_info = extract_first(&all_text);
        let navigation_structure = navigation_structure(pages);
        let mut key_information = KeyInformation {
            total_words: pages.iter().map(PageRecord::word_count).sum(),
            largest_page: largest_page(first, pages).clone(),
            last_updated: last_updated(first, pages).to_owned(),
            successful_pages: pages.iter().filter(|page| page.http_status() == 200).count(),
            key_phrases: key_phrases(&all_text, self.settings.analysis.key_phrases_count),
            website_specific: None,
        };

        self.log_page_coverage(pages, &page_types);

        let (content_summary, summary_source) = if main_content.is_empty() {
            (NO_MAIN_CONTENT.to_owned(), SummarySource::Extractive { fallback: None })
        } else {
            let context = format!(
                "Website type: {}, Domain: {domain}",
                self.website_type.unwrap_or("generic")
            );
            let outcome = self
                .generator
                .summarize_with_context(&main_content, Some(&context))
                .await;
            (outcome.summary, outcome.source)
        };

        if let Some(website_type) = self.website_type {
            key_information.website_specific = Some(self.website_specific(website_type, &all_text));
        }

        Some(WebsiteAnalysis {
            domain,
            total_pages: pages.len(),
            page_types,
            main_content,
            key_information,
            contact_info,
            navigation_structure,
            content_summary,
            summary_source,
        })
    }

    fn website_specific(&self, website_type: &str, all_text: &str) -> IndexMap<String, Vec<String>> {
        match self.settings.website_type(website_type) {
            Some(type_settings) => extract_website_specific(type_settings, all_text),
            None => {
                warn!("No configuration for website type {website_type}");
                IndexMap::new()
            }
        }
    }

    fn log_page_coverage(&self, pages: &[PageRecord], page_types: &IndexMap<String, usize>) {
        let min_word_count = self.settings.analysis.min_word_count;
        for page in pages.iter().filter(|page| page.word_count() < min_word_count) {
            debug!("Thin page {} ({} words)", page.url(), page.word_count());
        }

        let priority_pages = self
            .website_type
            .and_then(|name| self.settings.website_type(name))
            .map(|type_settings| type_settings.priority_pages.as_slice())
            .unwrap_or_default();
        for page_type in priority_pages {
            if !page_types.contains_key(page_type) {
                info!("Priority page type {page_type} not found");
            }
        }
    }
}

fn domain_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_owned(),
        (None, _) => String::new(),
    }
}

fn page_type_histogram(pages: &[PageRecord]) -> IndexMap<String, usize> {
    let mut histogram = IndexMap::new();
    for page in pages {
        *histogram.entry(page.page_type().to_owned()).or_insert(0) += 1;
    }
    histogram
}

/// First homepage text, then first about page text, each under a header.
fn main_content(pages: &[PageRecord]) -> String {
    let mut content = String::new();
    for (label, header) in [(HOMEPAGE, "HOMEPAGE"), (ABOUT, "ABOUT")] {
        if let Some(page) = pages.iter().find(|page| page.page_type() == label) {
            content.push_str(&format!("{header}: {}\n\n", page.text()));
        }
    }
    content
}

fn truncate_main_content(content: String) -> String {
    match truncate_chars(&content, MAIN_CONTENT_LIMIT) {
        Some(head) => format!("{head}..."),
        None => content,
    }
}

fn navigation_structure(pages: &[PageRecord]) -> IndexSet<String> {
    pages
        .iter()
        .map(PageRecord::page_type)
        .filter(|page_type| *page_type != UNKNOWN_PAGE_TYPE)
        .map(str::to_owned)
        .collect()
}

fn largest_page<'p>(first: &'p PageRecord, pages: &'p [PageRecord]) -> &'p PageRecord {
    pages.iter().fold(first, |largest, page| {
        if page.word_count() > largest.word_count() {
            page
        } else {
            largest
        }
    })
}

fn last_updated<'p>(first: &'p PageRecord, pages: &'p [PageRecord]) -> &'p str {
    pages
        .iter()
        .fold(first, |latest, page| {
            if page.fetched_at() > latest.fetched_at() {
                page
            } else {
                latest
            }
        })
        .fetched_at()
}

/// Most frequent lowercase words of four letters or more, stop words
/// excluded, ties kept in order of first appearance.
pub fn key_phrases(text: &str, count: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut frequencies: IndexMap<&str, usize> = IndexMap::new();
    for word in KEY_PHRASE_WORD.find_iter(&lowered).map(|m| m.as_str()) {
        if !KEY_PHRASE_STOP_WORDS.contains(&word) {
            *frequencies.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = frequencies.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(count)
        .map(|(word, _)| word.to_owned())
        .collect()
}

/// For each key field with content patterns, up to three matches of the
/// first pattern that matches at all. The first capture group is used when
/// the pattern has one.
pub fn extract_website_specific(
    type_settings: &WebsiteTypeSettings,
    text: &str,
) -> IndexMap<String, Vec<String>> {
    let mut extracted = IndexMap::new();

    for field in &type_settings.key_fields {
        let Some(patterns) = type_settings.content_patterns.get(field) else {
            continue;
        };

        for pattern in patterns {
            let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => regex,
                Err(err) => {
                    warn!("Skipping invalid pattern {pattern} for {field}: {err}");
                    continue;
                }
            };

            let matches: Vec<String> = regex
                .captures_iter(text)
                .filter_map(|captures| captures.get(1).or_else(|| captures.get(0)))
                .map(|m| m.as_str().to_owned())
                .take(MAX_WEBSITE_SPECIFIC_MATCHES)
                .collect();

            if !matches.is_empty() {
                extracted.insert(field.clone(), matches);
                break;
            }
        }
    }

    extracted
}
