//! The digest module builds one contact-aware summary out of every page of
//! a crawl.

use log::info;

use crate::error::DigestError;
use crate::extract::{TaggedContact, dedup_contacts, extract_all};
use crate::page::PageRecord;
use crate::summarize::{SummaryGenerator, SummarySource};

/// A unified summary of a whole crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub summary: String,
    pub summary_source: SummarySource,
    /// Distinct contacts of every page, in order of first appearance.
    pub contact_info: Vec<TaggedContact>,
    pub records_processed: usize,
}

/// Joins the text of every page under a `Page: <title> (from <url>)` line.
///
/// # Errors
///
/// Returns [`DigestError::NoText`] if no page has text.
pub fn combine_texts(pages: &[PageRecord]) -> Result<String, DigestError> {
    let texts: Vec<String> = pages
        .iter()
        .filter(|page| !page.text().is_empty())
        .map(|page| {
            let mut context = format!("Page: {}", page.title());
            if !page.url().is_empty() {
                context.push_str(&format!(" (from {})", page.url()));
            }
            format!("{context}\n{}", page.text())
        })
        .collect();

    if texts.is_empty() {
        return Err(DigestError::NoText);
    }

    Ok(texts.join("\n\n"))
}

/// Builds a digest of `pages`, making sure an AI summary keeps every
/// contact found in the combined text.
///
/// # Errors
///
/// Returns [`DigestError::NoText`] if no page has text.
pub async fn build_digest(
    pages: &[PageRecord],
    generator: &SummaryGenerator,
) -> Result<Digest, DigestError> {
    let combined = combine_texts(pages)?;

    let page_contacts = pages
        .iter()
        .filter(|page| !page.text().is_empty())
        .flat_map(|page| extract_all(page.text()))
        .collect();
    let contact_info = dedup_contacts(page_contacts);

    let summary_contacts = extract_all(&combined);
    let outcome = generator
        .summarize_with_contacts(&combined, &summary_contacts)
        .await;

    info!(
        "Built digest of {} pages with {} contacts",
        pages.len(),
        contact_info.len()
    );

    Ok(Digest {
        summary: outcome.summary,
        summary_source: outcome.source,
        contact_info,
        records_processed: pages.len(),
    })
}
