//! The report module renders a [`WebsiteAnalysis`] as a human-readable
//! report and as a JSON record.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use indexmap::{IndexMap, IndexSet};
use log::info;
use serde::Serialize;

use crate::analyze::{KeyInformation, WebsiteAnalysis};
use crate::constants::REPORT_KEY_PHRASES;
use crate::digest::Digest;
use crate::error::ReportError;
use crate::extract::{ContactDetails, ContactKind};

const RULE_WIDTH: usize = 80;

/// Serializable view of an analysis; `largest_page` is left out.
#[derive(Debug, Serialize)]
pub struct AnalysisRecord<'a> {
    pub domain: &'a str,
    pub total_pages: usize,
    pub page_types: &'a IndexMap<String, usize>,
    pub contact_info: &'a ContactDetails,
    pub navigation_structure: &'a IndexSet<String>,
    pub content_summary: &'a str,
    pub key_information: &'a KeyInformation,
    pub analysis_date: String,
}

/// Builds the persisted record of `analysis`, stamped with `analysis_date`.
pub fn to_record(analysis: &WebsiteAnalysis, analysis_date: DateTime<Local>) -> AnalysisRecord<'_> {
    AnalysisRecord {
        domain: &analysis.domain,
        total_pages: analysis.total_pages,
        page_types: &analysis.page_types,
        contact_info: &analysis.contact_info,
        navigation_structure: &analysis.navigation_structure,
        content_summary: &analysis.content_summary,
        key_information: &analysis.key_information,
        analysis_date: analysis_date.to_rfc3339(),
    }
}

/// Writes `analysis` as pretty JSON to `output_path`, stamped with the
/// current time.
///
/// # Errors
///
/// Returns an error if serialization or file operations fail.
pub fn save_analysis(analysis: &WebsiteAnalysis, output_path: &Path) -> Result<(), ReportError> {
    let record = to_record(analysis, Local::now());
    let json = serde_json::to_string_pretty(&record)?;

    let io_error = |source| ReportError::Io {
        path: output_path.display().to_string(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(output_path)
        .map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)?;

    info!("Analysis saved to {}", output_path.display());
    Ok(())
}

/// Renders the human-readable report of `analysis`.
pub fn render(analysis: &WebsiteAnalysis) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut report = vec![
        rule.clone(),
        format!("WEBSITE ANALYSIS: {}", analysis.domain),
        rule.clone(),
    ];

    push_statistics(&mut report, analysis);
    push_page_types(&mut report, &analysis.page_types);

    if !analysis.contact_info.is_empty() {
        report.push("\n📞 CONTACT INFORMATION:".to_owned());
        for (kind, value) in analysis.contact_info.entries() {
            report.push(format!("   • {}: {value}", kind_label(kind)));
        }
    }

    report.push("\n🧭 NAVIGATION STRUCTURE:".to_owned());
    report.push(format!(
        "   {}",
        analysis
            .navigation_structure
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" → ")
    ));

    let key_information = &analysis.key_information;
    if !key_information.key_phrases.is_empty() {
        report.push("\n🔑 KEY PHRASES:".to_owned());
        let phrases: Vec<&str> = key_information
            .key_phrases
            .iter()
            .take(REPORT_KEY_PHRASES)
            .map(String::as_str)
            .collect();
        report.push(format!("   {}", phrases.join(", ")));
    }

    report.push("\n📝 CONTENT SUMMARY:".to_owned());
    report.push(format!("   {}", analysis.content_summary));

    let largest = &key_information.largest_page;
    report.push("\n📈 LARGEST PAGE:".to_owned());
    report.push(format!("   • {} ({} words)", largest.title(), largest.word_count()));
    report.push(format!("   • URL: {}", largest.url()));

    if let Some(specific) = key_information
        .website_specific
        .as_ref()
        .filter(|specific| !specific.is_empty())
    {
        push_website_specific(&mut report, specific);
    }

    report.push(format!("\n{rule}"));
    report.join("\n")
}

fn push_statistics(report: &mut Vec<String>, analysis: &WebsiteAnalysis) {
    let key_information = &analysis.key_information;
    report.push("\n📊 GENERAL STATISTICS:".to_owned());
    report.push(format!("   • Total pages: {}", analysis.total_pages));
    report.push(format!(
        "   • Successfully fetched pages: {}",
        key_information.successful_pages
    ));
    report.push(format!(
        "   • Total words: {}",
        with_thousands(key_information.total_words)
    ));
    report.push(format!("   • Last updated: {}", key_information.last_updated));
}

/// Page types are listed alphabetically.
fn push_page_types(report: &mut Vec<String>, page_types: &IndexMap<String, usize>) {
    report.push("\n📄 PAGE TYPES:".to_owned());
    let mut page_types: Vec<(&String, &usize)> = page_types.iter().collect();
    page_types.sort_by(|a, b| a.0.cmp(b.0));
    for (page_type, count) in page_types {
        report.push(format!("   • {}: {count} pages", title_case(page_type)));
    }
}

fn push_website_specific(report: &mut Vec<String>, specific: &IndexMap<String, Vec<String>>) {
    report.push("\n🎯 WEBSITE-SPECIFIC INFORMATION:".to_owned());
    for (field, values) in specific {
        report.push(format!(
            "   • {}: {}",
            title_case(&field.replace('_', " ")),
            values.join(", ")
        ));
    }
}

/// Renders a digest as plain text with its contacts.
pub fn render_digest(digest: &Digest) -> String {
    let mut lines = vec![digest.summary.clone()];
    if !digest.contact_info.is_empty() {
        lines.push(String::new());
        lines.push(format!("Contacts found ({}):", digest.contact_info.len()));
        lines.extend(digest.contact_info.iter().map(ToString::to_string));
    }
    lines.push(String::new());
    lines.push(format!("Records processed: {}", digest.records_processed));
    lines.join("\n")
}

fn kind_label(kind: ContactKind) -> &'static str {
    match kind {
        ContactKind::Email => "Email",
        ContactKind::Phone => "Phone",
        ContactKind::Address => "Address",
    }
}

/// Uppercases the first letter of every alphabetic run, lowercases the rest.
fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if previous_is_letter {
            titled.extend(c.to_lowercase());
        } else {
            titled.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    titled
}

fn with_thousands(number: usize) -> String {
    let digits = number.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
