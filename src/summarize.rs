//! The summarize module turns page text into a short summary, asking the
//! configured [`SummaryBackend`] first and falling back to the leading
//! sentences of the text when the backend is missing or fails.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::backend::SummaryBackend;
use crate::constants::{
    AI_MIN_INPUT_CHARS, ANALYSIS_INPUT_BUDGET, CONTACTS_HEADER, DIGEST_INPUT_BUDGET,
    EXTRACTIVE_SENTENCES, NO_CONTENT_TO_SUMMARIZE,
};
use crate::error::BackendError;
use crate::extract::TaggedContact;

static CONTACT_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s.\-()]").expect("Failed to compile contact noise regex"));

/// Length bounds handed to the backend and its input ceiling.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SummaryOptions {
    pub max_length: usize,
    pub min_length: usize,
    /// Characters of input kept before calling the backend.
    pub input_budget: usize,
    /// Whether truncated input is marked with `...`.
    pub mark_truncation: bool,
}

impl SummaryOptions {
    /// Options for the site analysis summary.
    pub fn analysis(max_length: usize, min_length: usize) -> Self {
        SummaryOptions {
            max_length,
            min_length,
            input_budget: ANALYSIS_INPUT_BUDGET,
            mark_truncation: false,
        }
    }

    /// Options for a unified digest of every page.
    pub fn digest(max_length: usize, min_length: usize) -> Self {
        SummaryOptions {
            max_length,
            min_length,
            input_budget: DIGEST_INPUT_BUDGET,
            mark_truncation: true,
        }
    }
}

/// Why an AI summary was replaced by the extractive one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FallbackReason {
    Unavailable(String),
    Request(String),
    EmptyResponse,
}

impl From<BackendError> for FallbackReason {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unavailable(message) => FallbackReason::Unavailable(message),
            BackendError::Request(message) => FallbackReason::Request(message),
            BackendError::EmptyResponse => FallbackReason::EmptyResponse,
        }
    }
}

/// Where a summary came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SummarySource {
    Ai,
    /// `fallback` is set when the backend was asked and failed.
    Extractive { fallback: Option<FallbackReason> },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SummaryOutcome {
    pub summary: String,
    pub source: SummarySource,
}

impl SummaryOutcome {
    fn extractive(summary: String, fallback: Option<FallbackReason>) -> Self {
        SummaryOutcome {
            summary,
            source: SummarySource::Extractive { fallback },
        }
    }
}

/// Produces summaries, with or without an AI backend.
pub struct SummaryGenerator {
    backend: Option<Box<dyn SummaryBackend>>,
    options: SummaryOptions,
}

impl SummaryGenerator {
    /// A generator that only ever summarises extractively.
    pub fn extractive(options: SummaryOptions) -> Self {
        SummaryGenerator {
            backend: None,
            options,
        }
    }

    pub fn with_backend(backend: Box<dyn SummaryBackend>, options: SummaryOptions) -> Self {
        SummaryGenerator {
            backend: Some(backend),
            options,
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn options(&self) -> SummaryOptions {
        self.options
    }

    /// Summarises `text`, never failing.
    pub async fn summarize(&self, text: &str) -> SummaryOutcome {
        self.summarize_with_context(text, None).await
    }

    /// Summarises `text`; `context` is prepended to what the backend sees
    /// but not to the extractive fallback.
    pub async fn summarize_with_context(&self, text: &str, context: Option<&str>) -> SummaryOutcome {
        if text.trim().is_empty() {
            return SummaryOutcome::extractive(NO_CONTENT_TO_SUMMARIZE.to_owned(), None);
        }

        match self.abstractive(text, context).await {
            Some(Ok(summary)) => SummaryOutcome {
                summary,
                source: SummarySource::Ai,
            },
            Some(Err(error)) => {
                warn!("AI summarization failed, using extractive summary: {error}");
                SummaryOutcome::extractive(extractive_summary(text), Some(error.into()))
            }
            None => SummaryOutcome::extractive(extractive_summary(text), None),
        }
    }

    /// Summarises `text` and makes sure an AI summary still mentions every
    /// contact in `contacts`.
    pub async fn summarize_with_contacts(
        &self,
        text: &str,
        contacts: &[TaggedContact],
    ) -> SummaryOutcome {
        let mut outcome = self.summarize(text).await;
        if outcome.source == SummarySource::Ai {
            outcome.summary = ensure_contacts(&outcome.summary, contacts);
        }
        outcome
    }

    async fn abstractive(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Option<Result<String, BackendError>> {
        let backend = self.backend.as_ref()?;
        if text.chars().count() <= AI_MIN_INPUT_CHARS {
            debug!("Text too short for AI summarization, using extractive summary");
            return None;
        }

        let input = match context {
            Some(context) => format!("Context: {context}\n\nContent: {text}"),
            None => text.to_owned(),
        };
        let input = match truncate_chars(&input, self.options.input_budget) {
            Some(head) if self.options.mark_truncation => format!("{head}..."),
            Some(head) => head.to_owned(),
            None => input,
        };

        Some(
            backend
                .summarize(&input, self.options.max_length, self.options.min_length)
                .await,
        )
    }
}

/// Keeps the first three `". "`-separated sentences of `text`.
///
/// Texts with three sentences or fewer are returned unchanged.
pub fn extractive_summary(text: &str) -> String {
    let sentences: Vec<&str> = text.split(". ").collect();
    if sentences.len() <= EXTRACTIVE_SENTENCES {
        return text.to_owned();
    }

    let head: Vec<&str> = sentences.into_iter().take(EXTRACTIVE_SENTENCES).collect();
    format!("{}.", head.join(". "))
}

/// Appends a `CONTACTS:` block listing every contact whose value does not
/// occur in `summary`, unless the summary already has such a block.
///
/// Values are compared with whitespace, dots, dashes and brackets removed.
pub fn ensure_contacts(summary: &str, contacts: &[TaggedContact]) -> String {
    let summary_clean = CONTACT_NOISE.replace_all(summary, "");
    let missing: Vec<String> = contacts
        .iter()
        .filter(|contact| {
            let value_clean = CONTACT_NOISE.replace_all(&contact.value, "");
            !summary_clean.contains(&*value_clean)
        })
        .map(ToString::to_string)
        .collect();

    if missing.is_empty() || summary.contains(CONTACTS_HEADER) {
        return summary.to_owned();
    }

    format!("{summary}\n\n{CONTACTS_HEADER}\n{}", missing.join("\n"))
}

/// Returns the first `limit` characters of `text`, or `None` if it is not
/// longer than that.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> Option<&str> {
    text.char_indices()
        .nth(limit)
        .and_then(|(index, _)| text.get(..index))
}
