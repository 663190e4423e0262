//! Crawled page records.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::classify::RuleSet;
use crate::constants::UNKNOWN_PAGE_TYPE;

/// One JSON record of a crawl, as written by the crawler.
///
/// Every field is optional; missing, `null` and mistyped values default to
/// an empty string or zero. Numbers in text fields are kept as their JSON
/// form and a numeric string `status` is parsed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fetched_at: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        Some(Value::Number(value)) => Some(value.to_string()),
        _ => None,
    })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(value)) => value
            .as_i64()
            .or_else(|| value.as_f64().map(|status| status as i64)),
        Some(Value::String(value)) => value.trim().parse().ok(),
        _ => None,
    })
}

/// One crawled page.
///
/// `word_count` is derived from `text` when the record is built and
/// `page_type` is set once by the classifier; neither can change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    url: String,
    title: String,
    text: String,
    content_type: String,
    http_status: i64,
    fetched_at: String,
    word_count: usize,
    page_type: String,
}

impl PageRecord {
    /// Builds an unclassified page, with `page_type` set to `unknown`.
    pub fn new(record: CrawlRecord) -> Self {
        let text = record.text.unwrap_or_default();
        let word_count = text.split_whitespace().count();

        PageRecord {
            url: record.url.unwrap_or_default(),
            title: record.title.unwrap_or_default(),
            text,
            content_type: record.content_type.unwrap_or_default(),
            http_status: record.status.unwrap_or_default(),
            fetched_at: record.fetched_at.unwrap_or_default(),
            word_count,
            page_type: UNKNOWN_PAGE_TYPE.to_owned(),
        }
    }

    /// Builds a page and labels it with the given rules.
    pub fn classified(record: CrawlRecord, rules: &RuleSet) -> Self {
        let mut page = Self::new(record);
        page.page_type = rules.classify(&page.url, &page.title, &page.text);
        page
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn http_status(&self) -> i64 {
        self.http_status
    }

    pub fn fetched_at(&self) -> &str {
        &self.fetched_at
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn page_type(&self) -> &str {
        &self.page_type
    }
}
