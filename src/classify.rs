//! The classify module labels crawled pages (homepage, about, contact...)
//! from their URL, title and text with an ordered, data-driven rule table.

use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

use crate::constants::{
    ABOUT, CONTACT, DEFAULT_PAGE_TYPE, GALLERY, HOMEPAGE, LEGAL, MENU_SERVICES, NEWS_BLOG,
};

/// Substring patterns for one page label.
///
/// Patterns are matched case-insensitively. The URL pattern `/` only matches
/// a root path, since every URL contains a slash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRule {
    pub url_patterns: Vec<String>,
    pub title_patterns: Vec<String>,
    pub content_patterns: Vec<String>,
}

/// Order in which a [`RuleSet`] evaluates its rules.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Precedence {
    /// Every label's URL patterns, then every label's title patterns, then
    /// every label's content patterns.
    #[default]
    BySignal,
    /// Label by label, each checking URL, title and content patterns.
    ByLabel,
}

#[derive(Clone, Copy)]
enum Signal {
    Url,
    Title,
    Content,
}

const SIGNALS: [Signal; 3] = [Signal::Url, Signal::Title, Signal::Content];

/// Lowercased classification input.
struct Subject<'a> {
    raw_url: &'a str,
    url: String,
    title: String,
    text: String,
}

impl PageRule {
    fn new(url: &[&str], title: &[&str], content: &[&str]) -> Self {
        let owned = |patterns: &[&str]| patterns.iter().map(|p| (*p).to_owned()).collect();
        PageRule {
            url_patterns: owned(url),
            title_patterns: owned(title),
            content_patterns: owned(content),
        }
    }

    fn lowercased(self) -> Self {
        let lower = |patterns: Vec<String>| patterns.iter().map(|p| p.to_lowercase()).collect();
        PageRule {
            url_patterns: lower(self.url_patterns),
            title_patterns: lower(self.title_patterns),
            content_patterns: lower(self.content_patterns),
        }
    }

    fn matches(&self, signal: Signal, subject: &Subject<'_>) -> bool {
        match signal {
            Signal::Url => self
                .url_patterns
                .iter()
                .any(|pattern| url_matches(pattern, subject)),
            Signal::Title => self
                .title_patterns
                .iter()
                .any(|pattern| subject.title.contains(pattern.as_str())),
            Signal::Content => self
                .content_patterns
                .iter()
                .any(|pattern| subject.text.contains(pattern.as_str())),
        }
    }
}

fn url_matches(pattern: &str, subject: &Subject<'_>) -> bool {
    if pattern == "/" {
        return is_root_path(subject.raw_url);
    }
    subject.url.contains(pattern)
}

fn is_root_path(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.path() == "/" || parsed.path().is_empty(),
        Err(_) => url.trim() == "/",
    }
}

/// An ordered table of label rules.
///
/// The built-in table and a table read from configuration share this shape;
/// they differ only in their [`Precedence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: IndexMap<String, PageRule>,
    precedence: Precedence,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    /// The built-in rules, evaluated URL first, then title, then content.
    pub fn builtin() -> Self {
        let mut rules = IndexMap::new();
        rules.insert(
            HOMEPAGE.to_owned(),
            PageRule::new(
                &["/", "home", "index", "homepage"],
                &["home", "benvenuti", "welcome"],
                &[],
            ),
        );
        rules.insert(
            ABOUT.to_owned(),
            PageRule::new(
                &["about", "chi-siamo", "about-us", "storia"],
                &["about", "storia", "chi siamo"],
                &["about", "storia", "chi siamo"],
            ),
        );
        rules.insert(
            CONTACT.to_owned(),
            PageRule::new(&["contact", "contatti", "contatto"], &[], &[]),
        );
        rules.insert(
            MENU_SERVICES.to_owned(),
            PageRule::new(&["menu", "carta", "servizi", "products"], &[], &[]),
        );
        rules.insert(
            GALLERY.to_owned(),
            PageRule::new(&["gallery", "galleria", "foto", "images"], &[], &[]),
        );
        rules.insert(
            NEWS_BLOG.to_owned(),
            PageRule::new(&["news", "blog", "articoli", "notizie"], &[], &[]),
        );
        rules.insert(
            LEGAL.to_owned(),
            PageRule::new(&["privacy", "cookie", "terms", "legal"], &[], &[]),
        );

        RuleSet {
            rules,
            precedence: Precedence::BySignal,
        }
    }

    /// Builds rules from an external table, which fully replaces the built-in
    /// one. The table's label order becomes the precedence order.
    pub fn from_table(table: IndexMap<String, PageRule>) -> Self {
        RuleSet {
            rules: table
                .into_iter()
                .map(|(label, rule)| (label, rule.lowercased()))
                .collect(),
            precedence: Precedence::ByLabel,
        }
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Returns the label of the first matching rule, or `content`.
    pub fn classify(&self, url: &str, title: &str, text: &str) -> String {
        let subject = Subject {
            raw_url: url,
            url: url.to_lowercase(),
            title: title.to_lowercase(),
            text: text.to_lowercase(),
        };

        let matched = match self.precedence {
            Precedence::BySignal => SIGNALS.iter().find_map(|signal| {
                self.rules
                    .iter()
                    .find(|(_, rule)| rule.matches(*signal, &subject))
            }),
            Precedence::ByLabel => self.rules.iter().find(|(_, rule)| {
                SIGNALS
                    .iter()
                    .any(|signal| rule.matches(*signal, &subject))
            }),
        };

        matched
            .map(|(label, _)| label.clone())
            .unwrap_or_else(|| DEFAULT_PAGE_TYPE.to_owned())
    }
}
