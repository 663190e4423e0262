//! The extract module finds contact details (emails, phone numbers, street
//! addresses) in free text with regex heuristics.
//!
//! Two policies coexist and are selected explicitly with [`ExtractionMode`]:
//! first match wins per kind, or collect everything and deduplicate.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::constants::{
    ADDRESS_DENYLIST, ADDRESS_KEYWORDS, ADDRESS_MAX_LINE_CHARS, ADDRESS_MAX_WORDS,
};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("Failed to compile email regex")
});

// National numbers with optional +39 prefix, international, grouped digits.
static FIRST_PHONE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?:\+39|0039)?\s?\b\d{2,4}\s?\d{6,8}\b",
        r"(?:\+\d{1,3})?\s?\(?\b\d{3}\)?\s?\d{3}\s?\d{4}\b",
        r"\b\d{3}[.-]?\d{3}[.-]?\d{4}\b",
    ])
});

// Landlines, mobiles and their +39 forms.
static ALL_PHONE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"\b0\d{2,3}[.\s]?\d{6,7}\b",
        r"\b3\d{2}[.\s]?\d{3}[.\s]?\d{4}\b",
        r"\+39\s?0\d{2,3}\s?\d{6,7}\b",
        r"\+39\s?3\d{2}\s?\d{3}\s?\d{4}\b",
    ])
});

static ADDRESS_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"(?i)\bVia\s+[A-Za-z\s]+\d{1,4}(?:\s*,\s*\d{5})?",
        r"(?i)\bPiazza\s+[A-Za-z\s]+(?:\d{1,4})?",
        r"(?i)\bCorso\s+[A-Za-z\s]+\d{1,4}",
    ])
});

static ADDRESS_KEYWORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", ADDRESS_KEYWORDS.join("|")))
        .expect("Failed to compile address keyword regex")
});

static PHONE_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s.]").expect("Failed to compile phone separator regex"));

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("Failed to compile contact regex"))
        .collect()
}

/// Which extraction policy to apply.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ExtractionMode {
    /// One value per kind, the first one found.
    #[default]
    FirstMatch,
    /// Every distinct value, tagged with its kind.
    CollectAll,
}

/// Kind of a contact detail.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Email,
    Phone,
    Address,
}

impl ContactKind {
    /// Marker prefixed to tagged contacts.
    pub fn marker(self) -> &'static str {
        match self {
            ContactKind::Phone => "📞",
            ContactKind::Email => "📧",
            ContactKind::Address => "📍",
        }
    }
}

/// First-match contact details; absent kinds are `None`.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct ContactDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ContactDetails {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }

    /// Present details in email, phone, address order.
    pub fn entries(&self) -> Vec<(ContactKind, &str)> {
        [
            (ContactKind::Email, &self.email),
            (ContactKind::Phone, &self.phone),
            (ContactKind::Address, &self.address),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.as_deref().map(|value| (kind, value)))
        .collect()
    }
}

/// A contact found in collect-all mode.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TaggedContact {
    pub kind: ContactKind,
    /// The matched substring, as it appears in the text.
    pub value: String,
}

impl TaggedContact {
    fn new(kind: ContactKind, value: &str) -> Self {
        TaggedContact {
            kind,
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for TaggedContact {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.kind.marker(), self.value)
    }
}

/// Result of [`extract_contact_info`], shaped by the mode used.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ContactInfo {
    First(ContactDetails),
    All(Vec<TaggedContact>),
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        match self {
            ContactInfo::First(details) => details.is_empty(),
            ContactInfo::All(contacts) => contacts.is_empty(),
        }
    }
}

/// Extracts contact details from `text` with the given policy.
pub fn extract_contact_info(text: &str, mode: ExtractionMode) -> ContactInfo {
    match mode {
        ExtractionMode::FirstMatch => ContactInfo::First(extract_first(text)),
        ExtractionMode::CollectAll => ContactInfo::All(extract_all(text)),
    }
}

/// First email, first phone of the first pattern that matches at all, and
/// the first short line holding a street keyword.
pub fn extract_first(text: &str) -> ContactDetails {
    let email = EMAIL_REGEX.find(text).map(|m| m.as_str().to_owned());

    let phone = FIRST_PHONE_REGEXES
        .iter()
        .find_map(|regex| regex.find(text))
        .map(|m| m.as_str().trim().to_owned());

    let address = text
        .split('\n')
        .map(str::trim)
        .find(|line| {
            !line.is_empty()
                && line.chars().count() < ADDRESS_MAX_LINE_CHARS
                && ADDRESS_KEYWORD_REGEX.is_match(line)
                && !has_denylisted_word(line)
        })
        .map(str::to_owned);

    ContactDetails {
        email,
        phone,
        address,
    }
}

/// Every distinct phone, email and address, in that order.
///
/// Phones are compared without whitespace and dots but stored as matched.
pub fn extract_all(text: &str) -> Vec<TaggedContact> {
    let mut contacts = Vec::new();

    let mut seen_phones = HashSet::new();
    for regex in ALL_PHONE_REGEXES.iter() {
        for phone in regex.find_iter(text) {
            let normalized = PHONE_SEPARATORS.replace_all(phone.as_str(), "").into_owned();
            if seen_phones.insert(normalized) {
                contacts.push(TaggedContact::new(ContactKind::Phone, phone.as_str()));
            }
        }
    }

    for email in EMAIL_REGEX.find_iter(text) {
        contacts.push(TaggedContact::new(ContactKind::Email, email.as_str()));
    }

    for regex in ADDRESS_REGEXES.iter() {
        for address in regex.find_iter(text) {
            let address = address.as_str().trim();
            if address.split_whitespace().count() <= ADDRESS_MAX_WORDS
                && !has_denylisted_word(address)
            {
                contacts.push(TaggedContact::new(ContactKind::Address, address));
            }
        }
    }

    dedup_contacts(contacts)
}

/// Removes repeated contacts, keeping the first occurrence of each.
pub fn dedup_contacts(contacts: Vec<TaggedContact>) -> Vec<TaggedContact> {
    let mut seen = HashSet::new();
    contacts
        .into_iter()
        .filter(|contact| seen.insert(contact.to_string()))
        .collect()
}

fn has_denylisted_word(candidate: &str) -> bool {
    let lowered = candidate.to_lowercase();
    ADDRESS_DENYLIST.iter().any(|word| lowered.contains(word))
}
