pub const MODEL_API_KEY_ENV_NAME: &str = "SITEDIGEST_MODEL_API_KEY";

pub(crate) const THINK_STRIPPER: &str = r"<think>[\s\S]*</think>\s*";

pub(crate) const DEFAULT_PROMPT_TEMPLATE: &str = r#"
You will see the content of a website.
Create its concise summary between {min_length} and {max_length} words.
Keep every phone number, email address and street address you find.
Your answer should contain only the summary, it will be pasted directly into a report.
Try your best to keep original style and language.
Website content to summarize:"#;

pub const UNKNOWN_PAGE_TYPE: &str = "unknown";
pub const DEFAULT_PAGE_TYPE: &str = "content";

pub const HOMEPAGE: &str = "homepage";
pub const ABOUT: &str = "about";
pub const CONTACT: &str = "contact";
pub const MENU_SERVICES: &str = "menu/services";
pub const GALLERY: &str = "gallery";
pub const NEWS_BLOG: &str = "news/blog";
pub const LEGAL: &str = "legal";

/// Character cap of `WebsiteAnalysis::main_content` before the ellipsis.
pub const MAIN_CONTENT_LIMIT: usize = 1000;

/// Input ceiling of the summarisation backend during site analysis.
pub const ANALYSIS_INPUT_BUDGET: usize = 1024;

/// Input ceiling of the summarisation backend when building a digest.
pub const DIGEST_INPUT_BUDGET: usize = 12_000;

/// Shorter texts are summarised extractively without asking the backend.
pub const AI_MIN_INPUT_CHARS: usize = 100;

pub const EXTRACTIVE_SENTENCES: usize = 3;

pub const REPORT_KEY_PHRASES: usize = 8;

pub const MAX_WEBSITE_SPECIFIC_MATCHES: usize = 3;

pub const NO_MAIN_CONTENT: &str = "No main content found";
pub const NO_CONTENT_TO_SUMMARIZE: &str = "No content to summarize";

pub const CONTACTS_HEADER: &str = "CONTACTS:";

pub(crate) const KEY_PHRASE_STOP_WORDS: &[&str] = &[
    "questo", "quella", "essere", "avere", "fare", "dire", "andare", "potere", "dovere", "volere",
    "that", "this", "with", "from", "have", "your", "will", "more", "been", "were", "they",
    "their", "there", "what", "when", "which", "about", "into",
];

pub(crate) const ADDRESS_KEYWORDS: &[&str] = &[
    "via", "corso", "piazza", "viale", "strada", "street", "avenue", "road",
];

pub(crate) const ADDRESS_DENYLIST: &[&str] = &["successi", "brillante", "percorso", "ambito"];

pub(crate) const ADDRESS_MAX_WORDS: usize = 4;
pub(crate) const ADDRESS_MAX_LINE_CHARS: usize = 100;
