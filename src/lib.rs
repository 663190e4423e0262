//! The sitedigest library analyses crawled website content: it classifies
//! pages, extracts contact details, aggregates site-wide figures and
//! summarises the main content with an AI backend or extractively.

pub mod analyze;
pub mod backend;
pub mod classify;
pub mod config;
pub mod constants;
pub mod digest;
pub mod error;
pub mod extract;
pub mod loader;
pub mod page;
pub mod report;
pub mod summarize;

/// Enum representing the kind of website being analysed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum WebsiteType {
    /// Restaurants, pizzerias, cafes
    Restaurant,
    /// Online shops, retail websites
    Ecommerce,
    /// Company websites, services
    Corporate,
    /// Personal portfolios, creative sites
    Portfolio,
    /// Any other website
    #[default]
    Generic,
}

impl WebsiteType {
    /// Key of this type in the `website_types` configuration section.
    pub fn as_str(self) -> &'static str {
        match self {
            WebsiteType::Restaurant => "restaurant",
            WebsiteType::Ecommerce => "ecommerce",
            WebsiteType::Corporate => "corporate",
            WebsiteType::Portfolio => "portfolio",
            WebsiteType::Generic => "generic",
        }
    }
}

impl std::str::FromStr for WebsiteType {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "restaurant" => Ok(WebsiteType::Restaurant),
            "ecommerce" => Ok(WebsiteType::Ecommerce),
            "corporate" => Ok(WebsiteType::Corporate),
            "portfolio" => Ok(WebsiteType::Portfolio),
            "generic" => Ok(WebsiteType::Generic),
            _ => Err(format!("Invalid website type: {}", input)),
        }
    }
}

/// Enum representing which outputs the analysis produces.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputFormat {
    /// Print the text report
    #[default]
    Text,
    /// Save the JSON analysis
    Json,
    /// Both of the above
    Both,
}

impl OutputFormat {
    pub fn includes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    pub fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "both" => Ok(OutputFormat::Both),
            _ => Err(format!("Invalid output format: {}", input)),
        }
    }
}

pub use analyze::{WebsiteAnalysis, WebsiteAnalyzer};
pub use classify::RuleSet;
pub use config::Settings;
pub use digest::build_digest;
pub use extract::{ExtractionMode, extract_contact_info};
pub use loader::{load_file, load_str};
pub use page::PageRecord;
pub use report::{render, save_analysis};
pub use summarize::{SummaryGenerator, extractive_summary};
