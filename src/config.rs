//! YAML configuration of the analysis: summary bounds, website type
//! extensions and an optional page classification table.

use std::path::Path;

use indexmap::IndexMap;
use log::{info, warn};
use serde::Deserialize;

use crate::classify::{PageRule, RuleSet};
use crate::constants::{ABOUT, CONTACT, HOMEPAGE};
use crate::error::ConfigError;
use crate::summarize::SummaryOptions;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub website_types: IndexMap<String, WebsiteTypeSettings>,
    /// Replaces the built-in classification rules when present.
    pub page_classification: Option<IndexMap<String, PageRule>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Pages with fewer words are reported as thin.
    pub min_word_count: usize,
    pub max_summary_length: usize,
    pub min_summary_length: usize,
    pub key_phrases_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebsiteTypeSettings {
    /// Page types a site of this kind is expected to have.
    pub priority_pages: Vec<String>,
    /// Fields to look up with `content_patterns`, in order.
    pub key_fields: Vec<String>,
    /// Case-insensitive regexes per key field; the first matching one wins.
    pub content_patterns: IndexMap<String, Vec<String>>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            min_word_count: 10,
            max_summary_length: 200,
            min_summary_length: 50,
            key_phrases_count: 10,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let mut website_types = IndexMap::new();
        website_types.insert(
            "generic".to_owned(),
            WebsiteTypeSettings {
                priority_pages: [HOMEPAGE, ABOUT, CONTACT].map(str::to_owned).to_vec(),
                key_fields: ["name", "description", "contact_info"]
                    .map(str::to_owned)
                    .to_vec(),
                content_patterns: IndexMap::new(),
            },
        );

        Settings {
            analysis: AnalysisSettings::default(),
            website_types,
            page_classification: None,
        }
    }
}

impl Settings {
    /// Loads settings from a YAML file. A missing file is not an error: the
    /// built-in defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but can't be read or isn't valid
    /// YAML for these settings.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            warn!(
                "Config file not found: {}. Using default settings.",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;

        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parses settings from YAML text; an empty document yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML for these settings.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Classification rules: the configured table, or the built-in one.
    pub fn rules(&self) -> RuleSet {
        match &self.page_classification {
            Some(table) => RuleSet::from_table(table.clone()),
            None => RuleSet::builtin(),
        }
    }

    pub fn website_type(&self, name: &str) -> Option<&WebsiteTypeSettings> {
        self.website_types.get(name)
    }

    pub fn analysis_summary_options(&self) -> SummaryOptions {
        SummaryOptions::analysis(
            self.analysis.max_summary_length,
            self.analysis.min_summary_length,
        )
    }

    pub fn digest_summary_options(&self) -> SummaryOptions {
        SummaryOptions::digest(
            self.analysis.max_summary_length,
            self.analysis.min_summary_length,
        )
    }
}
