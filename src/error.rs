//! Typed errors of the sitedigest library.
//!
//! Input errors in line-delimited crawls are recovered by the loader and
//! never show up here; what remains is fatal for the operation that
//! returned it.

use thiserror::Error;

/// Errors raised while loading a crawl.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The crawl file could not be read
    #[error("unable to read crawl file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An object of a concatenated (newline-free) crawl is not valid JSON
    #[error("invalid JSON in concatenated object #{index}: {source}")]
    Concatenated {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures of the external summarisation capability.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No model could be built or reached
    #[error("summarization backend unavailable: {0}")]
    Unavailable(String),

    /// The request to the model failed
    #[error("summarization request failed: {0}")]
    Request(String),

    /// The model answered with nothing usable
    #[error("summarization backend returned an empty response")]
    EmptyResponse,
}

/// Errors raised while building a unified digest.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("no page text found to build a digest")]
    NoText,
}

/// Errors raised while persisting an analysis.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unable to write analysis to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to serialize analysis: {0}")]
    Json(#[from] serde_json::Error),
}
