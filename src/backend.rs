//! The backend module wraps the external summarization capability: a
//! [`SummaryBackend`] trait and its implementation over an `llm` chat model.

use std::str::FromStr;

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatMessageBuilder, ChatProvider};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::constants::{DEFAULT_PROMPT_TEMPLATE, MODEL_API_KEY_ENV_NAME, THINK_STRIPPER};
use crate::error::BackendError;

static THINK_STRIPPER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(THINK_STRIPPER).expect("Failed to compile THINK_STRIPPER regex"));

/// An abstractive summarizer with its own input length ceiling.
#[async_trait(?Send)]
pub trait SummaryBackend {
    /// Summarises `text` into roughly `min_length`..`max_length` words.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable, the request fails or
    /// the answer is empty.
    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, BackendError>;
}

/// Summarises through a chat model of the `llm` crate.
pub struct LlmBackend {
    model: Box<dyn ChatProvider>,
    prompt_template: Option<String>,
}

impl LlmBackend {
    pub fn new(model: Box<dyn ChatProvider>, prompt_template: Option<String>) -> Self {
        LlmBackend {
            model,
            prompt_template,
        }
    }

    /// Builds a backend from a model URL such as `ollama://llama3` or
    /// `openai://gpt-4o-mini`. The scheme names the backend, the host (and
    /// user part, joined with `:`) the model. The API key is read from
    /// `SITEDIGEST_MODEL_API_KEY` when set.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] if the URL is invalid, the
    /// backend is unknown or the model can't be built.
    pub fn from_model_url(model: &str, prompt_template: Option<String>) -> Result<Self, BackendError> {
        let model_url = Url::parse(model)
            .map_err(|e| BackendError::Unavailable(format!("Invalid model URL: {e}")))?;
        let backend = LLMBackend::from_str(model_url.scheme())
            .map_err(|e| BackendError::Unavailable(format!("Invalid LLM backend: {e}")))?;
        let model_name = [
            model_url.host_str().ok_or_else(|| {
                BackendError::Unavailable("Specify model name as host URL.".to_owned())
            })?,
            model_url.username(),
        ]
        .iter()
        .filter(|x| !x.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(":");

        let llm_builder = LLMBuilder::new().backend(backend).model(model_name);
        let llm_builder = match std::env::var(MODEL_API_KEY_ENV_NAME) {
            Ok(model_key) => {
                info!("API key provided through {MODEL_API_KEY_ENV_NAME}");
                llm_builder.api_key(model_key)
            }
            Err(err) => {
                info!("{err} while providing api key");
                llm_builder
            }
        };

        let model: Box<dyn ChatProvider> = llm_builder
            .build()
            .map_err(|e| BackendError::Unavailable(format!("Failed to build LLM model: {e}")))?;

        Ok(Self::new(model, prompt_template))
    }

    fn messages(&self, text: &str, max_length: usize, min_length: usize) -> Vec<ChatMessage> {
        let prompt_template = self
            .prompt_template
            .as_deref()
            .unwrap_or(DEFAULT_PROMPT_TEMPLATE);
        let prompt = prompt_template
            .replace("{max_length}", &max_length.to_string())
            .replace("{min_length}", &min_length.to_string())
            .replace("{text}", text);

        let mut messages: Vec<ChatMessageBuilder> = vec![ChatMessage::user().content(prompt)];

        if !prompt_template.contains("{text}") {
            messages.push(ChatMessage::user().content(text));
        }

        messages
            .into_iter()
            .map(|message| message.build())
            .collect()
    }
}

#[async_trait(?Send)]
impl SummaryBackend for LlmBackend {
    async fn summarize(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, BackendError> {
        let messages = self.messages(text, max_length, min_length);

        let response = self
            .model
            .chat(&messages)
            .await
            .map_err(|err| BackendError::Request(format!("LLM error: {err}.")))?
            .to_string();

        let summary = THINK_STRIPPER_REGEX
            .replace_all(&response, "")
            .trim()
            .to_owned();

        if summary.is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        Ok(summary)
    }
}
