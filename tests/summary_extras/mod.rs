#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use llm::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Tool},
    error::LLMError,
};
use sitedigest::backend::SummaryBackend;
use sitedigest::classify::RuleSet;
use sitedigest::error::BackendError;
use sitedigest::page::{CrawlRecord, PageRecord};

#[macro_export]
macro_rules! assert_responses {
    (
        $(
            $test_name:ident : response => $response:expr, result => $result:expr
        ),+ $(,)?
    ) => {
        $(
            #[tokio::test]
            async fn $test_name() {
                let backend = sitedigest::backend::LlmBackend::new(
                    Box::new(StubLlmProvider::new($response.to_owned())),
                    None,
                );
                let result = sitedigest::backend::SummaryBackend::summarize(&backend, "", 200, 50)
                    .await
                    .expect("Expected successful processing.");

                assert_that(&result).is_equal_to($result.to_owned());
            }
        )+
    }
}

/// Builds a page classified with the built-in rules.
pub fn page(url: &str, title: &str, text: &str) -> PageRecord {
    PageRecord::classified(
        CrawlRecord {
            url: Some(url.to_owned()),
            title: Some(title.to_owned()),
            text: Some(text.to_owned()),
            ..Default::default()
        },
        &RuleSet::builtin(),
    )
}

/// Builds a page with status and fetch time, classified with the built-in rules.
pub fn fetched_page(url: &str, text: &str, status: i64, fetched_at: &str) -> PageRecord {
    PageRecord::classified(
        CrawlRecord {
            url: Some(url.to_owned()),
            title: Some(String::new()),
            text: Some(text.to_owned()),
            status: Some(status),
            fetched_at: Some(fetched_at.to_owned()),
            ..Default::default()
        },
        &RuleSet::builtin(),
    )
}

/// Answers every request with the same summary and records the inputs.
pub struct StubBackend {
    response: String,
    pub inputs: Rc<RefCell<Vec<String>>>,
}

impl StubBackend {
    pub fn new(response: &str) -> Self {
        StubBackend {
            response: response.to_owned(),
            inputs: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

#[async_trait(?Send)]
impl SummaryBackend for StubBackend {
    async fn summarize(
        &self,
        text: &str,
        _max_length: usize,
        _min_length: usize,
    ) -> Result<String, BackendError> {
        self.inputs.borrow_mut().push(text.to_owned());
        Ok(self.response.clone())
    }
}

/// Fails every request.
pub struct FailingBackend;

#[async_trait(?Send)]
impl SummaryBackend for FailingBackend {
    async fn summarize(
        &self,
        _text: &str,
        _max_length: usize,
        _min_length: usize,
    ) -> Result<String, BackendError> {
        Err(BackendError::Request("connection refused".to_owned()))
    }
}

pub(crate) struct StubLlmProvider {
    response_content: String,
}

impl StubLlmProvider {
    pub fn new(response_content: String) -> Self {
        StubLlmProvider { response_content }
    }
}

impl ChatProvider for StubLlmProvider {
    fn chat<'life0, 'life1, 'async_trait>(
        &'life0 self,
        _messages: &'life1 [ChatMessage],
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            #[derive(Debug)]
            struct StringResponse(String);

            impl ChatResponse for StringResponse {
                fn text(&self) -> Option<String> {
                    Some(self.0.clone())
                }

                fn tool_calls(&self) -> Option<Vec<llm::ToolCall>> {
                    None
                }

                fn thinking(&self) -> Option<String> {
                    None
                }

                fn usage(&self) -> Option<llm::chat::Usage> {
                    None
                }
            }

            impl std::fmt::Display for StringResponse {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(formatter, "{}", self.0)
                }
            }

            Ok(Box::new(StringResponse(self.response_content.clone())) as Box<dyn ChatResponse>)
        })
    }

    fn chat_with_tools<'life0, 'life1, 'life2, 'async_trait>(
        &'life0 self,
        messages: &'life1 [ChatMessage],
        _tools: Option<&'life2 [Tool]>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        'life2: 'async_trait,
        Self: 'async_trait,
    {
        self.chat(messages)
    }
}
