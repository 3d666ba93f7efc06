//! Claude Messages API integration for commit summaries
//!
//! This module sends the diff and its overview to the Messages API and
//! returns the first text block of the reply.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ApiKey, Config};
use crate::error::SummaryError;
use crate::prompt::build_prompt;

/// Produces a one-line summary of a set of changes
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, diff: &str, stat: &str) -> Result<String, SummaryError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Client for the Messages API
///
/// # Example
///
/// ```no_run
/// use commitgpt::claude::{ClaudeClient, Summarizer};
/// use commitgpt::config::{ApiKey, Config};
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let config = Config::default();
/// let client = ClaudeClient::new(&config, ApiKey::from_env(&config.api_key_env)?)?;
/// let summary = client.summarize("+added line", "1 file changed").await?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClaudeClient {
    client: Client,
    api_key: ApiKey,
    endpoint: String,
    api_version: String,
    model: String,
    max_tokens: u32,
    max_prompt_size: usize,
    retry_transient: bool,
}

impl ClaudeClient {
    /// Build a client with the configured timeout
    ///
    /// # Errors
    ///
    /// * The HTTP client cannot be constructed (TLS backend failure)
    pub fn new(config: &Config, api_key: ApiKey) -> Result<Self, SummaryError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            api_version: config.api_version.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_prompt_size: config.max_prompt_size,
            retry_transient: config.retry_transient,
        })
    }

    async fn send(
        &self,
        request: &MessagesRequest<'_>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", &self.api_version)
            .json(request)
            .send()
            .await
    }

    /// Send with at most one retry on connect failures and timeouts
    async fn send_with_retry(
        &self,
        request: &MessagesRequest<'_>,
    ) -> Result<reqwest::Response, SummaryError> {
        match self.send(request).await {
            Ok(response) => Ok(response),
            Err(error) if self.retry_transient && is_transient(&error) => {
                warn!(%error, "transient failure calling the Messages API, retrying once");
                Ok(self.send(request).await?)
            }
            Err(error) => Err(error.into()),
        }
    }
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Extract the first content block's text from a response body
fn extract_text(body: &[u8]) -> Result<String, SummaryError> {
    let response: MessagesResponse = serde_json::from_slice(body)
        .map_err(|e| SummaryError::MalformedResponse(format!("invalid response body: {e}")))?;

    response
        .content
        .into_iter()
        .next()
        .ok_or_else(|| SummaryError::MalformedResponse("response has no content blocks".into()))?
        .text
        .ok_or_else(|| SummaryError::MalformedResponse("first content block has no text".into()))
}

#[async_trait]
impl Summarizer for ClaudeClient {
    async fn summarize(&self, diff: &str, stat: &str) -> Result<String, SummaryError> {
        let prompt = build_prompt(diff, stat, self.max_prompt_size)?;

        let request = MessagesRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.max_tokens,
        };

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            prompt_bytes = prompt.len(),
            "requesting summary"
        );

        let response = self.send_with_retry(&request).await?;
        let status = response.status();
        // Reading the body consumes the response on every path
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(SummaryError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let text = extract_text(&body)?;
        debug!(summary = %text, "received summary");
        Ok(text)
    }
}
