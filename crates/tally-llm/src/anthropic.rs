//! Anthropic Backend Implementation
//!
//! Calls the Anthropic Messages API with a base64 document block plus the
//! extraction instruction, and returns the reply text.
//!
//! # Features
//!
//! - PDF (and other media) document blocks, base64-encoded
//! - Configurable endpoint, model, and timeout
//! - Retry logic with exponential backoff for transient failures
//! - Typed errors for auth, rate-limit, and API failures
//!
//! # Examples
//!
//! ```no_run
//! use tally_llm::AnthropicBackend;
//!
//! // Reads the API key from the environment
//! let backend = AnthropicBackend::from_env("claude-3-opus-20240229").unwrap();
//! ```

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tally_domain::{AnalysisBackend, Document};

use crate::BackendError;

/// Default Messages API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// Default model for document analysis
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// Default timeout for analysis requests (3 minutes; large documents are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Default number of retry attempts for transient failures
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default completion budget, enough for a few dozen metrics
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// API protocol version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Anthropic Messages API backend for document analysis
///
/// Sends the document as a base64 block followed by the instruction text
/// and returns the concatenated text blocks of the reply.
pub struct AnthropicBackend {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
    max_retries: u32,
    max_tokens: u32,
}

/// Request body for the Messages API
#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Document { source: Base64Source },
    Text { text: String },
}

#[derive(Serialize)]
struct Base64Source {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: String,
    data: String,
}

/// Response body for the Messages API
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ReplyBlock>,
}

#[derive(Deserialize)]
struct ReplyBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AnthropicBackend {
    /// Create a backend with an explicit API key and the default timeout
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, BackendError> {
        Self::with_timeout_secs(api_key, model, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a backend reading the API key from `ANTHROPIC_API_KEY`
    ///
    /// # Errors
    /// Returns `MissingApiKey` if the variable is unset or empty.
    pub fn from_env(model: impl Into<String>) -> Result<Self, BackendError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::new(key, model),
            _ => Err(BackendError::MissingApiKey(API_KEY_ENV)),
        }
    }

    /// Create a backend with an explicit request timeout
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_timeout_secs(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BackendError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Override the API endpoint (proxies, test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The model this backend submits requests for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Analyze one document against an instruction
    ///
    /// Sends the document as a base64 block plus the instruction and
    /// returns the reply text. Rate limits and transport failures are
    /// retried with exponential backoff; auth and other API errors are
    /// returned immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request times out
    /// - Authentication is rejected
    /// - The rate limit holds across all retries
    /// - The response body is not in the Messages shape
    pub fn call(&self, document: &Document, instruction: &str) -> Result<String, BackendError> {
        let request_body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Document {
                        source: Base64Source {
                            kind: "base64",
                            media_type: document.media_type.clone(),
                            data: BASE64.encode(&document.bytes),
                        },
                    },
                    ContentBlock::Text {
                        text: instruction.to_string(),
                    },
                ],
            }],
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&request_body)
                .send()
            {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return extract_reply_text(response);
                    } else if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(BackendError::Auth(api_error_message(response)));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(BackendError::RateLimited);
                    } else {
                        return Err(BackendError::Api {
                            status: status.as_u16(),
                            message: api_error_message(response),
                        });
                    }
                }
                Err(e) if e.is_timeout() => {
                    return Err(BackendError::Timeout);
                }
                Err(e) => {
                    last_error = Some(BackendError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 500ms, 1s, 2s, etc.
                let delay = Duration::from_millis(500 * 2u64.pow(attempts - 1));
                std::thread::sleep(delay);
            }
        }

        Err(last_error
            .unwrap_or_else(|| BackendError::Communication("Max retries exceeded".to_string())))
    }
}

impl AnalysisBackend for AnthropicBackend {
    type Error = BackendError;

    fn analyze(&self, document: &Document, instruction: &str) -> Result<String, Self::Error> {
        self.call(document, instruction)
    }
}

/// Concatenate the text blocks of a successful reply
fn extract_reply_text(response: reqwest::blocking::Response) -> Result<String, BackendError> {
    let parsed: MessagesResponse = response
        .json()
        .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let text: String = parsed
        .content
        .iter()
        .filter(|block| block.block_type == "text")
        .map(|block| block.text.as_str())
        .collect();

    if text.is_empty() {
        return Err(BackendError::InvalidResponse(
            "Reply contained no text blocks".to_string(),
        ));
    }

    Ok(text)
}

/// Best-effort extraction of the error message from a failure body
fn api_error_message(response: reqwest::blocking::Response) -> String {
    let body = response.text().unwrap_or_else(|_| String::new());

    serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                "Unknown error".to_string()
            } else {
                body
            }
        })
}
