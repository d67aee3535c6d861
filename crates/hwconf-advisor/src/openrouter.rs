//! OpenRouter summarizer - remote configuration summaries
//!
//! Sends the validated requirements together with the baseline spec to an
//! OpenAI-compatible chat completion endpoint and parses the strict-JSON
//! answer into an [`AiSummary`].
//!
//! # Usage
//!
//! ```text
//! let summarizer = OpenRouterSummarizer::new(api_key)
//!     .with_model("anthropic/claude-3.5-sonnet")
//!     .with_timeout(Duration::from_secs(30));
//! let summary = summarizer.summarize(&requirements, &baseline).await?;
//! ```

use anyhow::Context;
use async_trait::async_trait;
use hwconf_core::baseline::BaselineSpec;
use hwconf_core::error::{ConfiguratorError, Result};
use hwconf_core::requirements::Requirements;
use hwconf_core::summary::{
    AiSummary, Alternative, AlternativeTier, Summarizer, TOTAL_PRICE_PLACEHOLDER,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// OpenRouter API base URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts per summary: the first call plus one retry
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

const REFERER: &str = "https://hardwareconfigurator.local";
const APP_TITLE: &str = "Hardware Configurator";

const SYSTEM_PROMPT: &str = "You are a senior enterprise hardware architect who turns structured \
procurement requirements into succinct summaries. Always answer in strict JSON with snake_case \
keys exactly as follows: {\"best_fit_configuration\": string, \"price_estimate\": string, \
\"unit_price\": string, \"total_price\": string, \"reasoning\": string, \"bulk_scaling\": string, \
\"alternatives\": [{\"tier\": \"higher\"|\"lower\"|\"lateral\", \"summary\": string}]}";

const INSTRUCTIONS: &str = "Use the baseline spec as the foundation, adjust where it makes sense, \
and keep recommendations enterprise-ready. Quote unit_price per device and total_price for the \
full quantity. Keep each field concise (1-4 sentences max).";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

/// Providers disagree on the content shape, so it stays untyped until
/// [`completion_text`] flattens it
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Serialize)]
struct UserPrompt<'a> {
    requirements: &'a Requirements,
    baseline: &'a BaselineSpec,
    instructions: &'static str,
}

/// Answer shape the system prompt asks the model for
#[derive(Debug, Deserialize)]
struct ModelSummary {
    best_fit_configuration: String,
    price_estimate: String,
    #[serde(default)]
    unit_price: Option<String>,
    #[serde(default)]
    total_price: Option<String>,
    reasoning: String,
    bulk_scaling: String,
    #[serde(default)]
    alternatives: Option<Vec<ModelAlternative>>,
}

#[derive(Debug, Deserialize)]
struct ModelAlternative {
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    summary: String,
}

impl From<ModelSummary> for AiSummary {
    fn from(raw: ModelSummary) -> Self {
        let unit_price = raw
            .unit_price
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| raw.price_estimate.clone());
        let total_price = raw
            .total_price
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| TOTAL_PRICE_PLACEHOLDER.to_string());

        AiSummary {
            best_fit_configuration: raw.best_fit_configuration,
            price_estimate: raw.price_estimate,
            unit_price,
            total_price,
            reasoning: raw.reasoning,
            bulk_scaling: raw.bulk_scaling,
            alternatives: raw.alternatives.map(|alts| {
                alts.into_iter()
                    .map(|alt| Alternative {
                        tier: match alt.tier.as_deref() {
                            Some("higher") => AlternativeTier::Higher,
                            Some("lower") => AlternativeTier::Lower,
                            _ => AlternativeTier::Lateral,
                        },
                        summary: alt.summary,
                    })
                    .collect()
            }),
        }
    }
}

/// Failure of a single HTTP attempt
#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OpenRouter request failed: {status} {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed completion envelope: {0}")]
    Envelope(String),
}

impl AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Envelope(_) => false,
        }
    }
}

/// OpenRouter-backed [`Summarizer`]
#[derive(Clone)]
pub struct OpenRouterSummarizer {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
    timeout: Duration,
    max_attempts: u32,
    temperature: f64,
    max_tokens: u32,
}

impl OpenRouterSummarizer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            temperature: 0.4,
            // modest so it fits low-credit accounts
            max_tokens: 600,
        }
    }

    /// Point at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts, clamped to at least one
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(
        &self,
        requirements: &Requirements,
        baseline: &BaselineSpec,
    ) -> std::result::Result<ChatCompletionRequest, serde_json::Error> {
        let user_prompt = serde_json::to_string(&UserPrompt {
            requirements,
            baseline,
            instructions: INSTRUCTIONS,
        })?;

        Ok(ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        })
    }

    /// One POST to the completions endpoint; returns the flattened content
    async fn request_once(
        &self,
        request: &ChatCompletionRequest,
    ) -> std::result::Result<String, AttemptError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Status { status, body });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AttemptError::Envelope(e.to_string()))?;

        Ok(completion
            .choices
            .first()
            .map(|c| completion_text(&c.message.content))
            .unwrap_or_default())
    }

    async fn request_with_retry(
        &self,
        request: &ChatCompletionRequest,
    ) -> std::result::Result<String, AttemptError> {
        let mut attempt = 1;
        loop {
            match self.request_once(request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::debug!(attempt, "OpenRouter attempt failed, retrying: {}", e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl std::fmt::Debug for OpenRouterSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterSummarizer")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[async_trait]
impl Summarizer for OpenRouterSummarizer {
    async fn summarize(
        &self,
        requirements: &Requirements,
        baseline: &BaselineSpec,
    ) -> Result<AiSummary> {
        let request = self.build_request(requirements, baseline)?;

        let text = self
            .request_with_retry(&request)
            .await
            .map_err(|e| ConfiguratorError::RemoteSummaryUnavailable(e.to_string()))?;

        parse_summary(&text)
            .map_err(|e| ConfiguratorError::RemoteSummaryUnavailable(format!("{:#}", e)))
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}

/// Flatten completion content: a string, an array of parts, or an object
/// carrying `text`. Array parts are joined with newlines.
pub fn completion_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                Value::Object(map) => map.get("text").map(value_text).unwrap_or_default(),
                _ => String::new(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map.get("text").map(value_text).unwrap_or_default(),
        _ => String::new(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Extract the body of a ```` ``` ```` or ```` ```json ```` fence, if any.
/// The fence may follow prose and may sit on a single line.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[open + 3..];
    let body = match after.rfind("```") {
        Some(close) => &after[..close],
        None => after,
    };
    // info string such as "json" directly after the opening fence
    let body = if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        body.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    } else {
        body
    };
    body.trim()
}

/// Parse the model's answer into a summary
pub fn parse_summary(text: &str) -> anyhow::Result<AiSummary> {
    let json = strip_code_fence(text);
    let raw: ModelSummary = serde_json::from_str(json).with_context(|| {
        format!(
            "Unable to parse OpenRouter response as JSON. Raw content: {}",
            text
        )
    })?;
    Ok(raw.into())
}
