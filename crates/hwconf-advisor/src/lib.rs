//! Hwconf Advisor - remote summaries for hardware configurations
//!
//! Wraps an OpenAI-compatible chat completion API (OpenRouter by default)
//! behind the [`Summarizer`](hwconf_core::summary::Summarizer) trait.
//! [`build_summarizer`] turns [`SummarizerSettings`] into a ready trait
//! object; without an API key it returns a
//! [`DisabledSummarizer`](hwconf_core::summary::DisabledSummarizer), which
//! sends every request down the baseline path.

pub mod openrouter;

pub use openrouter::{
    completion_text, parse_summary, strip_code_fence, OpenRouterSummarizer,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL, DEFAULT_TIMEOUT, OPENROUTER_BASE_URL,
};

use hwconf_core::summary::{DisabledSummarizer, Summarizer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Remote summarizer settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerSettings {
    /// OpenRouter API key; `None` disables remote summaries
    pub api_key: Option<String>,

    pub model: String,

    pub base_url: String,

    /// Per-attempt request timeout
    pub timeout_secs: u64,

    /// Total attempts for transport errors and 5xx/429 responses
    pub max_attempts: u32,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl SummarizerSettings {
    /// API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for SummarizerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerSettings")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Build the summarizer described by `settings`
pub fn build_summarizer(settings: &SummarizerSettings) -> Arc<dyn Summarizer> {
    match settings.api_key() {
        Some(key) => {
            let summarizer = OpenRouterSummarizer::new(key)
                .with_base_url(settings.base_url.as_str())
                .with_model(settings.model.as_str())
                .with_timeout(Duration::from_secs(settings.timeout_secs))
                .with_max_attempts(settings.max_attempts);
            tracing::info!(model = summarizer.model(), "OpenRouter summarizer enabled");
            Arc::new(summarizer)
        }
        None => {
            tracing::warn!("OPENROUTER_API_KEY is not configured, using baseline summaries only");
            Arc::new(DisabledSummarizer::new(
                "OPENROUTER_API_KEY is not configured",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_summarizer() {
        let mut settings = SummarizerSettings::default();
        assert_eq!(build_summarizer(&settings).name(), "disabled");

        settings.api_key = Some("   ".to_string());
        assert_eq!(build_summarizer(&settings).name(), "disabled");

        settings.api_key = Some("sk-or-1".to_string());
        assert_eq!(build_summarizer(&settings).name(), "openrouter");
    }

    #[test]
    fn test_settings_debug_redacts_key() {
        let settings = SummarizerSettings {
            api_key: Some("sk-or-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-or-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_settings_partial_json() {
        let settings: SummarizerSettings =
            serde_json::from_str(r#"{"model": "openai/gpt-4o-mini"}"#).unwrap();
        assert_eq!(settings.model, "openai/gpt-4o-mini");
        assert_eq!(settings.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert!(settings.api_key().is_none());
    }
}
