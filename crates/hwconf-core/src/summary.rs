//! Natural-language configuration summaries
//!
//! A summary is produced either by a remote [`Summarizer`] or, when that
//! fails, rendered locally from a [`BaselineSpec`].

use serde::{Deserialize, Serialize};

use crate::baseline::BaselineSpec;
use crate::error::{ConfiguratorError, Result};
use crate::requirements::Requirements;

/// Placeholder total used when no per-quantity total is available
pub const TOTAL_PRICE_PLACEHOLDER: &str = "Calculated based on quantity";

/// Bulk scaling text for locally rendered summaries
pub const BASELINE_BULK_SCALING: &str = "Baseline logic \u{2014} no AI scaling notes";

/// Summary shape shared by the AI path and the baseline fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    pub best_fit_configuration: String,
    pub price_estimate: String,
    pub unit_price: String,
    pub total_price: String,
    pub reasoning: String,
    pub bulk_scaling: String,

    /// Deprecated; only older summarizer revisions populate it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<Alternative>>,
}

/// Alternative configuration suggested alongside the best fit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub tier: AlternativeTier,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeTier {
    Higher,
    Lower,
    #[default]
    Lateral,
}

impl AiSummary {
    /// Render a baseline spec into the summary shape
    pub fn from_baseline(spec: &BaselineSpec) -> Self {
        let mut lines = vec![
            format!("CPU: {}", spec.cpu),
            format!("GPU: {}", spec.gpu),
            format!("RAM: {}", spec.ram),
            format!("Storage: {}", spec.storage),
            format!("Networking: {}", spec.networking),
        ];
        if let Some(display) = &spec.display {
            lines.push(format!("Display: {}", display));
        }
        lines.push(format!("Accessories: {}", spec.accessories.join(", ")));
        lines.push(format!(
            "Recommended Vendors: {}",
            spec.recommended_vendors.join(", ")
        ));

        Self {
            best_fit_configuration: lines.join("\n"),
            price_estimate: spec.estimated_unit_price.clone(),
            unit_price: spec.estimated_unit_price.clone(),
            total_price: TOTAL_PRICE_PLACEHOLDER.to_string(),
            reasoning: spec.notes.join(" "),
            bulk_scaling: BASELINE_BULK_SCALING.to_string(),
            alternatives: None,
        }
    }
}

/// Remote summary provider.
///
/// Implementations make at most a bounded number of network attempts and
/// report every failure as [`ConfiguratorError::RemoteSummaryUnavailable`].
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync + std::fmt::Debug {
    /// Produce a summary for the requirements, using the baseline as a starting point
    async fn summarize(
        &self,
        requirements: &Requirements,
        baseline: &BaselineSpec,
    ) -> Result<AiSummary>;

    /// Short name recorded in logs
    fn name(&self) -> &str;
}

/// Summarizer used when no remote provider is configured
#[derive(Debug, Clone, Default)]
pub struct DisabledSummarizer {
    reason: String,
}

impl DisabledSummarizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _: &Requirements, _: &BaselineSpec) -> Result<AiSummary> {
        Err(ConfiguratorError::RemoteSummaryUnavailable(
            self.reason.clone(),
        ))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
