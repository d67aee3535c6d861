//! Recommendation pipeline: remote summary first, baseline rendering as fallback

use serde::Serialize;

use crate::baseline::{derive_baseline_spec, BaselineSpec};
use crate::requirements::Requirements;
use crate::summary::{AiSummary, Summarizer};

/// Outcome of one recommendation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub summary: AiSummary,

    /// Present only when the summary was rendered from the baseline
    pub baseline: Option<BaselineSpec>,

    /// Provenance flag: true when the remote summarizer produced the summary
    pub used_ai: bool,
}

/// Produce a recommendation, falling back to the baseline engine when the
/// summarizer fails. Never returns an error.
pub async fn recommend(requirements: &Requirements, summarizer: &dyn Summarizer) -> Recommendation {
    let baseline = derive_baseline_spec(requirements);

    match summarizer.summarize(requirements, &baseline).await {
        Ok(summary) => {
            tracing::info!(
                summarizer = summarizer.name(),
                usage_type = %requirements.usage_type,
                "Remote summary generated"
            );
            Recommendation {
                summary,
                baseline: None,
                used_ai: true,
            }
        }
        Err(e) => {
            tracing::warn!(
                summarizer = summarizer.name(),
                "Remote summary failed, falling back to baseline spec: {}",
                e
            );
            Recommendation {
                summary: AiSummary::from_baseline(&baseline),
                baseline: Some(baseline),
                used_ai: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfiguratorError, Result};
    use crate::requirements::{FormFactor, PerformancePriority, Quantity, UsageType};
    use crate::summary::DisabledSummarizer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CannedSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Summarizer for CannedSummarizer {
        async fn summarize(
            &self,
            _requirements: &Requirements,
            baseline: &BaselineSpec,
        ) -> Result<AiSummary> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AiSummary {
                best_fit_configuration: format!("Tuned: {}", baseline.cpu),
                price_estimate: "$1,500".to_string(),
                unit_price: "$1,500".to_string(),
                total_price: "$30,000".to_string(),
                reasoning: "Fits the workload.".to_string(),
                bulk_scaling: "Negotiate 8% at 20 units.".to_string(),
                alternatives: None,
            })
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn requirements() -> Requirements {
        Requirements {
            usage_type: UsageType::Coding,
            budget_range: "1300-1700".to_string(),
            quantity: Quantity::Department,
            form_factor: FormFactor::Laptop,
            required_software: vec!["VS Code".to_string()],
            brand_constraints: "Lenovo".to_string(),
            performance_priority: PerformancePriority::Ram,
            storage_requirements: String::new(),
            networking_needs: String::new(),
            durability_needs: String::new(),
            warranty_preferences: String::new(),
            power_preferences: String::new(),
            compliance_notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_ai_path() {
        let summarizer = CannedSummarizer::default();
        let recommendation = recommend(&requirements(), &summarizer).await;

        assert!(recommendation.used_ai);
        assert!(recommendation.baseline.is_none());
        assert!(recommendation
            .summary
            .best_fit_configuration
            .starts_with("Tuned: Intel Core Ultra 7"));
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_path() {
        let summarizer = DisabledSummarizer::new("no key");
        let recommendation = recommend(&requirements(), &summarizer).await;

        assert!(!recommendation.used_ai);
        let baseline = recommendation.baseline.expect("baseline on fallback");
        assert_eq!(recommendation.summary, AiSummary::from_baseline(&baseline));
        assert_eq!(baseline.recommended_vendors, vec!["Lenovo"]);
    }

    #[tokio::test]
    async fn test_disabled_summarizer_reports_unavailable() {
        let summarizer = DisabledSummarizer::new("OPENROUTER_API_KEY is not configured");
        let baseline = derive_baseline_spec(&requirements());
        let err = summarizer
            .summarize(&requirements(), &baseline)
            .await
            .unwrap_err();

        assert!(matches!(err, ConfiguratorError::RemoteSummaryUnavailable(_)));
    }
}
