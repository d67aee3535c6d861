//! Hwconf Core - requirements, baseline engine and persistence for the
//! hardware configurator
//!
//! # Pipeline
//!
//! 1. **Normalize** (`requirements`): coerce a loose JSON body into a flat payload
//! 2. **Validate** (`requirements`): check required fields, parse the enums
//! 3. **Baseline** (`baseline`): deterministic component spec from lookup tables
//! 4. **Summarize** (`summary`, `recommend`): remote summary, baseline fallback
//! 5. **Persist** (`storage`): owner-scoped configuration history in SQLite
//!
//! # Quick Start
//!
//! ```
//! use hwconf_core::baseline::derive_baseline_spec;
//! use hwconf_core::requirements::normalize;
//! use hwconf_core::summary::AiSummary;
//! use serde_json::json;
//!
//! let payload = normalize(&json!({
//!     "usageType": "office",
//!     "budgetRange": "900-1200",
//!     "quantity": "5-20",
//!     "formFactor": "laptop",
//!     "requiredSoftware": "Microsoft Office, Teams",
//!     "brandConstraints": "Dell",
//!     "performancePriority": "balanced"
//! }))
//! .unwrap();
//!
//! let requirements = payload.validate().unwrap();
//! let spec = derive_baseline_spec(&requirements);
//! assert_eq!(spec.estimated_unit_price, "$800 - $1,100");
//!
//! let summary = AiSummary::from_baseline(&spec);
//! println!("{}", summary.best_fit_configuration);
//! ```

pub mod baseline;
pub mod error;
pub mod recommend;
pub mod requirements;
pub mod storage;
pub mod summary;

pub use baseline::{derive_baseline_spec, BaselineSpec};
pub use error::{ConfiguratorError, Result};
pub use recommend::{recommend, Recommendation};
pub use requirements::{normalize, Requirements, RequirementsPayload};
pub use summary::{AiSummary, DisabledSummarizer, Summarizer};

/// Version of hwconf-core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
