//! Error types for the configurator core
//!
//! Every failure the core can report to its callers is one of these variants.
//! We use `thiserror` for the Display/Error implementations.

use thiserror::Error;

/// Result type alias for configurator operations
pub type Result<T> = std::result::Result<T, ConfiguratorError>;

/// Main error type for configurator operations
#[derive(Error, Debug)]
pub enum ConfiguratorError {
    /// Malformed or incomplete requirements. Never retried.
    #[error("{0}")]
    InvalidPayload(String),

    /// The remote summarizer could not produce a usable answer.
    /// Recovered locally by falling back to the baseline engine.
    #[error("Remote summary unavailable: {0}")]
    RemoteSummaryUnavailable(String),

    /// Writing or reading a persisted record failed
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Missing or invalid bearer credential
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConfiguratorError {
    /// Shorthand for a missing required field
    pub fn missing_field(field: &str) -> Self {
        Self::InvalidPayload(format!("Missing required field: {}", field))
    }

    /// Shorthand for an enum field holding an unknown value
    pub fn invalid_value(field: &str, value: &str) -> Self {
        Self::InvalidPayload(format!("Invalid value for {}: '{}'", field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ConfiguratorError::missing_field("usageType");
        assert_eq!(err.to_string(), "Missing required field: usageType");
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ConfiguratorError::invalid_value("formFactor", "tablet");
        assert_eq!(err.to_string(), "Invalid value for formFactor: 'tablet'");
    }
}
