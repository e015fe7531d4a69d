//! Error types for voltage-cable

use thiserror::Error;

/// Result type for cable specification operations
pub type Result<T> = std::result::Result<T, CableSpecError>;

/// Cable specification errors
///
/// Every variant is terminal for a single parse call. Callers branch on the
/// variant, never on the rendered message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CableSpecError {
    /// Specification string is empty or whitespace-only
    #[error("Cable specification is empty")]
    EmptySpec,

    /// Model designator carries both power and control signatures
    #[error("Ambiguous cable category for model: {0}")]
    AmbiguousCategory(String),

    /// Bundle count token is zero, negative or out of range
    #[error("Invalid bundle count: {0}")]
    InvalidBundleCount(String),

    /// Count or section token failed numeric parsing
    #[error("Invalid section value: {0}")]
    InvalidSection(String),

    /// No grammar structurally matched the specification
    #[error("Unsupported cable specification format: {0}")]
    UnsupportedFormat(String),

    /// A grammar match ran past its time budget
    #[error("Pattern match timed out in {grammar} grammar after {elapsed_ms} ms")]
    MatchTimeout {
        grammar: &'static str,
        elapsed_ms: u64,
    },

    /// Grammar pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<regex::Error> for CableSpecError {
    fn from(err: regex::Error) -> Self {
        CableSpecError::Pattern(err.to_string())
    }
}

impl From<figment::Error> for CableSpecError {
    fn from(err: figment::Error) -> Self {
        CableSpecError::Config(err.to_string())
    }
}

// Helper methods
impl CableSpecError {
    pub fn ambiguous(model: impl Into<String>) -> Self {
        CableSpecError::AmbiguousCategory(model.into())
    }

    pub fn invalid_bundle(token: impl Into<String>) -> Self {
        CableSpecError::InvalidBundleCount(token.into())
    }

    pub fn invalid_section(token: impl Into<String>) -> Self {
        CableSpecError::InvalidSection(token.into())
    }

    pub fn unsupported(spec: impl Into<String>) -> Self {
        CableSpecError::UnsupportedFormat(spec.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        CableSpecError::Config(msg.into())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_payload() {
        assert_eq!(
            CableSpecError::invalid_section("ABC").to_string(),
            "Invalid section value: ABC"
        );
        assert_eq!(
            CableSpecError::ambiguous("YJV KVV").to_string(),
            "Ambiguous cable category for model: YJV KVV"
        );
        let timeout = CableSpecError::MatchTimeout {
            grammar: "simple",
            elapsed_ms: 1500,
        };
        assert!(timeout.to_string().contains("simple"));
    }

    #[test]
    fn test_regex_error_maps_to_pattern() {
        let err: CableSpecError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, CableSpecError::Pattern(_)));
    }
}
