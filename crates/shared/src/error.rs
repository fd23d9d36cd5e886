//! Error types for permission resolution

use thiserror::Error;

/// Raised when a string at the boundary names no known action, module or role
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{value}'. Expected one of: {}", expected.join(", "))]
pub struct InvalidArgumentError {
    pub kind: &'static str,
    pub value: String,
    pub expected: Vec<String>,
}

impl InvalidArgumentError {
    pub fn new<I, S>(kind: &'static str, value: impl Into<String>, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            kind,
            value: value.into(),
            expected: expected.into_iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// General access error type
#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AccessError {
    /// Whether this error came from an unknown action/module/role string
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, AccessError::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = InvalidArgumentError::new("action", "publish", ["view", "create"]);
        assert_eq!(
            err.to_string(),
            "Unknown action 'publish'. Expected one of: view, create"
        );
    }

    #[test]
    fn test_access_error_kind() {
        let err: AccessError = InvalidArgumentError::new("module", "x", Vec::<String>::new()).into();
        assert!(err.is_invalid_argument());

        let err = AccessError::Config("bad".to_string());
        assert!(!err.is_invalid_argument());
        assert_eq!(err.to_string(), "Configuration error: bad");
    }
}
