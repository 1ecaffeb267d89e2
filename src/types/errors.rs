//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The
//! invocation wrapper classifies errors with [`Error::is_domain`]: domain
//! errors become `isError` results, everything else is reported and re-raised.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error raised by a client callback that is not a domain error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error enum for the registration adapter.
#[derive(Error, Debug)]
pub enum Error {
    /// Expected, user-facing failure raised by a tool callback.
    #[error("{0}")]
    Tool(String),

    /// Tool invoked while its client reports it is not configured.
    #[error("The tool is not configured - configuration options for {client} are missing or invalid.")]
    NotConfigured { client: String },

    /// Output schema declared but the callback returned no structured content.
    #[error("The result of the tool '{tool}' must include 'structuredContent'")]
    MissingStructuredContent { tool: String },

    /// Registration-time misuse (empty titles, duplicate names).
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown tool, resource or prompt.
    #[error("not found: {0}")]
    NotFound(String),

    /// Cancellation observed by a callback.
    #[error("operation cancelled: {0}")]
    Cancelled(String),

    /// Timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other failure raised by a client callback, displayed unchanged.
    #[error("{0}")]
    Handler(#[source] BoxError),
}

impl Error {
    /// Domain errors are absorbed into an `isError` result and never reported.
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::Tool(_) | Error::NotConfigured { .. })
    }

    /// Short, stable label used in log fields and telemetry events.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Tool(_) => "tool",
            Error::NotConfigured { .. } => "not_configured",
            Error::MissingStructuredContent { .. } => "missing_structured_content",
            Error::Validation(_) => "validation",
            Error::NotFound(_) => "not_found",
            Error::Cancelled(_) => "cancelled",
            Error::Timeout(_) => "timeout",
            Error::Internal(_) => "internal",
            Error::Serialization(_) => "serialization",
            Error::Handler(_) => "handler",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }

    pub fn not_configured(client: impl Into<String>) -> Self {
        Self::NotConfigured {
            client: client.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Wrap an arbitrary callback failure. Strings are accepted too.
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_classification() {
        assert!(Error::tool("boom").is_domain());
        assert!(Error::not_configured("Test Product").is_domain());
        assert!(!Error::handler("boom").is_domain());
        assert!(!Error::cancelled("client went away").is_domain());
        assert!(!Error::MissingStructuredContent {
            tool: "t".to_string()
        }
        .is_domain());
    }

    #[test]
    fn test_handler_message_is_unchanged() {
        assert_eq!(Error::handler("Y").to_string(), "Y");
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::handler(io);
        assert_eq!(err.to_string(), "disk on fire");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_configured_message() {
        assert_eq!(
            Error::not_configured("Test Product").to_string(),
            "The tool is not configured - configuration options for Test Product are missing or invalid."
        );
    }

    #[test]
    fn test_missing_structured_content_message() {
        let err = Error::MissingStructuredContent {
            tool: "Test Product: Test Tool".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The result of the tool 'Test Product: Test Tool' must include 'structuredContent'"
        );
        assert_eq!(err.kind(), "missing_structured_content");
    }
}
