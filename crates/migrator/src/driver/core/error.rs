//! Error types for the migration driver and the remote API client

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the platform API or driving a batch
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Transport-level failure (connection refused, TLS, timeout)
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("API returned {status} for '{url}': {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The auth host rejected the client credentials
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Invalid or missing configuration
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },

    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A child item references a parent that was never created
    #[error("Parent '{parent}' not found for '{name}'")]
    ParentNotFound { name: String, parent: String },

    /// An item lacks the key needed to target it remotely
    #[error("Item '{name}' has no {field}")]
    MissingKey { name: String, field: &'static str },

    /// Parent references form a loop
    #[error("Dependency cycle among: {}", names.join(", "))]
    DependencyCycle { names: Vec<String> },

    #[error("Failed to read template '{path}'")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template '{path}'")]
    TemplateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Log directory or file could not be opened
    #[error("Failed to set up log sink at '{path}'")]
    LogSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MigrateError>;

impl MigrateError {
    /// Shorthand for a configuration error about a single missing field
    pub fn missing_config(field: &str, suggestion: &str) -> Self {
        MigrateError::Configuration {
            message: format!("{} is not set", field),
            field: Some(field.to_string()),
            suggestion: Some(suggestion.to_string()),
        }
    }

    /// Whether this error must abort the whole run rather than a single item
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MigrateError::Configuration { .. }
                | MigrateError::InvalidUrl { .. }
                | MigrateError::DependencyCycle { .. }
                | MigrateError::TemplateRead { .. }
                | MigrateError::TemplateParse { .. }
                | MigrateError::LogSink { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            MigrateError::HttpRequest { .. } => "http_request",
            MigrateError::Api { .. } => "api",
            MigrateError::Decode { .. } => "decode",
            MigrateError::Auth { .. } => "auth",
            MigrateError::Configuration { .. } => "configuration",
            MigrateError::InvalidUrl { .. } => "invalid_url",
            MigrateError::ParentNotFound { .. } => "parent_not_found",
            MigrateError::MissingKey { .. } => "missing_key",
            MigrateError::DependencyCycle { .. } => "dependency_cycle",
            MigrateError::TemplateRead { .. } => "template_read",
            MigrateError::TemplateParse { .. } => "template_parse",
            MigrateError::LogSink { .. } => "log_sink",
        }
    }

    /// HTTP status of the failed call, if the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            MigrateError::Api { status, .. } => Some(*status),
            MigrateError::HttpRequest { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            MigrateError::Configuration { suggestion, .. } => suggestion.as_deref(),
            MigrateError::Auth { .. } => {
                Some("Check CLIENT_ID, SHARED_SECRET and AUTH_HOST in your .env file")
            }
            MigrateError::ParentNotFound { .. } => {
                Some("Make sure the parent is in the same data file and was created first")
            }
            MigrateError::DependencyCycle { .. } => {
                Some("Remove the circular parent references from the data file")
            }
            MigrateError::TemplateRead { .. } => {
                Some("Check DATA_DIR points at the template directory")
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MigrateError {
    fn from(error: reqwest::Error) -> Self {
        let url = error
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        MigrateError::HttpRequest { url, source: error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_fatal() {
        let err = MigrateError::missing_config("TENANT_ID", "Set TENANT_ID in .env");
        assert!(err.is_fatal());
        assert_eq!(err.category(), "configuration");
        assert_eq!(err.suggestion(), Some("Set TENANT_ID in .env"));
        assert_eq!(err.to_string(), "Invalid configuration: TENANT_ID is not set");
    }

    #[test]
    fn item_errors_are_recoverable() {
        let api = MigrateError::Api {
            status: 409,
            url: "https://t1.example/api".to_string(),
            body: "conflict".to_string(),
        };
        assert!(!api.is_fatal());
        assert_eq!(api.status(), Some(409));

        let orphan = MigrateError::ParentNotFound {
            name: "Shirts".to_string(),
            parent: "Apparel".to_string(),
        };
        assert!(!orphan.is_fatal());
        assert_eq!(orphan.to_string(), "Parent 'Apparel' not found for 'Shirts'");
    }

    #[test]
    fn cycle_lists_every_name() {
        let err = MigrateError::DependencyCycle {
            names: vec!["A".to_string(), "B".to_string()],
        };
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Dependency cycle among: A, B");
    }
}
