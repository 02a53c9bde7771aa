//! Result and error types for the storefront suite.

use thiserror::Error;

/// Result type for storefront operations
pub type StorefrontResult<T> = Result<T, StorefrontError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// No element matched the locator before the wait expired
    #[error("Element {locator} not found within {timeout_ms}ms")]
    NotFound {
        /// Locator that was polled
        locator: String,
        /// Wait duration in milliseconds
        timeout_ms: u64,
    },

    /// An element matched but never became interactable
    #[error("Element {locator} not clickable within {timeout_ms}ms")]
    NotClickable {
        /// Locator that was polled
        locator: String,
        /// Wait duration in milliseconds
        timeout_ms: u64,
    },

    /// Script execution or text injection failed
    #[error("Failed to {action} {locator}: {message}")]
    Action {
        /// Locator of the target element
        locator: String,
        /// Action that was attempted
        action: &'static str,
        /// Underlying error message
        message: String,
    },

    /// A non-element condition (URL, load) was not met in time
    #[error("Timed out after {timeout_ms}ms waiting for {waited_for}")]
    Timeout {
        /// Description of the condition
        waited_for: String,
        /// Wait duration in milliseconds
        timeout_ms: u64,
    },

    /// Element handle outlived the DOM it was resolved against
    #[error("Stale element handle {id}")]
    StaleElement {
        /// Handle id
        id: String,
    },

    /// Locator strategy the active driver cannot resolve
    #[error("Unsupported locator {locator}")]
    UnsupportedLocator {
        /// Locator that was rejected
        locator: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Invalid suite configuration
    #[error("Invalid configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl StorefrontError {
    /// Wrap an underlying failure as an [`StorefrontError::Action`] on `locator`.
    pub fn action(
        locator: &impl std::fmt::Display,
        action: &'static str,
        source: impl std::fmt::Display,
    ) -> Self {
        Self::Action {
            locator: locator.to_string(),
            action,
            message: source.to_string(),
        }
    }

    /// Whether the error came from a bounded wait expiring.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::NotClickable { .. } | Self::Timeout { .. }
        )
    }
}
