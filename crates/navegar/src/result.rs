//! Result and error types for Navegar.

use thiserror::Error;

/// Result type for Navegar operations
pub type NavegarResult<T> = Result<T, NavegarError>;

/// Errors that can occur in Navegar
#[derive(Debug, Error)]
pub enum NavegarError {
    /// Selector document missing or unparseable. Fatal: aborts the run,
    /// no partial load.
    #[error("Failed to load selector document from {path}: {message}")]
    ConfigLoad {
        /// Path to the selector source
        path: String,
        /// Error message
        message: String,
    },

    /// A page object's required selector group (or a leaf inside it) is
    /// absent from the registry. Fatal at construction time.
    #[error("Selector group not found in registry: {path}")]
    MissingSelectorGroup {
        /// The offending dotted path
        path: String,
    },

    /// A wait/act operation exceeded its bound. Propagated to the calling
    /// test step; never retried by the core.
    #[error("Timed out after {ms}ms waiting on selector '{selector}'")]
    Timeout {
        /// Selector the operation was waiting on
        selector: String,
        /// Configured bound in milliseconds
        ms: u64,
    },

    /// Navigation failure
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Raw automation failure at the driver boundary
    #[error("Browser driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch failure
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Required process configuration absent or empty
    #[error("Required setting '{name}' is missing or empty")]
    MissingSetting {
        /// Setting name
        name: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NavegarError {
    /// Create a driver error from any displayable source
    pub fn driver(message: impl std::fmt::Display) -> Self {
        Self::Driver {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_carries_selector_and_bound() {
        let err = NavegarError::Timeout {
            selector: "#login".to_string(),
            ms: 5000,
        };
        let msg = err.to_string();
        assert!(msg.contains("#login"));
        assert!(msg.contains("5000"));
    }

    #[test]
    fn test_missing_group_names_path() {
        let err = NavegarError::MissingSelectorGroup {
            path: "parabank.loginPage".to_string(),
        };
        assert!(err.to_string().contains("parabank.loginPage"));
    }

    #[test]
    fn test_config_load_names_source() {
        let err = NavegarError::ConfigLoad {
            path: "config/selectors.yaml".to_string(),
            message: "mapping expected".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("config/selectors.yaml"));
        assert!(msg.contains("mapping expected"));
    }
}
