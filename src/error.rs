//! Error types and handling for the `UrbanRetail` application

use thiserror::Error;

/// Errors surfaced to operators and API clients
#[derive(Error, Debug)]
pub enum UrbanRetailError {
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Request payload rejected before prediction
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl UrbanRetailError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Message safe to show to an API client
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            UrbanRetailError::Config { .. } => {
                "Server misconfigured. Please check the config file and reasoning API key."
                    .to_string()
            }
            UrbanRetailError::Validation { message } => format!("Invalid input: {message}"),
        }
    }
}
