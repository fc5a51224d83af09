//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Failure of a single bot command.
///
/// The `Display` form is what the invoking author receives by direct message.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A configured category, channel or role does not exist in the guild.
    #[error("Missing {kind} '{name}' in this server.")]
    MissingEntity { kind: &'static str, name: String },

    #[error("Unknown user '{token}'.")]
    UnknownUser { token: String },

    #[error("{message}")]
    Usage { message: String },

    #[error("Could not parse the command: unbalanced quotes.")]
    UnbalancedQuotes,

    #[error("Failed to {action}: {message}")]
    Platform { action: String, message: String },
}

impl CommandError {
    pub fn missing(kind: &'static str, name: impl Into<String>) -> Self {
        Self::MissingEntity {
            kind,
            name: name.into(),
        }
    }

    pub fn platform(action: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Platform {
            action: action.into(),
            message: source.to_string(),
        }
    }
}

/// Result type alias for command execution.
pub type CommandResult<T> = std::result::Result<T, CommandError>;
