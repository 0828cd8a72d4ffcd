// src/error.rs

//! Unified error handling for the job watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for job watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Regular expression failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A source returned something the adapter could not use
    #[error("Source error for {context}: {message}")]
    Source { context: String, message: String },

    /// Building or delivering the digest email failed
    #[error("Email error: {0}")]
    Email(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a source error with context.
    pub fn source(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Source {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an email error.
    pub fn email(message: impl fmt::Display) -> Self {
        Self::Email(message.to_string())
    }

    /// Short failure class used in adapter status notes.
    pub fn class(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "timeout".to_string(),
            Self::Http(e) => match e.status() {
                Some(status) => format!("http {}", status.as_u16()),
                None if e.is_connect() => "connect".to_string(),
                None if e.is_decode() => "decode".to_string(),
                None => "http".to_string(),
            },
            Self::Io(_) => "io".to_string(),
            Self::Json(_) => "json".to_string(),
            Self::Toml(_) | Self::TomlSerialize(_) => "toml".to_string(),
            Self::Regex(_) => "regex".to_string(),
            Self::Selector { .. } => "selector".to_string(),
            Self::Config(_) => "config".to_string(),
            Self::Validation(_) => "validation".to_string(),
            Self::Source { .. } => "source".to_string(),
            Self::Email(_) => "email".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_for_parse_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(AppError::from(json_err).class(), "json");
        assert_eq!(AppError::selector("[[", "bad").class(), "selector");
        assert_eq!(AppError::source("lever:acme", "empty").class(), "source");
    }

    #[test]
    fn test_class_for_config_errors() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        assert_eq!(AppError::from(regex_err).class(), "regex");
        let toml_err = toml::from_str::<toml::Value>("a = ").unwrap_err();
        assert_eq!(AppError::from(toml_err).class(), "toml");
    }

    #[test]
    fn test_source_error_display() {
        let err = AppError::source("workday:Acme", "missing jobPostings");
        assert_eq!(
            err.to_string(),
            "Source error for workday:Acme: missing jobPostings"
        );
    }
}
