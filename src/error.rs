//! Error types for the sego analysis library.
//!
//! All errors are represented by the [`SegoError`] enum. Tokenization itself
//! never fails; errors only surface while loading dictionaries, building
//! tokenizers from configuration, or in the CLI.
//!
//! # Examples
//!
//! ```
//! use sego_analysis::error::{Result, SegoError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SegoError::configuration("dictionary file paths required"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for sego operations.
#[derive(Error, Debug)]
pub enum SegoError {
    /// Missing or malformed configuration (tokenizer config, registry lookups)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Dictionary data could not be loaded
    #[error("Dictionary load error: {0}")]
    DictionaryLoad(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with SegoError.
pub type Result<T> = std::result::Result<T, SegoError>;

impl SegoError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        SegoError::Configuration(msg.into())
    }

    /// Create a new dictionary load error.
    pub fn dictionary_load<S: Into<String>>(msg: S) -> Self {
        SegoError::DictionaryLoad(msg.into())
    }

    /// Whether this error was caused by invalid configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SegoError::Configuration(_))
    }

    /// Whether this error was caused by a failed dictionary load.
    pub fn is_dictionary_load(&self) -> bool {
        matches!(self, SegoError::DictionaryLoad(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SegoError::configuration("dictionary file paths required");
        assert_eq!(
            error.to_string(),
            "Configuration error: dictionary file paths required"
        );
        assert!(error.is_configuration());

        let error = SegoError::dictionary_load("dict.txt: not found");
        assert_eq!(error.to_string(), "Dictionary load error: dict.txt: not found");
        assert!(error.is_dictionary_load());
        assert!(!error.is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let sego_error = SegoError::from(io_error);

        match sego_error {
            SegoError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
