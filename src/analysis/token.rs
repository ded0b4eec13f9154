//! Token types for text analysis.
//!
//! This module defines the data that flows out of a tokenizer:
//!
//! - [`Token`] - A single term with byte offsets, position and type
//! - [`TokenType`] - Classification of the term (ideographic, numeric, alphanumeric)
//! - [`TokenStream`] - Type alias for a boxed iterator of tokens
//!
//! Positions are 1-based and increase by one for every token in a stream.
//! Terms are raw bytes, since tokenizers accept arbitrary byte input.
//!
//! # Examples
//!
//! ```
//! use sego_analysis::analysis::token::{Token, TokenType};
//!
//! let token = Token::new("水果", 3, 9, 2, TokenType::Ideographic);
//! assert_eq!(token.text(), "水果");
//! assert_eq!(token.start_offset, 3);
//! assert_eq!(token.end_offset, 9);
//! assert_eq!(token.position, 2);
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A token represents a single term produced by a tokenizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The term bytes
    pub term: Vec<u8>,

    /// The byte offset where this token starts in the original input
    pub start_offset: usize,

    /// The byte offset where this token ends in the original input
    pub end_offset: usize,

    /// The position of the token in the token stream (1-based)
    pub position: usize,

    /// Classification of the term
    pub token_type: TokenType,
}

/// Token type classification used for language-aware indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Terms containing Han characters
    Ideographic,
    /// Terms that parse as a floating-point number
    Numeric,
    /// Everything else
    AlphaNumeric,
}

impl Token {
    /// Create a new token.
    pub fn new<T: Into<Vec<u8>>>(
        term: T,
        start_offset: usize,
        end_offset: usize,
        position: usize,
        token_type: TokenType,
    ) -> Self {
        Token {
            term: term.into(),
            start_offset,
            end_offset,
            position,
            token_type,
        }
    }

    /// The term as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.term)
    }

    /// Get the length of the term in bytes.
    pub fn len(&self) -> usize {
        self.term.len()
    }

    /// Check if the term is empty.
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Ideographic => "ideographic",
            TokenType::Numeric => "numeric",
            TokenType::AlphaNumeric => "alphanumeric",
        };
        f.pad(name)
    }
}

/// A token stream represents the ordered tokens of one input.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

/// Trait for types that can produce a token stream.
pub trait IntoTokenStream {
    /// Convert this type into a token stream.
    fn into_token_stream(self) -> TokenStream;
}

impl IntoTokenStream for Vec<Token> {
    fn into_token_stream(self) -> TokenStream {
        Box::new(self.into_iter())
    }
}
