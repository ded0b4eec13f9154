//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step of the analysis pipeline: they split raw
//! input into an ordered [`TokenStream`].
//!
//! # Available Tokenizers
//!
//! - [`sego::SegoTokenizer`] - Dictionary-driven word segmentation with
//!   nested sub-token expansion

use crate::analysis::token::TokenStream;

/// Trait for tokenizers that convert raw input into tokens.
///
/// The trait requires `Send + Sync` so tokenizers can be shared between
/// indexing threads.
///
/// # Examples
///
/// Implementing a custom tokenizer:
///
/// ```
/// use sego_analysis::analysis::token::{Token, TokenStream, TokenType};
/// use sego_analysis::analysis::tokenizer::Tokenizer;
///
/// struct CommaTokenizer;
///
/// impl Tokenizer for CommaTokenizer {
///     fn tokenize(&self, input: &[u8]) -> TokenStream {
///         let mut tokens = Vec::new();
///         let mut start = 0;
///         for (i, part) in input.split(|b| *b == b',').enumerate() {
///             let end = start + part.len();
///             tokens.push(Token::new(part, start, end, i + 1, TokenType::AlphaNumeric));
///             start = end + 1;
///         }
///         Box::new(tokens.into_iter())
///     }
///
///     fn name(&self) -> &'static str {
///         "comma"
///     }
/// }
///
/// let tokens: Vec<_> = CommaTokenizer.tokenize(b"a,b").collect();
/// assert_eq!(tokens.len(), 2);
/// ```
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given input into a stream of tokens.
    ///
    /// Every byte sequence is valid input; empty input yields an empty stream.
    fn tokenize(&self, input: &[u8]) -> TokenStream;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod sego;

pub use sego::SegoTokenizer;
