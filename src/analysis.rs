//! Text analysis module.
//!
//! This module provides the tokenizer side of the analysis pipeline: token
//! types, the [`tokenizer::Tokenizer`] trait, the sego segmentation tokenizer
//! and a [`registry::TokenizerRegistry`] for building tokenizers from
//! configuration maps.

pub mod registry;
pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use registry::*;
pub use token::*;
pub use tokenizer::*;
