//! # sego-analysis
//!
//! Dictionary-driven word segmentation for full-text analysis.
//!
//! ## Features
//!
//! - Maximum-probability segmentation over plain-text frequency dictionaries
//! - Nested expansion of compound words into their sub-words
//! - Ideographic / numeric / alphanumeric token classification
//! - Shared dictionary cache: each dictionary is loaded once per process
//! - Configuration-driven tokenizer registry
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sego_analysis::analysis::token::TokenType;
//! use sego_analysis::analysis::tokenizer::{SegoTokenizer, Tokenizer};
//! use sego_analysis::segmenter::DictionarySegmenter;
//!
//! let dictionary = "水果 1000 n\n世博 300 nz\n世博园 400 nz\n园 300 n\n";
//! let segmenter = DictionarySegmenter::from_reader(dictionary.as_bytes()).unwrap();
//! let tokenizer = SegoTokenizer::with_segmenter(Arc::new(segmenter), true);
//!
//! let tokens: Vec<_> = tokenizer.tokenize("买水果".as_bytes()).collect();
//! assert_eq!(tokens[1].text(), "水果");
//! assert_eq!(tokens[1].token_type, TokenType::Ideographic);
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod segmenter;
