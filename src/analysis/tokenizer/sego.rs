//! Dictionary segmentation tokenizer.
//!
//! [`SegoTokenizer`] runs input through a [`Segmenter`] and flattens the
//! resulting segment trees into a token stream. In nested mode every composite
//! dictionary match is expanded into its sub-words, which are emitted before
//! the match itself:
//!
//! ```text
//! Input: "世博园"
//!
//! Segment tree:        Nested token stream:
//!   世博园               1: 世      (0..3)
//!   ├── 世博             2: 博      (3..6)
//!   │   ├── 世           3: 世博    (0..6)
//!   │   └── 博           4: 园      (6..9)
//!   └── 园               5: 世博园  (0..9)
//! ```
//!
//! Sub-words that only exist to complete a decomposition (pseudo entries with
//! frequency 1 and tag `"x"`) are dropped, but a top-level segment is always
//! emitted so the stream covers the whole input.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Tokenizer;
use crate::analysis::registry::{TokenizerConfig, TokenizerRegistry};
use crate::analysis::token::{IntoTokenStream, Token, TokenStream, TokenType};
use crate::error::{Result, SegoError};
use crate::segmenter::{Segment, Segmenter, SegmenterCache};

/// Name the tokenizer is registered under.
pub const NAME: &str = "sego";

static IDEOGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Han}+").expect("ideograph pattern should be valid"));

fn default_nested() -> bool {
    true
}

/// Configuration for [`SegoTokenizer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegoTokenizerConfig {
    /// Comma-separated dictionary file paths.
    pub files: String,

    /// Expand composite matches into their sub-words (default: true).
    #[serde(default = "default_nested")]
    pub nested: bool,
}

impl SegoTokenizerConfig {
    /// Create a config for `files` with nested expansion enabled.
    pub fn new<S: Into<String>>(files: S) -> Self {
        SegoTokenizerConfig {
            files: files.into(),
            nested: default_nested(),
        }
    }

    /// Enable or disable nested expansion.
    pub fn with_nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Read the config from a free-form configuration map.
    ///
    /// `files` must be a string. A missing or non-boolean `nested` falls back
    /// to `true`.
    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        let files = config
            .get("files")
            .and_then(Value::as_str)
            .ok_or_else(|| SegoError::configuration("dictionary file paths required"))?;
        let nested = config
            .get("nested")
            .and_then(Value::as_bool)
            .unwrap_or_else(default_nested);

        Ok(SegoTokenizerConfig::new(files).with_nested(nested))
    }
}

/// Tokenizer backed by a shared dictionary segmenter.
#[derive(Clone)]
pub struct SegoTokenizer {
    segmenter: Arc<dyn Segmenter>,
    nested: bool,
}

impl SegoTokenizer {
    /// Create a tokenizer for the dictionary `files`, loading it through
    /// `cache` if no other tokenizer has loaded it yet.
    pub fn new(cache: &SegmenterCache, files: &str, nested: bool) -> Result<Self> {
        let segmenter = cache.acquire(files)?;
        Ok(Self::with_segmenter(segmenter, nested))
    }

    /// Create a tokenizer from a typed config.
    pub fn from_config(cache: &SegmenterCache, config: &SegoTokenizerConfig) -> Result<Self> {
        Self::new(cache, &config.files, config.nested)
    }

    /// Wrap an already loaded segmenter.
    pub fn with_segmenter(segmenter: Arc<dyn Segmenter>, nested: bool) -> Self {
        SegoTokenizer { segmenter, nested }
    }

    /// Whether composite matches are expanded into their sub-words.
    pub fn nested(&self) -> bool {
        self.nested
    }

    /// Tokenize into a vector instead of a stream.
    pub fn tokens(&self, input: &[u8]) -> Vec<Token> {
        let mut tokens = Vec::new();
        for segment in self.segmenter.segment(input) {
            self.flatten(&segment, segment.start(), true, &mut tokens);
        }
        tokens
    }

    /// Emit `segment` (absolute start `start`) and, in nested mode, its
    /// children before it. Positions follow the number of tokens emitted.
    fn flatten(&self, segment: &Segment, start: usize, top: bool, tokens: &mut Vec<Token>) {
        let entry = segment.entry();

        if self.nested {
            for child in entry.segments() {
                self.flatten(child, start + child.start(), false, tokens);
            }
        }

        // Pseudo children only fill gaps in a decomposition.
        if top || !entry.is_pseudo() {
            let term = entry.text();
            tokens.push(Token::new(
                term,
                start,
                start + segment.end() - segment.start(),
                tokens.len() + 1,
                token_type(term),
            ));
        }
    }
}

impl Tokenizer for SegoTokenizer {
    fn tokenize(&self, input: &[u8]) -> TokenStream {
        self.tokens(input).into_token_stream()
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

impl fmt::Debug for SegoTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegoTokenizer")
            .field("nested", &self.nested)
            .finish_non_exhaustive()
    }
}

/// Classify a term: Han characters, then floating-point numbers, then the rest.
pub fn token_type(term: &[u8]) -> TokenType {
    if IDEOGRAPH.is_match(term) {
        return TokenType::Ideographic;
    }

    let numeric = std::str::from_utf8(term)
        .ok()
        .and_then(parse_float)
        .is_some();
    if numeric {
        return TokenType::Numeric;
    }

    TokenType::AlphaNumeric
}

/// Parse a decimal or hexadecimal (`0x1.8p3`) floating-point literal.
///
/// `inf`, `infinity` and `nan` are accepted case-insensitively (`nan`
/// unsigned only). Finite literals whose magnitude does not fit in an `f64`
/// are rejected rather than rounded to infinity.
fn parse_float(text: &str) -> Option<f64> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'+') => (false, &text[1..]),
        Some(b'-') => (true, &text[1..]),
        _ => (false, text),
    };
    if unsigned.starts_with(['+', '-']) {
        return None;
    }

    let lower = unsigned.to_ascii_lowercase();
    let value = match lower.as_str() {
        "inf" | "infinity" => return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY }),
        "nan" if unsigned.len() == text.len() => return Some(f64::NAN),
        "nan" => return None,
        _ => match lower.strip_prefix("0x") {
            Some(hex) => parse_hex_float(hex)?,
            None => {
                let decimal = lower
                    .bytes()
                    .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'+' | b'-'));
                if !decimal {
                    return None;
                }
                lower.parse::<f64>().ok()?
            }
        },
    };

    value
        .is_finite()
        .then_some(if negative { -value } else { value })
}

/// Hexadecimal mantissa with a mandatory binary exponent, without the `0x`.
fn parse_hex_float(hex: &str) -> Option<f64> {
    let (mantissa, exponent) = hex.split_once('p')?;
    let exponent: i32 = exponent.parse().ok()?;
    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for c in integer.chars().chain(fraction.chars()) {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }
    if value == 0.0 {
        return Some(0.0);
    }

    let scale = i32::try_from(fraction.len())
        .ok()
        .and_then(|len| exponent.checked_sub(len.checked_mul(4)?))?;
    Some(value * 2f64.powi(scale))
}

/// Registry constructor for the `"sego"` tokenizer type.
pub fn constructor(
    config: &TokenizerConfig,
    cache: &SegmenterCache,
) -> Result<Arc<dyn Tokenizer>> {
    let config = SegoTokenizerConfig::from_config(config)?;
    Ok(Arc::new(SegoTokenizer::from_config(cache, &config)?))
}

/// Register the `"sego"` tokenizer type with `registry`.
pub fn register(registry: &mut TokenizerRegistry) -> Result<()> {
    registry.register_tokenizer(NAME, constructor)
}
