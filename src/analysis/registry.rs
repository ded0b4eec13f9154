//! Named tokenizer constructors and custom tokenizer definitions.
//!
//! Index configurations refer to tokenizers by name. A *type* is a
//! constructor registered under a fixed name (such as `"sego"`); a *custom
//! tokenizer* is a named configuration map whose `"type"` key selects the
//! constructor:
//!
//! ```
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use sego_analysis::analysis::registry::TokenizerRegistry;
//! use sego_analysis::analysis::tokenizer::sego;
//! use sego_analysis::segmenter::SegmenterCache;
//!
//! let mut registry = TokenizerRegistry::new(Arc::new(SegmenterCache::default()));
//! sego::register(&mut registry).unwrap();
//!
//! // Missing "files" is rejected when the definition is added.
//! let config = json!({"type": "sego"});
//! assert!(registry
//!     .add_custom_tokenizer("chinese", config.as_object().unwrap())
//!     .is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use serde_json::{Map, Value};

use crate::analysis::tokenizer::Tokenizer;
use crate::error::{Result, SegoError};
use crate::segmenter::SegmenterCache;

/// Free-form tokenizer configuration.
pub type TokenizerConfig = Map<String, Value>;

/// Builds a tokenizer from its configuration, loading dictionaries through the
/// shared segmenter cache.
pub type TokenizerConstructor =
    fn(&TokenizerConfig, &SegmenterCache) -> Result<Arc<dyn Tokenizer>>;

/// Registry of tokenizer constructors and named tokenizer instances.
pub struct TokenizerRegistry {
    cache: Arc<SegmenterCache>,
    constructors: AHashMap<String, TokenizerConstructor>,
    custom: AHashMap<String, Arc<dyn Tokenizer>>,
}

impl TokenizerRegistry {
    /// Create an empty registry sharing `cache` between all tokenizers it builds.
    pub fn new(cache: Arc<SegmenterCache>) -> Self {
        TokenizerRegistry {
            cache,
            constructors: AHashMap::new(),
            custom: AHashMap::new(),
        }
    }

    /// The segmenter cache passed to constructors.
    pub fn cache(&self) -> &Arc<SegmenterCache> {
        &self.cache
    }

    /// Register a tokenizer type. Names can only be registered once.
    pub fn register_tokenizer(&mut self, name: &str, constructor: TokenizerConstructor) -> Result<()> {
        if self.constructors.contains_key(name) {
            return Err(SegoError::configuration(format!(
                "tokenizer type '{name}' is already registered"
            )));
        }
        self.constructors.insert(name.to_string(), constructor);
        Ok(())
    }

    /// Whether a tokenizer type is registered under `name`.
    pub fn has_type(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered tokenizer type names, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a tokenizer of type `type_name` from `config`.
    pub fn build_tokenizer(
        &self,
        type_name: &str,
        config: &TokenizerConfig,
    ) -> Result<Arc<dyn Tokenizer>> {
        let constructor = self.constructors.get(type_name).ok_or_else(|| {
            SegoError::configuration(format!("unknown tokenizer type '{type_name}'"))
        })?;
        log::debug!("building tokenizer of type '{type_name}'");
        constructor(config, &self.cache)
    }

    /// Build the tokenizer selected by the `"type"` key of `config`.
    pub fn build_from_config(&self, config: &TokenizerConfig) -> Result<Arc<dyn Tokenizer>> {
        let type_name = config
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| SegoError::configuration("tokenizer type required"))?;
        self.build_tokenizer(type_name, config)
    }

    /// Define a named tokenizer from a configuration map. The tokenizer is
    /// built immediately, so invalid definitions fail here.
    pub fn add_custom_tokenizer(&mut self, name: &str, config: &TokenizerConfig) -> Result<()> {
        if self.custom.contains_key(name) {
            return Err(SegoError::configuration(format!(
                "tokenizer '{name}' is already defined"
            )));
        }
        let tokenizer = self.build_from_config(config)?;
        self.custom.insert(name.to_string(), tokenizer);
        Ok(())
    }

    /// Look up a tokenizer by name: a custom definition first, otherwise a
    /// registered type built with an empty configuration.
    pub fn tokenizer_named(&self, name: &str) -> Result<Arc<dyn Tokenizer>> {
        if let Some(tokenizer) = self.custom.get(name) {
            return Ok(Arc::clone(tokenizer));
        }
        self.build_tokenizer(name, &TokenizerConfig::new())
    }
}

impl fmt::Debug for TokenizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        custom.sort_unstable();
        f.debug_struct("TokenizerRegistry")
            .field("types", &self.types())
            .field("custom", &custom)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::analysis::token::{Token, TokenStream, TokenType};

    struct WholeTokenizer;

    impl Tokenizer for WholeTokenizer {
        fn tokenize(&self, input: &[u8]) -> TokenStream {
            let token = Token::new(input, 0, input.len(), 1, TokenType::AlphaNumeric);
            Box::new(std::iter::once(token))
        }

        fn name(&self) -> &'static str {
            "whole"
        }
    }

    fn whole(_config: &TokenizerConfig, _cache: &SegmenterCache) -> Result<Arc<dyn Tokenizer>> {
        Ok(Arc::new(WholeTokenizer))
    }

    fn registry() -> TokenizerRegistry {
        let mut registry = TokenizerRegistry::new(Arc::new(SegmenterCache::default()));
        registry.register_tokenizer("whole", whole).unwrap();
        registry
    }

    #[test]
    fn test_register_and_build() {
        let registry = registry();
        assert!(registry.has_type("whole"));
        assert_eq!(registry.types(), vec!["whole"]);

        let tokenizer = registry.tokenizer_named("whole").unwrap();
        assert_eq!(tokenizer.name(), "whole");
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = registry();
        let err = registry.register_tokenizer("whole", whole).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_type() {
        let registry = registry();
        assert!(registry.tokenizer_named("missing").err().unwrap().is_configuration());

        let config = json!({"type": "missing"});
        let err = registry
            .build_from_config(config.as_object().unwrap())
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_custom_tokenizer() {
        let mut registry = registry();
        let config = json!({"type": "whole"});
        registry
            .add_custom_tokenizer("keyword", config.as_object().unwrap())
            .unwrap();

        let tokenizer = registry.tokenizer_named("keyword").unwrap();
        let tokens: Vec<_> = tokenizer.tokenize(b"abc").collect();
        assert_eq!(tokens.len(), 1);

        let err = registry
            .add_custom_tokenizer("keyword", config.as_object().unwrap())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_custom_tokenizer_requires_type() {
        let mut registry = registry();
        let config = json!({"files": "dict.txt"});
        let err = registry
            .add_custom_tokenizer("chinese", config.as_object().unwrap())
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
