//! Command implementations for the sego CLI.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::analysis::registry::{TokenizerConfig, TokenizerRegistry};
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{Tokenizer, sego};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, SegoError};
use crate::segmenter::SegmenterCache;

/// Execute a CLI command.
pub fn execute_command(args: SegoArgs) -> Result<()> {
    let mut registry = TokenizerRegistry::new(Arc::new(SegmenterCache::default()));
    sego::register(&mut registry)?;

    match &args.command {
        Command::Tokenize(tokenize_args) => tokenize(tokenize_args, &registry, &args),
        Command::Segment(segment_args) => segment(segment_args, &registry, &args),
    }
}

fn dictionary_files(dictionary: &DictionaryArgs) -> Result<&str> {
    dictionary
        .dict
        .as_deref()
        .ok_or_else(|| SegoError::configuration("dictionary file paths required (--dict)"))
}

/// Build the tokenizer described by the command line. A definition file
/// takes precedence over `--dict`.
fn build_tokenizer(
    args: &TokenizeArgs,
    registry: &TokenizerRegistry,
) -> Result<Arc<dyn Tokenizer>> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str::<TokenizerConfig>(&content)?
        }
        None => {
            let mut config = TokenizerConfig::new();
            config.insert("type".into(), sego::NAME.into());
            config.insert("files".into(), dictionary_files(&args.dictionary)?.into());
            config
        }
    };
    if args.flat {
        config.insert("nested".into(), false.into());
    }

    registry.build_from_config(&config)
}

fn tokenize_text(tokenizer: &dyn Tokenizer, text: String) -> TokenizeResult {
    let tokens: Vec<Token> = tokenizer.tokenize(text.as_bytes()).collect();
    TokenizeResult {
        tokens: tokens.iter().map(TokenRecord::from).collect(),
        text,
    }
}

/// Tokenize a single text or every line of an input file.
fn tokenize(args: &TokenizeArgs, registry: &TokenizerRegistry, cli_args: &SegoArgs) -> Result<()> {
    let tokenizer = build_tokenizer(args, registry)?;

    if let Some(input) = &args.input {
        let reader = BufReader::new(File::open(input)?);
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;

        let start_time = Instant::now();
        let results: Vec<TokenizeResult> = lines
            .into_par_iter()
            .map(|line| tokenize_text(tokenizer.as_ref(), line))
            .collect();
        log::info!(
            "tokenized {} lines from {} in {} ms",
            results.len(),
            input.display(),
            start_time.elapsed().as_millis()
        );

        return output_result("Tokenized input file", &results, cli_args);
    }

    let text = args.text.clone().unwrap_or_default();
    let result = tokenize_text(tokenizer.as_ref(), text);
    output_result("Tokenized text", &result, cli_args)
}

/// Print the raw segment trees for a text.
fn segment(args: &SegmentArgs, registry: &TokenizerRegistry, cli_args: &SegoArgs) -> Result<()> {
    let files = dictionary_files(&args.dictionary)?;
    let segmenter = registry.cache().acquire(files)?;

    let segments = segmenter.segment(args.text.as_bytes());
    let result = SegmentResult {
        text: args.text.clone(),
        segments: segments.iter().map(SegmentRecord::from).collect(),
    };

    output_result("Segments", &result, cli_args)
}
