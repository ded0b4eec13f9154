//! Output formatting for CLI commands.

use std::fmt::{self, Write};
use std::io;

use serde::{Deserialize, Serialize};

use crate::analysis::token::{Token, TokenType};
use crate::cli::args::{OutputFormat, SegoArgs};
use crate::error::Result;
use crate::segmenter::Segment;

/// A token as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub term: String,
    pub start: usize,
    pub end: usize,
    pub position: usize,
    pub token_type: TokenType,
}

impl From<&Token> for TokenRecord {
    fn from(token: &Token) -> Self {
        TokenRecord {
            term: token.text().into_owned(),
            start: token.start_offset,
            end: token.end_offset,
            position: token.position,
            token_type: token.token_type,
        }
    }
}

/// Result structure for one tokenized input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeResult {
    pub text: String,
    pub tokens: Vec<TokenRecord>,
}

/// A segment tree as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub frequency: u64,
    pub pos: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<SegmentRecord>,
}

impl From<&Segment> for SegmentRecord {
    fn from(segment: &Segment) -> Self {
        let entry = segment.entry();
        SegmentRecord {
            text: String::from_utf8_lossy(entry.text()).into_owned(),
            start: segment.start(),
            end: segment.end(),
            frequency: entry.frequency(),
            pos: entry.pos().to_string(),
            children: entry.segments().iter().map(SegmentRecord::from).collect(),
        }
    }
}

/// Result structure for segment inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentResult {
    pub text: String,
    pub segments: Vec<SegmentRecord>,
}

/// Types that know how to print themselves for humans.
pub trait HumanOutput {
    fn write_human(&self, out: &mut String) -> fmt::Result;
}

impl HumanOutput for TokenizeResult {
    fn write_human(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "{}", self.text)?;
        for token in &self.tokens {
            writeln!(
                out,
                "  {:>4}  {:>5}..{:<5}  {:<12}  {}",
                token.position, token.start, token.end, token.token_type, token.term
            )?;
        }
        Ok(())
    }
}

impl HumanOutput for SegmentResult {
    fn write_human(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "{}", self.text)?;
        for segment in &self.segments {
            write_segment(segment, 1, out)?;
        }
        Ok(())
    }
}

impl<T: HumanOutput> HumanOutput for Vec<T> {
    fn write_human(&self, out: &mut String) -> fmt::Result {
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            item.write_human(out)?;
        }
        Ok(())
    }
}

fn write_segment(segment: &SegmentRecord, depth: usize, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "{:indent$}{} [{}..{}] freq={} pos={}",
        "",
        segment.text,
        segment.start,
        segment.end,
        segment.frequency,
        segment.pos,
        indent = depth * 2
    )?;
    for child in &segment.children {
        write_segment(child, depth + 1, out)?;
    }
    Ok(())
}

/// Render a result in the requested format.
pub fn render_result<T: Serialize + HumanOutput>(result: &T, args: &SegoArgs) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => {
            let mut out = String::new();
            result.write_human(&mut out).map_err(io::Error::other)?;
            Ok(out)
        }
        OutputFormat::Json if args.pretty => Ok(serde_json::to_string_pretty(result)? + "\n"),
        OutputFormat::Json => Ok(serde_json::to_string(result)? + "\n"),
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &SegoArgs,
) -> Result<()> {
    if matches!(args.output_format, OutputFormat::Human) && args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    print!("{}", render_result(result, args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn tokenize_result() -> TokenizeResult {
        TokenizeResult {
            text: "24口".to_string(),
            tokens: vec![
                TokenRecord::from(&Token::new("24", 0, 2, 1, TokenType::Numeric)),
                TokenRecord::from(&Token::new("口", 2, 5, 2, TokenType::Ideographic)),
            ],
        }
    }

    #[test]
    fn test_render_human() {
        let args = SegoArgs::parse_from(["sego", "segment", "-d", "a.txt", "x"]);
        let out = render_result(&tokenize_result(), &args).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("numeric"));
        assert!(lines[2].trim_end().ends_with("口"));
    }

    #[test]
    fn test_render_human_columns() {
        let args = SegoArgs::parse_from(["sego", "segment", "-d", "a.txt", "x"]);
        let out = render_result(&tokenize_result(), &args).unwrap();

        assert_eq!(
            out.lines().nth(1),
            Some("     1      0..2      numeric       24")
        );
    }

    #[test]
    fn test_render_json() {
        let args = SegoArgs::parse_from(["sego", "-f", "json", "segment", "-d", "a.txt", "x"]);
        let out = render_result(&tokenize_result(), &args).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["tokens"][0]["token_type"], "numeric");
        assert_eq!(value["tokens"][1]["term"], "口");
    }

    #[test]
    fn test_segment_human_indents_children() {
        let result = SegmentResult {
            text: "世博".to_string(),
            segments: vec![SegmentRecord {
                text: "世博".to_string(),
                start: 0,
                end: 6,
                frequency: 300,
                pos: "nz".to_string(),
                children: vec![SegmentRecord {
                    text: "世".to_string(),
                    start: 0,
                    end: 3,
                    frequency: 100,
                    pos: "n".to_string(),
                    children: Vec::new(),
                }],
            }],
        };

        let mut out = String::new();
        result.write_human(&mut out).unwrap();
        assert!(out.contains("\n  世博 [0..6] freq=300 pos=nz\n"));
        assert!(out.contains("\n    世 [0..3] freq=100 pos=n\n"));
    }
}
