//! Segmentation engine interface.
//!
//! The tokenizer adapter consumes word segmentation only through the traits in
//! this module. A [`Segmenter`] splits a byte sequence into an ordered list of
//! [`Segment`]s; each segment carries the dictionary [`Entry`] it matched, and
//! an entry may itself decompose into child segments (nested segmentation).
//!
//! [`DictionaryLoader`] turns a dictionary identifier into a loaded
//! segmenter, and [`cache::SegmenterCache`] makes sure each identifier is
//! loaded at most once.
//!
//! # Examples
//!
//! ```
//! use sego_analysis::segmenter::Segmenter;
//! use sego_analysis::segmenter::dictionary::DictionarySegmenter;
//!
//! let segmenter = DictionarySegmenter::from_reader("水果 1000 n\n".as_bytes()).unwrap();
//! let segments = segmenter.segment("水果".as_bytes());
//!
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].entry().text(), "水果".as_bytes());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

pub mod cache;
pub mod dictionary;

pub use cache::SegmenterCache;
pub use dictionary::{DictionarySegmenter, FileDictionaryLoader};

/// Part-of-speech tag carried by entries synthesized for unknown words.
pub const PSEUDO_POS: &str = "x";

/// A loaded segmentation engine.
///
/// Implementations are read-only after loading and shared between every
/// tokenizer that references the same dictionary.
pub trait Segmenter: Send + Sync {
    /// Segment `input` into an ordered list of top-level segments.
    ///
    /// The returned segments cover the input without gaps or overlaps.
    /// Any byte sequence is valid input; empty input yields no segments.
    fn segment(&self, input: &[u8]) -> Vec<Segment>;
}

/// Loads a dictionary identifier into a [`Segmenter`].
pub trait DictionaryLoader: Send + Sync {
    /// Load the dictionary named by `files`.
    fn load(&self, files: &str) -> Result<Arc<dyn Segmenter>>;
}

/// A dictionary entry matched by the segmentation engine.
#[derive(Clone, PartialEq)]
pub struct Entry {
    text: Vec<u8>,
    frequency: u64,
    pos: String,
    distance: f32,
    word_count: usize,
    segments: Vec<Segment>,
}

impl Entry {
    /// Create a single-word entry without child segments.
    pub fn new<T: Into<Vec<u8>>, P: Into<String>>(text: T, frequency: u64, pos: P) -> Self {
        Entry {
            text: text.into(),
            frequency,
            pos: pos.into(),
            distance: 0.0,
            word_count: 1,
            segments: Vec::new(),
        }
    }

    /// Attach child segments, with offsets local to this entry's text.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    pub(crate) fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub(crate) fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = word_count;
        self
    }

    /// The entry text. ASCII letters are lowercased by the dictionary engine.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Dictionary frequency of the entry.
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Part-of-speech tag.
    pub fn pos(&self) -> &str {
        &self.pos
    }

    /// Child segments this entry decomposes into (empty when atomic).
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Path cost of this entry: `log2(total frequency) - log2(frequency)`.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Number of words the entry text splits into.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Whether this entry was synthesized for a word missing from the
    /// dictionary rather than matched against a real entry.
    pub fn is_pseudo(&self) -> bool {
        self.frequency == 1 && self.pos == PSEUDO_POS
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("text", &String::from_utf8_lossy(&self.text))
            .field("frequency", &self.frequency)
            .field("pos", &self.pos)
            .field("segments", &self.segments)
            .finish()
    }
}

/// A span of segmented text and the entry that matched it.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    start: usize,
    end: usize,
    entry: Arc<Entry>,
}

impl Segment {
    /// Create a segment covering `start..end` bytes.
    pub fn new(start: usize, end: usize, entry: Arc<Entry>) -> Self {
        Segment { start, end, entry }
    }

    /// Start byte offset, relative to the segmented text.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End byte offset (exclusive), relative to the segmented text.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The matched dictionary entry.
    pub fn entry(&self) -> &Entry {
        &self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accessors() {
        let entry = Entry::new("世博", 300, "nz");
        assert_eq!(entry.text(), "世博".as_bytes());
        assert_eq!(entry.frequency(), 300);
        assert_eq!(entry.pos(), "nz");
        assert!(entry.segments().is_empty());
        assert!(!entry.is_pseudo());
    }

    #[test]
    fn test_pseudo_entry() {
        assert!(Entry::new("水", 1, PSEUDO_POS).is_pseudo());
        assert!(!Entry::new("水", 2, PSEUDO_POS).is_pseudo());
        assert!(!Entry::new("水", 1, "n").is_pseudo());
    }

    #[test]
    fn test_segment_with_children() {
        let child = Segment::new(0, 3, Arc::new(Entry::new("世", 100, "n")));
        let entry = Entry::new("世博", 300, "nz").with_segments(vec![child.clone()]);
        let segment = Segment::new(6, 12, Arc::new(entry));

        assert_eq!(segment.start(), 6);
        assert_eq!(segment.end(), 12);
        assert_eq!(segment.entry().segments(), &[child]);
    }
}
