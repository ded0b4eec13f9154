//! Dictionary-based maximum-probability segmenter.
//!
//! Dictionaries are plain text, one entry per line:
//!
//! ```text
//! 水果 1000 n
//! 世博园 400 nz
//! first 600
//! ```
//!
//! Each entry gets a path cost of `log2(total) - log2(frequency)`, and text is
//! segmented along the path with the smallest total cost. Words missing from
//! the dictionary are covered by pseudo entries (frequency 1, pos `"x"`).
//!
//! Every multi-word entry is segmented once more at load time, excluding the
//! entry itself, and the result becomes the entry's child segments. This is
//! what the tokenizer's nested mode expands.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};

use super::{DictionaryLoader, Entry, PSEUDO_POS, Segment, Segmenter};
use crate::error::{Result, SegoError};

/// Entries rarer than this are dropped while loading.
const MIN_ENTRY_FREQUENCY: u64 = 2;

/// Path cost of a pseudo entry.
const PSEUDO_DISTANCE: f32 = 32.0;

/// Loads comma-separated dictionary file lists from the filesystem.
#[derive(Clone, Debug, Default)]
pub struct FileDictionaryLoader;

impl FileDictionaryLoader {
    /// Create a new file dictionary loader.
    pub fn new() -> Self {
        FileDictionaryLoader
    }
}

impl DictionaryLoader for FileDictionaryLoader {
    fn load(&self, files: &str) -> Result<Arc<dyn Segmenter>> {
        let paths: Vec<&str> = files
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .collect();
        if paths.is_empty() {
            return Err(SegoError::dictionary_load(format!(
                "no dictionary files in '{files}'"
            )));
        }

        let segmenter = DictionarySegmenter::open(&paths)?;
        Ok(Arc::new(segmenter))
    }
}

#[derive(Debug)]
struct RawEntry {
    words: Vec<Vec<u8>>,
    frequency: u64,
    pos: String,
}

/// Accumulates dictionary lines before the entries are finalized.
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    entries: Vec<RawEntry>,
    seen: AHashSet<Vec<u8>>,
    total_frequency: u64,
}

impl DictionaryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single entry. Returns `Ok(false)` when it was skipped, either
    /// because its frequency is too low or because the text is already present.
    ///
    /// Fails when the total frequency of the dictionary would overflow.
    pub fn add_entry(&mut self, text: &str, frequency: u64, pos: &str) -> Result<bool> {
        if frequency < MIN_ENTRY_FREQUENCY {
            return Ok(false);
        }

        let words = split_words(text.as_bytes());
        if words.is_empty() {
            return Ok(false);
        }

        let key = words.concat();
        if self.seen.contains(&key) {
            return Ok(false);
        }

        self.total_frequency = self.total_frequency.checked_add(frequency).ok_or_else(|| {
            SegoError::dictionary_load(format!(
                "total frequency overflows at entry '{text}' ({frequency})"
            ))
        })?;
        self.seen.insert(key);
        self.entries.push(RawEntry {
            words,
            frequency,
            pos: pos.to_string(),
        });
        Ok(true)
    }

    /// Read every line of `reader` in dictionary format.
    pub fn add_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let (Some(text), Some(frequency)) = (fields.next(), fields.next()) else {
                continue;
            };
            let pos = fields.next().unwrap_or("");

            match frequency.parse::<u64>() {
                Ok(frequency) => {
                    self.add_entry(text, frequency, pos)?;
                }
                Err(e) => {
                    log::warn!(
                        "skipping dictionary line {}: invalid frequency '{}': {}",
                        line_num + 1,
                        frequency,
                        e
                    );
                }
            }
        }
        Ok(())
    }

    /// Read a dictionary file.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SegoError::dictionary_load(format!(
                "failed to open dictionary {}: {}",
                path.display(),
                e
            ))
        })?;
        self.add_reader(BufReader::new(file)).map_err(|e| {
            SegoError::dictionary_load(format!(
                "failed to read dictionary {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Finalize the entries into a segmenter.
    pub fn build(self) -> DictionarySegmenter {
        let DictionaryBuilder {
            mut entries,
            total_frequency,
            ..
        } = self;

        let log_total = (total_frequency as f64).log2() as f32;
        let max_entry_words = entries.iter().map(|e| e.words.len()).max().unwrap_or(0);

        let mut segmenter = DictionarySegmenter {
            entries: AHashMap::with_capacity(entries.len()),
            max_entry_words,
            total_frequency,
        };

        // Children only ever span fewer words than their parent, so building
        // shortest-first means every child entry is already final.
        entries.sort_by_key(|raw| raw.words.len());
        for raw in entries {
            let segments = if raw.words.len() > 1 {
                segmenter.segment_words(&raw.words, true)
            } else {
                Vec::new()
            };
            let distance = log_total - (raw.frequency as f64).log2() as f32;
            let entry = Entry::new(raw.words.concat(), raw.frequency, raw.pos)
                .with_distance(distance)
                .with_word_count(raw.words.len())
                .with_segments(segments);

            segmenter
                .entries
                .insert(entry.text().to_vec(), Arc::new(entry));
        }

        segmenter
    }
}

/// Best path found so far ending at a given word.
#[derive(Clone)]
struct Jumper {
    distance: f32,
    entry: Arc<Entry>,
}

fn improves(jumper: &Option<Jumper>, distance: f32) -> bool {
    match jumper {
        Some(current) => distance < current.distance,
        None => true,
    }
}

/// A loaded dictionary that segments text along its most probable path.
#[derive(Debug)]
pub struct DictionarySegmenter {
    entries: AHashMap<Vec<u8>, Arc<Entry>>,
    max_entry_words: usize,
    total_frequency: u64,
}

impl DictionarySegmenter {
    /// Load and merge the given dictionary files, in order.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut builder = DictionaryBuilder::new();
        for path in paths {
            builder.add_file(path)?;
        }
        Ok(builder.build())
    }

    /// Load a dictionary from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut builder = DictionaryBuilder::new();
        builder.add_reader(reader)?;
        Ok(builder.build())
    }

    /// Number of dictionary entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the frequencies of all entries.
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    /// Length, in words, of the longest entry.
    pub fn max_entry_words(&self) -> usize {
        self.max_entry_words
    }

    /// Look up an entry by text (matched case-insensitively for ASCII).
    pub fn get(&self, text: &str) -> Option<&Arc<Entry>> {
        self.entries.get(&split_words(text.as_bytes()).concat())
    }

    /// Segment a word sequence. In search mode the whole sequence is not
    /// allowed to match a single entry, and single words are not split.
    fn segment_words(&self, words: &[Vec<u8>], search_mode: bool) -> Vec<Segment> {
        if words.is_empty() || (search_mode && words.len() == 1) {
            return Vec::new();
        }

        let last = words.len() - 1;
        let mut jumpers: Vec<Option<Jumper>> = vec![None; words.len()];
        let mut key = Vec::new();

        for current in 0..words.len() {
            let base = match current {
                0 => 0.0,
                _ => jumpers[current - 1]
                    .as_ref()
                    .map_or(0.0, |jumper| jumper.distance),
            };

            let limit = (current + self.max_entry_words).min(words.len());
            let mut has_single_word = false;
            key.clear();

            for end in current..limit {
                key.extend_from_slice(&words[end]);
                let Some(entry) = self.entries.get(key.as_slice()) else {
                    continue;
                };
                if entry.word_count() != end - current + 1 {
                    continue;
                }
                if end == current {
                    has_single_word = true;
                }
                if search_mode && current == 0 && end == last {
                    continue;
                }

                let distance = base + entry.distance();
                if improves(&jumpers[end], distance) {
                    jumpers[end] = Some(Jumper {
                        distance,
                        entry: Arc::clone(entry),
                    });
                }
            }

            if !has_single_word {
                let distance = base + PSEUDO_DISTANCE;
                if improves(&jumpers[current], distance) {
                    let entry = Entry::new(words[current].clone(), 1, PSEUDO_POS)
                        .with_distance(PSEUDO_DISTANCE);
                    jumpers[current] = Some(Jumper {
                        distance,
                        entry: Arc::new(entry),
                    });
                }
            }
        }

        // Walk the best path back from the last word.
        let mut path = Vec::new();
        let mut index = words.len();
        while index > 0 {
            let Some(jumper) = jumpers[index - 1].as_ref() else {
                break;
            };
            path.push(Arc::clone(&jumper.entry));
            index -= jumper.entry.word_count().clamp(1, index);
        }
        path.reverse();

        let mut offset = 0;
        path.into_iter()
            .map(|entry| {
                let start = offset;
                offset += entry.text().len();
                Segment::new(start, offset, entry)
            })
            .collect()
    }
}

impl Segmenter for DictionarySegmenter {
    fn segment(&self, input: &[u8]) -> Vec<Segment> {
        if input.is_empty() {
            return Vec::new();
        }
        self.segment_words(&split_words(input), false)
    }
}

/// Decode one UTF-8 character. Invalid bytes decode as `None` with width 1.
fn decode_char(bytes: &[u8]) -> (Option<char>, usize) {
    let width = match bytes[0] {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return (None, 1),
    };

    match bytes.get(..width).and_then(|s| std::str::from_utf8(s).ok()) {
        Some(s) => (s.chars().next(), width),
        None => (None, 1),
    }
}

/// Split text into words: runs of letters and digits encoded in at most two
/// bytes form one (ASCII-lowercased) word; every other character is a word of
/// its own. Byte lengths are preserved, so word offsets map back to the input.
pub fn split_words(text: &[u8]) -> Vec<Vec<u8>> {
    let mut words = Vec::with_capacity(text.len() / 3 + 1);
    let mut run_start: Option<usize> = None;
    let mut current = 0;

    while current < text.len() {
        let (ch, width) = decode_char(&text[current..]);
        let alphanumeric = width <= 2 && ch.is_some_and(char::is_alphanumeric);

        if alphanumeric {
            run_start.get_or_insert(current);
        } else {
            if let Some(start) = run_start.take() {
                words.push(text[start..current].to_ascii_lowercase());
            }
            words.push(text[current..current + width].to_vec());
        }
        current += width;
    }

    if let Some(start) = run_start {
        words.push(text[start..].to_ascii_lowercase());
    }

    words
}
