use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zstd::stream::read::Decoder;
use zstd::Encoder;

pub mod word_map;

pub use word_map::WordMap;

const SEED_LEXICON: &str = include_str!("dicts/khmer_seed.txt");
/// Frequency assigned to lexicon lines that carry no frequency column.
pub const DEFAULT_FREQUENCY: u32 = 1;

/// Word lexicon backing [`crate::DictTokenizer`].
///
/// Text format is one entry per line: `word [freq] [tag]`, whitespace
/// separated. Blank lines and lines starting with `#` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    pub words: WordMap,
}

impl Lexicon {
    /// The embedded seed lexicon of common Khmer news vocabulary.
    pub fn seed() -> Self {
        Self::from_text(SEED_LEXICON)
    }

    /// Parses an in-memory word list in the `word [freq] [tag]` format.
    pub fn from_text(content: &str) -> Self {
        let mut lexicon = Lexicon::default();
        for (line_no, line) in content.lines().enumerate() {
            lexicon.insert_line(line, line_no + 1);
        }
        lexicon
    }

    pub fn from_path<P>(filename: P) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = filename.as_ref();
        let file = File::open(path)?;
        let mut lexicon = Lexicon::default();

        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            lexicon.insert_line(&line, line_no + 1);
        }
        info!(path = %path.display(), words = lexicon.len(), "loaded lexicon");

        Ok(lexicon)
    }

    pub fn insert(&mut self, word: &str, freq: u32) {
        let len_chars = word.chars().count().min(u16::MAX as usize) as u16;
        self.words.insert_with_len(word.to_owned(), freq, len_chars);
    }

    fn insert_line(&mut self, line: &str, line_no: usize) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }
        let mut parts = trimmed.split_whitespace();
        let Some(word) = parts.next() else {
            return;
        };
        let freq = match parts.next() {
            None => DEFAULT_FREQUENCY,
            Some(raw) => match raw.parse::<u32>() {
                Ok(freq) => freq.max(1),
                Err(_) => {
                    warn!(line_no, line, "invalid lexicon frequency, line skipped");
                    return;
                }
            },
        };
        self.insert(word, freq);
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[inline]
    pub fn frequency(&self, word: &str) -> Option<u32> {
        self.words.get(word)
    }

    #[inline]
    pub fn total_frequency(&self) -> u64 {
        self.words.total
    }

    /// Longest word length, in characters
    #[inline]
    pub fn max_word_chars(&self) -> usize {
        self.words.max_len as usize
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn save_compressed<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = Encoder::new(writer, 19)?;
        serde_json::to_writer(&mut encoder, self)?;
        encoder.finish()?;
        Ok(())
    }

    pub fn load_compressed<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut decoder = Decoder::new(file)?;
        let mut json_data = String::new();
        decoder.read_to_string(&mut json_data)?;
        let lexicon = serde_json::from_str(&json_data)?;
        Ok(lexicon)
    }

    /// Loads a lexicon written by [`Lexicon::serialize_to_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let lexicon = serde_json::from_reader(BufReader::new(file))?;
        Ok(lexicon)
    }

    // Serialize the lexicon to plain JSON
    pub fn serialize_to_json<P: AsRef<Path>>(&self, filename: P) -> io::Result<()> {
        let json_string = serde_json::to_string(&self)?;
        let mut file = File::create(filename)?;
        file.write_all(json_string.as_bytes())?;
        Ok(())
    }
}
