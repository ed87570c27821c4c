//! Read-only word → vector tables.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use half::f16;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zstd::stream::read::Decoder;
use zstd::Encoder;

use crate::error::{KhmerNewsError, Result};

/// Dimensionality of the pretrained Khmer fastText vectors.
pub const EMBEDDING_DIM: usize = 300;

/// Lookup contract over a pretrained word-vector table.
///
/// Two accessors exist because backends differ: a subword model can compute
/// a vector for any string, while a plain table only answers for its
/// vocabulary. Callers try [`word_vector`](Self::word_vector) first, then
/// [`get_vector`](Self::get_vector).
pub trait WordVectors: Send + Sync {
    fn dimension(&self) -> usize;

    /// Vector computed by the backend (e.g. from character n-grams).
    fn word_vector(&self, _word: &str) -> Option<Vec<f32>> {
        None
    }

    /// Vector stored for an in-vocabulary word.
    fn get_vector(&self, word: &str) -> Option<&[f32]>;
}

/// In-memory, insertion-ordered vector table.
///
/// Rows are stored contiguously; the word order is the order of the source
/// file, which for fastText exports is descending corpus frequency.
#[derive(Debug, Clone, Default)]
pub struct VectorTable {
    dimension: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    data: Vec<f32>,
}

// On-disk layout of a compacted table. Components are IEEE half floats
// stored as their raw bit patterns, row-major.
#[derive(Serialize, Deserialize)]
struct CompactTable {
    dimension: usize,
    vocab_size: usize,
    words: Vec<String>,
    data: Vec<u16>,
}

impl VectorTable {
    pub fn new(dimension: usize) -> Self {
        VectorTable {
            dimension,
            ..Default::default()
        }
    }

    pub fn from_pairs<I, S>(dimension: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut table = VectorTable::new(dimension);
        for (word, vector) in pairs {
            table.insert(word.into(), &vector)?;
        }
        Ok(table)
    }

    /// Adds a row. An existing word keeps its first vector.
    pub fn insert(&mut self, word: String, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(KhmerNewsError::InvalidVectors(format!(
                "vector for {word:?} has {} components, expected {}",
                vector.len(),
                self.dimension
            )));
        }
        if self.index.contains_key(&word) {
            return Ok(());
        }
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Parses the fastText textual format: an optional `count dim` header,
    /// then one `word v1 .. vD` row per line.
    ///
    /// Without a header the dimension is taken from the first row. Rows with
    /// the wrong number of components or unparsable numbers are skipped.
    pub fn from_vec_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table: Option<VectorTable> = None;
        let mut skipped = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let values: Vec<&str> = parts.collect();

            if line_no == 0 && values.len() == 1 {
                if let (Ok(_), Ok(dim)) = (word.parse::<usize>(), values[0].parse::<usize>()) {
                    if dim == 0 {
                        return Err(KhmerNewsError::InvalidVectors(
                            "header declares dimension 0".into(),
                        ));
                    }
                    table = Some(VectorTable::new(dim));
                    continue;
                }
            }

            let table = table.get_or_insert_with(|| VectorTable::new(values.len()));
            if values.len() != table.dimension {
                skipped += 1;
                warn!(
                    line_no = line_no + 1,
                    found = values.len(),
                    expected = table.dimension,
                    "invalid vector row, skipped"
                );
                continue;
            }
            let parsed: std::result::Result<Vec<f32>, _> =
                values.iter().map(|v| v.parse::<f32>()).collect();
            match parsed {
                Ok(vector) => table.insert(word.to_owned(), &vector)?,
                Err(_) => {
                    skipped += 1;
                    warn!(line_no = line_no + 1, "unparsable vector row, skipped");
                }
            }
        }

        let table =
            table.ok_or_else(|| KhmerNewsError::InvalidVectors("empty vector file".into()))?;
        if table.dimension == 0 {
            return Err(KhmerNewsError::InvalidVectors("rows carry no components".into()));
        }
        if skipped > 0 {
            warn!(skipped, "vector rows skipped while loading");
        }
        Ok(table)
    }

    pub fn from_vec_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_vec_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            words = table.len(),
            dimension = table.dimension,
            "loaded word vectors"
        );
        Ok(table)
    }

    /// Keeps the first `vocab_limit` words.
    pub fn compact(&self, vocab_limit: usize) -> VectorTable {
        let keep = vocab_limit.min(self.words.len());
        let words: Vec<String> = self.words[..keep].to_vec();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        VectorTable {
            dimension: self.dimension,
            words,
            index,
            data: self.data[..keep * self.dimension].to_vec(),
        }
    }

    pub fn save_compressed<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = Encoder::new(writer, 19)?;
        serde_json::to_writer(&mut encoder, &self.to_compact())?;
        encoder.finish()?;
        Ok(())
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.to_compact())?;
        writer.flush()
    }

    pub fn load_compressed<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut decoder = Decoder::new(file)?;
        let mut json_data = String::new();
        decoder.read_to_string(&mut json_data)?;
        let compact: CompactTable = serde_json::from_str(&json_data)?;
        let table = Self::from_compact(compact)?;
        info!(
            path = %path.display(),
            words = table.len(),
            dimension = table.dimension,
            "loaded compact word vectors"
        );
        Ok(table)
    }

    /// Loads a table written by [`VectorTable::save_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let compact: CompactTable = serde_json::from_reader(BufReader::new(file))?;
        let table = Self::from_compact(compact)?;
        info!(
            path = %path.display(),
            words = table.len(),
            dimension = table.dimension,
            "loaded json word vectors"
        );
        Ok(table)
    }

    fn to_compact(&self) -> CompactTable {
        CompactTable {
            dimension: self.dimension,
            vocab_size: self.words.len(),
            words: self.words.clone(),
            data: self.data.iter().map(|&v| f16::from_f32(v).to_bits()).collect(),
        }
    }

    fn from_compact(compact: CompactTable) -> Result<Self> {
        if compact.words.len() * compact.dimension != compact.data.len() {
            return Err(KhmerNewsError::InvalidVectors(format!(
                "{} words x {} dimensions does not match {} stored values",
                compact.words.len(),
                compact.dimension,
                compact.data.len()
            )));
        }
        let index = compact
            .words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        Ok(VectorTable {
            dimension: compact.dimension,
            words: compact.words,
            index,
            data: compact.data.into_iter().map(|bits| f16::from_bits(bits).to_f32()).collect(),
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordVectors for VectorTable {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn get_vector(&self, word: &str) -> Option<&[f32]> {
        let row = *self.index.get(word)?;
        let offset = row * self.dimension;
        Some(&self.data[offset..offset + self.dimension])
    }
}
