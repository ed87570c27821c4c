//! Word tokenizers for Khmer sentences.
//!
//! Khmer is written without spaces between words, so word boundaries come
//! from a lexicon. [`DictTokenizer`] groups the text into orthographic
//! clusters (a base character with its subscripts, vowels and signs) and picks
//! the cheapest cover of the clusters by lexicon words; clusters no word
//! covers are merged into a single unknown token.

use std::sync::Arc;

use thiserror::Error;

use crate::lexicon::Lexicon;
use crate::text::{is_khmer_consonant, is_khmer_dependent, KHMER_COENG};

/// Default upper bound on the characters of a single sentence.
pub const DEFAULT_MAX_SENTENCE_CHARS: usize = 20_000;
const UNKNOWN_PENALTY: f64 = 10.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("sentence has {chars} characters, tokenizer limit is {max}")]
    SentenceTooLong { chars: usize, max: usize },
    #[error("tokenizer backend failure: {0}")]
    Backend(String),
}

/// Splits one sentence into an ordered sequence of word tokens.
pub trait WordTokenizer: Send + Sync {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, TokenizeError>;
}

impl<T: WordTokenizer + ?Sized> WordTokenizer for Arc<T> {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, TokenizeError> {
        (**self).tokenize(sentence)
    }
}

impl<T: WordTokenizer + ?Sized> WordTokenizer for Box<T> {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, TokenizeError> {
        (**self).tokenize(sentence)
    }
}

/// Tokenizer for pre-segmented text: one token per whitespace-separated run.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl WordTokenizer for WhitespaceTokenizer {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, TokenizeError> {
        Ok(sentence.split_whitespace().map(str::to_owned).collect())
    }
}

/// Lexicon-driven Khmer word tokenizer.
pub struct DictTokenizer {
    lexicon: Lexicon,
    max_sentence_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitKind {
    Khmer,
    Foreign,
    Symbol,
}

#[derive(Debug, Clone, Copy)]
struct Unit {
    start: usize,
    end: usize,
    kind: UnitKind,
}

#[derive(Clone, Copy)]
struct State {
    cost: f64,
    prev: usize,
    known: bool,
}

impl DictTokenizer {
    pub fn new(lexicon: Lexicon) -> Self {
        DictTokenizer {
            lexicon,
            max_sentence_chars: DEFAULT_MAX_SENTENCE_CHARS,
        }
    }

    /// Tokenizer over the embedded seed lexicon.
    pub fn with_seed_lexicon() -> Self {
        Self::new(Lexicon::seed())
    }

    pub fn with_max_sentence_chars(mut self, max: usize) -> Self {
        self.max_sentence_chars = max;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    // Minimum-cost cover of a run of Khmer clusters
    fn segment_khmer_run(&self, text: &str, units: &[Unit], tokens: &mut Vec<String>) {
        let n = units.len();
        if n == 0 {
            return;
        }
        let ln_total = ((self.lexicon.total_frequency() + 1) as f64).ln();
        let unknown_cost = ln_total + UNKNOWN_PENALTY;
        let max_chars = self.lexicon.max_word_chars();

        let bound = |i: usize| if i < n { units[i].start } else { units[n - 1].end };

        let mut dp = vec![
            State {
                cost: f64::INFINITY,
                prev: 0,
                known: false,
            };
            n + 1
        ];
        dp[0].cost = 0.0;

        for i in 0..n {
            let base = dp[i].cost;
            if base.is_infinite() {
                continue;
            }
            if base + unknown_cost < dp[i + 1].cost {
                dp[i + 1] = State {
                    cost: base + unknown_cost,
                    prev: i,
                    known: false,
                };
            }

            let mut chars = 0usize;
            for j in i + 1..=n {
                chars += text[bound(j - 1)..bound(j)].chars().count();
                if chars > max_chars {
                    break;
                }
                if !self.lexicon.words.has_key_len(chars as u16) {
                    continue;
                }
                let word = &text[bound(i)..bound(j)];
                if let Some(freq) = self.lexicon.frequency(word) {
                    let cost = base + ln_total - f64::from(freq).ln() + 1.0;
                    if cost < dp[j].cost {
                        dp[j] = State {
                            cost,
                            prev: i,
                            known: true,
                        };
                    }
                }
            }
        }

        let mut segments: Vec<(usize, usize, bool)> = Vec::with_capacity(n);
        let mut curr = n;
        while curr > 0 {
            let state = dp[curr];
            segments.push((state.prev, curr, state.known));
            curr = state.prev;
        }
        segments.reverse();

        // Merge consecutive unknown clusters into one token
        let mut unknown_start: Option<usize> = None;
        let mut unknown_end = 0;
        for (start, end, known) in segments {
            if known {
                if let Some(u_start) = unknown_start.take() {
                    tokens.push(text[bound(u_start)..bound(unknown_end)].to_owned());
                }
                tokens.push(text[bound(start)..bound(end)].to_owned());
            } else {
                if unknown_start.is_none() {
                    unknown_start = Some(start);
                }
                unknown_end = end;
            }
        }
        if let Some(u_start) = unknown_start {
            tokens.push(text[bound(u_start)..bound(unknown_end)].to_owned());
        }
    }
}

impl WordTokenizer for DictTokenizer {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, TokenizeError> {
        let chars = sentence.chars().count();
        if chars > self.max_sentence_chars {
            return Err(TokenizeError::SentenceTooLong {
                chars,
                max: self.max_sentence_chars,
            });
        }

        let mut tokens = Vec::new();
        for chunk in sentence.split_whitespace() {
            let units = split_units(chunk);
            let mut i = 0;
            while i < units.len() {
                if units[i].kind == UnitKind::Khmer {
                    let start = i;
                    while i < units.len() && units[i].kind == UnitKind::Khmer {
                        i += 1;
                    }
                    self.segment_khmer_run(chunk, &units[start..i], &mut tokens);
                } else {
                    tokens.push(chunk[units[i].start..units[i].end].to_owned());
                    i += 1;
                }
            }
        }
        Ok(tokens)
    }
}

#[inline]
fn is_cluster_char(c: char) -> bool {
    is_khmer_consonant(c) || c == KHMER_COENG || is_khmer_dependent(c)
}

/// Splits whitespace-free text into Khmer clusters, foreign alphanumeric
/// runs and single symbol characters.
fn split_units(text: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut iter = text.char_indices().peekable();

    while let Some((start, c)) = iter.next() {
        let mut end = start + c.len_utf8();
        let kind = if is_cluster_char(c) {
            // A base (or a stray mark) absorbs following marks and coeng+base pairs
            while let Some(&(idx, next)) = iter.peek() {
                if is_khmer_dependent(next) {
                    end = idx + next.len_utf8();
                    iter.next();
                } else if next == KHMER_COENG {
                    end = idx + next.len_utf8();
                    iter.next();
                    if let Some(&(sub_idx, sub)) = iter.peek() {
                        if is_khmer_consonant(sub) {
                            end = sub_idx + sub.len_utf8();
                            iter.next();
                        }
                    }
                } else {
                    break;
                }
            }
            UnitKind::Khmer
        } else if c.is_alphanumeric() {
            while let Some(&(idx, next)) = iter.peek() {
                if next.is_alphanumeric() && !is_cluster_char(next) {
                    end = idx + next.len_utf8();
                    iter.next();
                } else {
                    break;
                }
            }
            UnitKind::Foreign
        } else {
            UnitKind::Symbol
        };
        units.push(Unit { start, end, kind });
    }

    units
}
