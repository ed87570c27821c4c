use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::text::is_khmer_consonant;

/// Descriptive statistics of an input text.
///
/// Lengths are counted in Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub characters: usize,
    pub words: usize,
    pub unique_words: usize,
    pub sentences: usize,
    pub avg_word_length: f64,
    pub avg_sentence_length: f64,
    pub lexical_diversity: f64,
    pub khmer_character_ratio: f64,
    pub readability_score: f64,
}

impl TextStatistics {
    pub fn from_text(text: &str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let characters = text.chars().count();
        let delimiters = text
            .chars()
            .filter(|ch| matches!(ch, '។' | '.' | '!' | '?'))
            .count();
        let sentences = delimiters.max(1);

        let unique_words = words.iter().collect::<HashSet<_>>().len();
        let avg_word_length = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
        };
        let lexical_diversity = if words.is_empty() {
            0.0
        } else {
            unique_words as f64 / words.len() as f64
        };
        let khmer_chars = text.chars().filter(|ch| is_khmer_consonant(*ch)).count();
        let khmer_character_ratio = if characters > 0 {
            khmer_chars as f64 / characters as f64
        } else {
            0.0
        };
        let avg_sentence_length = words.len() as f64 / sentences as f64;

        TextStatistics {
            characters,
            words: words.len(),
            unique_words,
            sentences,
            avg_word_length,
            avg_sentence_length,
            lexical_diversity,
            khmer_character_ratio,
            readability_score: readability(words.len(), sentences, avg_word_length),
        }
    }
}

// Flesch reading-ease shape with word length standing in for syllables
fn readability(words: usize, sentences: usize, avg_word_length: f64) -> f64 {
    if words == 0 || sentences == 0 {
        return 0.0;
    }
    let avg_sentence_length = words as f64 / sentences as f64;
    let score = 206.835 - (1.015 * avg_sentence_length) - (84.6 * (avg_word_length / 10.0));
    score.clamp(0.0, 100.0)
}
