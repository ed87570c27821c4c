use tracing::debug;

use crate::text::{normalize_word, KHMER_FULL_STOP};
use crate::tokenizer::WordTokenizer;

/// Characters that end a sentence.
pub const SENTENCE_DELIMITERS: [char; 5] = [KHMER_FULL_STOP, '.', '!', '?', '\n'];
/// Separator placed between segmented sentences.
pub const SENTENCE_SEPARATOR: &str = " ។ ";

#[inline]
fn is_delimiter(ch: char) -> bool {
    SENTENCE_DELIMITERS.contains(&ch)
}

fn is_delimiter_token(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(ch), None) if is_delimiter(ch))
}

/// Splits text into trimmed, non-empty sentence candidates.
///
/// Each run up to and including a delimiter is one candidate; a trailing run
/// without a delimiter is kept as the last candidate.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if is_delimiter(ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                result.push(trimmed.to_owned());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        result.push(trimmed.to_owned());
    }

    result
}

/// Segments cleaned text into space-separated words, keeping sentence
/// boundaries as `" ។ "`.
///
/// A sentence the tokenizer rejects is kept verbatim. When no sentence
/// survives the input is returned unchanged.
pub fn segment_khmer_text<T>(text: &str, tokenizer: &T) -> String
where
    T: WordTokenizer + ?Sized,
{
    let mut processed: Vec<String> = Vec::new();

    for sentence in split_sentences(text) {
        match tokenizer.tokenize(&sentence) {
            Ok(tokens) => {
                let words: Vec<String> = tokens
                    .iter()
                    .map(|token| normalize_word(token))
                    .filter(|word| !word.is_empty() && !is_delimiter_token(word))
                    .collect();
                if !words.is_empty() {
                    processed.push(words.join(" "));
                }
            }
            Err(err) => {
                debug!(error = %err, "tokenizer failed, keeping sentence verbatim");
                processed.push(sentence);
            }
        }
    }

    if processed.is_empty() {
        return text.to_owned();
    }
    processed.join(SENTENCE_SEPARATOR)
}
