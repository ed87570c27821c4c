//! Sentence and paragraph recovery for text pulled out of PDF pages.
//!
//! PDF text extraction yields hard line breaks at every layout line and
//! loses paragraph structure. [`format_extracted_text`] flattens the text,
//! re-splits it on sentence punctuation and regroups the sentences into
//! paragraphs separated by a blank line.

use crate::text::{is_khmer_consonant, KHMER_FULL_STOP};

const SENTENCE_ENDINGS: &[char] = &[KHMER_FULL_STOP, '.', '!', '?', ':', ';'];
const HEADING_ENDINGS: &[char] = &[':', KHMER_FULL_STOP, '.'];
/// Sentences shorter than this many characters are dropped as fragments.
const MIN_SENTENCE_CHARS: usize = 4;
const SENTENCES_PER_PARAGRAPH: usize = 4;
const HEADING_MAX_CHARS: usize = 50;
const LONG_SENTENCE_CHARS: usize = 300;

/// Reformats raw extracted text into sentences and paragraphs.
///
/// A sentence ends at `។ . ! ? : ;` only when the next character is a space
/// and the one after it is an uppercase letter, a Khmer consonant or a digit.
/// A paragraph closes after four sentences, after a short heading-like
/// sentence, or after a sentence longer than 300 characters.
///
/// When no sentence survives the fragment filter the trimmed input is
/// returned unchanged.
pub fn format_extracted_text(raw: &str) -> String {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let sentences = split_extracted_sentences(&text);
    if sentences.is_empty() {
        return raw.trim().to_owned();
    }
    group_paragraphs(&sentences).join("\n\n")
}

fn split_extracted_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, &(idx, ch)) in chars.iter().enumerate() {
        if !SENTENCE_ENDINGS.contains(&ch) {
            continue;
        }
        let at_boundary = matches!(
            (chars.get(i + 1), chars.get(i + 2)),
            (Some(&(_, gap)), Some(&(_, next))) if gap.is_whitespace() && opens_sentence(next)
        );
        if at_boundary {
            let end = idx + ch.len_utf8();
            push_sentence(&mut sentences, &text[start..end]);
            start = end;
        }
    }
    push_sentence(&mut sentences, &text[start..]);
    sentences
}

#[inline]
fn opens_sentence(ch: char) -> bool {
    ch.is_uppercase() || is_khmer_consonant(ch) || ch.is_numeric()
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let sentence = candidate.trim();
    if sentence.chars().count() >= MIN_SENTENCE_CHARS {
        sentences.push(sentence);
    }
}

fn group_paragraphs(sentences: &[&str]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let last = sentences.len().saturating_sub(1);

    for (i, &sentence) in sentences.iter().enumerate() {
        current.push(sentence);
        let len = sentence.chars().count();
        let heading = len < HEADING_MAX_CHARS && sentence.ends_with(HEADING_ENDINGS);
        let should_break = current.len() >= SENTENCES_PER_PARAGRAPH
            || (i < last && (heading || len > LONG_SENTENCE_CHARS));
        if should_break {
            paragraphs.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs
}
