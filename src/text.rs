//! Unicode normalization and character-class cleaning for Khmer text.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

/// Khmer consonants and independent vowels (U+1780..=U+17B3).
pub const KHMER_CONSONANTS: std::ops::RangeInclusive<char> = '\u{1780}'..='\u{17B3}';
/// Khmer dependent vowels, nikahit, reahmuk and yuukaleapintu (U+17B4..=U+17C8).
pub const KHMER_VOWELS: std::ops::RangeInclusive<char> = '\u{17B4}'..='\u{17C8}';
/// Khmer register shifters and diacritic signs (U+17C9..=U+17D1).
pub const KHMER_SIGNS: std::ops::RangeInclusive<char> = '\u{17C9}'..='\u{17D1}';
/// Khmer coeng (subscript marker).
pub const KHMER_COENG: char = '\u{17D2}';
/// Khmer full stop, the canonical sentence delimiter.
pub const KHMER_FULL_STOP: char = '។';

// Symbols, Khmer digits, ASCII digits, Latin letters, ASCII punctuation and the
// extra punctuation marks U+1360, U+1361, U+1363..=U+1368, U+136A.
static STRIP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[!-/:-@\[-`{-~0-9A-Za-z«»\x{17D4}-\x{17DB}\x{17E0}-\x{17E9}\x{1360}\x{1361}\x{1363}-\x{1368}\x{136A}]",
    )
    .unwrap()
});
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// NFC-normalizes `text` and removes every code point whose general category
/// belongs to group C (control, format, surrogate, private use, unassigned).
/// Unassigned means unassigned in the Unicode version of
/// `unicode-general-category`.
///
/// Newlines and tabs are control characters, so they are removed as well.
pub fn normalize_khmer_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.nfc().filter(|ch| !is_other(*ch)).collect()
}

/// Normalizes a single token: NFC, trim, strip category C code points.
pub fn normalize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let composed: String = word.nfc().collect();
    composed.trim().chars().filter(|ch| !is_other(*ch)).collect()
}

/// Cleans raw text down to Khmer script content separated by single spaces.
///
/// Symbols, Khmer and ASCII digits, Latin letters and punctuation are
/// deleted; whitespace runs collapse to one space and the ends are trimmed.
/// The output is recomposed so that `clean_khmer_text(clean_khmer_text(s))`
/// equals `clean_khmer_text(s)`.
pub fn clean_khmer_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let normalized = normalize_khmer_text(text);
    let stripped = STRIP_REGEX.replace_all(&normalized, "");
    let collapsed = WHITESPACE_REGEX.replace_all(&stripped, " ");
    collapsed.trim().nfc().collect()
}

/// Returns `true` when `ch` is a Khmer consonant or independent vowel.
#[inline]
pub fn is_khmer_consonant(ch: char) -> bool {
    KHMER_CONSONANTS.contains(&ch)
}

/// Returns `true` when `ch` attaches to a preceding Khmer base: dependent
/// vowels, signs, and the U+17D3/U+17DD marks.
#[inline]
pub fn is_khmer_dependent(ch: char) -> bool {
    KHMER_VOWELS.contains(&ch)
        || KHMER_SIGNS.contains(&ch)
        || ch == '\u{17D3}'
        || ch == '\u{17DD}'
}

#[inline]
fn is_other(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}
