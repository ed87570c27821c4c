use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WordMap {
    #[serde(default)]
    pub map: HashMap<String, u32>,

    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub max_len: u16,
    #[serde(default)]
    pub key_len_mask: u64, // lengths 1..=64 → bit n-1
    #[serde(default)]
    pub long_lengths: HashSet<u16>, // >64
}

impl WordMap {
    /// Insert (word, freq) and update stats *incrementally* (no rescans).
    ///
    /// Re-inserting a word replaces its frequency; `total` is kept in sync.
    #[inline]
    pub fn insert_with_len(&mut self, word: String, freq: u32, len_chars: u16) {
        if len_chars != 0 {
            if len_chars <= 64 {
                self.key_len_mask |= 1u64 << (len_chars - 1);
            } else {
                self.long_lengths.insert(len_chars);
            }
            if len_chars > self.max_len {
                self.max_len = len_chars;
            }
        }
        if let Some(previous) = self.map.insert(word, freq) {
            self.total -= u64::from(previous);
        }
        self.total += u64::from(freq);
    }

    #[inline]
    pub fn get(&self, word: &str) -> Option<u32> {
        self.map.get(word).copied()
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.map.contains_key(word)
    }

    #[inline]
    pub fn has_key_len(&self, n: u16) -> bool {
        if n == 0 {
            return false;
        }
        if n <= 64 {
            (self.key_len_mask & (1u64 << (n - 1))) != 0
        } else {
            self.long_lengths.contains(&n)
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
