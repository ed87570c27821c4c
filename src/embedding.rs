use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::vectors::WordVectors;

/// How resolved word vectors are aggregated into one text vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMethod {
    /// Element-wise arithmetic mean.
    #[default]
    Mean,
    /// Every resolved occurrence scaled by its word's relative frequency,
    /// then summed.
    Weighted,
}

impl EmbeddingMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            EmbeddingMethod::Mean => "mean",
            EmbeddingMethod::Weighted => "weighted",
        }
    }
}

impl TryFrom<&str> for EmbeddingMethod {
    type Error = ();

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "weighted" => Ok(Self::Weighted),
            _ => Err(()),
        }
    }
}

/// Looks a word up through the table's accessors, first match wins.
///
/// A vector whose length differs from the table dimension counts as a
/// failed lookup.
fn resolve<'a, V>(vectors: &'a V, word: &str) -> Option<Cow<'a, [f32]>>
where
    V: WordVectors + ?Sized,
{
    let dim = vectors.dimension();
    if let Some(vec) = vectors.word_vector(word) {
        if vec.len() == dim {
            return Some(Cow::Owned(vec));
        }
    }
    match vectors.get_vector(word) {
        Some(vec) if vec.len() == dim => Some(Cow::Borrowed(vec)),
        _ => None,
    }
}

/// Maps segmented text to one vector of `vectors.dimension()` components.
///
/// Tokens are whitespace separated; out-of-vocabulary tokens are skipped and
/// the zero vector is returned when nothing resolves.
pub fn sentence_embedding<V>(
    segmented_text: &str,
    vectors: &V,
    method: EmbeddingMethod,
) -> Vec<f32>
where
    V: WordVectors + ?Sized,
{
    let dim = vectors.dimension();
    let resolved: Vec<(&str, Cow<'_, [f32]>)> = segmented_text
        .split_whitespace()
        .filter_map(|word| resolve(vectors, word).map(|vec| (word, vec)))
        .collect();

    let mut out = vec![0.0f32; dim];
    if resolved.is_empty() {
        return out;
    }

    match method {
        EmbeddingMethod::Mean => {
            for (_, vec) in &resolved {
                for (acc, v) in out.iter_mut().zip(vec.iter()) {
                    *acc += *v;
                }
            }
            let n = resolved.len() as f32;
            out.iter_mut().for_each(|acc| *acc /= n);
        }
        EmbeddingMethod::Weighted => {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for (word, _) in &resolved {
                *counts.entry(*word).or_insert(0) += 1;
            }
            let total = resolved.len() as f32;
            for (word, vec) in &resolved {
                let weight = counts[word] as f32 / total;
                for (acc, v) in out.iter_mut().zip(vec.iter()) {
                    *acc += *v * weight;
                }
            }
        }
    }

    out
}
