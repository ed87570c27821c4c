use std::collections::BTreeMap;

use crate::category::Category;

/// Confidence assigned to the predicted label when the classifier exposes
/// no per-category scores.
pub const HARD_LABEL_CONFIDENCE: f64 = 0.95;

/// Per-category probabilities, keyed in [`Category::ALL`] order.
pub type ConfidenceMap = BTreeMap<Category, f64>;

/// Turns classifier output into a probability distribution over categories.
///
/// With decision values: a max-shifted softmax. Values map to categories by
/// position; categories past the end of the slice get 0.0 and values past
/// [`Category::COUNT`] are ignored. Without them:
/// [`HARD_LABEL_CONFIDENCE`] for `hard_label` and the remainder spread evenly
/// over the other categories.
pub fn confidence_scores(decision_values: Option<&[f64]>, hard_label: Category) -> ConfidenceMap {
    match decision_values {
        Some(values) if !values.is_empty() => softmax_confidence(values),
        _ => hard_label_confidence(hard_label),
    }
}

fn softmax_confidence(values: &[f64]) -> ConfidenceMap {
    let values = &values[..values.len().min(Category::COUNT)];
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exp.iter().sum();

    Category::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let p = exp.get(i).map_or(0.0, |e| e / sum);
            (*category, p)
        })
        .collect()
}

fn hard_label_confidence(label: Category) -> ConfidenceMap {
    let rest = (1.0 - HARD_LABEL_CONFIDENCE) / (Category::COUNT - 1) as f64;
    Category::ALL
        .iter()
        .map(|category| {
            let p = if *category == label {
                HARD_LABEL_CONFIDENCE
            } else {
                rest
            };
            (*category, p)
        })
        .collect()
}

/// Category with the highest confidence; ties go to the earlier category.
pub fn top_category(confidence: &ConfidenceMap) -> Option<(Category, f64)> {
    confidence
        .iter()
        .fold(None, |best: Option<(Category, f64)>, (category, p)| match best {
            Some((_, best_p)) if best_p >= *p => best,
            _ => Some((*category, *p)),
        })
}
