use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::category::Category;
use crate::error::{KhmerNewsError, Result};

/// A pretrained text classifier over embedding vectors.
pub trait Classifier: Send + Sync {
    /// Hard label for the feature vector.
    fn predict(&self, features: &[f32]) -> Category;

    /// Raw per-category scores in [`Category::ALL`] order, when the model
    /// exposes them.
    fn decision_function(&self, _features: &[f32]) -> Option<Vec<f64>> {
        None
    }

    /// Expected feature length, when the model knows it.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// One-vs-rest linear model (`score_k = w_k · x + b_k`), e.g. an exported
/// linear SVM.
///
/// JSON layout:
///
/// ```json
/// { "classes": ["economic", ...], "coef": [[...], ...], "intercept": [...] }
/// ```
///
/// Rows are reordered into [`Category::ALL`] order on load, so every
/// category must appear exactly once.
#[derive(Debug, Clone)]
pub struct LinearModel {
    weights: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    dimension: usize,
}

#[derive(Deserialize)]
struct LinearModelFile {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    #[serde(default)]
    intercept: Vec<f64>,
}

impl LinearModel {
    /// Builds a model from rows already in [`Category::ALL`] order.
    pub fn new(weights: Vec<Vec<f64>>, intercept: Vec<f64>) -> Result<Self> {
        if weights.len() != Category::COUNT {
            return Err(KhmerNewsError::InvalidModel(format!(
                "expected {} weight rows, found {}",
                Category::COUNT,
                weights.len()
            )));
        }
        let dimension = weights[0].len();
        if dimension == 0 || weights.iter().any(|row| row.len() != dimension) {
            return Err(KhmerNewsError::InvalidModel(
                "weight rows must be non-empty and of equal length".into(),
            ));
        }
        let intercept = if intercept.is_empty() {
            vec![0.0; Category::COUNT]
        } else if intercept.len() == Category::COUNT {
            intercept
        } else {
            return Err(KhmerNewsError::InvalidModel(format!(
                "expected {} intercepts, found {}",
                Category::COUNT,
                intercept.len()
            )));
        };
        Ok(LinearModel {
            weights,
            intercept,
            dimension,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: LinearModelFile = serde_json::from_str(json)?;
        Self::from_file_model(file)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let model_file: LinearModelFile = serde_json::from_reader(BufReader::new(file))?;
        let model = Self::from_file_model(model_file)?;
        info!(path = %path.display(), dimension = model.dimension, "loaded linear classifier");
        Ok(model)
    }

    fn from_file_model(file: LinearModelFile) -> Result<Self> {
        if file.classes.len() != file.coef.len() {
            return Err(KhmerNewsError::InvalidModel(format!(
                "{} classes but {} weight rows",
                file.classes.len(),
                file.coef.len()
            )));
        }
        if !file.intercept.is_empty() && file.intercept.len() != file.classes.len() {
            return Err(KhmerNewsError::InvalidModel(format!(
                "{} classes but {} intercepts",
                file.classes.len(),
                file.intercept.len()
            )));
        }

        let mut rows: Vec<Option<(Vec<f64>, f64)>> = vec![None; Category::COUNT];
        for (i, (label, row)) in file.classes.iter().zip(file.coef).enumerate() {
            let category = Category::try_from(label.as_str())
                .map_err(|_| KhmerNewsError::UnknownCategory(label.clone()))?;
            let slot = &mut rows[category.index()];
            if slot.is_some() {
                return Err(KhmerNewsError::InvalidModel(format!(
                    "class {label:?} listed twice"
                )));
            }
            let bias = file.intercept.get(i).copied().unwrap_or(0.0);
            *slot = Some((row, bias));
        }

        let mut weights = Vec::with_capacity(Category::COUNT);
        let mut intercept = Vec::with_capacity(Category::COUNT);
        for (category, row) in Category::ALL.iter().zip(rows) {
            let (row, bias) = row.ok_or_else(|| {
                KhmerNewsError::InvalidModel(format!("class {:?} missing", category.as_str()))
            })?;
            weights.push(row);
            intercept.push(bias);
        }
        Self::new(weights, intercept)
    }

    fn scores(&self, features: &[f32]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| {
                row.iter()
                    .zip(features)
                    .map(|(w, x)| w * f64::from(*x))
                    .sum::<f64>()
                    + bias
            })
            .collect()
    }
}

impl Classifier for LinearModel {
    fn predict(&self, features: &[f32]) -> Category {
        let scores = self.scores(features);
        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        Category::ALL[best]
    }

    fn decision_function(&self, features: &[f32]) -> Option<Vec<f64>> {
        Some(self.scores(features))
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}
