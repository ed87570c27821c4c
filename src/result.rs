use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::category::Category;
use crate::confidence::{top_category, ConfidenceMap};
use crate::stats::TextStatistics;

/// Number of input characters that feed the prediction id hash.
const ID_PREFIX_CHARS: usize = 100;

/// Outcome of one classification call, with the pipeline intermediates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub prediction_id: String,
    pub prediction: Category,
    pub confidence: ConfidenceMap,
    pub embedding: Vec<f32>,
    #[serde(with = "duration_secs")]
    pub processing_time: Duration,
    pub timestamp: DateTime<Utc>,
    pub input_text: String,
    pub cleaned_text: String,
    pub segmented_text: String,
    pub text_statistics: TextStatistics,
}

impl ClassificationResult {
    /// Confidence of the predicted category.
    pub fn prediction_confidence(&self) -> f64 {
        self.confidence.get(&self.prediction).copied().unwrap_or(0.0)
    }

    /// Flat record for JSON export, reporting the predicted category's
    /// confidence.
    pub fn to_export_record(&self) -> ExportRecord {
        self.export_record(self.prediction_confidence())
    }

    fn export_record(&self, confidence: f64) -> ExportRecord {
        ExportRecord {
            prediction: self.prediction,
            category_label: self.prediction.label().to_owned(),
            confidence,
            all_confidences: self.confidence.clone(),
            text: self.input_text.clone(),
            processing_time: self.processing_time.as_secs_f64(),
            timestamp: self.timestamp.to_rfc3339(),
            prediction_id: self.prediction_id.clone(),
            text_statistics: self.text_statistics.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub prediction: Category,
    pub category_label: String,
    pub confidence: f64,
    pub all_confidences: ConfidenceMap,
    pub text: String,
    pub processing_time: f64,
    pub timestamp: String,
    pub prediction_id: String,
    pub text_statistics: TextStatistics,
}

/// Pretty JSON export of a single result.
pub fn export_result_json(result: &ClassificationResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&result.to_export_record())
}

/// Eight hex characters of SHA-256 over the text prefix and the timestamp.
pub fn prediction_id(text: &str, timestamp: &DateTime<Utc>) -> String {
    let prefix_end = text
        .char_indices()
        .nth(ID_PREFIX_CHARS)
        .map_or(text.len(), |(idx, _)| idx);
    let prefix = &text[..prefix_end];

    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(timestamp.to_rfc3339().as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_owned()
}

/// Ordered list of results held by a caller.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    results: Vec<ClassificationResult>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ClassificationResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.results.iter()
    }

    pub fn latest(&self) -> Option<&ClassificationResult> {
        self.results.last()
    }

    /// Export records for every result; `confidence` is each result's
    /// highest category probability.
    pub fn export_records(&self) -> Vec<ExportRecord> {
        self.results
            .iter()
            .map(|r| {
                let top = top_category(&r.confidence).map_or(0.0, |(_, p)| p);
                r.export_record(top)
            })
            .collect()
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export_records())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a SessionHistory {
    type Item = &'a ClassificationResult;
    type IntoIter = std::slice::Iter<'a, ClassificationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
