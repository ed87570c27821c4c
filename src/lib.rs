use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info};

pub mod category;
pub mod classifier;
pub mod confidence;
pub mod config;
pub mod demo;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod lexicon;
pub mod resources;
pub mod result;
pub mod segmenter;
pub mod stats;
pub mod text;
pub mod tokenizer;
pub mod vectors;

pub use crate::category::Category;
pub use crate::classifier::{Classifier, LinearModel};
pub use crate::confidence::{confidence_scores, ConfidenceMap};
pub use crate::config::{find_model_directory, ModelConfig};
pub use crate::embedding::{sentence_embedding, EmbeddingMethod};
pub use crate::error::KhmerNewsError;
pub use crate::extract::format_extracted_text;
pub use crate::lexicon::Lexicon;
pub use crate::result::{ClassificationResult, ExportRecord, SessionHistory};
pub use crate::segmenter::segment_khmer_text;
pub use crate::stats::TextStatistics;
pub use crate::text::{clean_khmer_text, normalize_khmer_text, normalize_word};
pub use crate::tokenizer::{DictTokenizer, TokenizeError, WhitespaceTokenizer, WordTokenizer};
pub use crate::vectors::{VectorTable, WordVectors, EMBEDDING_DIM};

// Define threshold for when to classify a batch in parallel
const PARALLEL_THRESHOLD: usize = 4;

/// Khmer news classifier: clean → segment → embed → classify → score.
///
/// Vectors, classifier and tokenizer are shared read-only handles, so one
/// instance can serve any number of concurrent callers.
#[derive(Clone)]
pub struct KhmerNewsClassifier {
    vectors: Arc<dyn WordVectors>,
    classifier: Arc<dyn Classifier>,
    tokenizer: Arc<dyn WordTokenizer>,
    embedding_method: EmbeddingMethod,
}

impl KhmerNewsClassifier {
    /// Fails when the classifier declares a feature length different from
    /// the vector table dimension.
    pub fn new(
        vectors: Arc<dyn WordVectors>,
        classifier: Arc<dyn Classifier>,
        tokenizer: Arc<dyn WordTokenizer>,
    ) -> Result<Self, KhmerNewsError> {
        if let Some(expected) = classifier.dimension() {
            if expected != vectors.dimension() {
                return Err(KhmerNewsError::DimensionMismatch {
                    vectors: vectors.dimension(),
                    classifier: expected,
                });
            }
        }
        Ok(KhmerNewsClassifier {
            vectors,
            classifier,
            tokenizer,
            embedding_method: EmbeddingMethod::default(),
        })
    }

    pub fn with_embedding_method(mut self, method: EmbeddingMethod) -> Self {
        self.embedding_method = method;
        self
    }

    /// Loads vectors, classifier and lexicon as described by
    /// `<model_dir>/config.json`.
    ///
    /// Reads `config.json` from `model_dir`, then loads the files it names
    /// through [`KhmerNewsClassifier::from_config`].
    pub fn from_model_dir<P: AsRef<Path>>(model_dir: P) -> Result<Self, KhmerNewsError> {
        let model_dir = model_dir.as_ref();
        let config = ModelConfig::from_model_dir(model_dir)?;
        info!(
            model_dir = %model_dir.display(),
            method = config.embedding_method.as_str(),
            "loading models"
        );
        Self::from_config(&config)
    }

    /// Loads the model files named by `config`.
    ///
    /// Files are selected by extension: `.zst` is a compressed table written
    /// by `vectors-compact`, `.json` its plain JSON form, anything else the
    /// text format (`.vec` rows or a `word [freq] [tag]` list).
    pub fn from_config(config: &ModelConfig) -> Result<Self, KhmerNewsError> {
        let vectors = match extension_of(&config.model_path) {
            Some("zst") => VectorTable::load_compressed(&config.model_path)?,
            Some("json") => VectorTable::load_json(&config.model_path)?,
            _ => VectorTable::from_vec_path(&config.model_path)?,
        };
        let classifier = LinearModel::from_path(&config.classifier_path)?;
        let lexicon = match &config.lexicon_path {
            Some(path) => match extension_of(path) {
                Some("zst") => Lexicon::load_compressed(path)?,
                Some("json") => Lexicon::load_json(path)?,
                _ => Lexicon::from_path(path)?,
            },
            None => Lexicon::seed(),
        };

        Ok(Self::new(
            Arc::new(vectors),
            Arc::new(classifier),
            Arc::new(DictTokenizer::new(lexicon)),
        )?
        .with_embedding_method(config.embedding_method))
    }

    pub fn embedding_method(&self) -> EmbeddingMethod {
        self.embedding_method
    }

    pub fn vectors(&self) -> &dyn WordVectors {
        self.vectors.as_ref()
    }

    pub fn clean(&self, text: &str) -> String {
        clean_khmer_text(text)
    }

    pub fn segment(&self, cleaned: &str) -> String {
        segment_khmer_text(cleaned, self.tokenizer.as_ref())
    }

    pub fn embed(&self, segmented: &str) -> Vec<f32> {
        sentence_embedding(segmented, self.vectors.as_ref(), self.embedding_method)
    }

    /// Runs the whole pipeline over `text`. Never fails: empty or
    /// out-of-vocabulary input degrades to a zero embedding.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let start = Instant::now();
        let timestamp = Utc::now();

        let cleaned_text = self.clean(text);
        let segmented_text = self.segment(&cleaned_text);
        let embedding = self.embed(&segmented_text);

        let prediction = self.classifier.predict(&embedding);
        let decision = self.classifier.decision_function(&embedding);
        if decision.is_none() {
            debug!(%prediction, "classifier exposes no scores, using hard-label confidence");
        }
        let confidence = confidence_scores(decision.as_deref(), prediction);
        let text_statistics = TextStatistics::from_text(text);

        ClassificationResult {
            prediction_id: result::prediction_id(text, &timestamp),
            prediction,
            confidence,
            embedding,
            processing_time: start.elapsed(),
            timestamp,
            input_text: text.to_owned(),
            cleaned_text,
            segmented_text,
            text_statistics,
        }
    }

    /// Classifies independent texts, in parallel for larger batches.
    /// Results keep the input order.
    pub fn classify_batch<T>(&self, texts: &[T]) -> Vec<ClassificationResult>
    where
        T: AsRef<str> + Sync,
    {
        if texts.len() >= PARALLEL_THRESHOLD {
            texts.par_iter().map(|t| self.classify(t.as_ref())).collect()
        } else {
            texts.iter().map(|t| self.classify(t.as_ref())).collect()
        }
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}
