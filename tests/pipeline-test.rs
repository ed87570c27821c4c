use std::sync::Arc;

use khmer_news_rs::resources::SharedModels;
use khmer_news_rs::result::{export_result_json, prediction_id};
use khmer_news_rs::{
    Category, Classifier, DictTokenizer, EmbeddingMethod, KhmerNewsClassifier, KhmerNewsError,
    LinearModel, SessionHistory, VectorTable, WhitespaceTokenizer,
};

// Predicts sport whenever any feature is set, without exposing scores
struct HardLabelClassifier;

impl Classifier for HardLabelClassifier {
    fn predict(&self, features: &[f32]) -> Category {
        if features.iter().any(|x| *x != 0.0) {
            Category::Sport
        } else {
            Category::Economic
        }
    }
}

fn vectors() -> VectorTable {
    VectorTable::from_pairs(
        2,
        vec![("ប្រាក់", vec![1.0, 0.0]), ("កីឡា", vec![0.0, 1.0]), ("បាល់ទាត់", vec![0.0, 1.0])],
    )
    .unwrap()
}

fn linear_model() -> LinearModel {
    let mut weights = vec![vec![0.0, 0.0]; Category::COUNT];
    weights[Category::Economic.index()] = vec![2.0, 0.0];
    weights[Category::Sport.index()] = vec![0.0, 2.0];
    LinearModel::new(weights, Vec::new()).unwrap()
}

fn classifier() -> KhmerNewsClassifier {
    KhmerNewsClassifier::new(
        Arc::new(vectors()),
        Arc::new(linear_model()),
        Arc::new(DictTokenizer::with_seed_lexicon()),
    )
    .unwrap()
}

fn assert_distribution(result: &khmer_news_rs::ClassificationResult) {
    assert_eq!(result.confidence.len(), Category::COUNT);
    let sum: f64 = result.confidence.values().sum();
    assert!((sum - 1.0).abs() < 1e-6, "confidences sum to {sum}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_sport_article_test() {
        let input = "ការប្រកួតកីឡាបាល់ទាត់ FIFA 2024។";
        let result = classifier().classify(input);
        assert_eq!(result.prediction, Category::Sport);
        assert_eq!(result.input_text, input);
        assert_eq!(result.cleaned_text, "ការប្រកួតកីឡាបាល់ទាត់");
        assert_eq!(result.segmented_text, "ការ ប្រកួត កីឡា បាល់ទាត់");
        assert_eq!(result.embedding, vec![0.0, 1.0]);
        assert_distribution(&result);
        assert!(result.prediction_confidence() > result.confidence[&Category::Economic]);
    }

    #[test]
    fn classify_economic_article_test() {
        let result = classifier().classify("ប្រាក់ ប្រាក់ កីឡា");
        assert_eq!(result.prediction, Category::Economic);
        assert_distribution(&result);
    }

    #[test]
    fn classify_non_khmer_input_test() {
        let result = classifier().classify("Breaking news 2024!");
        assert_eq!(result.cleaned_text, "");
        assert_eq!(result.segmented_text, "");
        assert_eq!(result.embedding, vec![0.0, 0.0]);
        // All scores tie, so the first category wins
        assert_eq!(result.prediction, Category::Economic);
        for p in result.confidence.values() {
            assert!((p - 1.0 / 6.0).abs() < 1e-9);
        }
    }

    #[test]
    fn classify_empty_input_test() {
        let result = classifier().classify("");
        assert_eq!(result.embedding.len(), 2);
        assert_eq!(result.text_statistics.words, 0);
        assert_distribution(&result);
    }

    #[test]
    fn hard_label_classifier_test() {
        let classifier = KhmerNewsClassifier::new(
            Arc::new(vectors()),
            Arc::new(HardLabelClassifier),
            Arc::new(WhitespaceTokenizer),
        )
        .unwrap();
        let result = classifier.classify("កីឡា");
        assert_eq!(result.prediction, Category::Sport);
        assert_eq!(result.confidence[&Category::Sport], 0.95);
        assert_distribution(&result);
    }

    #[test]
    fn dimension_mismatch_test() {
        let vectors = VectorTable::from_pairs(3, vec![("ក", vec![1.0, 0.0, 0.0])]).unwrap();
        let err = KhmerNewsClassifier::new(
            Arc::new(vectors),
            Arc::new(linear_model()),
            Arc::new(WhitespaceTokenizer),
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            KhmerNewsError::DimensionMismatch {
                vectors: 3,
                classifier: 2
            }
        ));
    }

    #[test]
    fn weighted_method_test() {
        let classifier = classifier().with_embedding_method(EmbeddingMethod::Weighted);
        assert_eq!(classifier.embedding_method(), EmbeddingMethod::Weighted);
        let result = classifier.classify("កីឡា កីឡា ប្រាក់");
        let expected = [1.0f32 / 3.0, 4.0 / 3.0];
        for (a, e) in result.embedding.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6);
        }
        assert_eq!(result.prediction, Category::Sport);
    }

    #[test]
    fn classify_batch_keeps_order_test() {
        let texts = [
            "កីឡា",
            "ប្រាក់",
            "បាល់ទាត់",
            "ប្រាក់ ប្រាក់",
            "hello",
            "កីឡា ប្រាក់ បាល់ទាត់",
        ];
        let results = classifier().classify_batch(&texts);
        let predictions: Vec<Category> = results.iter().map(|r| r.prediction).collect();
        assert_eq!(
            predictions,
            vec![
                Category::Sport,
                Category::Economic,
                Category::Sport,
                Category::Economic,
                Category::Economic,
                Category::Sport,
            ]
        );
        for (result, text) in results.iter().zip(texts) {
            assert_eq!(result.input_text, text);
        }
    }

    #[test]
    fn concurrent_classify_test() {
        let classifier = Arc::new(classifier());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let classifier = Arc::clone(&classifier);
                std::thread::spawn(move || classifier.classify("កីឡា").prediction)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Category::Sport);
        }
    }

    #[test]
    fn prediction_id_test() {
        let result = classifier().classify("កីឡា");
        assert_eq!(result.prediction_id.len(), 8);
        assert!(result.prediction_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            prediction_id(&result.input_text, &result.timestamp),
            result.prediction_id
        );
    }

    #[test]
    fn session_history_export_test() {
        let classifier = classifier();
        let mut history = SessionHistory::new();
        assert!(history.is_empty());
        history.push(classifier.classify("កីឡា"));
        history.push(classifier.classify("ប្រាក់"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|r| r.prediction), Some(Category::Economic));

        let records = history.export_records();
        assert_eq!(records[0].prediction, Category::Sport);
        assert_eq!(records[0].category_label, "Sports");
        assert_eq!(records[0].confidence, history.iter().next().unwrap().prediction_confidence());

        let json: serde_json::Value =
            serde_json::from_str(&history.export_json().unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert_eq!(json[1]["prediction"], "economic");
        assert!(json[1]["all_confidences"]["sport"].is_number());

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn export_single_result_test() {
        let result = classifier().classify("កីឡា");
        let json: serde_json::Value =
            serde_json::from_str(&export_result_json(&result).unwrap()).unwrap();
        assert_eq!(json["prediction"], "sport");
        assert_eq!(json["text"], "កីឡា");
        assert_eq!(json["prediction_id"], result.prediction_id.as_str());
        assert!(json["processing_time"].as_f64().unwrap() >= 0.0);
    }

    #[test]
    fn shared_models_test() {
        let shared = SharedModels::preloaded("unused", classifier());
        assert!(shared.is_loaded());
        let first = shared.get().unwrap();
        let second = shared.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let missing = SharedModels::new("/nonexistent/khmer-news/model");
        assert!(missing.get().is_err());
        assert!(!missing.is_loaded());
    }
}
