//! Model-free keyword classifier for demonstrations.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::category::Category;
use crate::confidence::ConfidenceMap;

// Khmer, Khmer Symbols and Buginese blocks survive, plus whitespace
static NON_KHMER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x{1780}-\x{17FF}\x{19E0}-\x{19FF}\x{1A00}-\x{1A1F}\s]").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const ECONOMIC: &[&str] = &[
    "ជំនួញ", "លុយ", "ប្រាក់", "សេដ្ឋកិច្ច", "ធនាគារ", "ពាណិជ្ជកម្ម", "តម្លៃ", "ទីផ្សារ", "វិនិយោគ",
    "ភាគហ៊ុន", "គ្រុប", "ហ្វាំង",
];
const ENVIRONMENT: &[&str] = &[
    "បរិស្ថាន", "ព្រៃឈើ", "ធម្មជាតិ", "ដី", "ទឹក", "អាកាស", "មហាសមុទ្រ", "កាត់ព្រៃ", "ប្រើប្រាស់",
    "ការពារ", "ជីវចម្រុះ",
];
const HEALTH: &[&str] = &[
    "សុខភាព", "មន្ទីរពេទ្យ", "វេជ្ជបណ្ឌិត", "ជំងឺ", "ថ្នាំ", "ព្យាបាល", "គ្រុនឈាម", "អេដស៍", "ស្ត្រី",
    "កុមារ", "ការពារ", "របុសរបួស",
];
const POLITIC: &[&str] = &[
    "នយោបាយ", "រដ្ឋាភិបាល", "ព្រឹទ្ធសភា", "បោះឆ្នោត", "ព្រះមហាក្សត្រ", "មន្ត្រី", "ក្រុម", "គណបក្ស",
    "លោកនាយករដ្ឋមន្ត្រី", "ច្បាប់", "ជាតិ",
];
const SPORT: &[&str] = &[
    "កីឡា", "កីឡាករ", "ប្រកួត", "ម៉ីត", "បាល់ទាត់", "វាយកូន", "ហែលទឹក", "ម៉ារ៉ាតុង", "ពាន", "ជើងឯក",
    "ទទួលបាន",
];
const TECHNOLOGY: &[&str] = &[
    "បច្ចេកវិទ្យា", "កុំព្យូទ័រ", "ទូរស័ព្ទ", "អ៊ីនធឺណេត", "កម្មវិធី", "ទិន្នន័យ", "ឌីជីថល", "ថាមពល",
    "បច្ចេកទេស", "ការងារ", "ពត៌មាន",
];

/// Floor applied to each category's share before renormalising.
const MIN_SHARE: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct DemoResult {
    pub prediction: Category,
    pub confidence: ConfidenceMap,
    pub word_matches: BTreeMap<Category, usize>,
    pub demo_mode: bool,
}

/// Keyword-counting classifier that needs no trained model.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<(Category, Vec<String>)>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        let lists = [ECONOMIC, ENVIRONMENT, HEALTH, POLITIC, SPORT, TECHNOLOGY];
        let keywords = Category::ALL
            .iter()
            .zip(lists)
            .map(|(category, words)| (*category, words.iter().map(|w| w.to_string()).collect()))
            .collect();
        KeywordClassifier { keywords }
    }
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.iter().map(|(_, words)| words.len()).sum()
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        self.keywords
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, words)| words.as_slice())
            .unwrap_or(&[])
    }

    /// Counts keyword occurrences per category. The first category with the
    /// highest count wins; economic is reported when nothing matches.
    pub fn classify(&self, text: &str) -> DemoResult {
        let text = clean_demo_text(text);

        let word_matches: BTreeMap<Category, usize> = self
            .keywords
            .iter()
            .map(|(category, words)| {
                let score: usize = words.iter().map(|w| text.matches(w.as_str()).count()).sum();
                (*category, score)
            })
            .collect();

        let total: usize = word_matches.values().sum();
        let mut prediction = Category::Economic;
        let mut best = 0;
        for (category, score) in &word_matches {
            if *score > best {
                best = *score;
                prediction = *category;
            }
        }

        let denominator = if total > 0 { total as f64 } else { Category::COUNT as f64 };
        let shares: Vec<(Category, f64)> = word_matches
            .iter()
            .map(|(category, score)| (*category, (*score as f64 / denominator).max(MIN_SHARE)))
            .collect();
        let sum: f64 = shares.iter().map(|(_, s)| s).sum();
        let confidence = shares.into_iter().map(|(c, s)| (c, s / sum)).collect();

        DemoResult {
            prediction,
            confidence,
            word_matches,
            demo_mode: true,
        }
    }
}

fn clean_demo_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let composed: String = text.nfc().collect();
    let replaced = NON_KHMER_REGEX.replace_all(&composed, " ");
    WHITESPACE_REGEX
        .replace_all(&replaced, " ")
        .trim()
        .to_lowercase()
}
