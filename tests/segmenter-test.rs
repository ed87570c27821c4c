use khmer_news_rs::segmenter::split_sentences;
use khmer_news_rs::{
    segment_khmer_text, DictTokenizer, Lexicon, TokenizeError, WhitespaceTokenizer, WordTokenizer,
};

struct FailingTokenizer;

impl WordTokenizer for FailingTokenizer {
    fn tokenize(&self, _sentence: &str) -> Result<Vec<String>, TokenizeError> {
        Err(TokenizeError::Backend("offline".into()))
    }
}

struct SilentTokenizer;

impl WordTokenizer for SilentTokenizer {
    fn tokenize(&self, _sentence: &str) -> Result<Vec<String>, TokenizeError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sentences_test() {
        let input = "ក ខ។ គ!  ឃ?\nង";
        assert_eq!(
            split_sentences(input),
            vec!["ក ខ។", "គ!", "ឃ?", "ង"]
        );
    }

    #[test]
    fn split_sentences_skips_blank_runs_test() {
        assert!(split_sentences("").is_empty());
        assert_eq!(split_sentences("។ ។ ក"), vec!["។", "។", "ក"]);
        assert_eq!(split_sentences("   "), Vec::<String>::new());
    }

    #[test]
    fn segment_drops_delimiter_tokens_test() {
        let input = "ក ខ ។ គ";
        let output = segment_khmer_text(input, &WhitespaceTokenizer);
        assert_eq!(output, "ក ខ ។ គ");
        let sentences: Vec<&str> = output.split(" ។ ").collect();
        assert_eq!(sentences, vec!["ក ខ", "គ"]);
    }

    #[test]
    fn segment_keeps_sentence_on_tokenizer_failure_test() {
        let input = "ក ខ។ គ";
        assert_eq!(segment_khmer_text(input, &FailingTokenizer), "ក ខ។ ។ គ");
    }

    #[test]
    fn segment_returns_input_when_nothing_survives_test() {
        assert_eq!(segment_khmer_text("ក ខ។", &SilentTokenizer), "ក ខ។");
        assert_eq!(segment_khmer_text("   ", &WhitespaceTokenizer), "   ");
        assert_eq!(segment_khmer_text("", &WhitespaceTokenizer), "");
    }

    #[test]
    fn segment_normalizes_tokens_test() {
        let input = "ក\u{200B} ខ";
        assert_eq!(segment_khmer_text(input, &WhitespaceTokenizer), "ក ខ");
    }

    #[test]
    fn dict_tokenizer_seed_test() {
        let tokenizer = DictTokenizer::with_seed_lexicon();
        let tokens = tokenizer.tokenize("ប្រកួតកីឡាបាល់ទាត់").unwrap();
        assert_eq!(tokens, vec!["ប្រកួត", "កីឡា", "បាល់ទាត់"]);
    }

    #[test]
    fn dict_tokenizer_merges_unknown_clusters_test() {
        let lexicon = Lexicon::from_text("កីឡា 100\n");
        let tokenizer = DictTokenizer::new(lexicon);
        let tokens = tokenizer.tokenize("ឆ្កែឆ្មាកីឡា").unwrap();
        assert_eq!(tokens, vec!["ឆ្កែឆ្មា", "កីឡា"]);
    }

    #[test]
    fn dict_tokenizer_foreign_runs_test() {
        let tokenizer = DictTokenizer::with_seed_lexicon();
        let tokens = tokenizer.tokenize("កីឡាFIFA ២០២៤").unwrap();
        assert_eq!(tokens, vec!["កីឡា", "FIFA", "២០២៤"]);
    }

    #[test]
    fn dict_tokenizer_sentence_limit_test() {
        let tokenizer = DictTokenizer::with_seed_lexicon().with_max_sentence_chars(3);
        assert_eq!(
            tokenizer.tokenize("ប្រកួត"),
            Err(TokenizeError::SentenceTooLong { chars: 6, max: 3 })
        );
        // The segmenter falls back to the raw sentence
        assert_eq!(segment_khmer_text("ប្រកួត", &tokenizer), "ប្រកួត");
    }

    #[test]
    fn segment_with_dict_tokenizer_test() {
        let tokenizer = DictTokenizer::with_seed_lexicon();
        let output = segment_khmer_text("ប្រកួតកីឡា។ បាល់ទាត់", &tokenizer);
        assert_eq!(output, "ប្រកួត កីឡា ។ បាល់ទាត់");
    }
}
