use khmer_news_rs::format_extracted_text;

const LONG_SENTENCE: &str = "This sentence is comfortably longer than any heading would be.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_empty_test() {
        assert_eq!(format_extracted_text(""), "");
        assert_eq!(format_extracted_text(" \n\t "), "");
    }

    #[test]
    fn format_joins_layout_lines_test() {
        let raw = "Hello\nworld. This is\n  a test. Another one here\n";
        assert_eq!(
            format_extracted_text(raw),
            "Hello world.\n\nThis is a test.\n\nAnother one here"
        );
    }

    #[test]
    fn format_khmer_sentences_test() {
        let raw = "វិស័យកីឡា។\nក្រុមបាល់ទាត់ឈ្នះ។";
        assert_eq!(
            format_extracted_text(raw),
            "វិស័យកីឡា។\n\nក្រុមបាល់ទាត់ឈ្នះ។"
        );
    }

    #[test]
    fn format_keeps_inner_punctuation_test() {
        let raw = "Prices rose by 1.5 percent, e.g. rice and fuel";
        assert_eq!(format_extracted_text(raw), raw);
    }

    #[test]
    fn format_groups_four_sentences_test() {
        let raw = [LONG_SENTENCE; 5].join(" ");
        let formatted = format_extracted_text(&raw);
        let paragraphs: Vec<&str> = formatted.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0], [LONG_SENTENCE; 4].join(" "));
        assert_eq!(paragraphs[1], LONG_SENTENCE);
    }

    #[test]
    fn format_breaks_after_long_sentence_test() {
        let long = format!("{} end.", "word ".repeat(70).trim_end());
        let raw = format!("{long} {LONG_SENTENCE}");
        assert_eq!(format_extracted_text(&raw), format!("{long}\n\n{LONG_SENTENCE}"));
    }

    #[test]
    fn format_drops_short_fragments_test() {
        assert_eq!(format_extracted_text("Hi. OK. Then we go"), "Then we go");
    }

    #[test]
    fn format_without_sentences_returns_input_test() {
        assert_eq!(format_extracted_text("  a\n b "), "a\n b");
    }
}
