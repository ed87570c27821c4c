use khmer_news_rs::segmenter::SENTENCE_DELIMITERS;
use khmer_news_rs::text::{is_khmer_consonant, is_khmer_dependent, KHMER_COENG, KHMER_FULL_STOP};
use khmer_news_rs::{clean_khmer_text, normalize_khmer_text, normalize_word, Category};
use unicode_general_category::{get_general_category, GeneralCategory};

fn is_forbidden(ch: char) -> bool {
    ch.is_ascii_punctuation()
        || ch.is_ascii_alphanumeric()
        || ('\u{17D4}'..='\u{17DB}').contains(&ch)
        || ('\u{17E0}'..='\u{17E9}').contains(&ch)
        || ch == '«'
        || ch == '»'
        || matches!(
            get_general_category(ch),
            GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::Surrogate
                | GeneralCategory::PrivateUse
                | GeneralCategory::Unassigned
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_empty_test() {
        assert_eq!(normalize_khmer_text(""), "");
        assert_eq!(normalize_word(""), "");
    }

    #[test]
    fn normalize_strips_control_and_format_test() {
        let input = "ក\u{200B}ខ\n\tគ\u{0007}";
        assert_eq!(normalize_khmer_text(input), "កខគ");
    }

    #[test]
    fn normalize_strips_unassigned_and_private_use_test() {
        // U+17DE and U+0378 are unassigned, U+E000 is private use
        let input = "ក\u{17DE}ខ\u{0378}គ\u{E000}ឃ";
        assert_eq!(normalize_khmer_text(input), "កខគឃ");
        assert_eq!(clean_khmer_text("\u{17EF}ក\u{17FA} \u{F8FF}ខ"), "ក ខ");
    }

    #[test]
    fn normalize_strips_newer_format_chars_test() {
        assert_eq!(normalize_khmer_text("ក\u{08E2}ខ\u{0890}គ"), "កខគ");
    }

    #[test]
    fn normalize_word_trims_test() {
        assert_eq!(normalize_word("  កីឡា\u{200B} "), "កីឡា");
    }

    #[test]
    fn clean_removes_latin_and_digits_test() {
        let input = "economic ឌ ប្រាក់ 123";
        assert_eq!(clean_khmer_text(input), "ឌ ប្រាក់");
    }

    #[test]
    fn clean_removes_khmer_punctuation_and_digits_test() {
        let input = "សួស្តី។ ពិភពលោក! «០១២៣៤៥៦៧៨៩» ៛";
        assert_eq!(clean_khmer_text(input), "សួស្តី ពិភពលោក");
    }

    #[test]
    fn clean_removes_extra_punctuation_test() {
        let input = "ក\u{1362}ខ\u{1361}គ\u{1368}";
        // U+1362 is not part of the removable set
        assert_eq!(clean_khmer_text(input), "ក\u{1362}ខគ");
    }

    #[test]
    fn clean_output_has_no_forbidden_chars_test() {
        let input = "  Hello, world!!  ក្រុម ១២៣ (2024)\n\nព័ត៌មាន ។ ";
        let cleaned = clean_khmer_text(input);
        assert!(!cleaned.starts_with(' ') && !cleaned.ends_with(' '));
        assert!(!cleaned.contains("  "));
        assert!(cleaned
            .chars()
            .all(|ch| !ch.is_ascii_punctuation() && !ch.is_ascii_alphanumeric() && ch != '។'));
        assert_eq!(cleaned, "ក្រុម ព័ត៌មាន");
    }

    #[test]
    fn clean_is_idempotent_test() {
        let inputs = [
            "economic ឌ ប្រាក់ 123",
            "ការប្រកួត\u{200B}កីឡា។ abc",
            "ក\u{17C1}\u{17B8}",
            "",
        ];
        for input in inputs {
            let once = clean_khmer_text(input);
            assert_eq!(clean_khmer_text(&once), once);
        }
    }

    #[test]
    fn clean_exhaustive_char_classes_test() {
        let extra = [0xE000, 0xF8FF, 0x0378, 0x08E2, 0x0890, 0xE0001, 0x10FFFD];
        let code_points = (0u32..=0x7F).chain(0x1780..=0x17FF).chain(extra);
        for cp in code_points {
            let Some(ch) = char::from_u32(cp) else {
                continue;
            };
            let input = format!("ក{ch}ខ {ch}{ch} គ");
            let once = clean_khmer_text(&input);
            assert!(
                !once.chars().any(is_forbidden),
                "U+{cp:04X} survived cleaning: {once:?}"
            );
            assert!(!once.starts_with(' ') && !once.ends_with(' '));
            assert!(!once.contains("  "));
            assert_eq!(clean_khmer_text(&once), once, "U+{cp:04X} not idempotent");
        }
    }

    #[test]
    fn clean_empty_and_latin_only_test() {
        assert_eq!(clean_khmer_text(""), "");
        assert_eq!(clean_khmer_text("Breaking News 2024!"), "");
    }

    #[test]
    fn khmer_char_class_test() {
        assert!(is_khmer_consonant('ក') && is_khmer_consonant('\u{17B3}'));
        assert!(!is_khmer_consonant('\u{17B4}'));
        for ch in ['\u{17B4}', 'ា', '\u{17C8}', '\u{17C9}', '\u{17D1}', '\u{17D3}', '\u{17DD}'] {
            assert!(is_khmer_dependent(ch), "U+{:04X}", ch as u32);
        }
        for ch in ['ក', KHMER_COENG, KHMER_FULL_STOP, '\u{17DC}', 'a'] {
            assert!(!is_khmer_dependent(ch), "U+{:04X}", ch as u32);
        }
        assert!(SENTENCE_DELIMITERS.contains(&KHMER_FULL_STOP));
    }

    #[test]
    fn category_labels_test() {
        assert_eq!(Category::try_from("Politics"), Ok(Category::Politic));
        assert_eq!(Category::try_from(" sport "), Ok(Category::Sport));
        assert_eq!(Category::try_from("weather"), Err(()));
        assert_eq!(Category::Politic.as_str(), "politic");
        assert_eq!(Category::Sport.label(), "Sports");
        assert_eq!(Category::from_index(5), Some(Category::Technology));
        assert_eq!(Category::from_index(6), None);
    }

    #[test]
    fn category_serde_test() {
        assert_eq!(
            serde_json::to_string(&Category::Politic).unwrap(),
            "\"politic\""
        );
        let parsed: Category = serde_json::from_str("\"politics\"").unwrap();
        assert_eq!(parsed, Category::Politic);
    }
}
