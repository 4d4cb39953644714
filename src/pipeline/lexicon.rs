//! Fixed vocabularies shared by the classifier and the cleaners.

use once_cell::sync::Lazy;
use regex::Regex;

/// Swastika glyph that marks section headings in the source catalogues.
pub const SWASTIKA: char = '卍';

/// Title vocabulary: dhāraṇī, true-word/mantra, incantation, vajra,
/// "all tathāgatas", longevity.
pub const MANTRA_KEYWORDS: &[&str] = &["陀罗尼", "真言", "咒", "金刚", "一切如来", "寿命"];

/// Diacritics of the IAST transliteration that count as Sanskrit evidence.
pub const SANSKRIT_DIACRITICS: &str = "āīūṛṝḷḹēōṭḍṇṣśḥṃñṅ";

/// Opening and closing brackets that mark title annotations.
pub const OPEN_BRACKETS: &[char] = &['(', '（', '〖'];
pub const CLOSE_BRACKETS: &[char] = &[')', '）', '〗'];

/// Catalogue numbering such as `M05.12`: code letter, two digits, a dot, digits.
pub static RE_NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]\d{2}\.\d+").unwrap());

pub fn is_sanskrit_diacritic(c: char) -> bool {
    SANSKRIT_DIACRITICS.contains(c)
}

pub fn has_numbering(text: &str) -> bool {
    RE_NUMBERING.is_match(text)
}

pub fn has_mantra_keyword(text: &str) -> bool {
    MANTRA_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Whether `text` contains any single character of a title keyword, which is
/// how a heading split across spans (`大悲心陀` / `罗尼经`) is recognised.
pub fn has_keyword_char(text: &str) -> bool {
    text.chars()
        .any(|c| MANTRA_KEYWORDS.iter().any(|k| k.contains(c)))
}

pub fn is_bracket(c: char) -> bool {
    OPEN_BRACKETS.contains(&c) || CLOSE_BRACKETS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_requires_dot_and_digits() {
        assert!(has_numbering("M05.12"));
        assert!(has_numbering("卍M05.7 金刚"));
        assert!(!has_numbering("M05"));
        assert!(!has_numbering("M0512"));
        assert!(!has_numbering("m05.12"));
    }

    #[test]
    fn keywords_are_substrings() {
        assert!(has_mantra_keyword("佛说大悲心陀罗尼经"));
        assert!(has_mantra_keyword("六字大明真言"));
        assert!(!has_mantra_keyword("般若波罗蜜多心经"));
    }

    #[test]
    fn keyword_fragments() {
        assert!(has_keyword_char("罗尼经"));
        assert!(has_keyword_char("大悲心陀"));
        assert!(!has_keyword_char(""));
        assert!(!has_keyword_char("心经"));
    }

    #[test]
    fn diacritic_set() {
        assert!(is_sanskrit_diacritic('ṃ'));
        assert!(is_sanskrit_diacritic('ś'));
        assert!(!is_sanskrit_diacritic('a'));
        assert!(!is_sanskrit_diacritic('é'));
    }
}
