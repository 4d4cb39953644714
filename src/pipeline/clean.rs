//! Body cleanup: the mantra text cleaner and the passage post-filter.
//!
//! [`clean_mantra_text`] runs on every raw body as soon as it leaves the
//! segmenter. [`post_filter`] runs afterwards and is the only place a passage
//! can be rejected.

use super::lexicon::is_sanskrit_diacritic;
use once_cell::sync::Lazy;
use regex::Regex;

/// Lone `j` / `t` glyphs: OCR debris from ornament fonts.
static RE_STRAY_JT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[jt]\s+|^[jt]\s+|\s+[jt]$").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Trailing run of characters that show up as page-edge residue.
static RE_TRAILING_RESIDUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[jtLrakidio\s]*$").unwrap());

static RE_TRAILING_SINGLE_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]\b\s*$").unwrap());

static RE_TRAILING_UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]+\s*$").unwrap());

static RE_NOISE_TOKENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(LLL|LL|No|A|T)\b").unwrap());

/// Remove noise from an accumulated mantra body.
///
/// Keeps ASCII letters, whitespace and the Sanskrit diacritic set, drops
/// stray `j`/`t` tokens, and normalises whitespace. Applying it to its own
/// output is a no-op.
pub fn clean_mantra_text(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(text: &str) -> String {
    let without_strays = RE_STRAY_JT.replace_all(text, " ");
    let kept: String = without_strays
        .chars()
        .filter(|&c| c.is_ascii_alphabetic() || c.is_whitespace() || is_sanskrit_diacritic(c))
        .collect();
    normalize_whitespace(&kept)
}

/// Trim residual noise from a cleaned body and apply the length filter.
///
/// Returns `None` when the passage should be dropped: the remaining text is
/// empty or shorter than `min_chars` characters.
pub fn post_filter(body: &str, min_chars: usize) -> Option<String> {
    let text = body.trim();
    let text = RE_TRAILING_RESIDUE.replace(text, "");
    let text = RE_TRAILING_SINGLE_LETTER.replace(text.trim(), "");
    let text = RE_TRAILING_UPPERCASE.replace(text.trim(), "");
    let text = RE_NOISE_TOKENS.replace_all(text.trim(), "");
    let text = normalize_whitespace(&text);

    if text.is_empty() || text.chars().count() < min_chars {
        None
    } else {
        Some(text)
    }
}

fn normalize_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_non_sanskrit_characters() {
        assert_eq!(
            clean_mantra_text("oṃ, vajra-sattva | svāhā 123 金刚"),
            "oṃ vajrasattva svāhā"
        );
    }

    #[test]
    fn drops_stray_j_and_t() {
        assert_eq!(clean_mantra_text("j oṃ t maṇi t padme j"), "oṃ maṇi padme");
        // adjacent strays need more than one pass
        assert_eq!(clean_mantra_text("oṃ j t hūṃ"), "oṃ hūṃ");
        // inside a word they are kept
        assert_eq!(clean_mantra_text("tadyathā"), "tadyathā");
    }

    #[test]
    fn cleaner_is_idempotent() {
        let samples = [
            "  oṃ   vajra svāhā  ",
            "j t j",
            "namo (12) ratna-trayāya ; t",
            "t  j  oṃ .j. t",
            "",
            "只有中文",
        ];
        for s in samples {
            let once = clean_mantra_text(s);
            assert_eq!(clean_mantra_text(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn cleaner_may_return_empty() {
        assert_eq!(clean_mantra_text("第一卷 12"), "");
    }

    #[test]
    fn post_filter_rejects_short_bodies() {
        assert_eq!(post_filter("ab", 5), None);
        assert_eq!(post_filter("", 5), None);
        assert_eq!(post_filter("LL No A T", 5), None);
    }

    #[test]
    fn post_filter_keeps_sanskrit_endings() {
        assert_eq!(
            post_filter("oṃ vajra svāhā", 5).as_deref(),
            Some("oṃ vajra svāhā")
        );
        assert_eq!(
            post_filter("namo bhagavate", 5).as_deref(),
            Some("namo bhagavate")
        );
    }

    #[test]
    fn post_filter_trims_trailing_noise() {
        assert_eq!(
            post_filter("oṃ hūṃ phaṭ svāhā L r k", 5).as_deref(),
            Some("oṃ hūṃ phaṭ svāhā")
        );
        assert_eq!(
            post_filter("oṃ amṛte hūṃ XYZ", 5).as_deref(),
            Some("oṃ amṛte hūṃ")
        );
    }

    #[test]
    fn post_filter_removes_noise_tokens_anywhere() {
        assert_eq!(
            post_filter("oṃ LLL maṇi No padme hūṃ", 5).as_deref(),
            Some("oṃ maṇi padme hūṃ")
        );
    }

    #[test]
    fn post_filter_honours_min_chars() {
        assert_eq!(post_filter("oṃ hūṃ", 5).as_deref(), Some("oṃ hūṃ"));
        assert_eq!(post_filter("oṃ hūṃ", 7), None);
    }
}
