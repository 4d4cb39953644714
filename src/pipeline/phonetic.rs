//! Sanskrit → Romanian-orthography respelling for the speech synthesizer.
//!
//! The Romanian voice has no idea what `ṣ` or `ā` are, but it pronounces `ș`
//! and plain vowels well enough. [`RULES`] lists literal rewrites in priority
//! order; [`to_phonetic`] scans the input once, left to right, and at each
//! position applies the first rule whose pattern starts there. Output of one
//! rule is never fed back into the table.

/// Ordered rewrite table. Order is significant: whole phrases come before the
/// letters they contain, and combining sequences before their base letters.
pub const RULES: &[(&str, &str)] = &[
    // liturgical phrases
    ("svāhā", "svaha"),
    ("tadyathā", "tadiata"),
    // vocalic r/l written with a combining ring below
    ("r\u{0325}", "rî"),
    ("l\u{0325}", "lî"),
    // diacritics
    ("ā", "a"),
    ("ī", "i"),
    ("ū", "u"),
    ("ṛ", "ri"),
    ("ṝ", "rî"),
    ("ḷ", "li"),
    ("ḹ", "lî"),
    ("ē", "e"),
    ("ō", "o"),
    ("ṭ", "t"),
    ("ḍ", "d"),
    ("ṇ", "n"),
    ("ṣ", "ș"),
    ("ś", "ș"),
    ("ḥ", "h"),
    ("ṃ", "m"),
    ("ñ", "ni"),
    ("ṅ", "ng"),
    // aspirates
    ("th", "t"),
    ("dh", "d"),
    ("ph", "p"),
    ("bh", "b"),
];

/// Respell `text` using [`RULES`].
pub fn to_phonetic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    'scan: while let Some(c) = rest.chars().next() {
        for (pattern, replacement) in RULES {
            if let Some(tail) = rest.strip_prefix(pattern) {
                out.push_str(replacement);
                rest = tail;
                continue 'scan;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_mantra() {
        assert_eq!(to_phonetic("oṃ vajra svāhā"), "om vajra svaha");
        assert_eq!(to_phonetic("oṃ maṇi padme hūṃ"), "om mani padme hum");
    }

    #[test]
    fn phrase_rules_win_over_letters() {
        // without the phrase rule "th" would become "t" and "y" would survive
        assert_eq!(to_phonetic("tadyathā oṃ"), "tadiata om");
    }

    #[test]
    fn sibilants_use_comma_below() {
        assert_eq!(to_phonetic("śrī"), "șri");
        assert_eq!(to_phonetic("viṣṇu"), "vișnu");
    }

    #[test]
    fn aspirates_lose_their_h() {
        assert_eq!(to_phonetic("bhagavate dharma phaṭ"), "bagavate darma pat");
    }

    #[test]
    fn vocalic_forms() {
        assert_eq!(to_phonetic("amṛta"), "amrita");
        assert_eq!(to_phonetic("kr\u{0325}ta"), "krîta");
        assert_eq!(to_phonetic("ṝ ḹ"), "rî lî");
    }

    #[test]
    fn replacements_are_not_rescanned() {
        // "ṅ" → "ng" must not be touched again, and "ñ" → "ni" neither
        assert_eq!(to_phonetic("ṅh ñh"), "ngh nih");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(to_phonetic("namo ratna"), "namo ratna");
        assert_eq!(to_phonetic(""), "");
    }

    #[test]
    fn is_deterministic() {
        let s = "namo bhagavate uṣṇīṣa sarva tathāgata svāhā";
        assert_eq!(to_phonetic(s), to_phonetic(s));
        assert_eq!(to_phonetic(s), "namo bagavate ușnișa sarva tatagata svaha");
    }
}
