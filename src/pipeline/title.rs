//! Title normalisation.
//!
//! Raw titles are whatever the segmenter glued together: a catalogue number,
//! the heading proper, and any number of parenthesised annotations (translator,
//! canon citation), often repeated when a heading is typeset twice. The
//! cleaner keeps every distinct annotation once, turns the catalogue number
//! into a compact prefix and produces an underscore-joined label with no
//! whitespace.
//!
//! ```text
//! "M05.12 金刚陀罗尼 (唐 不空 译) (唐 不空 译)"  →  "M0512_金刚陀罗尼_(唐_不空_译)"
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder used when cleaning leaves nothing.
pub const UNTITLED: &str = "Untitled";

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_TITLE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[,，、。"“”]"#).unwrap());

/// `(…)` or `（…）`, either style on either side, no nesting.
static RE_PAREN_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[(（]([^()（）]*)[)）]").unwrap());

/// Catalogue numbering with the dot optional: `M05.12`, `M05.7`, `M0512`.
static RE_NUMBERING_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]\d{2})\.?(\d+)").unwrap());

static RE_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["'“”‘’「」]"#).unwrap());

static RE_SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_-]{2,}").unwrap());

static RE_UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// Turn an accumulated raw title into a display label.
///
/// The result never contains whitespace, never starts or ends with `_`, and
/// is never empty.
pub fn clean_title(raw: &str) -> String {
    let title = RE_WHITESPACE.replace_all(raw.trim(), " ");
    let title = RE_TITLE_PUNCT.replace_all(&title, "").into_owned();

    let fragments = bracket_fragments(&title);
    let title = RE_PAREN_FRAGMENT.replace_all(&title, " ").into_owned();

    let prefix = RE_NUMBERING_LOOSE
        .captures(&title)
        .map(|caps| format!("{}{:0>2}", &caps[1], &caps[2]));
    let title = if prefix.is_some() {
        RE_NUMBERING_LOOSE.replacen(&title, 1, " ").into_owned()
    } else {
        title
    };

    let title = title.replace(super::lexicon::SWASTIKA, " ");
    let title = RE_QUOTES.replace_all(&title, "");
    let body = RE_SEPARATOR_RUN.replace_all(title.trim(), "_");

    let mut parts: Vec<String> = Vec::with_capacity(fragments.len() + 2);
    if let Some(prefix) = prefix {
        parts.push(prefix);
    }
    parts.push(body.into_owned());
    parts.extend(fragments);

    let joined = parts.join("_");
    let joined = RE_WHITESPACE.replace_all(&joined, "_");
    let joined = RE_UNDERSCORE_RUN.replace_all(&joined, "_");
    let cleaned = joined.trim_matches('_');

    if cleaned.is_empty() {
        UNTITLED.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Parenthesised fragments in first-seen order, one per distinct inner text.
fn bracket_fragments(title: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut fragments = Vec::new();
    for caps in RE_PAREN_FRAGMENT.captures_iter(title) {
        let inner = caps[1].trim();
        if inner.is_empty() || seen.iter().any(|s| s == inner) {
            continue;
        }
        seen.push(inner.to_string());
        fragments.push(caps[0].to_string());
    }
    fragments
}
