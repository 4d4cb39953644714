//! Filesystem-safe audio file stems.

use super::lexicon::SWASTIKA;
use super::title::UNTITLED;
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest stem produced, in characters.
pub const MAX_FILENAME_CHARS: usize = 200;

static RE_FORBIDDEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

static RE_NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]\d{2}\.\d+").unwrap());

/// Volume counts such as `(3卷)` or `3 卷`.
static RE_VOLUME_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[(（]?\d+[\s_]*卷[)）]?").unwrap());

/// Bracketed translator credits of the Tang, Yuan, Sui and Liu Song
/// dynasties: `(唐 不空 译)`, `〖刘宋 求那跋陀罗 译〗`.
static RE_DYNASTY_CREDIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[(（〖][\s_]*(?:刘宋|唐|元|隋)[^()（）〖〗]*?译[\s_]*[)）〗]").unwrap()
});

/// The same credit without brackets. Dynasty and `译` must be whole tokens,
/// so a title that merely contains `唐` or `元` is left alone.
static RE_BARE_DYNASTY_CREDIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s_])(?:刘宋|唐|元|隋)[\s_]+(?:[^\s_]+[\s_]+){0,3}?译(?:[\s_]|$)")
        .unwrap()
});

static RE_TAISHO_CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"大正藏第.*").unwrap());

static RE_CBETA_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CBETA[\s_]*佛经.*").unwrap());

static RE_CATALOGUE_NO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"No\.?[\s_]*\d+[A-Z]?").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// Derive the audio file stem for a cleaned title.
///
/// The result contains only Unicode word characters, `_` and `-`, is at most
/// [`MAX_FILENAME_CHARS`] characters long and is never empty.
pub fn sanitize_filename(title: &str) -> String {
    // annotations are recognised by their brackets, which the forbidden
    // character strip removes
    let mut name = title.to_string();
    for re in [&*RE_DYNASTY_CREDIT, &*RE_BARE_DYNASTY_CREDIT, &*RE_VOLUME_COUNT] {
        name = re.replace_all(&name, " ").into_owned();
    }

    name = tidy(&RE_FORBIDDEN.replace_all(&name, ""));
    name = tidy(&name.replace(SWASTIKA, ""));
    for re in [
        &*RE_NUMBERING,
        &*RE_TAISHO_CITATION,
        &*RE_CBETA_CITATION,
        &*RE_CATALOGUE_NO,
    ] {
        name = tidy(&re.replace_all(&name, ""));
    }
    name = tidy(&name.replace('卷', ""));

    let name = RE_WHITESPACE.replace_all(&name, "_");
    let name = RE_UNDERSCORE_RUN.replace_all(&name, "_");
    let truncated: String = name.trim_matches('_').chars().take(MAX_FILENAME_CHARS).collect();
    let truncated = truncated.trim_end_matches('_');

    if truncated.is_empty() {
        UNTITLED.to_string()
    } else {
        truncated.to_string()
    }
}

fn tidy(text: &str) -> String {
    text.trim().trim_matches('_').trim().to_string()
}
