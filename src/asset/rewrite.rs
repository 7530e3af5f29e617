//! CSS reference rewriting.
//!
//! Concatenated stylesheets are served from a different URL than their
//! sources, so relative `url(...)` and `@import` references are rewritten to
//! absolute URLs against the source file's base URL.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

/// `url(...)` with double, single or no quotes.
static URL_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^)'"\s]*))\s*\)"#).expect("valid regex")
});

/// `@import "..."` / `@import '...'` (the `url()` form is covered by `URL_REF`).
static IMPORT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

/// Rewrite all relative references in `css` against `base`.
pub fn rewrite_css_urls<'a>(css: &'a str, base: &Url) -> Cow<'a, str> {
    let pass = URL_REF.replace_all(css, |caps: &Captures| {
        let (quote, raw) = quoted(caps);
        match absolutize(raw, base) {
            Some(url) => format!("url({quote}{url}{quote})"),
            None => caps[0].to_string(),
        }
    });

    if !IMPORT_REF.is_match(&pass) {
        return pass;
    }

    let rewritten = IMPORT_REF.replace_all(&pass, |caps: &Captures| {
        let (quote, raw) = quoted(caps);
        match absolutize(raw, base) {
            Some(url) => format!("@import {quote}{url}{quote}"),
            None => caps[0].to_string(),
        }
    });
    Cow::Owned(rewritten.into_owned())
}

/// Extract the quote character and the raw reference from a match.
fn quoted<'c>(caps: &'c Captures) -> (&'static str, &'c str) {
    if let Some(m) = caps.get(1) {
        ("\"", m.as_str())
    } else if let Some(m) = caps.get(2) {
        ("'", m.as_str())
    } else {
        ("", caps.get(3).map_or("", |m| m.as_str()))
    }
}

/// Resolve a reference against `base`, or `None` when it must stay as-is.
fn absolutize(raw: &str, base: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') || raw.starts_with("//") || has_scheme(raw) {
        return None;
    }
    base.join(raw).ok().map(String::from)
}

/// `data:`, `http:`, `https:` and friends.
fn has_scheme(raw: &str) -> bool {
    match raw.find(':') {
        Some(idx) => {
            let scheme = &raw[..idx];
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
