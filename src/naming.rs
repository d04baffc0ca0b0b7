//! Pluggable name strategies
//!
//! Incoming file names cannot be trusted, so the store runs them through a
//! sanitizer before anything touches disk. When a sanitized name collides
//! with an unrelated file, an extension inferer decides which suffix survives
//! on the content-derived replacement name.
//!
//! Both concerns share one capability, [`NameTransform`]. Defaults are
//! provided, regex based strategies can be compiled from user supplied
//! patterns, and any `Fn(&str) -> String` closure works as well.

use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_GARBAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[/.\s]+").unwrap());
static TRAILING_GARBAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/.\s]+$").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?*\\]").unwrap());
static TRAILING_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[a-zA-Z0-9_]*(\.(zip|gz|bz2|xz))?$").unwrap());

/// A name to name transformation
///
/// Implemented by sanitizers (name in, safe name out) and extension inferers
/// (name in, extension including the leading dot out).
pub trait NameTransform: Send + Sync {
    fn transform(&self, name: &str) -> String;
}

impl<F> NameTransform for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn transform(&self, name: &str) -> String {
        self(name)
    }
}

/// Default sanitizer
///
/// Strips leading and trailing runs of `/`, `.` and whitespace, collapses
/// internal whitespace to a single space and replaces `?`, `*` and `\` with
/// `_`. Applying it to its own output is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSanitizer;

impl NameTransform for DefaultSanitizer {
    fn transform(&self, name: &str) -> String {
        let name = LEADING_GARBAGE.replace(name, "");
        let name = TRAILING_GARBAGE.replace(&name, "");
        let name = WHITESPACE_RUN.replace_all(&name, " ");
        UNSAFE_CHARS.replace_all(&name, "_").into_owned()
    }
}

/// Default extension inferer
///
/// Takes the trailing `.ext` of a name, keeping one compression suffix
/// (`.zip`, `.gz`, `.bz2`, `.xz`) so `archive.tar.gz` yields `.tar.gz`.
/// Names without a trailing extension yield an empty string.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultExtensionInferer;

impl NameTransform for DefaultExtensionInferer {
    fn transform(&self, name: &str) -> String {
        TRAILING_EXTENSION
            .find(name)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

/// Sanitizer that runs the default rules, then replaces every match of a
/// user supplied pattern with `_`
#[derive(Clone, Debug)]
pub struct PatternSanitizer {
    pattern: Regex,
}

impl PatternSanitizer {
    /// Compile the pattern; fails before any store work starts
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(PatternSanitizer {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl NameTransform for PatternSanitizer {
    fn transform(&self, name: &str) -> String {
        let name = DefaultSanitizer.transform(name);
        self.pattern.replace_all(&name, "_").into_owned()
    }
}

/// Extension inferer driven by a user supplied pattern
///
/// The first match is the extension; no match yields an empty string.
#[derive(Clone, Debug)]
pub struct PatternInferer {
    pattern: Regex,
}

impl PatternInferer {
    /// Compile the pattern; fails before any store work starts
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(PatternInferer {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl NameTransform for PatternInferer {
    fn transform(&self, name: &str) -> String {
        self.pattern
            .find(name)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_leading_garbage() {
        assert_eq!(
            DefaultSanitizer.transform("  ///weird*name.bin"),
            "weird_name.bin"
        );
    }

    #[test]
    fn test_sanitize_trailing_garbage() {
        assert_eq!(DefaultSanitizer.transform("report.pdf. /"), "report.pdf");
        assert_eq!(DefaultSanitizer.transform("..hidden..."), "hidden");
    }

    #[test]
    fn test_sanitize_whitespace_and_bad_chars() {
        assert_eq!(
            DefaultSanitizer.transform("my \t\n file?\\x.txt"),
            "my file__x.txt"
        );
    }

    #[test]
    fn test_sanitize_to_empty() {
        assert_eq!(DefaultSanitizer.transform(" ./. "), "");
    }

    #[test]
    fn test_infer_simple_extension() {
        assert_eq!(DefaultExtensionInferer.transform("photo.jpg"), ".jpg");
        assert_eq!(DefaultExtensionInferer.transform("a.b.c"), ".c");
    }

    #[test]
    fn test_infer_compound_extension() {
        assert_eq!(DefaultExtensionInferer.transform("src.tar.gz"), ".tar.gz");
        assert_eq!(DefaultExtensionInferer.transform("dump.sql.xz"), ".sql.xz");
        assert_eq!(DefaultExtensionInferer.transform("x.tar.7z"), ".7z");
    }

    #[test]
    fn test_infer_no_extension() {
        assert_eq!(DefaultExtensionInferer.transform("README"), "");
        assert_eq!(DefaultExtensionInferer.transform("bad.ext-dash"), "");
    }

    #[test]
    fn test_closure_transform() {
        let upper = |name: &str| name.to_uppercase();
        assert_eq!(upper.transform("abc"), "ABC");
    }

    #[test]
    fn test_pattern_sanitizer() {
        let sanitizer = PatternSanitizer::new("[:<>|]").unwrap();
        assert_eq!(sanitizer.transform(" a:b<c>.txt "), "a_b_c_.txt");
    }

    #[test]
    fn test_pattern_inferer() {
        let inferer = PatternInferer::new(r"\.[a-z]+$").unwrap();
        assert_eq!(inferer.transform("photo.jpeg"), ".jpeg");
        assert_eq!(inferer.transform("photo.JPEG"), "");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            PatternInferer::new("(unclosed"),
            Err(crate::Error::Pattern(_))
        ));
        assert!(PatternSanitizer::new("[").is_err());
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(name in "\\PC{0,40}") {
            let once = DefaultSanitizer.transform(&name);
            let twice = DefaultSanitizer.transform(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_sanitized_has_no_unsafe_chars(name in "\\PC{0,40}") {
            let clean = DefaultSanitizer.transform(&name);
            prop_assert!(!clean.contains(['?', '*', '\\']));
            prop_assert!(!clean.starts_with(['/', '.', ' ']));
            prop_assert!(!clean.ends_with(['/', '.', ' ']));
        }
    }
}
