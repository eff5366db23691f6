//! Fixed field patterns.

use std::sync::OnceLock;

use regex::Regex;

/// A regex kept as source text and compiled on first use.
pub struct Pattern {
    source: &'static str,
    compiled: OnceLock<Regex>,
}

impl Pattern {
    pub const fn new(source: &'static str) -> Self {
        Self { source, compiled: OnceLock::new() }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn regex(&self) -> &Regex {
        self.compiled.get_or_init(|| Regex::new(self.source).unwrap())
    }

    /// The whole value must match, anchors in the source or not.
    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex()
            .find(value)
            .map(|m| m.start() == 0 && m.end() == value.len())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// Finnish business identity code, `NNNNNNN-N`.
pub static BUSINESS_CODE: Pattern = Pattern::new(r"^[0-9]{7}-[0-9]{1}$");

/// Organization oid accepted up to v8.
pub static OID: Pattern = Pattern::new(r"^[A-Za-z0-9.-]*$");

/// Organization oid from v9: dot separated segments, at least one dot.
pub static STRICT_OID: Pattern = Pattern::new(r"^[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$");

/// Date query value, `yyyy-MM-ddTHH:mm:ss` with every field zero-padded.
pub static DATE: Pattern = Pattern::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}$");

/// ISO 639-1 language code.
pub static LANGUAGE_CODE: Pattern = Pattern::new(r"^[a-z]{2}$");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_code() {
        assert!(BUSINESS_CODE.is_full_match("1234567-8"));
        assert!(!BUSINESS_CODE.is_full_match("123456-78"));
        assert!(!BUSINESS_CODE.is_full_match("1234567-89"));
        assert!(!BUSINESS_CODE.is_full_match(""));
    }

    #[test]
    fn test_oid_variants() {
        assert!(OID.is_full_match("1.2.246.10"));
        assert!(OID.is_full_match("abc"));
        assert!(OID.is_full_match(""));
        assert!(!OID.is_full_match("1 2"));

        assert!(STRICT_OID.is_full_match("1.2.246.10"));
        assert!(!STRICT_OID.is_full_match("abc"));
        assert!(!STRICT_OID.is_full_match("1..2"));
    }

    #[test]
    fn test_full_match_without_anchors() {
        let pattern = Pattern::new("[0-9]+");
        assert!(pattern.is_full_match("123"));
        assert!(!pattern.is_full_match("123a"));
    }
}
