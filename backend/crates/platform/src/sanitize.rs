//! Free-text screening
//!
//! Queries are always parameterized, so these checks exist to keep stored
//! text (comments, product descriptions) free of markup that would execute
//! when rendered by the storefront.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

static SCRIPT_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)<\s*script\b",
        r"(?i)<\s*/\s*script\s*>",
        r"(?i)javascript\s*:",
        r"(?i)vbscript\s*:",
        r"(?i)\beval\s*\(",
        r"(?i)\bexpression\s*\(",
        r"(?i)\bon(load|error)\s*=",
        r#"(?i)\bsrc\s*=\s*['"]?\s*javascript"#,
    ])
    .unwrap_or_else(|e| panic!("invalid script pattern: {e}"))
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap_or_else(|e| panic!("invalid pattern: {e}")));

/// Does `text` look like it carries executable markup?
pub fn contains_script_injection(text: &str) -> bool {
    SCRIPT_PATTERNS.is_match(text)
}

/// Trim and collapse internal whitespace runs into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_script_payloads() {
        assert!(contains_script_injection("<script>alert(1)</script>"));
        assert!(contains_script_injection("<SCRIPT src=x>"));
        assert!(contains_script_injection("<img src=x onerror=alert(1)>"));
        assert!(contains_script_injection("<body onload = init()>"));
        assert!(contains_script_injection("click JavaScript:void(0)"));
        assert!(contains_script_injection("width: expression(alert(1))"));
        assert!(contains_script_injection("eval (atob('...'))"));
    }

    #[test]
    fn test_plain_text_is_not_flagged_as_script() {
        assert!(!contains_script_injection("Great phone, battery lasts 2 days!"));
        assert!(!contains_script_injection("Evaluation: 5/5"));
        assert!(!contains_script_injection("The description mentions scripts"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  nice \n\t product  "), "nice product");
        assert_eq!(normalize_whitespace(" \n "), "");
    }
}
