//! Per-value translation eligibility.
//!
//! Mod language files mix user-facing prose with machine-oriented tokens:
//! color codes, item ids, format placeholders. Sending those to a natural
//! language translator corrupts them, so they are left untouched.

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits, whitespace and symbols only — nothing a translator could work on.
static NO_WORDS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s\W]+$").expect("valid no-words pattern"));

/// Decide whether a string value is worth sending to the translator.
///
/// Pure; values rejected here are emitted unchanged and never counted as
/// translated or skipped.
pub fn should_translate(value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }

    // '§' opens vanilla formatting escapes, '&' the legacy color codes.
    if value.starts_with('§') || value.starts_with('&') {
        return false;
    }

    if NO_WORDS_PATTERN.is_match(value) {
        return false;
    }

    // Very short strings are technical codes, not prose.
    if value.trim().chars().count() < 3 {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(!should_translate(""));
        assert!(!should_translate("   "));
        assert!(!should_translate("\t\n"));
    }

    #[test]
    fn rejects_formatting_markers() {
        assert!(!should_translate("§aGreen text"));
        assert!(!should_translate("§l"));
        assert!(!should_translate("&7Gray text"));
    }

    #[test]
    fn rejects_wordless_values() {
        assert!(!should_translate("12345"));
        assert!(!should_translate("1.0.4"));
        assert!(!should_translate("%s"));
        assert!(!should_translate("---"));
        assert!(!should_translate("10 / 20"));
    }

    #[test]
    fn rejects_short_codes() {
        assert!(!should_translate("ab"));
        assert!(!should_translate(" ok "));
        assert!(!should_translate("X"));
    }

    #[test]
    fn accepts_prose() {
        assert!(should_translate("Sword"));
        assert!(should_translate("A sharp iron blade."));
        assert!(should_translate("Right-click to open"));
        assert!(should_translate("Hello %s, welcome back!"));
    }
}
