//! User input hygiene and validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChatConfig;
use crate::error::{ColloquyError, Result};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid pattern"));

/// Normalizes raw user input: trims and collapses internal whitespace runs
/// to single spaces.
pub fn clean_text_input(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Validates cleaned message content against the chat configuration.
///
/// Rejects empty or whitespace-only content, content over the configured
/// maximum length, and content containing a denylisted substring. No state
/// is touched on rejection.
pub fn validate_message_content(content: &str, config: &ChatConfig) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ColloquyError::validation("message must not be empty"));
    }

    if content.chars().count() > config.max_message_length {
        return Err(ColloquyError::validation(format!(
            "message must not exceed {} characters",
            config.max_message_length
        )));
    }

    if let Some(term) = config
        .denylist
        .iter()
        .find(|term| !term.is_empty() && content.contains(term.as_str()))
    {
        return Err(ColloquyError::validation(format!(
            "message contains a disallowed term: {term}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(max: usize, denylist: &[&str]) -> ChatConfig {
        ChatConfig {
            max_message_length: max,
            denylist: denylist.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_text_input("  a \n b  "), "a b");
        assert_eq!(clean_text_input("plain"), "plain");
        assert_eq!(clean_text_input("   "), "");
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let config = ChatConfig::default();
        assert!(validate_message_content("", &config).unwrap_err().is_validation());
        assert!(validate_message_content("   ", &config).unwrap_err().is_validation());
    }

    #[test]
    fn test_length_bound_is_enforced() {
        let config = config_with(5, &[]);
        assert!(validate_message_content("12345", &config).is_ok());
        let err = validate_message_content("123456", &config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_denylisted_substring_is_rejected() {
        let config = config_with(100, &["forbidden"]);
        assert!(validate_message_content("all good here", &config).is_ok());
        let err = validate_message_content("a forbidden word", &config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_default_limit_is_one_thousand_characters() {
        let config = ChatConfig::default();
        let long = "x".repeat(1001);
        assert!(validate_message_content(&long, &config).unwrap_err().is_validation());
        assert!(validate_message_content("Hello", &config).is_ok());
    }
}
