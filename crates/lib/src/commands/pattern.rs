//! Command patterns: literal substring or regular expression.

use regex::Regex;
use std::fmt;

#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Matches when the text contains the value anywhere.
    Substring(String),
    /// Matches when the expression finds a match in the text.
    Regex(Regex),
}

impl CommandPattern {
    pub fn substring(value: impl Into<String>) -> Self {
        CommandPattern::Substring(value.into())
    }

    pub fn regex(expr: &str) -> Result<Self, regex::Error> {
        Ok(CommandPattern::Regex(Regex::new(expr)?))
    }

    /// Matches every text, including the empty string.
    pub fn any() -> Self {
        CommandPattern::Regex(Regex::new(".*").expect("literal regex is valid"))
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            CommandPattern::Substring(value) => text.contains(value.as_str()),
            CommandPattern::Regex(re) => re.is_match(text),
        }
    }
}

/// Identifier used in logs and dispatch outcomes: the literal, or `/expr/`.
impl fmt::Display for CommandPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandPattern::Substring(value) => f.write_str(value),
            CommandPattern::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_matches_anywhere_in_text() {
        let p = CommandPattern::substring("시간");
        assert!(p.matches("시간"));
        assert!(p.matches("지금 시간 알려줘"));
        assert!(!p.matches("시 간"));
        assert!(!p.matches(""));
    }

    #[test]
    fn regex_matches_any_position() {
        let p = CommandPattern::regex(r"\d{3}").unwrap();
        assert!(p.matches("room 404 please"));
        assert!(!p.matches("no digits"));
        assert!(CommandPattern::any().matches(""));
    }

    #[test]
    fn display_identifies_pattern() {
        assert_eq!(CommandPattern::substring("안녕").to_string(), "안녕");
        assert_eq!(CommandPattern::regex(".*").unwrap().to_string(), "/.*/");
    }
}
