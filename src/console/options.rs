//! Option value types
//!
//! Custom scalar types used by interactive command schemas. Each type parses
//! and validates a single token; failures surface as the option's own
//! diagnostic before the command usage is printed.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use url::Url;

use crate::domain::{AccountDirectory, AccountHandle};

/// Case-insensitive regular expression option.
#[derive(Debug, Clone)]
pub struct OptionRegex(pub Regex);

impl OptionRegex {
    pub fn parse(token: &str) -> Result<Self, String> {
        RegexBuilder::new(token)
            .case_insensitive(true)
            .build()
            .map(Self)
            .map_err(|_| "invalid regular expression".to_string())
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.0.is_match(name)
    }
}

/// Either an exact numeric id or a case-insensitive name pattern.
///
/// The numeric reading always wins: a token that parses as a number in full
/// is an id, never a pattern.
#[derive(Debug, Clone)]
pub enum OptionRegexId {
    Id(u64),
    Pattern(OptionRegex),
}

impl OptionRegexId {
    pub fn parse(token: &str) -> Result<Self, String> {
        if let Ok(id) = token.parse::<u64>() {
            return Ok(Self::Id(id));
        }
        OptionRegex::parse(token).map(Self::Pattern)
    }

    pub fn matches(&self, name: &str, id: u64) -> bool {
        match self {
            Self::Id(wanted) => *wanted == id,
            Self::Pattern(pattern) => pattern.is_match(name),
        }
    }
}

/// Syntactically validated URL option.
pub fn parse_url(token: &str) -> Result<Url, String> {
    Url::parse(token).map_err(|error| format!("invalid url: {error}"))
}

/// Account-name option, resolved against the live directory at parse time.
#[derive(Clone)]
pub struct BotName(pub Arc<AccountHandle>);

impl BotName {
    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl std::fmt::Debug for BotName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BotName").field(&self.0.name()).finish()
    }
}

/// Value parser for [`BotName`]; rejects names not present in `directory`.
pub fn bot_name_parser(
    directory: Arc<AccountDirectory>,
) -> impl Fn(&str) -> Result<BotName, String> + Clone + Send + Sync + 'static {
    move |token: &str| {
        directory
            .find(token)
            .map(BotName)
            .ok_or_else(|| format!("unknown account \"{token}\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_id_numeric_form_wins() {
        let option = OptionRegexId::parse("440").unwrap();
        assert!(option.matches("anything", 440));
        assert!(!option.matches("440 in the name", 441));
    }

    #[test]
    fn test_regex_id_pattern_is_case_insensitive_search() {
        let option = OptionRegexId::parse("portal").unwrap();
        assert!(option.matches("Portal 2", 620));
        assert!(option.matches("THE PORTAL COLLECTION", 0));
        // A pattern never matches by numeric equality.
        assert!(!option.matches("Half-Life", 620));
    }

    #[test]
    fn test_regex_id_parse_is_idempotent() {
        for token in ["440", "portal"] {
            let first = OptionRegexId::parse(token).unwrap();
            let second = OptionRegexId::parse(token).unwrap();
            assert_eq!(first.matches("Portal 2", 440), second.matches("Portal 2", 440));
        }
    }

    #[test]
    fn test_invalid_regex_reports_error() {
        assert!(OptionRegex::parse("[unclosed").is_err());
        assert!(OptionRegexId::parse("[unclosed").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(parse_url("https://example.com/watch").is_ok());
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn test_bot_name_lookup_at_parse_time() {
        let directory = Arc::new(AccountDirectory::in_memory());
        directory.create("alpha");

        let parser = bot_name_parser(Arc::clone(&directory));
        assert_eq!(parser("alpha").unwrap().name(), "alpha");
        let error = parser("ghost").unwrap_err();
        assert!(error.contains("unknown account"));
    }
}
