//! Argument division.
//!
//! Splits a token vector into the positional zone, the option zone and the
//! trailing arguments. Positional tokens must precede every flag: once the
//! first flag or alias is seen, everything after it belongs to the option
//! zone, including tokens that look positional.

use tracing::debug;

use crate::config::System;
use crate::error::ParseResult;
use crate::token::{Token, classify};

/// The three zones of one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Zones {
    pub positional: Vec<String>,
    pub options: Vec<Token>,
    pub trailing: Vec<String>,
}

/// Splits `tokens` at the first occurrence of `separator`.
///
/// Everything after the separator is returned verbatim, later separators
/// included. Without a separator, or when it is absent, the trailing part
/// is empty.
///
/// # Examples
///
/// ```
/// use argtree_core::divide::split_trailing;
///
/// let tokens: Vec<String> = ["run", "--", "a", "--", "b"].map(String::from).into();
/// let (main, trailing) = split_trailing(&tokens, Some("--"));
/// assert_eq!(main, ["run"]);
/// assert_eq!(trailing, ["a", "--", "b"]);
/// ```
pub fn split_trailing<'a>(
    tokens: &'a [String],
    separator: Option<&str>,
) -> (&'a [String], &'a [String]) {
    let position = separator.and_then(|sep| tokens.iter().position(|token| token == sep));
    match position {
        Some(index) => (&tokens[..index], &tokens[index + 1..]),
        None => (tokens, &tokens[tokens.len()..]),
    }
}

/// Divides a command line into its zones.
///
/// # Errors
///
/// Propagates classification errors, e.g. a disallowed `--key=value`.
pub fn divide(tokens: &[String], separator: Option<&str>, system: &System) -> ParseResult<Zones> {
    let (main, trailing) = split_trailing(tokens, separator);
    let mut zones = Zones {
        trailing: trailing.to_vec(),
        ..Default::default()
    };

    let mut option_zone = false;
    for raw in main {
        let token = classify(raw, system)?;
        option_zone |= token.is_option();

        if option_zone {
            zones.options.push(token);
        } else {
            zones.positional.push(raw.clone());
        }
    }

    debug!(
        positional = zones.positional.len(),
        options = zones.options.len(),
        trailing = zones.trailing.len(),
        "divided command line"
    );

    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positionals_stop_at_first_flag() {
        let zones = divide(&tokens(&["a", "b", "--x", "1", "c"]), None, &System::default()).unwrap();

        assert_eq!(zones.positional, ["a", "b"]);
        let raw: Vec<&str> = zones.options.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raw, ["--x", "1", "c"]);
        assert_eq!(zones.options[2].kind, TokenKind::Value);
        assert!(zones.trailing.is_empty());
    }

    #[test]
    fn test_trailing_is_not_classified() {
        let zones = divide(
            &tokens(&["a", "--x", "1", "--", "--raw", "-y"]),
            Some("--"),
            &System::default(),
        )
        .unwrap();

        assert_eq!(zones.positional, ["a"]);
        assert_eq!(zones.options.len(), 2);
        assert_eq!(zones.trailing, ["--raw", "-y"]);
    }

    #[test]
    fn test_separator_ignored_when_disabled() {
        let zones = divide(&tokens(&["a", "--", "b"]), None, &System::default()).unwrap();
        assert_eq!(zones.positional, ["a", "--", "b"]);
        assert!(zones.trailing.is_empty());
    }

    #[test]
    fn test_custom_separator() {
        let raw = tokens(&["1", "-", "2", "3"]);
        let (main, trailing) = split_trailing(&raw, Some("-"));
        assert_eq!(main, ["1"]);
        assert_eq!(trailing, ["2", "3"]);
    }
}
