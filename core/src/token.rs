//! Token classification.
//!
//! Decides whether a raw token is a long flag (`--name`), a short alias
//! (`-n`) or a plain value, and extracts an attached `key=value` pair or a
//! boolean negation suffix.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::System;
use crate::error::{ParseError, ParseResult};

static LONG_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--[^-]").expect("static regex must compile"));
static SHORT_ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-[^-]").expect("static regex must compile"));
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<key>[^=]+)=(?P<value>.+)$").expect("static regex must compile")
});

/// What a raw token was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Flag,
    Alias,
    Value,
}

/// A classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token exactly as given.
    pub raw: String,
    pub kind: TokenKind,
    /// Flag or alias name without dashes; `None` for values.
    pub key: Option<String>,
    /// Attached value (`--key=value`), or the token itself for values.
    pub value: Option<String>,
    /// The name carried the boolean negation suffix.
    pub negated: bool,
}

impl Token {
    /// Flags and aliases both name an option.
    pub fn is_option(&self) -> bool {
        matches!(self.kind, TokenKind::Flag | TokenKind::Alias)
    }
}

/// Classifies one raw token under `system`.
///
/// An attached `=value` takes precedence over the negation suffix, so
/// `--name\=x` assigns `x` to `name\` rather than negating `name`.
///
/// # Errors
///
/// Returns [`ParseError::EqualAssignDisabled`] for `--key=value` when
/// [`System::allow_equal_assign`] is off.
///
/// # Examples
///
/// ```
/// use argtree_core::token::{classify, TokenKind};
/// use argtree_core::System;
///
/// let token = classify("--out=dist", &System::default()).unwrap();
/// assert_eq!(token.kind, TokenKind::Flag);
/// assert_eq!(token.key.as_deref(), Some("out"));
/// assert_eq!(token.value.as_deref(), Some("dist"));
///
/// let token = classify("-v\\", &System::default()).unwrap();
/// assert_eq!(token.kind, TokenKind::Alias);
/// assert!(token.negated);
/// ```
pub fn classify(raw: &str, system: &System) -> ParseResult<Token> {
    let (kind, key) = if LONG_FLAG.is_match(raw) {
        (TokenKind::Flag, &raw[2..])
    } else if SHORT_ALIAS.is_match(raw) {
        (TokenKind::Alias, &raw[1..])
    } else {
        return Ok(Token {
            raw: raw.to_string(),
            kind: TokenKind::Value,
            key: None,
            value: Some(raw.to_string()),
            negated: false,
        });
    };

    let mut token = Token {
        raw: raw.to_string(),
        kind,
        key: Some(key.to_string()),
        value: None,
        negated: false,
    };

    if let Some(captures) = ASSIGNMENT.captures(key) {
        if !system.allow_equal_assign {
            return Err(ParseError::EqualAssignDisabled(raw.to_string()));
        }
        token.key = Some(captures["key"].to_string());
        token.value = Some(captures["value"].to_string());
    } else if let Some(stripped) = system
        .negation_suffix()
        .and_then(|suffix| key.strip_suffix(suffix))
    {
        token.key = Some(stripped.to_string());
        token.negated = true;
    }

    Ok(token)
}
