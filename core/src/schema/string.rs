use regex::Regex;

use super::{SchemaMeta, meta_builders};
use crate::error::SchemaError;
use crate::value::Value;

/// Case conversion applied before the enum check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Lower,
    Upper,
}

/// String schema.
///
/// Input is trimmed, then checked against the pattern and length bounds,
/// then case-converted, then checked against the allowed values.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub(super) meta: SchemaMeta,
    pattern: Option<Regex>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    case: Option<Case>,
    allowed: Vec<String>,
}

meta_builders!(StringSchema);

impl StringSchema {
    pub fn regex(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn to_case(mut self, case: Case) -> Self {
        self.case = Some(case);
        self
    }

    /// Restricts the value to a fixed set, compared after case conversion.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub(crate) fn check(&self, raw: &str) -> Result<Value, SchemaError> {
        let value = raw.trim();

        if let Some(pattern) = self.pattern.as_ref().filter(|p| !p.is_match(value)) {
            return Err(SchemaError::PatternMismatch {
                value: value.to_string(),
                pattern: pattern.as_str().to_string(),
            });
        }

        let length = value.chars().count();
        if let Some(min) = self.min_length.filter(|&min| length < min) {
            return Err(SchemaError::TooShort { min });
        }
        if let Some(max) = self.max_length.filter(|&max| length > max) {
            return Err(SchemaError::TooLong { max });
        }

        let value = match self.case {
            Some(Case::Lower) => value.to_lowercase(),
            Some(Case::Upper) => value.to_uppercase(),
            None => value.to_string(),
        };

        if !self.allowed.is_empty() && !self.allowed.contains(&value) {
            return Err(SchemaError::NotInEnum {
                value,
                allowed: self.allowed.join(", "),
            });
        }

        Ok(Value::String(value))
    }
}
