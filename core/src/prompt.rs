//! Interactive prompting boundary.
//!
//! Parsing never blocks on input. A required flag or argument that was not
//! given but carries an `ask` question becomes a [`PromptRequest`]; the
//! caller answers it with a [`Prompter`] (see
//! [`Parsed::resolve_with`](crate::Parsed::resolve_with)) or feeds answers in
//! itself, from synchronous or asynchronous code, through
//! [`Parsed::answer`](crate::Parsed::answer).

use std::fmt;
use std::io;

use crate::error::SchemaError;
use crate::schema::{RawInput, Schema};
use crate::value::Value;

/// What a prompt fills in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A required positional argument, by declaration index.
    Argument { index: usize, name: String },
    Flag(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Argument { name, .. } => write!(f, "argument `{name}`"),
            Target::Flag(name) => write!(f, "option `--{name}`"),
        }
    }
}

/// A value that must be asked for.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub target: Target,
    pub question: String,
    pub schema: Schema,
}

impl PromptRequest {
    /// The schema default, offered for an empty answer.
    pub fn default_value(&self) -> Option<&Value> {
        self.schema.meta().default.as_ref()
    }

    /// Validates an answer.
    ///
    /// Empty entries are dropped. An empty answer takes the default; with
    /// no default a boolean becomes `false` and anything else is rejected.
    /// Lists take every entry; primitives take exactly one.
    ///
    /// # Examples
    ///
    /// ```
    /// use argtree_core::prompt::{PromptRequest, Target};
    /// use argtree_core::{schema, Value};
    ///
    /// let request = PromptRequest {
    ///     target: Target::Flag("name".into()),
    ///     question: "who are you?".into(),
    ///     schema: schema::string().default("root").into(),
    /// };
    /// assert_eq!(request.accept(&[]).unwrap(), Value::from("root"));
    /// assert_eq!(request.accept(&["ada".into()]).unwrap(), Value::from("ada"));
    /// ```
    pub fn accept(&self, answer: &[String]) -> Result<Value, SchemaError> {
        let answer: Vec<String> = answer
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .cloned()
            .collect();

        if answer.is_empty() {
            if let Some(default) = self.default_value() {
                return Ok(default.clone());
            }
            if self.schema.is_boolean() {
                return Ok(Value::Boolean(false));
            }
            return Err(SchemaError::EmptyAnswer);
        }

        if self.schema.is_list() {
            return self.schema.parse(RawInput::Many(&answer));
        }

        match answer.as_slice() {
            [single] => self.schema.parse(RawInput::Single(single)),
            _ => Err(SchemaError::ExpectedSingle(self.schema.type_name())),
        }
    }
}

/// Supplies answers to prompt requests.
pub trait Prompter {
    /// Asks one question and returns the raw answer: one entry for a
    /// primitive, any number for an array, one per position for a tuple.
    fn ask(&mut self, request: &PromptRequest) -> io::Result<Vec<String>>;

    /// Called when an answer failed validation, before asking again.
    fn rejected(&mut self, _request: &PromptRequest, _error: &SchemaError) {}
}
