//! Positional binding.
//!
//! Assigns the positional zone to a command's declared arguments: required
//! arguments first, then optional arguments while input remains, then the
//! list argument, which takes everything left.

use crate::config::System;
use crate::error::{DefinitionError, NameKind, ParseError, ParseResult};
use crate::prompt::{PromptRequest, Target};
use crate::schema::{self, Primitive, RawInput, Schema, check_length};
use crate::validate::validate_name;
use crate::value::Value;

/// A single positional argument.
///
/// Without a schema the raw token is kept as a string.
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: String,
    pub schema: Option<Primitive>,
    pub description: Option<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            description: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<Primitive>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn parse(&self, raw: &str) -> ParseResult<Value> {
        match &self.schema {
            Some(schema) => schema
                .parse(raw)
                .map_err(|source| ParseError::InvalidArgument {
                    name: self.name.clone(),
                    source,
                }),
            None => Ok(Value::String(raw.to_string())),
        }
    }
}

/// The argument that collects every remaining positional token.
#[derive(Debug, Clone)]
pub struct ListArgument {
    pub name: String,
    pub schema: Option<Primitive>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub description: Option<String>,
}

impl ListArgument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            min_length: None,
            max_length: None,
            description: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<Primitive>) -> Self {
        self.schema = Some(schema.into());
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

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn parse(&self, raw: &[String]) -> ParseResult<Vec<Value>> {
        let invalid = |source| ParseError::InvalidArgument {
            name: self.name.clone(),
            source,
        };

        let Some(item) = &self.schema else {
            check_length(raw.len(), self.min_length, self.max_length).map_err(invalid)?;
            return Ok(raw.iter().map(|token| Value::String(token.clone())).collect());
        };

        let mut array = schema::array(item.clone());
        if let Some(min) = self.min_length {
            array = array.min_length(min);
        }
        if let Some(max) = self.max_length {
            array = array.max_length(max);
        }
        match Schema::from(array).parse(RawInput::Many(raw)).map_err(invalid)? {
            Value::List(items) => Ok(items),
            other => Ok(vec![other]),
        }
    }
}

/// The positional declarations of one command.
#[derive(Debug, Clone, Default)]
pub struct Positionals {
    pub args: Vec<Argument>,
    pub opt_args: Vec<Argument>,
    pub list_arg: Option<ListArgument>,
}

impl Positionals {
    /// Checks every argument name and the list argument bounds.
    pub fn validate(&self, negation_suffix: Option<&str>) -> Result<(), DefinitionError> {
        for argument in self.args.iter().chain(&self.opt_args) {
            validate_name(NameKind::Argument, &argument.name, negation_suffix)?;
        }

        if let Some(list) = &self.list_arg {
            validate_name(NameKind::Argument, &list.name, negation_suffix)?;
            if let (Some(min), Some(max)) = (list.min_length, list.max_length) {
                if min > max {
                    return Err(DefinitionError::InvalidListBounds {
                        name: list.name.clone(),
                        min,
                        max,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Positional values of one invocation.
#[derive(Debug, Clone, Default)]
pub struct BoundPositionals {
    /// One slot per required argument; `None` while a prompt is pending.
    pub args: Vec<Option<Value>>,
    /// Values for the optional arguments that received input, in order.
    pub opt_args: Vec<Value>,
    pub list_args: Vec<Value>,
    pub pending: Vec<PromptRequest>,
}

/// Binds the positional zone to `positionals`.
///
/// # Errors
///
/// Fails when a required argument without a question has no input, when a
/// token fails its argument's schema, and when tokens are left over with no
/// list argument to take them (unless [`System::allow_extra_arguments`]).
///
/// # Examples
///
/// ```
/// use argtree_core::bind::{bind, Argument, Positionals};
/// use argtree_core::{schema, System, Value};
///
/// let positionals = Positionals {
///     args: vec![Argument::new("count").schema(schema::number())],
///     ..Default::default()
/// };
/// let bound = bind(&["42".to_string()], &positionals, &System::default()).unwrap();
/// assert_eq!(bound.args, [Some(Value::from(42))]);
/// ```
pub fn bind(
    tokens: &[String],
    positionals: &Positionals,
    system: &System,
) -> ParseResult<BoundPositionals> {
    let mut remaining = tokens.iter();
    let mut bound = BoundPositionals::default();
    let mut missing = Vec::new();

    for (index, argument) in positionals.args.iter().enumerate() {
        match remaining.next() {
            Some(raw) => bound.args.push(Some(argument.parse(raw)?)),
            None => {
                bound.args.push(None);
                let question = argument
                    .schema
                    .as_ref()
                    .and_then(|schema| schema.meta().ask.clone());
                match (question, &argument.schema) {
                    (Some(question), Some(schema)) => bound.pending.push(PromptRequest {
                        target: Target::Argument {
                            index,
                            name: argument.name.clone(),
                        },
                        question,
                        schema: schema.clone().into(),
                    }),
                    _ => missing.push(argument.name.clone()),
                }
            }
        }
    }

    if !missing.is_empty() {
        return Err(ParseError::MissingArguments(missing));
    }

    for argument in &positionals.opt_args {
        let Some(raw) = remaining.next() else {
            break;
        };
        bound.opt_args.push(argument.parse(raw)?);
    }

    let rest = remaining.as_slice();
    match &positionals.list_arg {
        Some(list) => bound.list_args = list.parse(rest)?,
        None if !rest.is_empty() && !system.allow_extra_arguments => {
            return Err(ParseError::UnexpectedArguments(rest.to_vec()));
        }
        None => {}
    }

    Ok(bound)
}
