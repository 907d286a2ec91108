//! Typed value schemas.
//!
//! A schema validates raw command-line text and produces a [`Value`]. The
//! five kinds form the closed [`Schema`] enum; the three primitive kinds
//! also form [`Primitive`], which is what positional arguments and the
//! items of arrays and tuples accept.
//!
//! Builders take `self` by value and return the updated schema, so reusing
//! one definition across commands clones it rather than sharing it.
//!
//! # Examples
//!
//! ```
//! use argtree_core::schema::{self, Case, RawInput, Schema};
//! use argtree_core::Value;
//!
//! let level: Schema = schema::string()
//!     .to_case(Case::Upper)
//!     .one_of(["A", "B"])
//!     .aliases(["l"])
//!     .into();
//!
//! assert_eq!(level.parse(RawInput::Single("a")).unwrap(), Value::from("A"));
//! assert!(level.parse(RawInput::Single("c")).is_err());
//! ```

mod boolean;
mod list;
mod number;
mod string;

pub use boolean::BooleanSchema;
pub use list::{ArraySchema, TupleSchema};
pub(crate) use list::check_length;
pub use number::NumberSchema;
pub use string::{Case, StringSchema};

use crate::error::SchemaError;
use crate::value::Value;

/// Flag-level settings shared by every schema kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaMeta {
    /// Short names, matched against `-x` tokens.
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub required: bool,
    /// Used as-is, without validation, when no value is given.
    pub default: Option<Value>,
    /// Question to ask interactively when no value is given.
    pub ask: Option<String>,
}

/// Generates the metadata builder methods for a schema type.
macro_rules! meta_builders {
    ($ty:ty) => {
        impl $ty {
            /// Sets the short names matched against `-x` tokens.
            ///
            /// Duplicates are removed and the shortest alias comes first.
            pub fn aliases<I, S>(mut self, aliases: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                let mut aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
                aliases.sort();
                aliases.dedup();
                aliases.sort_by_key(String::len);
                self.meta.aliases = aliases;
                self
            }

            pub fn description(mut self, description: impl Into<String>) -> Self {
                self.meta.description = Some(description.into());
                self
            }

            pub fn required(mut self) -> Self {
                self.meta.required = true;
                self
            }

            /// Value used when nothing is given. It is not validated.
            pub fn default(mut self, value: impl Into<$crate::Value>) -> Self {
                self.meta.default = Some(value.into());
                self
            }

            /// Asks `question` interactively when nothing is given.
            ///
            /// The prompt is issued even when a default is also set; the
            /// default is offered to the prompter instead.
            pub fn ask(mut self, question: impl Into<String>) -> Self {
                self.meta.ask = Some(question.into());
                self
            }

            pub fn meta(&self) -> &$crate::schema::SchemaMeta {
                &self.meta
            }
        }
    };
}

pub(crate) use meta_builders;

/// Raw input handed to [`Schema::parse`].
#[derive(Debug, Clone, Copy)]
pub enum RawInput<'a> {
    Single(&'a str),
    Many(&'a [String]),
}

/// A primitive schema: the kinds that validate exactly one token.
#[derive(Debug, Clone)]
pub enum Primitive {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
}

impl Primitive {
    /// Validates a single raw token.
    pub fn parse(&self, raw: &str) -> Result<Value, SchemaError> {
        match self {
            Primitive::String(s) => s.check(raw),
            Primitive::Number(n) => n.check(raw),
            Primitive::Boolean(b) => b.check(raw),
        }
    }

    pub fn meta(&self) -> &SchemaMeta {
        match self {
            Primitive::String(s) => s.meta(),
            Primitive::Number(n) => n.meta(),
            Primitive::Boolean(b) => b.meta(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::String(_) => "string",
            Primitive::Number(_) => "number",
            Primitive::Boolean(_) => "boolean",
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Primitive::Boolean(_))
    }

    /// Drops the flag-level metadata, keeping only validation rules.
    pub(crate) fn into_bare(self) -> Self {
        match self {
            Primitive::String(mut s) => {
                s.meta = SchemaMeta::default();
                Primitive::String(s)
            }
            Primitive::Number(mut n) => {
                n.meta = SchemaMeta::default();
                Primitive::Number(n)
            }
            Primitive::Boolean(mut b) => {
                b.meta = SchemaMeta::default();
                Primitive::Boolean(b)
            }
        }
    }
}

impl From<StringSchema> for Primitive {
    fn from(schema: StringSchema) -> Self {
        Primitive::String(schema)
    }
}

impl From<NumberSchema> for Primitive {
    fn from(schema: NumberSchema) -> Self {
        Primitive::Number(schema)
    }
}

impl From<BooleanSchema> for Primitive {
    fn from(schema: BooleanSchema) -> Self {
        Primitive::Boolean(schema)
    }
}

/// Any schema a flag can carry.
#[derive(Debug, Clone)]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Array(ArraySchema),
    Tuple(TupleSchema),
}

impl Schema {
    /// Validates raw input.
    ///
    /// Primitives expect [`RawInput::Single`]; arrays and tuples expect
    /// [`RawInput::Many`].
    pub fn parse(&self, raw: RawInput<'_>) -> Result<Value, SchemaError> {
        match (self, raw) {
            (Schema::String(s), RawInput::Single(raw)) => s.check(raw),
            (Schema::Number(n), RawInput::Single(raw)) => n.check(raw),
            (Schema::Boolean(b), RawInput::Single(raw)) => b.check(raw),
            (Schema::Array(a), RawInput::Many(raw)) => a.check(raw),
            (Schema::Tuple(t), RawInput::Many(raw)) => t.check(raw),
            (Schema::Array(_) | Schema::Tuple(_), RawInput::Single(_)) => {
                Err(SchemaError::ExpectedList(self.type_name()))
            }
            (_, RawInput::Many(_)) => Err(SchemaError::ExpectedSingle(self.type_name())),
        }
    }

    pub fn meta(&self) -> &SchemaMeta {
        match self {
            Schema::String(s) => s.meta(),
            Schema::Number(n) => n.meta(),
            Schema::Boolean(b) => b.meta(),
            Schema::Array(a) => a.meta(),
            Schema::Tuple(t) => t.meta(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String(_) => "string",
            Schema::Number(_) => "number",
            Schema::Boolean(_) => "boolean",
            Schema::Array(_) => "array",
            Schema::Tuple(_) => "tuple",
        }
    }

    /// Human-readable type label, e.g. `array[number]` or `[string, number]`.
    pub fn type_label(&self) -> String {
        match self {
            Schema::Array(a) => format!("array[{}]", a.item().type_name()),
            Schema::Tuple(t) => {
                let names: Vec<&str> = t.items().iter().map(Primitive::type_name).collect();
                format!("[{}]", names.join(", "))
            }
            other => other.type_name().to_string(),
        }
    }

    /// Arrays and tuples accumulate several values.
    pub fn is_list(&self) -> bool {
        matches!(self, Schema::Array(_) | Schema::Tuple(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Schema::Boolean(_))
    }
}

impl From<StringSchema> for Schema {
    fn from(schema: StringSchema) -> Self {
        Schema::String(schema)
    }
}

impl From<NumberSchema> for Schema {
    fn from(schema: NumberSchema) -> Self {
        Schema::Number(schema)
    }
}

impl From<BooleanSchema> for Schema {
    fn from(schema: BooleanSchema) -> Self {
        Schema::Boolean(schema)
    }
}

impl From<ArraySchema> for Schema {
    fn from(schema: ArraySchema) -> Self {
        Schema::Array(schema)
    }
}

impl From<TupleSchema> for Schema {
    fn from(schema: TupleSchema) -> Self {
        Schema::Tuple(schema)
    }
}

impl From<Primitive> for Schema {
    fn from(primitive: Primitive) -> Self {
        match primitive {
            Primitive::String(s) => Schema::String(s),
            Primitive::Number(n) => Schema::Number(n),
            Primitive::Boolean(b) => Schema::Boolean(b),
        }
    }
}

pub fn string() -> StringSchema {
    Default::default()
}

pub fn number() -> NumberSchema {
    Default::default()
}

pub fn boolean() -> BooleanSchema {
    Default::default()
}

/// An array whose every item is validated by `item`.
pub fn array(item: impl Into<Primitive>) -> ArraySchema {
    ArraySchema::new(item.into())
}

/// A fixed-length list validated position by position.
pub fn tuple<I, P>(items: I) -> TupleSchema
where
    I: IntoIterator<Item = P>,
    P: Into<Primitive>,
{
    TupleSchema::new(items.into_iter().map(Into::into).collect())
}
