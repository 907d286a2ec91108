//! Flag value accumulation.
//!
//! Walks the option zone once, pairing each flag or alias with the value
//! tokens that follow it. A flag without a value is settled when the next
//! flag arrives or the input ends: booleans become `true`, anything else is
//! an error. Repeated flags follow the duplicate policies in [`System`].
//!
//! After the walk every flag is validated against its schema, and flags
//! that were never given fall back to a prompt, their default, a
//! required-option error, or absence, in that order.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::config::System;
use crate::error::{ParseError, ParseResult};
use crate::prompt::{PromptRequest, Target};
use crate::resolve::Resolver;
use crate::schema::{RawInput, Schema};
use crate::token::Token;
use crate::value::Value;

/// Values gathered for one flag.
#[derive(Debug)]
struct Slot<'a> {
    name: &'a str,
    /// Most recent token that named the flag, used in error messages.
    raw: String,
    schema: &'a Schema,
    values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No flag seen yet.
    Idle,
    /// Flag at this slot has at least one value.
    Open(usize),
    /// Flag at this slot is waiting for its first value.
    MustHaveValue(usize),
    /// An unknown flag was skipped; its values are dropped too.
    Skipping,
}

struct Accumulator<'a, 's> {
    resolver: &'s Resolver<'a>,
    system: &'s System,
    slots: Vec<Slot<'a>>,
    state: State,
}

impl<'a, 's> Accumulator<'a, 's> {
    fn new(resolver: &'s Resolver<'a>, system: &'s System) -> Self {
        Self {
            resolver,
            system,
            slots: Vec::new(),
            state: State::Idle,
        }
    }

    fn push(&mut self, token: &Token) -> ParseResult<()> {
        if token.is_option() {
            self.open(token)
        } else {
            self.value(token)
        }
    }

    fn open(&mut self, token: &Token) -> ParseResult<()> {
        self.settle()?;

        let Some(flag) = self.resolver.resolve(token) else {
            if self.system.skip_unknown_flag {
                debug!(token = %token.raw, "skipping unknown option");
                self.state = State::Skipping;
                return Ok(());
            }
            return Err(ParseError::UnknownOption(token.raw.clone()));
        };

        let index = match self.slots.iter().position(|slot| slot.name == flag.name) {
            Some(index) => {
                self.repeat(index, token)?;
                index
            }
            None => {
                self.slots.push(Slot {
                    name: flag.name,
                    raw: token.raw.clone(),
                    schema: flag.schema,
                    values: Vec::new(),
                });
                self.slots.len() - 1
            }
        };

        let value = if token.negated {
            if !flag.schema.is_boolean() {
                return Err(ParseError::NegationOnNonBoolean {
                    flag: token.raw.clone(),
                    suffix: self.system.negation_suffix().unwrap_or_default().to_string(),
                });
            }
            Some("false".to_string())
        } else {
            token.value.clone()
        };

        self.state = match value {
            Some(value) => {
                self.slots[index].values.push(value);
                State::Open(index)
            }
            None => State::MustHaveValue(index),
        };
        trace!(flag = flag.name, state = ?self.state, "opened flag");
        Ok(())
    }

    /// Applies the duplicate policy to a flag seen again.
    fn repeat(&mut self, index: usize, token: &Token) -> ParseResult<()> {
        let system = self.system;
        let slot = &mut self.slots[index];
        slot.raw = token.raw.clone();

        if slot.schema.is_list() {
            if system.allow_duplicate_flag_for_list {
                if system.overwrite_duplicate_flag_for_list {
                    slot.values.clear();
                }
                return Ok(());
            }
        } else if system.allow_duplicate_flag_for_primitive {
            slot.values.clear();
            return Ok(());
        }

        Err(ParseError::DuplicateOption(token.raw.clone()))
    }

    fn value(&mut self, token: &Token) -> ParseResult<()> {
        match self.state {
            State::Open(index) | State::MustHaveValue(index) => {
                self.slots[index].values.push(token.raw.clone());
                self.state = State::Open(index);
            }
            State::Skipping => trace!(token = %token.raw, "dropping value of unknown option"),
            State::Idle if self.system.skip_unknown_flag => {
                trace!(token = %token.raw, "dropping value before any option");
            }
            State::Idle => return Err(ParseError::UnexpectedValue(token.raw.clone())),
        }
        Ok(())
    }

    /// Resolves a flag still waiting for its value.
    fn settle(&mut self) -> ParseResult<()> {
        if let State::MustHaveValue(index) = self.state {
            let slot = &mut self.slots[index];
            if !slot.schema.is_boolean() {
                return Err(ParseError::NoValue(slot.raw.clone()));
            }
            slot.values.push("true".to_string());
            self.state = State::Open(index);
        }
        Ok(())
    }

    fn finish(mut self) -> ParseResult<BTreeMap<String, Value>> {
        self.settle()?;
        let system = self.system;
        self.slots
            .into_iter()
            .map(|slot| {
                let value = finalize(&slot, system)?;
                Ok((slot.name.to_string(), value))
            })
            .collect()
    }
}

/// Validates the values gathered for one flag.
fn finalize(slot: &Slot<'_>, system: &System) -> ParseResult<Value> {
    let invalid = |source| ParseError::InvalidOption {
        flag: slot.raw.clone(),
        source,
    };

    if slot.schema.is_list() {
        let values: Vec<String> = if system.split_list_by_comma {
            slot.values
                .iter()
                .flat_map(|value| value.split(','))
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            slot.values.clone()
        };
        return slot.schema.parse(RawInput::Many(&values)).map_err(invalid);
    }

    let raw = match slot.values.as_slice() {
        [] => return Err(ParseError::NoValue(slot.raw.clone())),
        [single] => single,
        [.., last] if system.allow_multiple_values_for_primitive => last,
        values => {
            return Err(ParseError::MultipleValues {
                flag: slot.raw.clone(),
                values: values.to_vec(),
            });
        }
    };
    slot.schema.parse(RawInput::Single(raw)).map_err(invalid)
}

/// Collects and validates the flags given in the option zone.
///
/// The result holds only flags that appeared on the command line; see
/// [`fill_missing`] for the rest.
///
/// # Errors
///
/// Fails on the first unknown option, stray value, missing value,
/// disallowed repetition, misused negation or schema violation.
///
/// # Examples
///
/// ```
/// use argtree_core::accumulate::accumulate;
/// use argtree_core::resolve::Resolver;
/// use argtree_core::token::classify;
/// use argtree_core::{schema, FlagTable, System, Value};
///
/// let flags: FlagTable = [("out", schema::string().aliases(["o"]))].into_iter().collect();
/// let globals = FlagTable::new();
/// let system = System::default();
/// let tokens: Vec<_> = ["-o", "dist"]
///     .iter()
///     .map(|raw| classify(raw, &system).unwrap())
///     .collect();
///
/// let values = accumulate(&tokens, &Resolver::new(&flags, &globals), &system).unwrap();
/// assert_eq!(values["out"], Value::from("dist"));
/// ```
pub fn accumulate(
    tokens: &[Token],
    resolver: &Resolver<'_>,
    system: &System,
) -> ParseResult<BTreeMap<String, Value>> {
    let mut accumulator = Accumulator::new(resolver, system);
    for token in tokens {
        accumulator.push(token)?;
    }
    accumulator.finish()
}

/// Fills in flags that were not given.
///
/// Visits every visible flag in declaration order. A flag with a question
/// becomes a pending prompt, otherwise its default is used, otherwise a
/// required flag is an error. Anything else stays absent.
///
/// # Errors
///
/// Returns [`ParseError::RequiredOption`] for the first required flag with
/// neither a question nor a default.
pub fn fill_missing(
    values: &mut BTreeMap<String, Value>,
    resolver: &Resolver<'_>,
) -> ParseResult<Vec<PromptRequest>> {
    let mut pending = Vec::new();

    for flag in resolver.combined() {
        if values.contains_key(flag.name) {
            continue;
        }
        let meta = flag.schema.meta();
        if let Some(question) = &meta.ask {
            pending.push(PromptRequest {
                target: Target::Flag(flag.name.to_string()),
                question: question.clone(),
                schema: flag.schema.clone(),
            });
        } else if let Some(default) = &meta.default {
            values.insert(flag.name.to_string(), default.clone());
        } else if meta.required {
            return Err(ParseError::RequiredOption(flag.name.to_string()));
        }
    }

    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::flags::FlagTable;
    use crate::schema::{self, Case};
    use crate::token::classify;

    fn flags() -> FlagTable {
        let mut flags = FlagTable::new();
        flags.insert("verbose", schema::boolean().aliases(["v"]));
        flags.insert("name", schema::string());
        flags.insert("tags", schema::array(schema::string()).aliases(["t"]));
        flags.insert("level", schema::string().to_case(Case::Upper).one_of(["A", "B"]));
        flags.insert("size", schema::tuple([schema::number(), schema::number()]));
        flags
    }

    fn run(raw: &[&str], system: &System) -> ParseResult<BTreeMap<String, Value>> {
        let (flags, globals) = (flags(), FlagTable::new());
        let tokens = raw
            .iter()
            .map(|raw| classify(raw, system))
            .collect::<ParseResult<Vec<_>>>()?;
        accumulate(&tokens, &Resolver::new(&flags, &globals), system)
    }

    #[test]
    fn test_boolean_forms() {
        let system = System::default();
        assert_eq!(run(&["--verbose"], &system).unwrap()["verbose"], Value::Boolean(true));
        assert_eq!(run(&["--verbose\\"], &system).unwrap()["verbose"], Value::Boolean(false));
        assert_eq!(run(&["-v", "no"], &system).unwrap()["verbose"], Value::Boolean(false));
        assert!(matches!(
            run(&["--verbose", "maybe"], &system),
            Err(ParseError::InvalidOption {
                source: SchemaError::NotABoolean(_),
                ..
            })
        ));
    }

    #[test]
    fn test_separate_and_attached_values_agree() {
        let system = System::default();
        assert_eq!(
            run(&["--name", "x"], &system).unwrap(),
            run(&["--name=x"], &system).unwrap()
        );
    }

    #[test]
    fn test_missing_value() {
        assert!(matches!(
            run(&["--name", "--verbose"], &System::default()),
            Err(ParseError::NoValue(raw)) if raw == "--name"
        ));
        assert!(matches!(
            run(&["--verbose", "--name"], &System::default()),
            Err(ParseError::NoValue(_))
        ));
    }

    #[test]
    fn test_negation_only_for_booleans() {
        assert!(matches!(
            run(&["--name\\"], &System::default()),
            Err(ParseError::NegationOnNonBoolean { flag, suffix }) if flag == "--name\\" && suffix == "\\"
        ));
    }

    #[test]
    fn test_list_duplicates() {
        let system = System::default();
        assert_eq!(
            run(&["--tags", "a", "-t", "b", "c"], &system).unwrap()["tags"],
            Value::from(vec!["a", "b", "c"])
        );

        let overwrite = System {
            overwrite_duplicate_flag_for_list: true,
            ..Default::default()
        };
        assert_eq!(
            run(&["--tags", "a", "--tags", "b"], &overwrite).unwrap()["tags"],
            Value::from(vec!["b"])
        );

        let strict = System {
            allow_duplicate_flag_for_list: false,
            ..Default::default()
        };
        assert!(matches!(
            run(&["--tags", "a", "--tags", "b"], &strict),
            Err(ParseError::DuplicateOption(raw)) if raw == "--tags"
        ));
    }

    #[test]
    fn test_primitive_duplicates() {
        assert!(matches!(
            run(&["--name", "a", "--name", "b"], &System::default()),
            Err(ParseError::DuplicateOption(_))
        ));

        let lenient = System {
            allow_duplicate_flag_for_primitive: true,
            ..Default::default()
        };
        assert_eq!(
            run(&["--name", "a", "--name", "b"], &lenient).unwrap()["name"],
            Value::from("b")
        );
    }

    #[test]
    fn test_multiple_values_for_primitive() {
        assert!(matches!(
            run(&["--name", "a", "b"], &System::default()),
            Err(ParseError::MultipleValues { values, .. }) if values == ["a", "b"]
        ));

        let lenient = System {
            allow_multiple_values_for_primitive: true,
            ..Default::default()
        };
        assert_eq!(run(&["--name", "a", "b"], &lenient).unwrap()["name"], Value::from("b"));
    }

    #[test]
    fn test_split_list_by_comma() {
        let system = System {
            split_list_by_comma: true,
            ..Default::default()
        };
        assert_eq!(
            run(&["--tags", "a, b,,c", "d"], &system).unwrap()["tags"],
            Value::from(vec!["a", "b", "c", "d"])
        );
    }

    #[test]
    fn test_tuple_arity() {
        let system = System::default();
        assert_eq!(
            run(&["--size", "1", "2"], &system).unwrap()["size"],
            Value::from(vec![1.0, 2.0])
        );
        assert!(matches!(
            run(&["--size", "1"], &system),
            Err(ParseError::InvalidOption {
                source: SchemaError::TupleArity { expected: 2, found: 1 },
                ..
            })
        ));
    }

    #[test]
    fn test_case_then_enum() {
        let system = System::default();
        assert_eq!(run(&["--level", "a"], &system).unwrap()["level"], Value::from("A"));
        assert!(run(&["--level", "c"], &system).is_err());
    }

    #[test]
    fn test_unknown_options() {
        assert!(matches!(
            run(&["--nope"], &System::default()),
            Err(ParseError::UnknownOption(raw)) if raw == "--nope"
        ));

        let skip = System {
            skip_unknown_flag: true,
            ..Default::default()
        };
        let values = run(&["stray", "--nope", "1", "2", "--name", "x"], &skip).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values["name"], Value::from("x"));
    }

    #[test]
    fn test_fill_missing_order() {
        let mut flags = FlagTable::new();
        flags.insert("asked", schema::string().ask("name?").default("d"));
        flags.insert("defaulted", schema::number().default(3));
        flags.insert("optional", schema::string());
        let globals = FlagTable::new();
        let resolver = Resolver::new(&flags, &globals);

        let mut values = BTreeMap::new();
        let pending = fill_missing(&mut values, &resolver).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].target, Target::Flag("asked".into()));
        assert_eq!(values["defaulted"], Value::from(3));
        assert!(!values.contains_key("optional"));
        assert!(!values.contains_key("asked"));
    }

    #[test]
    fn test_fill_missing_required() {
        let flags: FlagTable = [("out", schema::string().required())].into_iter().collect();
        let globals = FlagTable::new();
        let resolver = Resolver::new(&flags, &globals);

        assert!(matches!(
            fill_missing(&mut BTreeMap::new(), &resolver),
            Err(ParseError::RequiredOption(name)) if name == "out"
        ));

        let mut given = BTreeMap::from([("out".to_string(), Value::from("x"))]);
        assert!(fill_missing(&mut given, &resolver).unwrap().is_empty());
    }
}
