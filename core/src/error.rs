//! Error types for command construction and parsing.
//!
//! Construction mistakes ([`DefinitionError`]) are bugs in a command
//! definition and surface from [`Cli::new`](crate::Cli::new) and
//! [`Cli::create`](crate::Cli::create). Input mistakes ([`ParseError`])
//! surface from parsing and abort the whole invocation. A single value that
//! fails its schema is a [`SchemaError`], wrapped with the flag or argument
//! it belonged to.

use thiserror::Error;

/// A value rejected by a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// String does not match the configured regex.
    #[error("`{value}` doesn't match pattern {pattern}")]
    PatternMismatch { value: String, pattern: String },
    /// String is shorter than its minimum length.
    #[error("minimum {min} characters expected")]
    TooShort { min: usize },
    /// String is longer than its maximum length.
    #[error("maximum {max} characters expected")]
    TooLong { max: usize },
    /// Value is not one of the allowed values, compared after any case transform.
    #[error("`{value}` is not one of {allowed}")]
    NotInEnum { value: String, allowed: String },
    /// Number input is empty or whitespace-only.
    #[error("number can not be empty string")]
    EmptyNumber,
    /// Number input is not a finite number (e.g., `abc`, `NaN`, `inf`).
    #[error("`{0}` is not a valid number")]
    NotANumber(String),
    /// Number is below its minimum.
    #[error("minimum value {min} expected, got {value}")]
    BelowMinimum { min: f64, value: f64 },
    /// Number is above its maximum.
    #[error("maximum value {max} expected, got {value}")]
    AboveMaximum { max: f64, value: f64 },
    /// Boolean input is not `true`, `false`, `yes` or `no`.
    #[error("`{0}` is not a valid boolean")]
    NotABoolean(String),
    /// A single value was given to an array or tuple.
    #[error("expected a list of {0}")]
    ExpectedList(&'static str),
    /// Several values were given to a primitive.
    #[error("expected a single {0}")]
    ExpectedSingle(&'static str),
    /// Array has fewer items than its minimum length.
    #[error("minimum {min} items expected")]
    TooFewItems { min: usize },
    /// Array has more items than its maximum length.
    #[error("maximum {max} items expected")]
    TooManyItems { max: usize },
    /// Tuple input length differs from the number of positions.
    #[error("expected {expected} items, got {found}")]
    TupleArity { expected: usize, found: usize },
    /// Prompt answer is empty and there is no default to fall back to.
    #[error("empty input isn't acceptable")]
    EmptyAnswer,
}

/// Which kind of name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Flag,
    Alias,
    Command,
    Argument,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NameKind::Flag => "flag",
            NameKind::Alias => "alias",
            NameKind::Command => "command",
            NameKind::Argument => "argument",
        })
    }
}

/// A mistake in a command definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Name is empty.
    #[error("{0} name cannot be empty")]
    EmptyName(NameKind),
    /// Name contains a space.
    #[error("{kind} `{name}` can not contain spaces")]
    ContainsSpace { kind: NameKind, name: String },
    /// Name starts with `-` (e.g., `--verbose` instead of `verbose`).
    #[error("{kind} `{name}` should not start with `-`")]
    LeadingDash { kind: NameKind, name: String },
    /// Name contains `=`, which would clash with `--key=value`.
    #[error("{kind} `{name}` should not contain `=`")]
    ContainsEquals { kind: NameKind, name: String },
    /// Name ends with the boolean negation suffix.
    #[error("{kind} `{name}` should not end with `{suffix}`")]
    NegationSuffix {
        kind: NameKind,
        name: String,
        suffix: String,
    },
    /// Two flags visible to the same command share an alias.
    #[error("alias `{alias}` is used by both `{first}` and `{second}`")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
    /// A parent already has a child with this name.
    #[error("duplicate command `{0}`")]
    DuplicateCommand(String),
    /// List argument minimum length is above its maximum.
    #[error("list argument `{name}` has min length {min} above max length {max}")]
    InvalidListBounds { name: String, min: usize, max: usize },
    /// A second action was registered for one command.
    #[error("action already registered for command `{0}`")]
    ActionAlreadySet(String),
    /// The id does not belong to this tree.
    #[error("no command with id {0}")]
    UnknownCommand(usize),
}

/// A mistake in the user's input.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Flag or alias is defined nowhere on the command.
    #[error("unknown option `{0}` entered")]
    UnknownOption(String),
    /// `--key=value` was given while equal assignment is off.
    #[error("equal assignment is not allowed `{0}`")]
    EqualAssignDisabled(String),
    /// A value appeared in the flag section before any flag.
    #[error("received a value `{0}`, expected an option")]
    UnexpectedValue(String),
    /// A non-boolean flag was given without a value.
    #[error("no value given for option `{0}`")]
    NoValue(String),
    /// A flag was repeated and the duplicate policy rejects it.
    #[error("duplicate option `{0}` entered")]
    DuplicateOption(String),
    /// A primitive flag received several values.
    #[error("multiple values `{}` entered for option `{flag}`", .values.join("` `"))]
    MultipleValues { flag: String, values: Vec<String> },
    /// The negation suffix was used on a non-boolean flag.
    #[error("only boolean options accept `{suffix}` negation: `{flag}`")]
    NegationOnNonBoolean { flag: String, suffix: String },
    /// A flag value failed its schema.
    #[error("{source} for option `{flag}`")]
    InvalidOption { flag: String, source: SchemaError },
    /// An argument value failed its schema.
    #[error("{source} for argument `{name}`")]
    InvalidArgument { name: String, source: SchemaError },
    /// Required arguments received no input.
    #[error("no value provided for argument(s): {}", .0.join(", "))]
    MissingArguments(Vec<String>),
    /// A required flag was not given and has no default.
    #[error("option `--{0}` is required")]
    RequiredOption(String),
    /// Positional tokens were left after binding.
    #[error("unexpected argument(s): {}", .0.join(" "))]
    UnexpectedArguments(Vec<String>),
    /// A value still waits on a prompt.
    #[error("a value for {0} must be asked interactively but no prompter is available")]
    PromptUnavailable(String),
    /// [`Parsed::answer`](crate::Parsed::answer) was given an index with no pending prompt.
    #[error("no pending prompt at index {0}")]
    UnknownPrompt(usize),
    /// The prompter failed to read an answer.
    #[error("prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Convenience alias for parse results.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
