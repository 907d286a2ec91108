//! A typed command-line parsing engine.
//!
//! This crate turns a vector of raw tokens into validated values for a tree
//! of commands:
//!
//! - [`schema`]: typed value schemas (string, number, boolean, array,
//!   tuple) with flag-level metadata such as aliases, defaults and prompts.
//! - [`Cli`]: the command tree. [`Cli::create`] adds subcommands that
//!   inherit the parent's config and global flags; [`Cli::on`] registers
//!   the action a command runs.
//! - [`System`] and [`CommandConfig`]: the parsing policies for equal-sign
//!   assignment, boolean negation, duplicate handling, trailing arguments.
//! - [`Parsed`] and [`Bound`]: the result of one command line. Values that
//!   must be asked for interactively are left pending on [`Parsed`] and
//!   answered through a [`Prompter`].
//!
//! Parsing is fail-fast: the first [`ParseError`] aborts the invocation and
//! no action runs. Mistakes in a command definition are reported as
//! [`DefinitionError`] while the tree is built.
//!
//! # Example
//!
//! ```
//! use argtree_core::*;
//!
//! let mut cli = Cli::new(
//!     "app",
//!     System::default(),
//!     CommandDef::new()
//!         .argument(Argument::new("count").schema(schema::number()))
//!         .flag("verbose", schema::boolean().aliases(["v"])),
//! )
//! .unwrap();
//! cli.on(cli.root(), |invocation| {
//!     assert_eq!(invocation.bound.args, [Value::from(42)]);
//! })
//! .unwrap();
//!
//! let tokens: Vec<String> = ["42", "--verbose"].map(String::from).into();
//! assert_eq!(cli.run(&tokens).unwrap(), Dispatch::Invoked(cli.root()));
//!
//! let err = cli.run(&["abc".to_string()]).unwrap_err();
//! assert_eq!(err.to_string(), "`abc` is not a valid number for argument `count`");
//! ```

pub mod accumulate;
pub mod bind;
mod command;
mod config;
pub mod divide;
mod error;
mod flags;
pub mod help;
mod parsed;
pub mod prompt;
pub mod resolve;
pub mod schema;
pub mod token;
pub mod validate;
mod value;

pub use bind::{Argument, ListArgument, Positionals};
pub use command::{Action, Cli, CommandDef, CommandId, CommandNode, Dispatch, Invocation};
pub use config::{CommandConfig, ConfigPatch, System};
pub use error::{DefinitionError, NameKind, ParseError, ParseResult, SchemaError};
pub use flags::FlagTable;
pub use parsed::{Bound, Outcome, Parsed};
pub use prompt::{PromptRequest, Prompter, Target};
pub use schema::{Primitive, Schema};
pub use value::Value;
