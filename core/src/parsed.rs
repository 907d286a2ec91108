//! Parse results.
//!
//! [`Parsed`] is what one command line parses to before any prompt has been
//! answered. Once every pending prompt is satisfied, [`Parsed::finish`]
//! yields the [`Bound`] values handed to the command's action.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::command::CommandId;
use crate::error::{ParseError, ParseResult, SchemaError};
use crate::prompt::{PromptRequest, Prompter, Target};
use crate::value::Value;

/// The values bound for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bound {
    /// Required argument values, in declaration order.
    pub args: Vec<Value>,
    /// Optional argument values that received input, in declaration order.
    pub opt_args: Vec<Value>,
    pub list_args: Vec<Value>,
    pub flags: BTreeMap<String, Value>,
    /// Tokens after the trailing separator, untouched.
    pub trailing_args: Vec<String>,
}

impl Bound {
    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.flags.get(name)
    }
}

/// What a command line parsed to.
#[derive(Debug)]
pub enum Outcome {
    /// `--help` or `-h` was given to this command.
    Help(CommandId),
    /// `--help-usage` or `-hu` was given to this command.
    Usage(CommandId),
    Parsed(Parsed),
}

/// A parsed command line, possibly still waiting on prompts.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub(crate) command: CommandId,
    pub(crate) args: Vec<Option<Value>>,
    pub(crate) opt_args: Vec<Value>,
    pub(crate) list_args: Vec<Value>,
    pub(crate) flags: BTreeMap<String, Value>,
    pub(crate) trailing_args: Vec<String>,
    pub(crate) pending: Vec<PromptRequest>,
}

impl Parsed {
    /// The command the line was routed to.
    pub fn command(&self) -> CommandId {
        self.command
    }

    /// Prompts still to be answered: missing arguments first, then flags.
    pub fn pending(&self) -> &[PromptRequest] {
        &self.pending
    }

    /// Answers the pending prompt at `index`.
    ///
    /// On success the prompt is removed from [`pending`](Self::pending); a
    /// rejected answer leaves it in place to be asked again.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownPrompt`] if nothing is pending at `index`,
    /// or the schema error for the flag or argument if the answer is rejected.
    pub fn answer(&mut self, index: usize, raw: &[String]) -> ParseResult<()> {
        let request = self
            .pending
            .get(index)
            .ok_or(ParseError::UnknownPrompt(index))?;
        let value = request.accept(raw).map_err(|source| match &request.target {
            Target::Argument { name, .. } => ParseError::InvalidArgument {
                name: name.clone(),
                source,
            },
            Target::Flag(name) => ParseError::InvalidOption {
                flag: format!("--{name}"),
                source,
            },
        })?;
        let request = self.pending.remove(index);
        self.store(request.target, value);
        Ok(())
    }

    /// Answers every pending prompt with `prompter`, asking again after each
    /// rejected answer. If the prompter fails, the unanswered prompts stay
    /// pending.
    pub fn resolve_with(&mut self, prompter: &mut dyn Prompter) -> ParseResult<()> {
        while let Some(request) = self.pending.first() {
            let value = loop {
                let answer = prompter.ask(request)?;
                match request.accept(&answer) {
                    Ok(value) => break value,
                    Err(error) => {
                        debug!(target_name = %request.target, %error, "answer rejected");
                        prompter.rejected(request, &error);
                    }
                }
            };
            let request = self.pending.remove(0);
            self.store(request.target, value);
        }
        Ok(())
    }

    fn store(&mut self, target: Target, value: Value) {
        match target {
            Target::Argument { index, .. } => self.args[index] = Some(value),
            Target::Flag(name) => {
                self.flags.insert(name, value);
            }
        }
    }

    /// Completes the parse.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::PromptUnavailable`] while any prompt is pending.
    pub fn finish(self) -> ParseResult<Bound> {
        if let Some(request) = self.pending.first() {
            return Err(ParseError::PromptUnavailable(request.target.to_string()));
        }

        Ok(Bound {
            args: self.args.into_iter().flatten().collect(),
            opt_args: self.opt_args,
            list_args: self.list_args,
            flags: self.flags,
            trailing_args: self.trailing_args,
        })
    }
}
