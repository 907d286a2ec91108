//! The command tree.
//!
//! A [`Cli`] owns every command node in one arena. The root is created by
//! [`Cli::new`]; children by [`Cli::create`], which snapshots the parent's
//! config and global flags at that moment. Nodes are addressed by
//! [`CommandId`] and refer to their parent by id, which is only used to
//! print the command lineage.
//!
//! Parsing a command line routes leading tokens that name a child command,
//! then hands the rest to the divider, binder and accumulator of the
//! command that was reached.

use std::fmt;

use tracing::debug;

use crate::accumulate::{accumulate, fill_missing};
use crate::bind::{Argument, ListArgument, Positionals, bind};
use crate::config::{CommandConfig, ConfigPatch, System};
use crate::divide::{divide, split_trailing};
use crate::error::{DefinitionError, NameKind, ParseError, ParseResult};
use crate::flags::FlagTable;
use crate::help;
use crate::parsed::{Bound, Outcome, Parsed};
use crate::prompt::Prompter;
use crate::resolve::Resolver;
use crate::schema::Schema;
use crate::validate::{validate_flags, validate_name};

/// Index of a command in its [`Cli`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

impl CommandId {
    pub const ROOT: CommandId = CommandId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// What an action receives.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub command: CommandId,
    pub name: &'a str,
    pub bound: &'a Bound,
    pub config: &'a CommandConfig,
    pub system: &'a System,
}

/// Callback registered with [`Cli::on`].
pub type Action = Box<dyn Fn(&Invocation<'_>) + Send + Sync>;

/// Declaration of one command, consumed by [`Cli::new`] or [`Cli::create`].
#[derive(Debug, Clone, Default)]
pub struct CommandDef {
    description: Option<String>,
    positionals: Positionals,
    flags: FlagTable,
    global_flags: FlagTable,
    config: ConfigPatch,
}

impl CommandDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a required positional argument.
    pub fn argument(mut self, argument: Argument) -> Self {
        self.positionals.args.push(argument);
        self
    }

    /// Adds an optional positional argument, bound only while input remains.
    pub fn optional_argument(mut self, argument: Argument) -> Self {
        self.positionals.opt_args.push(argument);
        self
    }

    pub fn list_argument(mut self, argument: ListArgument) -> Self {
        self.positionals.list_arg = Some(argument);
        self
    }

    pub fn flag(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.flags.insert(name, schema);
        self
    }

    /// Adds a flag that this command and its later children share.
    pub fn global_flag(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.global_flags.insert(name, schema);
        self
    }

    pub fn config(mut self, patch: ConfigPatch) -> Self {
        self.config = patch;
        self
    }
}

/// One command of the tree.
pub struct CommandNode {
    name: String,
    description: Option<String>,
    config: CommandConfig,
    positionals: Positionals,
    flags: FlagTable,
    /// Effective global flags: inherited ones with this command's own on top.
    global_flags: FlagTable,
    programs: Vec<(String, CommandId)>,
    parent: Option<CommandId>,
    action: Option<Action>,
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("flags", &self.flags.names().collect::<Vec<_>>())
            .field("global_flags", &self.global_flags.names().collect::<Vec<_>>())
            .field("programs", &self.programs)
            .field("parent", &self.parent)
            .field("action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

impl CommandNode {
    fn build(
        name: String,
        def: CommandDef,
        config: CommandConfig,
        global_flags: FlagTable,
        parent: Option<CommandId>,
        system: &System,
    ) -> Result<Self, DefinitionError> {
        let suffix = system.negation_suffix();
        validate_name(NameKind::Command, &name, suffix)?;
        validate_flags(&def.flags, &global_flags, suffix)?;
        def.positionals.validate(suffix)?;

        Ok(Self {
            name,
            description: def.description,
            config,
            positionals: def.positionals,
            flags: def.flags,
            global_flags,
            programs: Vec::new(),
            parent,
            action: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    pub fn positionals(&self) -> &Positionals {
        &self.positionals
    }

    pub fn flags(&self) -> &FlagTable {
        &self.flags
    }

    pub fn global_flags(&self) -> &FlagTable {
        &self.global_flags
    }

    /// Child commands in creation order.
    pub fn programs(&self) -> impl Iterator<Item = (&str, CommandId)> {
        self.programs.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn program(&self, name: &str) -> Option<CommandId> {
        self.programs
            .iter()
            .find(|(program, _)| program == name)
            .map(|(_, id)| *id)
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.flags, &self.global_flags)
    }

    fn trailing_separator(&self) -> Option<&str> {
        self.config.trailing_separator()
    }

    /// The help or usage token present in `tokens`, if help is enabled.
    fn help_request(&self, tokens: &[String]) -> Option<HelpKind> {
        if !self.config.help {
            return None;
        }
        tokens.iter().find_map(|token| match token.as_str() {
            "--help" | "-h" => Some(HelpKind::Help),
            "--help-usage" | "-hu" => Some(HelpKind::Usage),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HelpKind {
    Help,
    Usage,
}

/// How one invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The command's action ran.
    Invoked(CommandId),
    /// The command parsed successfully but has no action.
    NoAction(CommandId),
    Help(CommandId),
    Usage(CommandId),
}

/// A command tree and its parsing policy.
///
/// Construction is not thread safe; once built, a `Cli` is immutable during
/// parsing and can run any number of command lines.
#[derive(Debug)]
pub struct Cli {
    system: System,
    nodes: Vec<CommandNode>,
}

impl Cli {
    /// Creates the root command.
    pub fn new(name: impl Into<String>, system: System, def: CommandDef) -> Result<Self, DefinitionError> {
        let config = CommandConfig::default().merged(&def.config);
        let global_flags = def.global_flags.clone();
        let root = CommandNode::build(name.into(), def, config, global_flags, None, &system)?;
        Ok(Self {
            system,
            nodes: vec![root],
        })
    }

    pub fn root(&self) -> CommandId {
        CommandId::ROOT
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn command(&self, id: CommandId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    fn node(&self, id: CommandId) -> Result<&CommandNode, DefinitionError> {
        self.nodes.get(id.0).ok_or(DefinitionError::UnknownCommand(id.0))
    }

    /// Adds a child command under `parent`.
    ///
    /// The child starts from the parent's current config with the
    /// definition's patch applied, and inherits the parent's current global
    /// flags unless `skip_global_flags` ends up set. Global flags added to
    /// the parent later do not reach the child.
    pub fn create(
        &mut self,
        parent: CommandId,
        name: impl Into<String>,
        def: CommandDef,
    ) -> Result<CommandId, DefinitionError> {
        let name = name.into();
        let parent_node = self.node(parent)?;
        if parent_node.program(&name).is_some() {
            return Err(DefinitionError::DuplicateCommand(name));
        }

        let config = parent_node.config.merged(&def.config);
        let global_flags = if config.skip_global_flags {
            def.global_flags.clone()
        } else {
            parent_node.global_flags.merged(&def.global_flags)
        };

        let node = CommandNode::build(name.clone(), def, config, global_flags, Some(parent), &self.system)?;
        let id = CommandId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].programs.push((name, id));
        Ok(id)
    }

    /// Registers the action of a command. Each command takes one action.
    pub fn on<F>(&mut self, id: CommandId, action: F) -> Result<(), DefinitionError>
    where
        F: Fn(&Invocation<'_>) + Send + Sync + 'static,
    {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(DefinitionError::UnknownCommand(id.0))?;
        if node.action.is_some() {
            return Err(DefinitionError::ActionAlreadySet(node.name.clone()));
        }
        node.action = Some(Box::new(action));
        Ok(())
    }

    /// Command names from the root down to `id`.
    pub fn lineage(&self, id: CommandId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self.command(id);
        while let Some(node) = current {
            names.push(node.name());
            current = node.parent.and_then(|parent| self.command(parent));
        }
        names.reverse();
        names
    }

    /// Follows leading tokens that name child commands.
    fn route<'t>(&self, tokens: &'t [String]) -> (CommandId, &'t [String]) {
        let mut id = CommandId::ROOT;
        let mut rest = tokens;
        while let Some((first, remaining)) = rest.split_first() {
            let Some(child) = self.nodes[id.0].program(first) else {
                break;
            };
            debug!(program = %first, "routing to subcommand");
            id = child;
            rest = remaining;
        }
        (id, rest)
    }

    /// Parses a command line without running any action.
    ///
    /// # Errors
    ///
    /// Returns the first input error; nothing is bound on failure.
    pub fn parse(&self, tokens: &[String]) -> ParseResult<Outcome> {
        let (id, rest) = self.route(tokens);
        let node = &self.nodes[id.0];
        let separator = node.trailing_separator();

        let (main, _) = split_trailing(rest, separator);
        match node.help_request(main) {
            Some(HelpKind::Help) => return Ok(Outcome::Help(id)),
            Some(HelpKind::Usage) => return Ok(Outcome::Usage(id)),
            None => {}
        }

        let zones = divide(rest, separator, &self.system)?;
        let positionals = bind(&zones.positional, &node.positionals, &self.system)?;

        let resolver = node.resolver();
        let mut flags = accumulate(&zones.options, &resolver, &self.system)?;
        let flag_prompts = fill_missing(&mut flags, &resolver)?;

        let mut pending = positionals.pending;
        pending.extend(flag_prompts);

        Ok(Outcome::Parsed(Parsed {
            command: id,
            args: positionals.args,
            opt_args: positionals.opt_args,
            list_args: positionals.list_args,
            flags,
            trailing_args: zones.trailing,
            pending,
        }))
    }

    /// Parses a command line and runs the action of the command it reaches.
    ///
    /// Values that must be prompted for are an error here; use
    /// [`run_with`](Self::run_with) to supply a prompter.
    pub fn run(&self, tokens: &[String]) -> ParseResult<Dispatch> {
        match self.parse(tokens)? {
            Outcome::Help(id) => Ok(Dispatch::Help(id)),
            Outcome::Usage(id) => Ok(Dispatch::Usage(id)),
            Outcome::Parsed(parsed) => {
                let id = parsed.command();
                Ok(self.dispatch(id, &parsed.finish()?))
            }
        }
    }

    /// Like [`run`](Self::run), answering prompts with `prompter`.
    pub fn run_with(&self, tokens: &[String], prompter: &mut dyn Prompter) -> ParseResult<Dispatch> {
        match self.parse(tokens)? {
            Outcome::Help(id) => Ok(Dispatch::Help(id)),
            Outcome::Usage(id) => Ok(Dispatch::Usage(id)),
            Outcome::Parsed(mut parsed) => {
                parsed.resolve_with(prompter)?;
                let id = parsed.command();
                Ok(self.dispatch(id, &parsed.finish()?))
            }
        }
    }

    fn dispatch(&self, id: CommandId, bound: &Bound) -> Dispatch {
        let node = &self.nodes[id.0];
        let Some(action) = &node.action else {
            debug!(command = %node.name, "no action registered");
            return Dispatch::NoAction(id);
        };

        debug!(command = %node.name, "invoking action");
        action(&Invocation {
            command: id,
            name: &node.name,
            bound,
            config: &node.config,
            system: &self.system,
        });
        Dispatch::Invoked(id)
    }

    /// Runs a process's command line.
    ///
    /// Help and usage are printed to stdout. An error is printed to stderr
    /// and ends the process with status 1, unless
    /// [`System::do_not_exit_on_error`] is set, in which case it is returned.
    pub fn start(&self, tokens: &[String], prompter: &mut dyn Prompter) -> ParseResult<Dispatch> {
        match self.run_with(tokens, prompter) {
            Ok(Dispatch::Help(id)) => {
                print!("{}", help::render_help(self, id));
                Ok(Dispatch::Help(id))
            }
            Ok(Dispatch::Usage(id)) => {
                print!("{}", help::render_usage(self, id));
                Ok(Dispatch::Usage(id))
            }
            Ok(dispatch) => Ok(dispatch),
            Err(err) if self.system.do_not_exit_on_error => Err(err),
            Err(err) => exit_with(&err),
        }
    }
}

fn exit_with(err: &ParseError) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use crate::value::Value;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn parse(cli: &Cli, raw: &[&str]) -> Parsed {
        match cli.parse(&tokens(raw)).unwrap() {
            Outcome::Parsed(parsed) => parsed,
            other => panic!("expected a parse, got {other:?}"),
        }
    }

    fn app() -> Cli {
        let mut cli = Cli::new(
            "app",
            System::default(),
            CommandDef::new().global_flag("verbose", schema::boolean().aliases(["v"])),
        )
        .unwrap();
        let build = cli
            .create(CommandId::ROOT, "build", CommandDef::new().flag("out", schema::string()))
            .unwrap();
        cli.create(build, "watch", CommandDef::new()).unwrap();
        cli
    }

    #[test]
    fn test_routes_nested_subcommands() {
        let cli = app();
        let parsed = parse(&cli, &["build", "watch", "-v"]);
        assert_eq!(cli.lineage(parsed.command()), ["app", "build", "watch"]);
        assert_eq!(parsed.finish().unwrap().flag("verbose"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_routing_only_matches_leading_tokens() {
        let mut cli = app();
        cli.create(
            CommandId::ROOT,
            "echo",
            CommandDef::new().list_argument(ListArgument::new("words")),
        )
        .unwrap();

        let parsed = parse(&cli, &["echo", "build"]);
        assert_eq!(cli.lineage(parsed.command()), ["app", "echo"]);
        assert_eq!(parsed.finish().unwrap().list_args, [Value::from("build")]);
    }

    #[test]
    fn test_duplicate_child_is_rejected() {
        let mut cli = app();
        assert_eq!(
            cli.create(CommandId::ROOT, "build", CommandDef::new()).unwrap_err(),
            DefinitionError::DuplicateCommand("build".into())
        );
        assert!(matches!(
            cli.create(CommandId::ROOT, "two words", CommandDef::new()),
            Err(DefinitionError::ContainsSpace { .. })
        ));
    }

    #[test]
    fn test_child_snapshots_parent_globals() {
        let mut cli = Cli::new("app", System::default(), CommandDef::new()).unwrap();
        let early = cli.create(CommandId::ROOT, "early", CommandDef::new()).unwrap();
        let mid = cli
            .create(
                CommandId::ROOT,
                "mid",
                CommandDef::new().global_flag("color", schema::boolean()),
            )
            .unwrap();
        let late = cli.create(mid, "late", CommandDef::new()).unwrap();

        assert!(cli.command(early).unwrap().global_flags().is_empty());
        assert!(cli.command(late).unwrap().global_flags().get("color").is_some());
        assert!(cli.command(CommandId::ROOT).unwrap().global_flags().is_empty());
    }

    #[test]
    fn test_skip_global_flags() {
        let mut cli = app();
        let isolated = cli
            .create(
                CommandId::ROOT,
                "isolated",
                CommandDef::new().config(ConfigPatch {
                    skip_global_flags: Some(true),
                    ..Default::default()
                }),
            )
            .unwrap();

        assert!(cli.command(isolated).unwrap().global_flags().is_empty());
        assert!(matches!(
            cli.parse(&tokens(&["isolated", "--verbose"])),
            Err(ParseError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_help_is_checked_after_routing() {
        let cli = app();
        assert!(matches!(
            cli.parse(&tokens(&["build", "-h"])).unwrap(),
            Outcome::Help(id) if cli.lineage(id) == ["app", "build"]
        ));
        assert!(matches!(
            cli.parse(&tokens(&["--out", "x", "--help-usage"])).unwrap(),
            Outcome::Usage(CommandId::ROOT)
        ));
    }

    #[test]
    fn test_help_disabled() {
        let mut cli = app();
        let quiet = cli
            .create(
                CommandId::ROOT,
                "quiet",
                CommandDef::new().config(ConfigPatch {
                    help: Some(false),
                    ..Default::default()
                }),
            )
            .unwrap();
        assert!(!cli.command(quiet).unwrap().config().help);
        assert!(matches!(
            cli.parse(&tokens(&["quiet", "--help"])),
            Err(ParseError::UnknownOption(raw)) if raw == "--help"
        ));
    }

    #[test]
    fn test_action_is_registered_once_and_invoked_once() {
        let mut cli = app();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        cli.on(CommandId::ROOT, move |invocation| {
            assert_eq!(invocation.name, "app");
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert!(matches!(
            cli.on(CommandId::ROOT, |_| {}),
            Err(DefinitionError::ActionAlreadySet(name)) if name == "app"
        ));

        assert_eq!(cli.run(&tokens(&["-v"])).unwrap(), Dispatch::Invoked(CommandId::ROOT));
        assert!(cli.run(&tokens(&["--nope"])).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_command_id() {
        let mut cli = app();
        let stranger = CommandId(99);
        assert!(cli.command(stranger).is_none());
        assert_eq!(
            cli.create(stranger, "x", CommandDef::new()).unwrap_err(),
            DefinitionError::UnknownCommand(99)
        );
        assert!(cli.on(stranger, |_| {}).is_err());
    }

    struct NoAnswers;

    impl Prompter for NoAnswers {
        fn ask(&mut self, _request: &crate::PromptRequest) -> std::io::Result<Vec<String>> {
            Err(std::io::ErrorKind::UnexpectedEof.into())
        }
    }

    #[test]
    fn test_start_returns_errors_when_exit_is_disabled() {
        let system = System {
            do_not_exit_on_error: true,
            ..System::default()
        };
        let mut cli = Cli::new(
            "app",
            system,
            CommandDef::new()
                .argument(Argument::new("name").schema(schema::string().ask("name?")))
                .flag("n", schema::number()),
        )
        .unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        cli.on(CommandId::ROOT, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert!(matches!(
            cli.start(&tokens(&["ada", "--nope"]), &mut NoAnswers),
            Err(ParseError::UnknownOption(raw)) if raw == "--nope"
        ));
        assert!(matches!(
            cli.start(&tokens(&[]), &mut NoAnswers),
            Err(ParseError::Prompt(_))
        ));
        assert_eq!(
            cli.start(&tokens(&["-h"]), &mut NoAnswers).unwrap(),
            Dispatch::Help(CommandId::ROOT)
        );
        assert_eq!(
            cli.start(&tokens(&["ada", "--n", "2"]), &mut NoAnswers).unwrap(),
            Dispatch::Invoked(CommandId::ROOT)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
