use std::io::{self, BufRead, Write};

use argtree_core::help::render_help;
use argtree_core::schema::{self, Case};
use argtree_core::{
    Argument, Cli, CommandDef, CommandId, ConfigPatch, DefinitionError, Dispatch, Invocation,
    ListArgument, PromptRequest, Prompter, Schema, SchemaError, System,
};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a JSON `System` policy.
const SYSTEM_ENV: &str = "ARGTREE_SYSTEM";

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let system = match load_system() {
        Ok(system) => system,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let cli = match build_cli(system) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("error: invalid command definition: {err}");
            std::process::exit(2);
        }
    };

    let tokens: Vec<String> = std::env::args().skip(1).collect();
    let mut prompter = TerminalPrompter::new(io::stdin().lock());

    match cli.start(&tokens, &mut prompter) {
        Ok(Dispatch::NoAction(id)) => print!("{}", render_help(&cli, id)),
        Ok(dispatch) => debug!(?dispatch, "finished"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn load_system() -> Result<System, String> {
    match std::env::var(SYSTEM_ENV) {
        Ok(raw) => serde_json::from_str(&raw).map_err(|err| format!("invalid {SYSTEM_ENV}: {err}")),
        Err(_) => Ok(System::default()),
    }
}

/// The demo `pkg` tool: a small package manager front end.
fn build_cli(system: System) -> Result<Cli, DefinitionError> {
    let mut cli = Cli::new(
        "pkg",
        system,
        CommandDef::new()
            .description("A demo package tool")
            .global_flag(
                "verbose",
                schema::boolean().aliases(["v"]).description("Print more"),
            )
            .global_flag(
                "root",
                schema::string().default(".").description("Project root"),
            ),
    )?;

    let build = cli.create(
        CommandId::ROOT,
        "build",
        CommandDef::new()
            .description("Compile the project")
            .optional_argument(Argument::new("target").description("Package to build"))
            .flag("release", schema::boolean().aliases(["r"]))
            .flag("jobs", schema::number().min(1.0).to_integer().aliases(["j"]))
            .flag("features", schema::array(schema::string()).aliases(["F"]))
            .flag(
                "profile",
                schema::string()
                    .to_case(Case::Lower)
                    .one_of(["dev", "release"])
                    .default("dev"),
            ),
    )?;
    cli.on(build, print_invocation)?;

    let add = cli.create(
        CommandId::ROOT,
        "add",
        CommandDef::new()
            .description("Add dependencies")
            .list_argument(
                ListArgument::new("names")
                    .schema(schema::string().min_length(1))
                    .min_length(1),
            )
            .flag("dev", schema::boolean().aliases(["D"]))
            .flag("registry", schema::string().default("crates.io")),
    )?;
    cli.on(add, print_invocation)?;

    let run = cli.create(
        CommandId::ROOT,
        "run",
        CommandDef::new()
            .description("Run a script")
            .argument(Argument::new("script"))
            .flag("env", schema::array(schema::string()).aliases(["e"]))
            .config(ConfigPatch {
                enable_trailing_args: Some(true),
                ..Default::default()
            }),
    )?;
    cli.on(run, print_invocation)?;

    let init = cli.create(
        CommandId::ROOT,
        "init",
        CommandDef::new()
            .description("Create a new project")
            .argument(Argument::new("name").schema(schema::string().ask("Project name?")))
            .flag(
                "template",
                schema::string().one_of(["bin", "lib"]).default("bin"),
            ),
    )?;
    cli.on(init, print_invocation)?;

    Ok(cli)
}

fn print_invocation(invocation: &Invocation<'_>) {
    let output = json!({
        "command": invocation.name,
        "bound": invocation.bound,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("error: failed to serialize output: {err}"),
    }
}

/// Answers prompts on stderr, reading lines from `input`.
struct TerminalPrompter<R> {
    input: R,
}

impl<R: BufRead> TerminalPrompter<R> {
    fn new(input: R) -> Self {
        Self { input }
    }

    /// Reads one line without its terminator; `None` at end of input.
    fn read_line(&mut self, label: &str) -> io::Result<Option<String>> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{label}: ")?;
        stderr.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn require_line(&mut self, label: &str) -> io::Result<String> {
        self.read_line(label)?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))
    }
}

impl<R: BufRead> Prompter for TerminalPrompter<R> {
    fn ask(&mut self, request: &PromptRequest) -> io::Result<Vec<String>> {
        eprintln!("{}: {}", request.target, request.question);
        if let Some(default) = request.default_value() {
            eprintln!("(empty input uses the default: {default})");
        }

        match &request.schema {
            Schema::Array(array) => {
                let kind = array.item().type_name();
                let mut items = Vec::new();
                loop {
                    let label = format!("{kind}[{}]", items.len() + 1);
                    match self.read_line(&label)? {
                        Some(item) if !item.is_empty() => items.push(item),
                        Some(_) => break,
                        None if items.is_empty() => {
                            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
                        }
                        None => break,
                    }
                }
                Ok(items)
            }
            Schema::Tuple(tuple) => tuple
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| self.require_line(&format!("{}[{index}]", item.type_name())))
                .collect(),
            schema => Ok(vec![self.require_line(schema.type_name())?]),
        }
    }

    fn rejected(&mut self, _request: &PromptRequest, error: &SchemaError) {
        eprintln!("{error}");
    }
}
