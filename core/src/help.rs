//! Plain-text help and usage pages.

use crate::bind::Argument;
use crate::command::{Cli, CommandId, CommandNode};
use crate::flags::FlagTable;
use crate::schema::{Primitive, Schema};

/// Renders `--help` for a command.
///
/// Returns an empty string for an id the tree does not know.
///
/// # Examples
///
/// ```
/// use argtree_core::{schema, Argument, Cli, CommandDef, System};
/// use argtree_core::help::render_help;
///
/// let cli = Cli::new(
///     "greet",
///     System::default(),
///     CommandDef::new()
///         .argument(Argument::new("name"))
///         .flag("loud", schema::boolean().aliases(["l"])),
/// )
/// .unwrap();
///
/// let page = render_help(&cli, cli.root());
/// assert!(page.starts_with("Usage: greet <name> --[flags]"));
/// assert!(page.contains("--loud, -l"));
/// ```
pub fn render_help(cli: &Cli, id: CommandId) -> String {
    let Some(node) = cli.command(id) else {
        return String::new();
    };
    let mut out = String::new();

    out.push_str(&format!("Usage: {}\n", usage_line(cli, id, node)));
    if let Some(description) = node.description() {
        out.push_str(&format!("\n{description}\n"));
    }

    let programs: Vec<(String, String)> = node
        .programs()
        .map(|(name, child)| {
            let description = cli
                .command(child)
                .and_then(CommandNode::description)
                .unwrap_or_default();
            (name.to_string(), description.to_string())
        })
        .collect();
    section(&mut out, "Programs", &programs);

    let positionals = node.positionals();
    let mut arguments: Vec<(String, String)> = positionals
        .args
        .iter()
        .map(|argument| argument_row(argument, false))
        .collect();
    arguments.extend(positionals.opt_args.iter().map(|argument| argument_row(argument, true)));
    if let Some(list) = &positionals.list_arg {
        let item = list.schema.as_ref().map_or("string", Primitive::type_name);
        arguments.push((
            format!("[...{}]", list.name),
            join_cells(&[
                format!("array[{item}]").as_str(),
                list.description.as_deref().unwrap_or_default(),
            ]),
        ));
    }
    section(&mut out, "Arguments", &arguments);

    section(&mut out, "Flags", &flag_rows(node.flags(), None));
    section(&mut out, "Global flags", &flag_rows(node.global_flags(), Some(node.flags())));

    if let Some(separator) = node.config().trailing_separator() {
        out.push_str("\nTrailing arguments:\n");
        out.push_str(&format!("  Everything after `{separator}` is passed to the program as is.\n"));
    }

    out
}

/// Renders `--help-usage`: how a command line is read under the active
/// policies.
pub fn render_usage(cli: &Cli, id: CommandId) -> String {
    let Some(node) = cli.command(id) else {
        return String::new();
    };
    let system = cli.system();
    let config = node.config();
    let mut out = String::new();

    out.push_str(
        "Structure: programs fixed-arguments optional-arguments list-arguments flags trailing-args\n",
    );
    out.push_str("  Arguments come before flags; the first flag starts the flag section.\n");

    out.push_str("\nFlags:\n");
    out.push_str("  --flag value    set a value\n");
    out.push_str("  -f value        set a value through an alias\n");
    let assign = if system.allow_equal_assign { "allowed" } else { "not allowed" };
    out.push_str(&format!("  --flag=value    {assign}\n"));
    out.push_str("  --flag          a boolean flag alone is true\n");
    if let Some(suffix) = system.negation_suffix() {
        out.push_str(&format!("  --flag{suffix}   a boolean flag with `{suffix}` is false\n"));
    }

    out.push_str("\nRepeated flags:\n");
    let list = match (
        system.allow_duplicate_flag_for_list,
        system.overwrite_duplicate_flag_for_list,
    ) {
        (true, false) => "values accumulate",
        (true, true) => "the last occurrence wins",
        (false, _) => "rejected",
    };
    out.push_str(&format!("  list flags      {list}\n"));
    let primitive = if system.allow_duplicate_flag_for_primitive {
        "the last occurrence wins"
    } else {
        "rejected"
    };
    out.push_str(&format!("  other flags     {primitive}\n"));
    let multiple = if system.allow_multiple_values_for_primitive {
        "the last value wins"
    } else {
        "rejected"
    };
    out.push_str(&format!("  several values  {multiple}\n"));
    if system.split_list_by_comma {
        out.push_str("  list values are also split on `,`\n");
    }
    if system.skip_unknown_flag {
        out.push_str("  unknown flags and their values are ignored\n");
    }

    out.push_str("\nTrailing arguments:\n");
    match config.trailing_separator() {
        Some(separator) => {
            out.push_str(&format!("  everything after `{separator}` is passed as is\n"))
        }
        None => out.push_str("  not accepted\n"),
    }

    out
}

fn usage_line(cli: &Cli, id: CommandId, node: &CommandNode) -> String {
    let mut items: Vec<String> = cli.lineage(id).into_iter().map(str::to_string).collect();

    if node.programs().next().is_some() {
        items.push("(program)".to_string());
    }
    let positionals = node.positionals();
    items.extend(positionals.args.iter().map(|a| format!("<{}>", a.name)));
    items.extend(positionals.opt_args.iter().map(|a| format!("<{}>?", a.name)));
    if let Some(list) = &positionals.list_arg {
        items.push(format!("[...{}]", list.name));
    }
    if !node.flags().is_empty() || !node.global_flags().is_empty() {
        items.push("--[flags]".to_string());
    }
    if let Some(separator) = node.config().trailing_separator() {
        items.push(format!("{separator} [...trailing]"));
    }

    items.join(" ")
}

fn argument_row(argument: &Argument, optional: bool) -> (String, String) {
    let mut name = format!("<{}>", argument.name);
    let optional = optional
        || argument
            .schema
            .as_ref()
            .is_some_and(|schema| schema.meta().ask.is_some() || schema.meta().default.is_some());
    if optional {
        name.push('?');
    }
    let kind = argument.schema.as_ref().map_or("string", Primitive::type_name);
    (name, join_cells(&[kind, argument.description.as_deref().unwrap_or_default()]))
}

/// Rows for a flag table; names in `shadowed_by` are left out.
fn flag_rows(flags: &FlagTable, shadowed_by: Option<&FlagTable>) -> Vec<(String, String)> {
    flags
        .iter()
        .filter(|(name, _)| shadowed_by.is_none_or(|own| own.get(name).is_none()))
        .map(|(name, schema)| (flag_label(name, schema), flag_detail(schema)))
        .collect()
}

fn flag_label(name: &str, schema: &Schema) -> String {
    let meta = schema.meta();
    let mut label = format!("--{name}");
    for alias in &meta.aliases {
        label.push_str(&format!(", -{alias}"));
    }
    if !meta.required || meta.default.is_some() || meta.ask.is_some() {
        label.push('?');
    }
    label
}

fn flag_detail(schema: &Schema) -> String {
    let meta = schema.meta();
    let default = meta
        .default
        .as_ref()
        .map(|value| format!("(default: {value})"))
        .unwrap_or_default();
    join_cells(&[
        schema.type_label().as_str(),
        meta.description.as_deref().unwrap_or_default(),
        default.as_str(),
    ])
}

fn join_cells(cells: &[&str]) -> String {
    cells
        .iter()
        .filter(|cell| !cell.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("  ")
}

fn section(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    out.push_str(&format!("\n{title}:\n"));
    for (left, right) in rows {
        let line = format!("  {left:<width$}  {right}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::ListArgument;
    use crate::command::CommandDef;
    use crate::config::{ConfigPatch, System};
    use crate::schema;

    fn cli() -> Cli {
        let mut cli = Cli::new(
            "pkg",
            System::default(),
            CommandDef::new()
                .description("Package tool")
                .global_flag("verbose", schema::boolean().aliases(["v"])),
        )
        .unwrap();
        cli.create(
            CommandId::ROOT,
            "add",
            CommandDef::new()
                .description("Add packages")
                .argument(Argument::new("target").schema(schema::string()))
                .list_argument(ListArgument::new("names"))
                .flag("dev", schema::boolean().description("dev dependency"))
                .flag("registry", schema::string().required())
                .config(ConfigPatch {
                    enable_trailing_args: Some(true),
                    ..Default::default()
                }),
        )
        .unwrap();
        cli
    }

    #[test]
    fn test_root_help_lists_programs() {
        let cli = cli();
        let page = render_help(&cli, cli.root());
        assert!(page.starts_with("Usage: pkg (program) --[flags]\n"));
        assert!(page.contains("Package tool"));
        assert!(page.contains("Programs:\n  add  Add packages\n"));
        assert!(page.contains("--verbose, -v?  boolean"));
    }

    #[test]
    fn test_child_help_shows_lineage_and_trailing() {
        let cli = cli();
        let add = cli.command(cli.root()).unwrap().program("add").unwrap();
        let page = render_help(&cli, add);

        assert!(page.starts_with("Usage: pkg add <target> [...names] --[flags] -- [...trailing]\n"));
        assert!(page.contains("[...names]  array[string]"));
        assert!(page.contains("  --dev?      boolean  dev dependency\n"));
        assert!(page.contains("  --registry  string\n"));
        assert!(page.contains("Global flags:"));
        assert!(page.contains("Everything after `--`"));
    }

    #[test]
    fn test_usage_reflects_policies() {
        let strict = Cli::new(
            "app",
            System {
                allow_equal_assign: false,
                boolean_negation_suffix: None,
                ..Default::default()
            },
            CommandDef::new(),
        )
        .unwrap();
        let page = render_usage(&strict, strict.root());
        assert!(page.contains("--flag=value    not allowed"));
        assert!(!page.contains("is false"));
        assert!(page.contains("not accepted"));
    }
}
