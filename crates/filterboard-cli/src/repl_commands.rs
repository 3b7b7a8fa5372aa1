//! REPL command handlers.
//!
//! Each command is implemented as a separate function for maintainability.

use colored::Colorize;
use filterboard_core::{
    schema, ConditionId, Field, FilterBuilder, GroupId, Prop, PropertyKind, PropertyValues,
    RenderSurface,
};

use crate::repl::ReplConfig;

/// Result of a REPL command execution.
pub enum CommandResult {
    Continue,
    Quit,
    Error(String),
}

/// Handle a REPL command (line starting with '.')
pub fn handle_command<S: RenderSurface>(
    builder: &mut FilterBuilder<S>,
    line: &str,
    config: &mut ReplConfig,
) -> CommandResult {
    let parts = split_args(line);
    let cmd = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();

    match cmd.as_str() {
        ".quit" | ".exit" | ".q" => CommandResult::Quit,
        ".help" | ".h" => {
            print_help();
            CommandResult::Continue
        }
        ".fields" => cmd_fields(),
        ".schema" => cmd_schema(&parts),
        ".add" => cmd_add(builder, &parts),
        ".new" => cmd_new(builder),
        ".rm" => cmd_rm(builder, &parts),
        ".rmgroup" => cmd_rmgroup(builder, &parts),
        ".use" => cmd_use(builder, &parts),
        ".groups" => cmd_groups(builder),
        ".json" => {
            println!("{}\n", builder.mirror());
            CommandResult::Continue
        }
        ".apply" => cmd_apply(builder, &parts),
        ".clear" => cmd_clear(builder),
        ".copy" => {
            builder.copy_mirror();
            CommandResult::Continue
        }
        ".timing" => cmd_timing(config, &parts),
        _ => CommandResult::Error(format!("Unknown command: {cmd}")),
    }
}

fn cmd_fields() -> CommandResult {
    println!("{}", "Fields:".bold());
    for field in Field::ALL {
        println!(
            "  {:<13} {}",
            field.display_name().green(),
            field.wire_name().dimmed()
        );
    }
    println!();
    CommandResult::Continue
}

fn cmd_schema(parts: &[String]) -> CommandResult {
    let Some(name) = parts.get(1) else {
        println!("Usage: .schema <field>\n");
        return CommandResult::Continue;
    };
    let Some(field) = Field::from_display(name) else {
        return CommandResult::Error(format!("Unknown field: {name}"));
    };

    println!("{} {}", "Field:".bold(), field.display_name().green());
    for spec in schema::properties(field) {
        match spec.kind {
            PropertyKind::Text => {
                println!(
                    "  {:<9} text{}",
                    spec.prop.name().cyan(),
                    placeholder_hint(spec.placeholder)
                );
            }
            PropertyKind::Number => {
                let min = spec.min.map_or(String::new(), |m| format!(", min {m}"));
                println!(
                    "  {:<9} number{}{}",
                    spec.prop.name().cyan(),
                    placeholder_hint(spec.placeholder),
                    min.dimmed()
                );
            }
            PropertyKind::Enum(options) => {
                println!("  {:<9} one of: {}", spec.prop.name().cyan(), options.join(" | "));
            }
        }
    }
    println!();
    CommandResult::Continue
}

fn placeholder_hint(placeholder: Option<&str>) -> String {
    placeholder.map_or(String::new(), |p| format!(" (e.g. {p})"))
}

fn cmd_add<S: RenderSurface>(builder: &mut FilterBuilder<S>, parts: &[String]) -> CommandResult {
    if parts.len() < 2 {
        println!("Usage: .add <field> <Prop>=<value> ...");
        println!("       .add Tag Key=plan Relation=\"is greater than\" Value=10\n");
        return CommandResult::Continue;
    }
    let Some(field) = Field::from_display(&parts[1]) else {
        return CommandResult::Error(format!("Unknown field: {}", parts[1]));
    };

    let mut values = PropertyValues::new();
    for pair in &parts[2..] {
        let Some((name, value)) = pair.split_once('=') else {
            return CommandResult::Error(format!("Expected <Prop>=<value>, got: {pair}"));
        };
        let Some(prop) = Prop::from_name(name) else {
            return CommandResult::Error(format!("Unknown property: {name}"));
        };
        values.insert(prop, value.to_string());
    }

    match builder.add_condition(field, values) {
        Ok(_) => CommandResult::Continue,
        Err(err) => CommandResult::Error(err.to_string()),
    }
}

fn cmd_new<S: RenderSurface>(builder: &mut FilterBuilder<S>) -> CommandResult {
    let group = builder.new_group();
    println!("Now adding into {}\n", group.to_string().green());
    CommandResult::Continue
}

fn cmd_rm<S: RenderSurface>(builder: &mut FilterBuilder<S>, parts: &[String]) -> CommandResult {
    let Some(arg) = parts.get(1) else {
        println!("Usage: .rm <node> (see .groups for node ids)\n");
        return CommandResult::Continue;
    };
    let Some(node) = find_condition(builder, arg) else {
        return CommandResult::Error(format!("No condition '{arg}'"));
    };
    match builder.remove_condition(node) {
        Ok(()) => CommandResult::Continue,
        Err(err) => CommandResult::Error(err.to_string()),
    }
}

fn cmd_rmgroup<S: RenderSurface>(builder: &mut FilterBuilder<S>, parts: &[String]) -> CommandResult {
    let Some(arg) = parts.get(1) else {
        println!("Usage: .rmgroup <group>\n");
        return CommandResult::Continue;
    };
    let Some(group) = find_group(builder, arg) else {
        return CommandResult::Error(format!("No group '{arg}'"));
    };
    match builder.remove_group(group) {
        Ok(()) => CommandResult::Continue,
        Err(err) => CommandResult::Error(err.to_string()),
    }
}

fn cmd_use<S: RenderSurface>(builder: &mut FilterBuilder<S>, parts: &[String]) -> CommandResult {
    let Some(arg) = parts.get(1) else {
        println!("Active group: {}\n", builder.tree().active().to_string().green());
        return CommandResult::Continue;
    };
    let Some(group) = find_group(builder, arg) else {
        return CommandResult::Error(format!("No group '{arg}'"));
    };
    match builder.activate_group(group) {
        Ok(()) => CommandResult::Continue,
        Err(err) => CommandResult::Error(err.to_string()),
    }
}

fn cmd_groups<S: RenderSurface>(builder: &FilterBuilder<S>) -> CommandResult {
    let tree = builder.tree();
    for (index, group) in tree.groups().iter().enumerate() {
        let active = if group.id() == tree.active() {
            " (active)".green().to_string()
        } else {
            String::new()
        };
        let count = group.len();
        println!(
            "{} {} {}{active}",
            format!("Condition {}", index + 1).bold(),
            group.id().to_string().dimmed(),
            format!("({count} item{})", if count == 1 { "" } else { "s" }).dimmed()
        );

        let conflicted = group.conflicted();
        for (node, cond) in group.conditions() {
            let mark = if conflicted.contains(&node) {
                format!(" {}", "overridden by 'is' in this group".yellow())
            } else {
                String::new()
            };
            println!("  {} {}{mark}", node.to_string().cyan(), cond.summary());
        }
    }
    println!();
    CommandResult::Continue
}

fn cmd_apply<S: RenderSurface>(builder: &mut FilterBuilder<S>, parts: &[String]) -> CommandResult {
    let Some(path) = parts.get(1) else {
        println!("Usage: .apply <file.json>\n");
        return CommandResult::Continue;
    };
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => return CommandResult::Error(format!("Failed to read {path}: {err}")),
    };
    match builder.apply_text(&raw) {
        Ok(()) => {
            println!(
                "Applied {}: {} group(s), {} condition(s)\n",
                path.green(),
                builder.tree().groups().len(),
                builder.tree().condition_count()
            );
            CommandResult::Continue
        }
        Err(_) => {
            print_diagnostic_context(builder, &raw);
            println!();
            CommandResult::Continue
        }
    }
}

fn cmd_clear<S: RenderSurface>(builder: &mut FilterBuilder<S>) -> CommandResult {
    match builder.apply_text("") {
        Ok(()) => {
            println!("Cleared.\n");
            CommandResult::Continue
        }
        Err(err) => CommandResult::Error(err.to_string()),
    }
}

fn cmd_timing(config: &mut ReplConfig, parts: &[String]) -> CommandResult {
    match parts.get(1).map(String::as_str) {
        None => println!("Timing is {}\n", if config.timing { "ON" } else { "OFF" }),
        Some("on") => {
            config.timing = true;
            println!("Timing ON\n");
        }
        Some("off") => {
            config.timing = false;
            println!("Timing OFF\n");
        }
        Some(_) => return CommandResult::Error("Use: .timing on|off".to_string()),
    }
    CommandResult::Continue
}

/// Shows the rejected line from the raw text alongside the diagnostic.
pub fn print_diagnostic_context<S: RenderSurface>(builder: &FilterBuilder<S>, raw: &str) {
    let Some(diagnostic) = builder.diagnostic() else {
        return;
    };
    if let Some(line) = raw.lines().nth(diagnostic.line.saturating_sub(1)) {
        println!("  {:>4} {} {}", diagnostic.line, "|".dimmed(), line.red());
    }
}

/// Resolves a group by id ("g2") or 1-based position ("2").
fn find_group<S: RenderSurface>(builder: &FilterBuilder<S>, arg: &str) -> Option<GroupId> {
    let tree = builder.tree();
    if let Some(group) = tree.groups().iter().find(|g| g.id().to_string() == arg) {
        return Some(group.id());
    }
    let index: usize = arg.parse().ok()?;
    tree.groups().get(index.checked_sub(1)?).map(|g| g.id())
}

/// Resolves a condition node by id ("n3").
fn find_condition<S: RenderSurface>(builder: &FilterBuilder<S>, arg: &str) -> Option<ConditionId> {
    builder.tree().groups().iter().find_map(|group| {
        group
            .conditions()
            .find(|(node, _)| node.to_string() == arg)
            .map(|(node, _)| node)
    })
}

/// Splits a command line into tokens, honoring double quotes.
fn split_args(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Print help text for REPL commands
pub fn print_help() {
    println!("\n{}", "Filterboard REPL Commands".bold().underline());
    println!();
    println!("  {}                      Show this help", ".help".yellow());
    println!("  {}                      Exit the REPL", ".quit".yellow());
    println!("  {}                    List filterable fields", ".fields".yellow());
    println!("  {}            Show a field's properties", ".schema <field>".yellow());
    println!(
        "  {}  Add a condition",
        ".add <field> <Prop>=<v> ...".yellow()
    );
    println!("  {}                       Start a new OR'd group", ".new".yellow());
    println!("  {}                 Remove a condition node", ".rm <node>".yellow());
    println!("  {}           Remove a group", ".rmgroup <group>".yellow());
    println!("  {}              Switch the active group", ".use <group>".yellow());
    println!("  {}                    Show the group tree", ".groups".yellow());
    println!("  {}                      Show the JSON mirror", ".json".yellow());
    println!("  {}             Apply a filter JSON file", ".apply <file>".yellow());
    println!("  {}                     Remove all conditions", ".clear".yellow());
    println!("  {}                      Print the mirror for copying", ".copy".yellow());
    println!("  {}             Toggle apply timing", ".timing on|off".yellow());
    println!();
    println!("{}", "Anything else is treated as filter JSON and applied:".bold());
    println!();
    println!(
        "  {}",
        r#"[{"field":"country","relation":"=","value":"US"}]"#.italic().white()
    );
    println!(
        "  {}",
        r#".add Tag Key=plan Relation="is greater than" Value=10"#.italic().white()
    );
    println!();
}
