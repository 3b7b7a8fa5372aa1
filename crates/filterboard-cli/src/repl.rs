//! Interactive REPL loop.
//!
//! Dot-commands drive the builder; any other line is treated as filter JSON
//! and applied, exactly like pasting into the builder's textarea.

use colored::Colorize;
use filterboard_core::FilterBuilder;
use instant::Instant;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::repl_commands::{handle_command, print_diagnostic_context, CommandResult};
use crate::surface::TerminalSurface;

/// Session-local REPL settings.
#[derive(Debug, Default)]
pub struct ReplConfig {
    /// Print elapsed time after each apply.
    pub timing: bool,
}

/// Runs the REPL until quit/EOF.
pub fn run(mut builder: FilterBuilder<TerminalSurface>) -> anyhow::Result<()> {
    println!(
        "{} v{} - type {} for help",
        "Filterboard".bold(),
        env!("CARGO_PKG_VERSION"),
        ".help".yellow()
    );
    println!();

    let mut rl = DefaultEditor::new()?;
    let mut config = ReplConfig::default();

    loop {
        match rl.readline("filterboard> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if line.starts_with('.') || line.starts_with('\\') {
                    match handle_command(&mut builder, line, &mut config) {
                        CommandResult::Continue => {}
                        CommandResult::Quit => break,
                        CommandResult::Error(msg) => {
                            println!("{} {msg}\n", "Error:".red().bold());
                        }
                    }
                } else {
                    apply_json(&mut builder, line, &config);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn apply_json(builder: &mut FilterBuilder<TerminalSurface>, raw: &str, config: &ReplConfig) {
    let start = Instant::now();
    match builder.apply_text(raw) {
        Ok(()) => {
            let groups = builder.tree().groups().len();
            let conditions = builder.tree().condition_count();
            println!(
                "Applied: {} group(s), {} condition(s)",
                groups.to_string().green(),
                conditions.to_string().green()
            );
            if config.timing {
                println!("({:.2} ms)", start.elapsed().as_secs_f64() * 1000.0);
            }
            println!();
        }
        Err(_) => {
            print_diagnostic_context(builder, raw);
            println!();
        }
    }
}
