//! Terminal implementation of the core's rendering surface.

use colored::Colorize;
use filterboard_core::{ConditionId, Diagnostic, GroupId, RenderSurface};

/// Prints group/node updates as they happen; the REPL owns everything else.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    quiet: bool,
}

impl TerminalSurface {
    /// A surface that narrates tree changes.
    #[must_use]
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// A surface that stays silent (one-shot --apply mode).
    #[must_use]
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl RenderSurface for TerminalSurface {
    fn group_added(&mut self, group: GroupId, index: usize) {
        if !self.quiet {
            println!(
                "{} {} ({})",
                "Condition".bold(),
                (index + 1).to_string().bold(),
                group.to_string().dimmed()
            );
        }
    }

    fn group_removed(&mut self, group: GroupId) {
        if !self.quiet {
            println!("Removed group {}", group.to_string().yellow());
        }
    }

    fn condition_added(&mut self, group: GroupId, condition: ConditionId, summary: &str) {
        if !self.quiet {
            println!(
                "  {} {} {} {}",
                "+".green(),
                summary.green(),
                format!("[{condition}]").dimmed(),
                format!("in {group}").dimmed()
            );
        }
    }

    fn condition_removed(&mut self, _group: GroupId, condition: ConditionId) {
        if !self.quiet {
            println!("  {} removed {}", "-".red(), condition.to_string().yellow());
        }
    }

    fn conflicts_changed(&mut self, _group: GroupId, conflicted: &[ConditionId]) {
        if !self.quiet && !conflicted.is_empty() {
            let nodes: Vec<String> = conflicted.iter().map(ToString::to_string).collect();
            println!(
                "  {} {}: {}",
                "!".yellow().bold(),
                "overridden by 'is' in this group".yellow(),
                nodes.join(", ")
            );
        }
    }

    fn diagnostic_shown(&mut self, diagnostic: &Diagnostic) {
        if !self.quiet {
            println!(
                "{} {}",
                "Invalid JSON:".red().bold(),
                diagnostic.to_string().red()
            );
        }
    }

    fn copy_text(&mut self, text: &str) {
        // No clipboard in a plain terminal; print so the user can copy.
        println!("{text}");
    }
}
