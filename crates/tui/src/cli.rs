use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::{Category, TaskStatus};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskboard",
    version,
    about = "A keyboard-first client for a remote task service.",
    after_help = "Examples:\n  taskboard                 Launch the TUI (same as `taskboard tui`)\n  taskboard list --status pending\n  taskboard add --title \"Buy milk\" --description 2% --category urgent --deadline 2024-01-01T10:00\n  taskboard delete 12 --yes"
)]
pub struct Cli {
    /// Base URL of the task service (defaults to http://localhost:8000/api)
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override the data directory used for logs (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the tracing filter (e.g. "info", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui,
    /// Print tasks, optionally narrowed to one status
    List(ListArgs),
    /// Create a task; fields are checked exactly like the UI form
    Add(AddArgs),
    /// Mark a task as completed
    Done(DoneArgs),
    /// Delete a task (requires --yes)
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only show tasks with this status
    #[arg(long, value_enum)]
    pub status: Option<TaskStatus>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Deadline as YYYY-MM-DDTHH:MM
    #[arg(long, value_name = "DATETIME")]
    pub deadline: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DoneArgs {
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Confirm the deletion; without it nothing is deleted
    #[arg(long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["taskboard"]).expect("parse");
        assert!(cli.command.is_none());
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "list",
            "--status",
            "completed",
            "--api-url",
            "http://tasks.test/api",
        ])
        .expect("parse");

        assert_eq!(cli.api_url.as_deref(), Some("http://tasks.test/api"));
        match cli.command {
            Some(CliCommand::List(args)) => assert_eq!(args.status, Some(TaskStatus::Completed)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn add_parses_category_values() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "add",
            "--title",
            "Buy milk",
            "--category",
            "important",
        ])
        .expect("parse");

        match cli.command {
            Some(CliCommand::Add(args)) => {
                assert_eq!(args.category, Some(Category::Important));
                assert_eq!(args.deadline, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn unknown_categories_are_rejected() {
        assert!(Cli::try_parse_from(["taskboard", "add", "--category", "someday"]).is_err());
    }
}
