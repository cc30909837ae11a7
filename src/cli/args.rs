//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--project <name>`: Run in a registered project's directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// devbot - commit and push, or queue the commit until the network is back
#[derive(Parser, Debug)]
#[command(name = "devbot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if devbot was started in this directory
    #[arg(long, global = true, conflicts_with = "project")]
    pub cwd: Option<PathBuf>,

    /// Run in the directory of this registered project
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Commit files and push, or queue the commit while offline
    #[command(
        name = "commit",
        long_about = "Commit files and push them, or queue the commit while offline.\n\n\
            Before committing, any commits queued by earlier runs are replayed in \
            order. If the remote is unreachable the new commit is queued and nothing \
            is changed in the repository. If the push fails after a local commit, \
            the commit is queued for a later push.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Commit two files
    devbot commit -m \"Fix parser\" src/parser.rs tests/parser.rs

    # Commit in a registered project from anywhere
    devbot --project api commit -m \"Bump version\" Cargo.toml"
    )]
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,

        /// Files to stage, relative to the working directory
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Replay queued commits to the remote
    #[command(
        name = "drain",
        long_about = "Replay queued commits to the remote, oldest first.\n\n\
            Each commit leaves the queue only after its push succeeds. The first \
            failure stops the replay and leaves that commit and everything after \
            it queued."
    )]
    Drain,

    /// Show uncommitted, unpushed and queued work
    Status,

    /// List queued commits
    Queue,

    /// Work-hours notice, replay, queue listing and status in one go
    #[command(
        name = "check",
        after_help = "\
WORKFLOW EXAMPLES:
    # Start-of-day check for the default project
    devbot check"
    )]
    Check,

    /// List registered projects
    Projects,

    /// Create a git repository in the target directory
    Init {
        /// Remote to push to (stored in the repository's devbot config)
        #[arg(long)]
        remote: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for devbot commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    devbot completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    devbot completion zsh >> ~/.zshrc

    # Fish
    devbot completion fish > ~/.config/fish/completions/devbot.fish

    # PowerShell
    devbot completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn commit_requires_files() {
        assert!(Cli::try_parse_from(["devbot", "commit", "-m", "msg"]).is_err());

        let cli = Cli::try_parse_from(["devbot", "commit", "-m", "msg", "a.py", "b.py"]).unwrap();
        match cli.command {
            Command::Commit { message, files } => {
                assert_eq!(message, "msg");
                assert_eq!(files.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["devbot", "status", "--project", "api", "-q"]).unwrap();
        assert_eq!(cli.project.as_deref(), Some("api"));
        assert!(cli.quiet);
    }

    #[test]
    fn cwd_conflicts_with_project() {
        assert!(Cli::try_parse_from(["devbot", "--cwd", "/tmp", "--project", "x", "status"]).is_err());
    }
}
