use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "regex-rename")]
#[command(version)]
#[command(about = "Batch rename files with a regular expression")]
#[command(
    long_about = "A CLI tool that renames several files or directories at once by applying \
                  a regular expression search/replace to their names, with a preview of \
                  every change and an optional undo."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show how each name would change")]
    Preview {
        #[arg(
            short,
            long,
            default_value = "",
            help = "Pattern to search for (empty replaces the whole name)"
        )]
        pattern: String,

        #[arg(help = "Replacement text; $1 or ${name} refer to capture groups")]
        replacement: String,

        #[arg(required = true, num_args = 2.., help = "Files or directories to rename")]
        paths: Vec<PathBuf>,
    },

    #[command(about = "Rename the given files or directories")]
    Apply {
        #[arg(
            short,
            long,
            default_value = "",
            help = "Pattern to search for (empty replaces the whole name)"
        )]
        pattern: String,

        #[arg(help = "Replacement text; $1 or ${name} refer to capture groups")]
        replacement: String,

        #[arg(required = true, num_args = 2.., help = "Files or directories to rename")]
        paths: Vec<PathBuf>,

        #[arg(long, help = "Perform a dry run without making changes")]
        dry_run: bool,

        #[arg(short, long, help = "Do not ask for confirmation before renaming")]
        yes: bool,

        #[arg(long, help = "Offer to undo the renames once they are applied")]
        offer_undo: bool,
    },

    #[command(about = "Edit pattern and replacement interactively with a live preview")]
    Edit {
        #[arg(required = true, num_args = 2.., help = "Files or directories to rename")]
        paths: Vec<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_preview_command() {
        let args = vec![
            "regex-rename",
            "preview",
            "--pattern",
            r"^foo_(\d+)$",
            "baz_$1",
            "foo_1",
            "foo_2",
        ];

        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Preview { pattern, replacement, paths } => {
                assert_eq!(pattern, r"^foo_(\d+)$");
                assert_eq!(replacement, "baz_$1");
                assert_eq!(paths, vec![PathBuf::from("foo_1"), PathBuf::from("foo_2")]);
            }
            _ => panic!("Expected Preview command"),
        }
    }

    #[test]
    fn test_apply_command_defaults() {
        let args = vec!["regex-rename", "apply", "X", "a.txt", "b.txt", "--dry-run"];

        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Apply { pattern, replacement, dry_run, yes, offer_undo, .. } => {
                assert_eq!(pattern, "");
                assert_eq!(replacement, "X");
                assert!(dry_run);
                assert!(!yes);
                assert!(!offer_undo);
            }
            _ => panic!("Expected Apply command"),
        }
    }

    #[test]
    fn test_single_path_is_rejected() {
        let args = vec!["regex-rename", "apply", "X", "a.txt"];

        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_edit_command() {
        let args = vec!["regex-rename", "-v", "edit", "a", "b", "c"];

        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Edit { paths } => assert_eq!(paths.len(), 3),
            _ => panic!("Expected Edit command"),
        }
    }
}
