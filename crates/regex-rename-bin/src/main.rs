mod cli;
mod diff;

use anyhow::Result;
use cli::{Cli, Commands};
use inquire::{Confirm, Select, Text};
use regex_rename_core::{ApplyOptions, FileItem, FsHost, RenameEngine, RenameError};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const APPLY: &str = "Apply";
const EDIT: &str = "Edit";
const CANCEL: &str = "Cancel";

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting regex-rename");

    match cli.command {
        Commands::Preview { pattern, replacement, paths } => {
            handle_preview_command(pattern, replacement, paths)?;
        }
        Commands::Apply {
            pattern,
            replacement,
            paths,
            dry_run,
            yes,
            offer_undo
        } => {
            handle_apply_command(pattern, replacement, paths, dry_run, yes, offer_undo)?;
        }
        Commands::Edit { paths } => {
            handle_edit_command(paths)?;
        }
    }

    info!("regex-rename completed successfully");
    Ok(())
}

fn open_engine(paths: Vec<PathBuf>, options: ApplyOptions) -> Result<RenameEngine<FsHost>> {
    for path in &paths {
        if !path.exists() {
            anyhow::bail!("Path does not exist: {:?}", path);
        }
    }

    let items = paths
        .iter()
        .map(FileItem::from_path)
        .collect::<Result<Vec<_>, _>>()?;

    let mut engine = RenameEngine::with_options(FsHost::new(), options);
    engine.open(items)?;
    Ok(engine)
}

fn configure(engine: &mut RenameEngine<FsHost>, pattern: &str, replacement: &str) -> Result<()> {
    let session = engine.session_mut().ok_or(RenameError::NoSession)?;
    session.set_pattern(pattern)?;
    session.set_replacement(replacement);
    Ok(())
}

fn handle_preview_command(pattern: String, replacement: String, paths: Vec<PathBuf>) -> Result<()> {
    info!("Preview: '{}' -> '{}'", pattern, replacement);

    let mut engine = open_engine(paths, ApplyOptions::default())?;
    configure(&mut engine, &pattern, &replacement)?;

    let session = engine.session().ok_or(RenameError::NoSession)?;
    diff::show_preview(session);

    Ok(())
}

fn handle_apply_command(
    pattern: String,
    replacement: String,
    paths: Vec<PathBuf>,
    dry_run: bool,
    yes: bool,
    offer_undo: bool,
) -> Result<()> {
    info!("Rename: '{}' -> '{}'", pattern, replacement);
    info!("Items: {}", paths.len());

    if dry_run {
        warn!("Dry run mode - no changes will be made");
    }

    let options = ApplyOptions {
        dry_run,
        ..ApplyOptions::default()
    };
    let mut engine = open_engine(paths, options)?;
    configure(&mut engine, &pattern, &replacement)?;

    let session = engine.session().ok_or(RenameError::NoSession)?;
    diff::show_preview(session);

    if !session.enabled() {
        anyhow::bail!("The replacement must not be empty");
    }

    if !dry_run && !yes {
        let proceed = Confirm::new("Apply these renames?")
            .with_default(true)
            .prompt()?;
        if !proceed {
            println!("Rename cancelled.");
            return Ok(());
        }
    }

    finish(&mut engine, offer_undo && !dry_run)
}

fn handle_edit_command(paths: Vec<PathBuf>) -> Result<()> {
    let mut engine = open_engine(paths, ApplyOptions::default())?;

    loop {
        let session = engine.session_mut().ok_or(RenameError::NoSession)?;

        let pattern = Text::new("Pattern (optional)")
            .with_initial_value(session.pattern())
            .prompt()?;
        if let Err(e) = session.set_pattern(&pattern) {
            warn!("{}", e);
        }

        let replacement = Text::new("Replacement")
            .with_initial_value(session.replacement())
            .prompt()?;
        session.set_replacement(&replacement);

        diff::show_preview(session);

        let mut choices = vec![EDIT, CANCEL];
        if session.enabled() {
            choices.insert(0, APPLY);
        }

        match Select::new("What next?", choices).prompt()? {
            APPLY => break,
            EDIT => continue,
            _ => {
                engine.close();
                println!("Rename cancelled.");
                return Ok(());
            }
        }
    }

    finish(&mut engine, true)
}

fn finish(engine: &mut RenameEngine<FsHost>, offer_undo: bool) -> Result<()> {
    let dry_run = engine.options().dry_run;
    let report = engine.apply()?;
    diff::show_apply_report(&report, dry_run);

    let mut failed = report.failures.len();

    if offer_undo && report.changed > 0 {
        let undo = Confirm::new("Undo these renames?")
            .with_default(false)
            .prompt()?;
        if undo {
            let undo_report = engine.undo()?;
            diff::show_undo_report(&undo_report);
            failed = undo_report.failures.len();
        }
    }

    engine.close();

    if failed > 0 {
        anyhow::bail!("{} item(s) could not be renamed", failed);
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}
