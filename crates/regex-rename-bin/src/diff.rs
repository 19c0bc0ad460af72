use regex_rename_core::{ApplyReport, Conflict, ItemFailure, NamedItem, Session, UndoReport};
use similar::{ChangeTag, TextDiff};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Highlights removed characters in the old name and inserted ones in the new.
pub fn highlight_change(old_name: &str, new_name: &str) -> (String, String) {
    let diff = TextDiff::from_chars(old_name, new_name);
    let mut old_output = String::new();
    let mut new_output = String::new();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => {
                old_output.push_str(&format!("{}{}{}", RED, change.value(), RESET));
            }
            ChangeTag::Insert => {
                new_output.push_str(&format!("{}{}{}", GREEN, change.value(), RESET));
            }
            ChangeTag::Equal => {
                old_output.push_str(change.value());
                new_output.push_str(change.value());
            }
        }
    }

    (old_output, new_output)
}

pub fn show_preview<I: NamedItem>(session: &Session<I>) {
    let previews = session.previews();
    let width = session
        .items()
        .iter()
        .map(|item| item.name().chars().count())
        .max()
        .unwrap_or(0);

    println!("\n🔎 Preview ({} items):", previews.len());

    for (item, proposed) in session.items().iter().zip(&previews) {
        let name = item.name();
        let padding = " ".repeat(width.saturating_sub(name.chars().count()));
        if name == proposed {
            println!("  {}{}  (unchanged)", name, padding);
        } else {
            let (old, new) = highlight_change(name, proposed);
            println!("  {}{}  ->  {}", old, padding, new);
        }
    }

    if let Some(e) = session.pattern_error() {
        println!("\n⚠️  Invalid pattern: {}", e);
    } else if session.replacement().is_empty() {
        println!("\n⚠️  Enter a replacement to enable renaming.");
    }

    show_conflicts(&session.conflicts());
}

pub fn show_conflicts(conflicts: &[Conflict]) {
    for conflict in conflicts {
        println!("  {}⚠ {}{}", RED, conflict, RESET);
    }
}

fn show_failures(failures: &[ItemFailure]) {
    for failure in failures {
        println!("  {}✗ {}{}", RED, failure, RESET);
    }
}

pub fn show_apply_report(report: &ApplyReport, dry_run: bool) {
    if dry_run {
        println!("Dry run complete!");
        println!("  Would rename: {}", report.changed);
    } else {
        println!("Renaming complete!");
        println!("  Renamed: {}", report.changed);
        println!("  Failed: {}", report.failures.len());
    }
    show_failures(&report.failures);
}

pub fn show_undo_report(report: &UndoReport) {
    println!("Undo complete!");
    println!("  Restored: {}", report.restored);
    println!("  Failed: {}", report.failures.len());
    show_failures(&report.failures);
}
