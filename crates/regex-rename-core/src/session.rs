use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, error, info, warn};

use crate::host::{NamedItem, RenameHost};
use crate::matcher::NameMatcher;
use crate::RenameError;

pub const DEFAULT_UNDO_LABEL: &str = "Changed name";

/// How every item of a session is renamed, decided from the first item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Transactional,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Applied,
    Undone,
}

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub dry_run: bool,
    pub undo_label: String,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            undo_label: DEFAULT_UNDO_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub index: usize,
    pub name: String,
    pub target: String,
    pub message: String,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' -> '{}': {}", self.name, self.target, self.message)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Items whose name differs from the one they held before Apply.
    pub changed: usize,
    pub failures: Vec<ItemFailure>,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UndoReport {
    pub restored: usize,
    pub failures: Vec<ItemFailure>,
}

impl UndoReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Problems visible in the preview before anything is renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    Duplicate { name: String, indices: Vec<usize> },
    Empty { index: usize },
    /// The target is still held by another selected item when this rename runs.
    Occupied { index: usize, name: String, holder: usize },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::Duplicate { name, indices } => {
                write!(f, "{} items would be named '{}'", indices.len(), name)
            }
            Conflict::Empty { index } => write!(f, "item {} would get an empty name", index + 1),
            Conflict::Occupied { index, name, holder } => write!(
                f,
                "item {} would be renamed to '{}', still held by item {}",
                index + 1,
                name,
                holder + 1
            ),
        }
    }
}

/// One open rename workflow over a fixed list of items.
pub struct Session<I> {
    items: Vec<I>,
    original_names: Vec<String>,
    pattern: String,
    replacement: String,
    matcher: NameMatcher,
    mode: Mode,
    state: SessionState,
}

impl<I: NamedItem> Session<I> {
    pub fn open<H>(host: &H, items: Vec<I>) -> Result<Self, RenameError>
    where
        H: RenameHost<Item = I>,
    {
        if items.len() < 2 {
            return Err(RenameError::InvalidSelection { count: items.len() });
        }

        let original_names: Vec<String> = items.iter().map(|i| i.name().to_string()).collect();
        let mode = if host.is_transactional(&items[0]) {
            Mode::Transactional
        } else {
            Mode::Direct
        };

        info!("Opened rename session: {} items, {:?} mode", items.len(), mode);

        Ok(Self {
            items,
            original_names,
            pattern: String::new(),
            replacement: String::new(),
            matcher: NameMatcher::new(),
            mode,
            state: SessionState::Editing,
        })
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn into_items(self) -> Vec<I> {
        self.items
    }

    pub fn original_names(&self) -> &[String] {
        &self.original_names
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Direct items can only be reverted through the host's own undo history.
    pub fn undo_is_host_managed(&self) -> bool {
        self.mode == Mode::Direct
    }

    /// Updates the pattern. A compile error leaves the session editable but
    /// not enabled; the error is returned and also kept for [`Self::pattern_error`].
    pub fn set_pattern(&mut self, pattern: &str) -> Result<(), RenameError> {
        self.pattern = pattern.to_string();
        self.matcher.update(pattern);

        match self.matcher.error() {
            Some(e) => Err(RenameError::Pattern {
                pattern: pattern.to_string(),
                source: e.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn pattern_error(&self) -> Option<&regex::Error> {
        self.matcher.error()
    }

    pub fn set_replacement(&mut self, replacement: &str) {
        self.replacement = replacement.to_string();
    }

    pub fn enabled(&self) -> bool {
        self.matcher.is_valid() && !self.replacement.is_empty()
    }

    pub fn preview(&self, item: &I) -> String {
        self.preview_name(item.name())
    }

    pub fn preview_name(&self, name: &str) -> String {
        if self.replacement.is_empty() {
            return name.to_string();
        }
        self.matcher
            .replace(name, &self.replacement)
            .unwrap_or_else(|| name.to_string())
    }

    /// Proposed names for every item, in input order.
    pub fn previews(&self) -> Vec<String> {
        self.items.iter().map(|item| self.preview(item)).collect()
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        if !self.enabled() {
            return Vec::new();
        }
        find_conflicts(&self.current_names(), &self.previews())
    }

    fn current_names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.name().to_string()).collect()
    }

    pub fn apply<H>(
        &mut self,
        host: &mut H,
        options: &ApplyOptions,
    ) -> Result<ApplyReport, RenameError>
    where
        H: RenameHost<Item = I>,
    {
        if self.state == SessionState::Undone {
            return Err(RenameError::SessionUndone);
        }
        if !self.enabled() {
            return Err(RenameError::NotEnabled);
        }

        let targets = self.previews();
        for conflict in find_conflicts(&self.current_names(), &targets) {
            warn!("Rename conflict: {}", conflict);
        }

        let mut report = ApplyReport::default();

        if options.dry_run {
            report.changed = self
                .items
                .iter()
                .zip(&targets)
                .filter(|(item, target)| item.name() != target.as_str())
                .count();
            info!("Dry run: {} of {} items would be renamed", report.changed, self.items.len());
            return Ok(report);
        }

        let mode = self.mode;
        info!("Applying rename to {} items", self.items.len());

        for (index, (item, target)) in self.items.iter_mut().zip(targets).enumerate() {
            let before = item.name().to_string();
            let result = match mode {
                Mode::Transactional => host.rename_transactional(item, &target),
                Mode::Direct => {
                    host.register_undo(item, &options.undo_label);
                    host.rename_direct(item, &target)
                }
            };

            match result {
                Ok(()) => {
                    if before != target {
                        debug!("Renamed: '{}' -> '{}'", before, target);
                        report.changed += 1;
                    }
                }
                Err(message) => {
                    error!("Failed to rename '{}' -> '{}': {}", before, target, message);
                    report.failures.push(ItemFailure {
                        index,
                        name: before,
                        target,
                        message,
                    });
                }
            }
        }

        if mode == Mode::Transactional {
            host.persist_and_refresh();
        }
        self.state = SessionState::Applied;

        info!(
            "Rename complete: {} renamed, {} failed",
            report.changed,
            report.failures.len()
        );

        Ok(report)
    }

    /// Restores every item to the name it had when the session was opened.
    ///
    /// Restores run in input order. One may be blocked by a name that a later
    /// item still holds, so failed restores are retried until a pass makes no
    /// progress. Only what is still failing after that is reported.
    pub fn undo<H>(&mut self, host: &mut H) -> Result<UndoReport, RenameError>
    where
        H: RenameHost<Item = I>,
    {
        if self.mode != Mode::Transactional {
            return Err(RenameError::UndoUnavailable);
        }

        info!("Restoring original names of {} items", self.items.len());

        let mut report = UndoReport::default();
        let mut pending: Vec<usize> = (0..self.items.len()).collect();

        loop {
            let mut failures = Vec::new();

            for &index in &pending {
                let item = &mut self.items[index];
                let original = &self.original_names[index];
                let before = item.name().to_string();

                match host.rename_transactional(item, original) {
                    Ok(()) => {
                        if before != *original {
                            debug!("Restored: '{}' -> '{}'", before, original);
                            report.restored += 1;
                        }
                    }
                    Err(message) => failures.push(ItemFailure {
                        index,
                        name: before,
                        target: original.clone(),
                        message,
                    }),
                }
            }

            if failures.is_empty() || failures.len() == pending.len() {
                report.failures = failures;
                break;
            }

            debug!("Retrying {} blocked restores", failures.len());
            pending = failures.iter().map(|f| f.index).collect();
        }

        for failure in &report.failures {
            error!(
                "Failed to restore '{}' -> '{}': {}",
                failure.name, failure.target, failure.message
            );
        }

        host.persist_and_refresh();
        self.state = SessionState::Undone;

        info!(
            "Undo complete: {} restored, {} failed",
            report.restored,
            report.failures.len()
        );

        Ok(report)
    }
}

/// Checks targets against each other and against the names the items hold
/// before a batch runs in input order.
fn find_conflicts(current: &[String], targets: &[String]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut by_name: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

    for (index, target) in targets.iter().enumerate() {
        if target.is_empty() {
            conflicts.push(Conflict::Empty { index });
            continue;
        }
        by_name.entry(target.as_str()).or_default().push(index);

        if *target == current[index] {
            continue;
        }

        // An earlier item that moved away has already freed its old name.
        let holder = (0..current.len()).find(|&other| {
            other != index
                && current[other] == *target
                && (other > index || targets[other] == current[other])
        });
        if let Some(holder) = holder {
            conflicts.push(Conflict::Occupied {
                index,
                name: target.clone(),
                holder,
            });
        }
    }

    conflicts.extend(
        by_name
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(name, indices)| Conflict::Duplicate {
                name: name.to_string(),
                indices,
            }),
    );

    conflicts
}
