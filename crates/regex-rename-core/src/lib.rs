pub mod engine;
pub mod fs_host;
pub mod host;
pub mod matcher;
pub mod session;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::RenameEngine;
pub use fs_host::{FileItem, FsHost};
pub use host::{NamedItem, RenameHost};
pub use matcher::{NameMatcher, MATCH_ALL};
pub use session::{
    ApplyOptions, ApplyReport, Conflict, ItemFailure, Mode, Session, SessionState, UndoReport,
    DEFAULT_UNDO_LABEL,
};
pub use trigger::{dispatch_session_key, InputEvent, Key, RenameTrigger, SessionAction};

#[derive(thiserror::Error, Debug)]
pub enum RenameError {
    #[error("Invalid selection: at least 2 items are required, got {count}")]
    InvalidSelection { count: usize },
    #[error("Pattern error in '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Path error: {message}")]
    Path { message: String },
    #[error("Rename is not enabled: needs a valid pattern and a non-empty replacement")]
    NotEnabled,
    #[error("No rename session is open")]
    NoSession,
    #[error("Undo is only available for transactional items")]
    UndoUnavailable,
    #[error("The rename session has already been undone")]
    SessionUndone,
}
