//! Maps host input onto the rename engine: a key press over a multi-item
//! selection opens a session, and keys inside the session apply or close it.

use tracing::debug;

use crate::engine::RenameEngine;
use crate::host::RenameHost;
use crate::session::ApplyReport;
use crate::RenameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    F2,
    Enter,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Applied(ApplyReport),
    Closed,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct RenameTrigger {
    key: Key,
    reject_mixed: bool,
}

impl RenameTrigger {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            reject_mixed: false,
        }
    }

    /// Ignore selections that mix transactional and direct items.
    pub fn reject_mixed(mut self, reject: bool) -> Self {
        self.reject_mixed = reject;
        self
    }

    pub fn matches(&self, event: &InputEvent, selection_len: usize) -> bool {
        selection_len > 1 && *event == InputEvent::KeyDown(self.key)
    }

    /// Opens a session over `selection` when `event` is the trigger key.
    /// Returns whether the event was consumed.
    pub fn handle<H>(
        &self,
        engine: &mut RenameEngine<H>,
        event: &InputEvent,
        selection: &[H::Item],
    ) -> Result<bool, RenameError>
    where
        H: RenameHost,
        H::Item: Clone,
    {
        if !self.matches(event, selection.len()) {
            return Ok(false);
        }

        if self.reject_mixed {
            let host = engine.host();
            let transactional = selection.iter().filter(|i| host.is_transactional(i)).count();
            if transactional != 0 && transactional != selection.len() {
                debug!(
                    "Ignoring mixed selection: {} transactional, {} direct",
                    transactional,
                    selection.len() - transactional
                );
                return Ok(false);
            }
        }

        engine.open(selection.to_vec())?;
        Ok(true)
    }
}

impl Default for RenameTrigger {
    fn default() -> Self {
        Self::new(Key::F2)
    }
}

/// Enter applies when the session is enabled, Escape closes it.
pub fn dispatch_session_key<H: RenameHost>(
    engine: &mut RenameEngine<H>,
    key: Key,
) -> Result<SessionAction, RenameError> {
    let enabled = engine.session().ok_or(RenameError::NoSession)?.enabled();

    match key {
        Key::Enter if enabled => Ok(SessionAction::Applied(engine.apply()?)),
        Key::Escape => {
            engine.close();
            Ok(SessionAction::Closed)
        }
        _ => Ok(SessionAction::Ignored),
    }
}
