use tracing::debug;

use crate::host::RenameHost;
use crate::session::{ApplyOptions, ApplyReport, Mode, Session, UndoReport};
use crate::RenameError;

/// Owns the host and at most one open [`Session`].
pub struct RenameEngine<H: RenameHost> {
    host: H,
    options: ApplyOptions,
    session: Option<Session<H::Item>>,
}

impl<H: RenameHost> RenameEngine<H> {
    pub fn new(host: H) -> Self {
        Self::with_options(host, ApplyOptions::default())
    }

    pub fn with_options(host: H, options: ApplyOptions) -> Self {
        Self {
            host,
            options,
            session: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn options(&self) -> &ApplyOptions {
        &self.options
    }

    /// Opens a session over `items`, discarding any session already open.
    pub fn open(&mut self, items: Vec<H::Item>) -> Result<&mut Session<H::Item>, RenameError> {
        if self.session.take().is_some() {
            debug!("Discarding previous rename session");
        }
        let session = Session::open(&self.host, items)?;
        Ok(self.session.insert(session))
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session<H::Item>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session<H::Item>> {
        self.session.as_mut()
    }

    /// Applies the open session. A direct-mode session is closed afterwards;
    /// a transactional one stays open so it can be undone.
    pub fn apply(&mut self) -> Result<ApplyReport, RenameError> {
        let session = self.session.as_mut().ok_or(RenameError::NoSession)?;
        let report = session.apply(&mut self.host, &self.options)?;

        if session.mode() == Mode::Direct && !self.options.dry_run {
            self.close();
        }

        Ok(report)
    }

    pub fn undo(&mut self) -> Result<UndoReport, RenameError> {
        let session = self.session.as_mut().ok_or(RenameError::NoSession)?;
        session.undo(&mut self.host)
    }

    pub fn close(&mut self) {
        if self.session.take().is_some() {
            debug!("Closed rename session");
        }
    }

    /// Closes the session and hands its items back to the caller.
    pub fn take_items(&mut self) -> Option<Vec<H::Item>> {
        self.session.take().map(Session::into_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::testing::{assets, objects, RecordingHost};

    #[test]
    fn test_open_replaces_previous_session() {
        let mut engine = RenameEngine::new(RecordingHost::default());

        engine.open(assets(&["a", "b"])).unwrap().set_replacement("x");
        engine.open(assets(&["c", "d", "e"])).unwrap();

        let session = engine.session().unwrap();
        assert_eq!(session.original_names(), ["c", "d", "e"]);
        assert_eq!(session.replacement(), "");
        assert!(engine.host().renames.is_empty());
    }

    #[test]
    fn test_failed_open_leaves_no_session() {
        let mut engine = RenameEngine::new(RecordingHost::default());
        engine.open(assets(&["a", "b"])).unwrap();

        let result = engine.open(assets(&["c"]));

        assert!(matches!(result, Err(RenameError::InvalidSelection { count: 1 })));
        assert!(!engine.is_open());
    }

    #[test]
    fn test_operations_without_session() {
        let mut engine = RenameEngine::new(RecordingHost::default());

        assert!(matches!(engine.apply(), Err(RenameError::NoSession)));
        assert!(matches!(engine.undo(), Err(RenameError::NoSession)));
    }

    #[test]
    fn test_transactional_apply_then_undo() {
        let mut engine = RenameEngine::new(RecordingHost::default());
        let session = engine.open(assets(&["foo_1", "foo_2", "bar_1"])).unwrap();
        session.set_pattern(r"^foo_(\d+)$").unwrap();
        session.set_replacement("baz_$1");

        let report = engine.apply().unwrap();
        assert_eq!(report.changed, 2);
        assert_eq!(engine.session().unwrap().state(), SessionState::Applied);

        let report = engine.undo().unwrap();
        assert_eq!(report.restored, 2);

        let names: Vec<_> = engine
            .take_items()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["foo_1", "foo_2", "bar_1"]);
        assert_eq!(engine.host().refreshes, 2);
        assert!(!engine.is_open());
    }

    #[test]
    fn test_direct_apply_closes_session() {
        let mut engine = RenameEngine::new(RecordingHost::default());
        engine.open(objects(&["a", "b"])).unwrap().set_replacement("c");

        let report = engine.apply().unwrap();

        assert_eq!(report.changed, 2);
        assert!(!engine.is_open());
        assert_eq!(engine.host().undo_registrations.len(), 2);
    }

    #[test]
    fn test_dry_run_keeps_direct_session_open() {
        let options = ApplyOptions {
            dry_run: true,
            ..ApplyOptions::default()
        };
        let mut engine = RenameEngine::with_options(RecordingHost::default(), options);
        engine.open(objects(&["a", "b"])).unwrap().set_replacement("c");

        let report = engine.apply().unwrap();

        assert_eq!(report.changed, 2);
        assert!(engine.is_open());
        assert!(engine.host().renames.is_empty());
    }

    #[test]
    fn test_close_clears_session() {
        let mut engine = RenameEngine::new(RecordingHost::default());
        engine.open(assets(&["a", "b"])).unwrap();

        engine.close();

        assert!(engine.session().is_none());
        assert!(engine.take_items().is_none());
    }
}
