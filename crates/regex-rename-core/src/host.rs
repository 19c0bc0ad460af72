/// An entity with a user-visible name.
pub trait NamedItem {
    fn name(&self) -> &str;
}

/// Operations the surrounding environment provides to the rename engine.
///
/// Items come in two flavours. Transactional items are renamed through a
/// persisted primitive that may refuse the rename and needs a flush afterwards.
/// Direct items are in-memory names, mutated in place after the host has been
/// told to record an undo step for them.
pub trait RenameHost {
    type Item: NamedItem;

    /// Classifies an item. Only consulted for the first item of a selection.
    fn is_transactional(&self, item: &Self::Item) -> bool;

    /// Renames a transactional item. `Err` carries a human-readable reason and
    /// means the rename was not applied. Renaming to the current name must succeed.
    fn rename_transactional(&mut self, item: &mut Self::Item, new_name: &str)
        -> Result<(), String>;

    /// Called immediately before each direct rename.
    fn register_undo(&mut self, item: &Self::Item, description: &str);

    fn rename_direct(&mut self, item: &mut Self::Item, new_name: &str) -> Result<(), String>;

    /// Flushes whatever backs transactional items. Called once per batch.
    fn persist_and_refresh(&mut self);
}
