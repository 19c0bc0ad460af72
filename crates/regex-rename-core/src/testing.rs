use std::collections::BTreeSet;

use crate::host::{NamedItem, RenameHost};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub transactional: bool,
}

impl Entity {
    pub fn asset(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transactional: true,
        }
    }

    pub fn object(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transactional: false,
        }
    }
}

impl NamedItem for Entity {
    fn name(&self) -> &str {
        &self.name
    }
}

pub fn assets(names: &[&str]) -> Vec<Entity> {
    names.iter().map(|n| Entity::asset(n)).collect()
}

pub fn objects(names: &[&str]) -> Vec<Entity> {
    names.iter().map(|n| Entity::object(n)).collect()
}

/// Records every call and refuses to rename items whose current name is listed
/// in `fail_on`. When `held` is set, a target already held by another item is
/// refused as well.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub fail_on: Vec<String>,
    pub renames: Vec<(String, String)>,
    pub undo_registrations: Vec<(String, String)>,
    pub refreshes: usize,
    pub held: Option<BTreeSet<String>>,
}

impl RecordingHost {
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            fail_on: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn holding(names: &[&str]) -> Self {
        Self {
            held: Some(names.iter().map(|n| n.to_string()).collect()),
            ..Self::default()
        }
    }

    fn rename(&mut self, item: &mut Entity, new_name: &str) -> Result<(), String> {
        self.renames.push((item.name.clone(), new_name.to_string()));
        if self.fail_on.contains(&item.name) {
            return Err(format!("'{}' is locked", item.name));
        }
        if let Some(held) = &mut self.held {
            if item.name != new_name {
                if held.contains(new_name) {
                    return Err(format!("'{}' already exists", new_name));
                }
                held.remove(&item.name);
                held.insert(new_name.to_string());
            }
        }
        item.name = new_name.to_string();
        Ok(())
    }
}

impl RenameHost for RecordingHost {
    type Item = Entity;

    fn is_transactional(&self, item: &Entity) -> bool {
        item.transactional
    }

    fn rename_transactional(&mut self, item: &mut Entity, new_name: &str) -> Result<(), String> {
        self.rename(item, new_name)
    }

    fn register_undo(&mut self, item: &Entity, description: &str) {
        self.undo_registrations
            .push((item.name.clone(), description.to_string()));
    }

    fn rename_direct(&mut self, item: &mut Entity, new_name: &str) -> Result<(), String> {
        self.rename(item, new_name)
    }

    fn persist_and_refresh(&mut self) {
        self.refreshes += 1;
    }
}
