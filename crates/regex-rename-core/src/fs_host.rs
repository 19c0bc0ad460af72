use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::host::{NamedItem, RenameHost};
use crate::RenameError;

/// A file or directory, named by its final path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    path: PathBuf,
    name: String,
}

impl FileItem {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RenameError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RenameError::Path {
                message: format!("{:?} has no UTF-8 file name", path),
            })?;

        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl NamedItem for FileItem {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Renames entries in place on the local file system. Every entry is
/// transactional: a rename either happens or reports why it did not.
#[derive(Debug, Default)]
pub struct FsHost {
    touched: BTreeSet<PathBuf>,
}

impl FsHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenameHost for FsHost {
    type Item = FileItem;

    fn is_transactional(&self, _item: &FileItem) -> bool {
        true
    }

    fn rename_transactional(&mut self, item: &mut FileItem, new_name: &str) -> Result<(), String> {
        if new_name == item.name {
            return Ok(());
        }
        validate_name(new_name)?;

        let parent = item.parent();
        let target = parent.join(new_name);

        // Case-only renames see the source itself on case-insensitive file systems.
        if target.exists()
            && !(new_name.eq_ignore_ascii_case(&item.name) && same_file(&item.path, &target))
        {
            return Err(format!(
                "Cannot rename {:?} to '{}': destination already exists",
                item.path, new_name
            ));
        }

        fs::rename(&item.path, &target)
            .map_err(|e| format!("Cannot rename {:?} to '{}': {}", item.path, new_name, e))?;

        info!("Renamed: {:?} -> {:?}", item.path, target);
        self.touched.insert(parent);
        item.path = target;
        item.name = new_name.to_string();
        Ok(())
    }

    fn register_undo(&mut self, item: &FileItem, description: &str) {
        debug!("No undo history for {:?} ({})", item.path, description);
    }

    fn rename_direct(&mut self, item: &mut FileItem, _new_name: &str) -> Result<(), String> {
        Err(format!("{:?} can only be renamed on disk", item.path))
    }

    fn persist_and_refresh(&mut self) {
        for dir in std::mem::take(&mut self.touched) {
            match sync_dir(&dir) {
                Ok(()) => debug!("Synced directory: {:?}", dir),
                Err(e) => warn!("Failed to sync directory {:?}: {}", dir, e),
            }
        }
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("New name is empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("'{}' is a reserved name", name));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(format!("'{}' contains a path separator or NUL byte", name));
    }
    Ok(())
}

#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
