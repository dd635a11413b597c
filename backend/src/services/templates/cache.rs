//! Read-through cache for template files.
//!
//! Entries are keyed by path and remember the modification time they were
//! read at; a file whose modification time changed is read again.

use crate::error::Result;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<PathBuf, (SystemTime, String)>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, path: &Path) -> Result<String> {
        let modified = fs::metadata(path)?.modified()?;

        if let Ok(entries) = self.entries.read() {
            if let Some((stamp, content)) = entries.get(path) {
                if *stamp == modified {
                    return Ok(content.clone());
                }
            }
        }

        debug!("Reading template {}", path.display());
        let content = fs::read_to_string(path)?;
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(path.to_path_buf(), (modified, content.clone()));
        }
        Ok(content)
    }

    /// Drops the entry of `path`, or of every file below it for a directory.
    pub fn invalidate(&self, path: &Path) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|cached, _| !cached.starts_with(path));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn changed_files_are_read_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.html");
        fs::write(&path, "<p>one</p>").unwrap();

        let cache = TemplateCache::new();
        assert_eq!(cache.read(&path).unwrap(), "<p>one</p>");
        assert_eq!(cache.len(), 1);

        fs::write(&path, "<p>two</p>").unwrap();
        let later = SystemTime::now() + Duration::from_secs(5);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();
        assert_eq!(cache.read(&path).unwrap(), "<p>two</p>");
    }

    #[test]
    fn invalidation_covers_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("index.html");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "x").unwrap();

        let cache = TemplateCache::new();
        cache.read(&path).unwrap();
        cache.invalidate(&dir.path().join("a"));
        assert!(cache.is_empty());
        assert!(cache.read(&dir.path().join("missing.html")).is_err());
    }
}
