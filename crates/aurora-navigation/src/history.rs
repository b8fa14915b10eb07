//! Visit history
//!
//! An append-only list of visited URLs. Loaded once at startup, written back
//! once at shutdown as a JSON array of strings. There is no cap.

use std::path::Path;

use aurora_storage::JsonFile;

use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<String>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load history from `path`, starting empty if the file is missing or
    /// cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load(path.as_ref()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "Ignoring unreadable history file"
                );
                Self::new()
            }
        }
    }

    /// Like [`HistoryStore::load`] but reports read and parse failures.
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let entries: Vec<String> = JsonFile::new(path.as_ref())
            .read()
            .map_err(NavigationError::PersistenceRead)?
            .unwrap_or_default();

        tracing::info!(
            path = %path.as_ref().display(),
            entries = entries.len(),
            "Loaded history"
        );

        Ok(Self { entries })
    }

    pub fn append(&mut self, url: impl Into<String>) {
        self.entries.push(url.into());
    }

    /// Overwrite `path` with the full history.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        JsonFile::new(path.as_ref())
            .write(&self.entries)
            .map_err(NavigationError::PersistenceWrite)?;

        tracing::info!(
            path = %path.as_ref().display(),
            entries = self.entries.len(),
            "Saved history"
        );

        Ok(())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = HistoryStore::new();
        history.append("https://b.com");
        history.append("https://a.com");
        history.append("https://b.com");
        history.save(&path).unwrap();

        let loaded = HistoryStore::load(&path);
        assert_eq!(
            loaded.entries(),
            &["https://b.com", "https://a.com", "https://b.com"]
        );
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryStore::try_load(dir.path().join("none.json")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_malformed_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"{"urls": 3}"#).unwrap();

        assert!(matches!(
            HistoryStore::try_load(&path),
            Err(NavigationError::PersistenceRead(_))
        ));
        assert!(HistoryStore::load(&path).is_empty());
    }

    #[test]
    fn test_save_to_unwritable_path_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("history.json");
        std::fs::create_dir(&path).unwrap();

        let mut history = HistoryStore::new();
        history.append("https://a.com");

        assert!(matches!(
            history.save(&path),
            Err(NavigationError::PersistenceWrite(_))
        ));
        assert_eq!(history.entries(), &["https://a.com"]);
    }
}
