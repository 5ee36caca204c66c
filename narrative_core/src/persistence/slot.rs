//! Storage backends for the save slot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::PersistError;

/// A single storage slot holding one serialized record.
pub trait SaveSlot {
    /// Read the slot. `Ok(None)` means nothing is stored.
    fn read(&self) -> Result<Option<String>, PersistError>;

    /// Replace the slot's contents.
    fn write(&mut self, data: &str) -> Result<(), PersistError>;

    /// Empty the slot. Clearing an empty slot is not an error.
    fn clear(&mut self) -> Result<(), PersistError>;
}

/// In-process slot; contents are lost when the session is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    data: Option<String>,
}

impl SaveSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self.data.clone())
    }

    fn write(&mut self, data: &str) -> Result<(), PersistError> {
        self.data = Some(data.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.data = None;
        Ok(())
    }
}

/// File-backed slot.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// the slot holds either the previous record or the new one, never a mix.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SaveSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, data)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slot() {
        let mut slot = MemorySlot::default();
        assert_eq!(slot.read().unwrap(), None);

        slot.write("one").unwrap();
        slot.write("two").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("two"));

        slot.clear().unwrap();
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_file_slot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = FileSlot::new(dir.path().join("saves").join("slot.json"));

        assert_eq!(slot.read().unwrap(), None);

        slot.write(r#"{"a":1}"#).unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert!(!slot.temp_path().exists());

        slot.clear().unwrap();
        assert_eq!(slot.read().unwrap(), None);
        slot.clear().unwrap();
    }

    #[test]
    fn test_file_slot_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as a save.
        let slot = FileSlot::new(dir.path());
        assert!(slot.read().is_err());
    }
}
