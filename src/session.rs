use std::{
    env,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{decoder::DecodedRecord, file::File, index::IndexOptions, ReadRecord, Result};

/// Tracks the data file currently being inspected. Requesting a record from another file drops
/// the index of the previous one.
#[derive(Debug, Default)]
pub struct Session {
    active: Option<File>,
    options: IndexOptions,
}

impl Session {
    pub fn new() -> Session {
        Self::default()
    }

    pub fn with_options(options: IndexOptions) -> Session {
        Self {
            active: None,
            options,
        }
    }

    /// Reads and decodes record `record_number` (1-based) of `path`. Returns `None` if the file
    /// has no such record.
    pub fn get_record<P: AsRef<Path>>(
        &mut self,
        path: P,
        record_number: usize,
    ) -> Result<Option<DecodedRecord>> {
        self.activate(path.as_ref())?.get_record(record_number)
    }

    /// Starts over with an empty index for `path`
    pub fn reset_index<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = absolute(path.as_ref())?;
        debug!(path = %path.display(), "reset line index");
        self.active = Some(File::with_options(path, self.options));
        Ok(())
    }

    /// Path of the file whose index is currently kept
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|file| file.path())
    }

    /// The currently active file
    pub fn active(&self) -> Option<&File> {
        self.active.as_ref()
    }

    fn activate(&mut self, path: &Path) -> Result<&mut File> {
        let path = absolute(path)?;

        let switched = self
            .active
            .as_ref()
            .map_or(false, |file| file.path() != path.as_path());
        if switched {
            debug!(path = %path.display(), "switching data file, dropping line index");
            self.active = None;
        }

        let options = self.options;
        Ok(self
            .active
            .get_or_insert_with(|| File::with_options(path, options)))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, fixture, Indexable};

    #[test]
    fn test_get_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture::write_extract(dir.path(), "extract", &[2, 0, 1, 1, 3]);

        let mut session = Session::new();
        let record = session.get_record(&path, 5).unwrap().unwrap();

        assert_eq!(record.depositors().len(), 3);
        assert!(session.get_record(&path, 999_999).unwrap().is_none());
        assert_eq!(session.active_path(), Some(path.as_path()));
    }

    #[test]
    fn test_switching_files_drops_index() {
        let dir = tempfile::tempdir().unwrap();
        let first = fixture::write_extract(dir.path(), "first", &[1, 1, 1]);
        let second = fixture::write_extract(dir.path(), "second", &[2]);

        let mut session = Session::with_options(IndexOptions::with_stride(1));
        session.get_record(&first, 3).unwrap().unwrap();
        assert_eq!(session.active().unwrap().indexed_records(), 3);

        let record = session.get_record(&second, 1).unwrap().unwrap();
        assert_eq!(record.depositors().len(), 2);
        assert_eq!(session.active().unwrap().indexed_records(), 1);
        assert!(session.get_record(&second, 3).unwrap().is_none());
    }

    #[test]
    fn test_same_file_keeps_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture::write_extract(dir.path(), "extract", &[1, 1, 1]);

        let mut session = Session::new();
        session.get_record(&path, 1).unwrap();
        let before = session.active().unwrap().get_index().clone();

        session.get_record(&path, 2).unwrap();
        assert_eq!(session.active().unwrap().get_index(), &before);
    }

    #[test]
    fn test_reset_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture::write_extract(dir.path(), "extract", &[1, 1]);

        let mut session = Session::new();
        session.get_record(&path, 1).unwrap();
        session.reset_index(&path).unwrap();

        assert!(session.active().unwrap().get_index().is_empty());
        assert_eq!(session.active_path(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();

        let res = session.get_record(dir.path().join("missing"), 1);
        assert!(matches!(res, Err(Error::Io(_))));
    }
}
