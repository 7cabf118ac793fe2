use std::{
    fs,
    io::{prelude::*, BufReader, SeekFrom},
    path::{Path, PathBuf},
};

use tracing::trace;

use crate::{
    index::{Index, IndexOptions},
    Indexable, ReadRecord, Result,
};

/// A data file on disk together with its index. No file handle is kept open: every scan and
/// every read opens the file and closes it again before returning.
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    index: Index,
    options: IndexOptions,
}

impl File {
    /// Creates a reader for `path` with an empty index. The file is not touched until the first
    /// record is requested.
    pub fn new<P: AsRef<Path>>(path: P) -> File {
        Self::with_options(path, IndexOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(path: P, options: IndexOptions) -> File {
        Self {
            path: path.as_ref().to_path_buf(),
            index: Index::new(),
            options,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes sure the index contains `through` records, or all records if the file has fewer.
    pub fn ensure_coverage(&mut self, through: usize) -> Result<()> {
        if !self.index.needs_scan(through) {
            return Ok(());
        }

        let mut reader = self.open()?;
        self.index
            .ensure_coverage(&mut reader, through, &self.options)
    }

    /// Returns the offset of `record_number` if it's already indexed
    #[inline]
    pub fn offset_of(&self, record_number: usize) -> Option<u64> {
        self.index.offset_of(record_number)
    }

    /// Drops the index, eg. after the file was replaced
    pub fn reset_index(&mut self) {
        self.index.clear();
    }

    fn open(&self) -> Result<BufReader<fs::File>> {
        Ok(BufReader::new(fs::File::open(&self.path)?))
    }
}

impl Indexable for File {
    #[inline]
    fn get_index(&self) -> &Index {
        &self.index
    }
}

impl ReadRecord for File {
    #[inline]
    fn extend_index(&mut self, through: usize) -> Result<()> {
        self.ensure_coverage(through)
    }

    fn read_at(&mut self, offset: u64, buf: &mut Vec<u8>) -> Result<usize> {
        let mut reader = self.open()?;
        reader.seek(SeekFrom::Start(offset))?;
        let n = reader.read_until(b'\n', buf)?;
        trace!(path = %self.path.display(), offset, len = n, "read record");
        Ok(n)
    }
}
