use std::io::{prelude::*, Cursor, SeekFrom};

use crate::{
    index::{Index, IndexOptions},
    Indexable, ReadRecord, Result,
};

/// Reads records of a data file which is already held in memory
#[derive(Debug, Clone)]
pub struct IndexedString<'a> {
    data: &'a str,
    index: Index,
    options: IndexOptions,
}

impl<'a> IndexedString<'a> {
    /// Create a new `IndexedString` with an empty index. The index is built on demand.
    pub fn new(s: &'a str) -> IndexedString<'a> {
        Self::with_options(s, IndexOptions::default())
    }

    pub fn with_options(s: &'a str, options: IndexOptions) -> IndexedString<'a> {
        Self {
            data: s,
            index: Index::new(),
            options,
        }
    }

    #[inline]
    fn reader(&self) -> Cursor<&'a [u8]> {
        Cursor::new(self.data.as_bytes())
    }
}

impl<'a> Indexable for IndexedString<'a> {
    #[inline]
    fn get_index(&self) -> &Index {
        &self.index
    }
}

impl<'a> ReadRecord for IndexedString<'a> {
    fn extend_index(&mut self, through: usize) -> Result<()> {
        let mut reader = self.reader();
        self.index
            .ensure_coverage(&mut reader, through, &self.options)
    }

    fn read_at(&mut self, offset: u64, buf: &mut Vec<u8>) -> Result<usize> {
        let mut reader = self.reader();
        reader.seek(SeekFrom::Start(offset))?;
        Ok(reader.read_until(b'\n', buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn test_no_new_line() {
        let text = format!("{}\n{}", fixture::HEADER_LINE, fixture::record(1, 2));
        let mut indexed = IndexedString::new(&text);

        assert_eq!(indexed.read_line(1).unwrap(), Some(fixture::record(1, 2)));
        assert_eq!(
            indexed.get_record(1).unwrap().unwrap().depositors().len(),
            2
        );
        assert!(indexed.get_record(2).unwrap().is_none());
    }

    #[test]
    fn test_crlf() {
        let text = format!(
            "{}\r\n{}\r\n{}\r\n",
            fixture::HEADER_LINE,
            fixture::record(1, 1),
            fixture::record(2, 0)
        );
        let mut indexed = IndexedString::new(&text);

        assert_eq!(indexed.read_line(2).unwrap(), Some(fixture::record(2, 0)));
        let record = indexed.get_record(1).unwrap().unwrap();
        assert_eq!(record.depositors().len(), 1);
        assert!(!record.depositors()[0]
            .fields()
            .any(|(_, v)| v.contains('\r')));
    }

    #[test]
    fn test_clone_keeps_index() {
        let text = fixture::extract(&[1, 1, 1]);
        let mut indexed = IndexedString::new(&text);
        indexed.locate(3).unwrap();

        let cloned = indexed.clone();
        assert_eq!(cloned.get_index(), indexed.get_index());
    }
}
