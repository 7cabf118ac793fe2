//! Random access to records of large fixed-width deposit protection scheme data files, using an
//! incrementally built line index

/// Fixed-width record decoding
pub mod decoder;
pub mod error;
/// Record reader backed by a file on disk
pub mod file;
/// The index of data files
pub mod index;
/// Field layout of the data files
pub mod schema;
/// Keeps the index of the currently inspected file
pub mod session;
/// An indexed string reader
pub mod string;

#[cfg(test)]
mod fixture;

pub use decoder::{decode, DecodedRecord, Decoder, SubRecord};
pub use file::File;
pub use index::{Index, IndexOptions};
pub use session::Session;
pub use string::IndexedString;

pub type Result<T> = std::result::Result<T, error::Error>;

pub trait Indexable {
    /// Returns a reference to the files index.
    fn get_index(&self) -> &Index;

    /// Returns the amount of records indexed so far, excluding the header row.
    #[inline]
    fn indexed_records(&self) -> usize {
        self.get_index().len()
    }
}

/// A trait defining behavior for reading records by their 1-based number.
pub trait ReadRecord: Indexable {
    /// Should extend the index until it holds `through` records or covers the entire data.
    fn extend_index(&mut self, through: usize) -> Result<()>;

    /// Should read the line starting at `offset` into `buf`, including its line terminator.
    fn read_at(&mut self, offset: u64, buf: &mut Vec<u8>) -> Result<usize>;

    /// Decoder used by `get_record`
    #[inline]
    fn decoder(&self) -> Decoder {
        Decoder::default()
    }

    /// Returns the offset of `record_number`, scanning further if it isn't indexed yet. Returns
    /// `None` if there is no such record.
    fn locate(&mut self, record_number: usize) -> Result<Option<u64>> {
        if record_number == 0 {
            return Ok(None);
        }

        if self.get_index().needs_scan(record_number) {
            self.extend_index(record_number)?;
        }

        Ok(self.get_index().offset_of(record_number))
    }

    /// Reads the given record into `buf`, including the line terminator
    fn read_line_raw(&mut self, record_number: usize, buf: &mut Vec<u8>) -> Result<Option<usize>> {
        match self.locate(record_number)? {
            Some(offset) => Ok(Some(self.read_at(offset, buf)?)),
            None => Ok(None),
        }
    }

    /// Reads the given record, omitting the line terminator
    fn read_line(&mut self, record_number: usize) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.read_line_raw(record_number, &mut buf)?.is_none() {
            return Ok(None);
        }

        let line = decoder::strip_terminator(&buf);
        Ok(Some(String::from_utf8_lossy(line).into_owned()))
    }

    /// Reads and decodes the given record. Returns `None` only if the record doesn't exist, a
    /// blank line decodes to an empty record.
    fn get_record(&mut self, record_number: usize) -> Result<Option<DecodedRecord>> {
        let mut buf = Vec::new();
        if self.read_line_raw(record_number, &mut buf)?.is_none() {
            return Ok(None);
        }

        let decoder = self.decoder();
        Ok(Some(
            decoder
                .decode_bytes(&buf)?
                .unwrap_or_else(|| decoder.blank()),
        ))
    }
}
