use std::io::{prelude::*, SeekFrom};

use itertools::Itertools;
use tracing::debug;

use crate::Result;

/// Default guess of bytes per record used to bound a single scan pass
pub const DEFAULT_STRIDE: u64 = 10_000;

/// Options controlling how far a single scan pass reads ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    /// Estimated byte length of a record. A pass requested for record `n` scans up to
    /// `n * stride` bytes, which also prefetches offsets of the following records.
    pub stride: u64,
}

impl IndexOptions {
    pub fn with_stride(stride: u64) -> Self {
        Self {
            stride: stride.max(1),
        }
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
        }
    }
}

/// An incrementally built in-memory line-index of a data file. The first line of the file is
/// the header row and is never indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    /// Byte offsets of the data records in ascending order. `inner[i]` is the start of record
    /// `i + 1`. May be a prefix of all records in the file.
    inner: Vec<u64>,
    /// Set once a scan has hit the end of the file
    complete: bool,
}

impl Index {
    /// Create a new, empty Index
    pub fn new() -> Index {
        Self::default()
    }

    /// Returns `true` if records up to `through` are not known yet and the end of the file has
    /// not been reached. Once the index is complete, records appended to the file afterwards
    /// are only found after `clear`.
    #[inline]
    pub fn needs_scan(&self, through: usize) -> bool {
        self.inner.len() < through && !self.complete
    }

    /// Extends the index until it contains at least `through` offsets or the end of the file
    /// was reached. Does nothing if the index already covers `through`. If any pass fails, the
    /// index is rolled back to its state before the call.
    pub fn ensure_coverage<R: BufRead + Seek>(
        &mut self,
        reader: &mut R,
        through: usize,
        options: &IndexOptions,
    ) -> Result<()> {
        let (len, complete) = (self.inner.len(), self.complete);

        let res = self.extend_through(reader, through, options);
        if res.is_err() {
            // Passes only ever append behind the last offset
            self.inner.truncate(len);
            self.complete = complete;
        }

        res
    }

    fn extend_through<R: BufRead + Seek>(
        &mut self,
        reader: &mut R,
        through: usize,
        options: &IndexOptions,
    ) -> Result<()> {
        while self.needs_scan(through) {
            let from = self.last().unwrap_or(0);
            let limit = options
                .stride
                .saturating_mul(through as u64)
                .max(from.saturating_add(options.stride));

            let added = self.scan(reader, from, Some(limit))?;
            debug!(
                from,
                limit,
                added,
                records = self.inner.len(),
                complete = self.complete,
                "extended line index"
            );
        }

        Ok(())
    }

    /// Scans `reader` for record offsets, starting at `from` which must be 0 or an already
    /// indexed offset. Starting at 0 skips the header row, an indexed offset resumes behind that
    /// record. Any other `from` would leave a gap and scans nothing. Stops once a line ends at or
    /// past `limit`, or at the end of the file if no limit is given. At least one line is
    /// indexed per call unless the end of the file is reached first.
    ///
    /// Returns the amount of new offsets. If reading fails the index is left unchanged.
    pub(crate) fn scan<R: BufRead + Seek>(
        &mut self,
        reader: &mut R,
        from: u64,
        limit: Option<u64>,
    ) -> Result<usize> {
        if from != 0 && self.inner.binary_search(&from).is_err() {
            return Ok(0);
        }

        reader.seek(SeekFrom::Start(from))?;

        let mut buff = Vec::with_capacity(1000);

        // Both the header row and a resumed record are consumed without being indexed
        let mut curr_offset = from + reader.read_until(b'\n', &mut buff)? as u64;
        let mut found: Vec<u64> = Vec::new();
        let mut eof = curr_offset == from;

        while !eof {
            buff.clear();
            let n = reader.read_until(b'\n', &mut buff)?;

            if n == 0 {
                // Nothing starts at `curr_offset`
                eof = true;
                break;
            }

            found.push(curr_offset);
            curr_offset += n as u64;

            if limit.map_or(false, |limit| curr_offset >= limit) {
                break;
            }
        }

        let before = self.inner.len();
        self.merge(found);
        self.complete |= eof;

        Ok(self.inner.len() - before)
    }

    /// Merges `offsets` into the index, keeping it sorted and free of duplicates
    fn merge(&mut self, mut offsets: Vec<u64>) {
        offsets.sort_unstable();
        self.inner = self
            .inner
            .iter()
            .copied()
            .merge(offsets)
            .dedup()
            .collect();
    }

    /// Returns the byte offset of the 1-based `record_number` if it's indexed
    #[inline]
    pub fn offset_of(&self, record_number: usize) -> Option<u64> {
        let pos = record_number.checked_sub(1)?;
        self.inner.get(pos).copied()
    }

    /// Offset of the last indexed record
    #[inline]
    pub fn last(&self) -> Option<u64> {
        self.inner.last().copied()
    }

    /// Returns all indexed offsets
    #[inline]
    pub fn offsets(&self) -> &[u64] {
        &self.inner
    }

    /// Returns the amount of indexed records. Once `is_complete` returns `true` this is the
    /// amount of records in the file.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no record is indexed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if a scan reached the end of the file. A complete index is never extended
    /// again, so lines appended to the file later stay unknown until the index is cleared.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Drops all offsets, eg. when switching to another file
    pub fn clear(&mut self) {
        self.inner.clear();
        self.complete = false;
    }
}
