use std::convert::TryFrom;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    error::Error,
    schema::{FieldSpec, Schema, DEPOSIT_PROTECTION},
    Result,
};

/// Splits `input` after at most `n` bytes. If `input` is shorter, the whole input is returned
/// and the remainder is empty.
#[inline]
pub fn take_up_to(input: &[u8], n: usize) -> (&[u8], &[u8]) {
    input.split_at(n.min(input.len()))
}

/// Removes a trailing `\n` or `\r\n`
#[inline]
pub(crate) fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Decodes fixed-width lines using a `Schema`
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    schema: Schema,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DEPOSIT_PROTECTION)
    }
}

impl Decoder {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Decode a single line. See `decode_bytes`
    #[inline]
    pub fn decode(&self, line: &str) -> Result<Option<DecodedRecord>> {
        self.decode_bytes(line.as_bytes())
    }

    /// Decode a single line, with or without its line terminator. Returns `None` for an empty
    /// line, see `blank` for the record of an existing empty line.
    ///
    /// Short input never fails: fields past the end of the line decode to shorter or empty
    /// values. The only error is a repeat count which is present but not a non negative
    /// integer.
    pub fn decode_bytes(&self, line: &[u8]) -> Result<Option<DecodedRecord>> {
        let mut rest = strip_terminator(line);
        if rest.is_empty() {
            return Ok(None);
        }

        let fields = slice_segment(self.schema.header, &mut rest);
        let count_spec = &self.schema.header[self.schema.count_field];
        let count = parse_count(&fields[self.schema.count_field].1, count_spec.width)?;

        // Exactly `count` segments, no matter how many bytes are left
        let depositors = (0..count)
            .map(|_| SubRecord {
                fields: slice_segment(self.schema.repeated, &mut rest),
            })
            .collect();

        Ok(Some(DecodedRecord {
            repeated_key: self.schema.repeated_key,
            fields,
            depositors,
        }))
    }

    /// A record without any fields, standing for a blank line which exists in the data
    pub fn blank(&self) -> DecodedRecord {
        DecodedRecord {
            repeated_key: self.schema.repeated_key,
            fields: Vec::new(),
            depositors: Vec::new(),
        }
    }
}

/// Decode a line of a deposit protection scheme data file
#[inline]
pub fn decode(line: &str) -> Result<Option<DecodedRecord>> {
    Decoder::default().decode(line)
}

fn slice_segment(specs: &[FieldSpec], rest: &mut &[u8]) -> Vec<(&'static str, String)> {
    specs
        .iter()
        .map(|spec| {
            let (value, tail) = take_up_to(*rest, spec.width);
            *rest = tail;
            (spec.name, String::from_utf8_lossy(value).into_owned())
        })
        .collect()
}

/// Parses the repeat count of a `width` wide field. A field cut short by the end of the line
/// and holding no digits counts as zero. Signed zero is zero.
fn parse_count(raw: &str, width: usize) -> Result<usize> {
    let trimmed = raw.trim();
    if trimmed.is_empty() && raw.len() < width {
        return Ok(0);
    }

    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| Error::MalformedCount {
            value: raw.to_owned(),
        })
}

/// A decoded line. Header fields keep the order of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    repeated_key: &'static str,
    fields: Vec<(&'static str, String)>,
    depositors: Vec<SubRecord>,
}

impl DecodedRecord {
    /// Returns the raw value of the header field `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        find(&self.fields, name)
    }

    /// Iterates over all header fields as `(name, value)`
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// The repeated segments
    #[inline]
    pub fn depositors(&self) -> &[SubRecord] {
        &self.depositors
    }

    /// Amount of header fields
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for DecodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(self.repeated_key, &self.depositors)?;
        map.end()
    }
}

/// One repeated segment of a `DecodedRecord`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRecord {
    fields: Vec<(&'static str, String)>,
}

impl SubRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        find(&self.fields, name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(name, value)| (*name, value.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for SubRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[inline]
fn find<'a>(fields: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, value)| value.as_str())
}
