//! Builders for well-formed deposit extracts used in tests

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use crate::schema::{DEPOSITOR_SEGMENT, DEPOSIT_SEGMENT};

pub(crate) const HEADER_LINE: &str = "DPS DATA FILE 31122016 SCHEME MEMBER 001";

/// Byte range of `number of depositor(s)` within a line
pub(crate) const COUNT_RANGE: Range<usize> = 216..219;

fn pad(value: &str, width: usize) -> String {
    format!("{:<1$.1$}", value, width)
}

/// A full width record line without terminator
pub(crate) fn record(record_number: usize, depositors: usize) -> String {
    let mut line: String = DEPOSIT_SEGMENT
        .iter()
        .map(|spec| match spec.name {
            "Record number" => format!("{:010}", record_number),
            "currency" => "HKD".to_owned(),
            "number of depositor(s)" => format!("{:03}", depositors),
            _ if spec.format.is_some() => "31122016".to_owned(),
            name => pad(name, spec.width),
        })
        .collect();

    for i in 1..=depositors {
        line.extend(DEPOSITOR_SEGMENT.iter().map(|spec| match spec.name {
            "depositor name" => pad(&format!("depositor {}-{}", record_number, i), spec.width),
            _ if spec.format.is_some() => "01011970".to_owned(),
            name => pad(name, spec.width),
        }));
    }

    line
}

/// A complete extract with header row, records separated by `\n`
pub(crate) fn extract(depositors: &[usize]) -> String {
    let mut out = format!("{}\n", HEADER_LINE);
    for (i, count) in depositors.iter().enumerate() {
        out.push_str(&record(i + 1, *count));
        out.push('\n');
    }
    out
}

pub(crate) fn write_extract(dir: &Path, name: &str, depositors: &[usize]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, extract(depositors)).unwrap();
    path
}
