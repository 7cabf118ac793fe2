//! Decode a single record of a data file and print it as json

use dps_records::{File, ReadRecord};

fn main() -> dps_records::Result<()> {
    // Nothing is read until the first record is requested
    let mut file = File::new("<some data file>");

    // Only the offsets up to record 30 get indexed
    match file.get_record(30)? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record).unwrap()),
        None => println!("no record 30"),
    }

    Ok(())
}
