//! Step through the records of a data file until the end is reached

use dps_records::Session;

fn main() -> dps_records::Result<()> {
    let path = "<some data file>";
    let mut session = Session::new();

    let mut record_number = 1;
    while let Some(record) = session.get_record(path, record_number)? {
        record_number += 1;

        // Blank line
        if record.is_empty() {
            continue;
        }

        println!(
            "{}: {} depositor(s)",
            record.get("Record number").unwrap_or_default().trim(),
            record.depositors().len()
        );
    }

    Ok(())
}
