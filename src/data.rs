use std::fs::File;

use anyhow::Result;
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a whole snapshot CSV into typed records. Columns the record type
/// does not declare (snapshot row ids, insert timestamps) are ignored.
pub fn read_csv_file<T: DeserializeOwned>(file_path: &str) -> Result<Vec<T>> {
    // Open the csv file and set up the reader
    let file = File::open(file_path)?;
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<T>() {
        rows.push(record?);
    }

    Ok(rows)
}

// Write one computed view into its report file
pub fn write_report<T: Serialize>(file_path: &str, rows: &[T]) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Event, EventKind, Product};
    use std::io::Write;

    #[test]
    fn read_csv_file_ignores_snapshot_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,visitor_id,event,item_id,transaction_id,date_insert").unwrap();
        writeln!(file, "1,257597,view,355908,,2023-06-01 09:15:27").unwrap();
        writeln!(file, "2,599528,addtocart,356475,,2023-06-01 09:15:41").unwrap();
        writeln!(file, "3,599528,transaction,356475,4000,2023-06-01 09:16:02").unwrap();
        file.flush().unwrap();

        let events = read_csv_file::<Event>(file.path().to_str().unwrap()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event, EventKind::View);
        assert_eq!(events[0].transaction_id, None);
        assert_eq!(events[1].event, EventKind::AddToCart);
        assert_eq!(events[2].event, EventKind::Transaction);
        assert_eq!(events[2].transaction_id, Some(4000));
    }

    #[test]
    fn read_csv_file_tolerates_missing_foreign_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,name,category_id,brand_id").unwrap();
        writeln!(file, "7,kettle,1,").unwrap();
        writeln!(file, "8,mystery item,,").unwrap();
        file.flush().unwrap();

        let products = read_csv_file::<Product>(file.path().to_str().unwrap()).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].category_id, Some(1));
        assert_eq!(products[0].brand_id, None);
        assert_eq!(products[1].category_id, None);
    }
}
