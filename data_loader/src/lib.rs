use csv::WriterBuilder;
use diesel::sql_query;
use diesel::sql_types::BigInt;
use diesel_async::{AsyncMysqlConnection, RunQueryDsl};
pub use model::*;
use rev_buf_reader::RevBufReader;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::BufRead;

mod model;

pub async fn load_products(conn: &mut AsyncMysqlConnection) -> anyhow::Result<Vec<ProductRow>> {
    let query = "
        select
            id,
            nombre as name,
            categoria_id as category_id,
            marca_id as brand_id
        from producto
        where deleted = 0;";
    sql_query(query)
        .load::<ProductRow>(conn)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

pub async fn load_categories(conn: &mut AsyncMysqlConnection) -> anyhow::Result<Vec<CategoryRow>> {
    let query = "
        select
            id,
            nombre as name
        from categoria
        where deleted = 0;";
    sql_query(query)
        .load::<CategoryRow>(conn)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

pub async fn load_brands(conn: &mut AsyncMysqlConnection) -> anyhow::Result<Vec<BrandRow>> {
    let query = "
        select
            id,
            nombre as name
        from marca
        where deleted = 0;";
    sql_query(query)
        .load::<BrandRow>(conn)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

pub async fn load_clients(conn: &mut AsyncMysqlConnection) -> anyhow::Result<Vec<ClientRow>> {
    let query = "
        select
            id,
            nombre as first_name,
            apellido as last_name
        from cliente
        where deleted = 0;";
    sql_query(query)
        .load::<ClientRow>(conn)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

// The event stream is append-only, so only rows newer than the last
// exported id are fetched
pub async fn load_events(
    conn: &mut AsyncMysqlConnection,
    last_id: Option<i64>,
) -> anyhow::Result<Vec<EventRow>> {
    let query = "
        select
            id,
            visitorid as visitor_id,
            event,
            itemid as item_id,
            transactionid as transaction_id,
            date_insert
        from events
        where id > ?;";
    sql_query(query)
        .bind::<BigInt, _>(last_id.unwrap_or(0))
        .load::<EventRow>(conn)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

pub fn write_to_csv_file<T: Serialize>(data: &[T], path: &str, append: bool) -> anyhow::Result<()> {
    let file = if append {
        OpenOptions::new().append(true).open(path)?
    } else {
        File::create(path)?
    };
    let mut wtr = WriterBuilder::new().has_headers(!append).from_writer(file);

    for record in data {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Recover the id of the last exported row from the tail of an existing
/// snapshot file. `None` when the file is missing or has no parsable id.
pub fn extract_last_id(path: &str) -> Option<i64> {
    let Ok(file) = File::open(path) else {
        return None;
    };

    let reader = RevBufReader::new(file);
    let last_lines: Vec<String> = reader
        .lines()
        .take(1)
        .map(|l| l.expect("Could not parse line"))
        .collect();
    let line = <[String]>::first(&last_lines)?;

    let parts = line.split(',').collect::<Vec<&str>>();
    if parts.is_empty() {
        return None;
    }

    let id = parts[0].parse::<i64>().ok()?;
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn extract_last_id_reads_the_final_row() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,visitor_id,event,item_id,transaction_id,date_insert").unwrap();
        writeln!(file, "1,10,view,7,,2023-06-01 09:15:27").unwrap();
        writeln!(file, "2,11,transaction,8,4000,2023-06-01 09:16:02").unwrap();
        file.flush().unwrap();

        assert_eq!(extract_last_id(file.path().to_str().unwrap()), Some(2));
    }

    #[test]
    fn extract_last_id_handles_missing_or_fresh_files() {
        assert_eq!(extract_last_id("data/definitely_not_there.csv"), None);

        // A file holding only the header has no exported rows yet
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,visitor_id,event,item_id,transaction_id,date_insert").unwrap();
        file.flush().unwrap();
        assert_eq!(extract_last_id(file.path().to_str().unwrap()), None);
    }
}
