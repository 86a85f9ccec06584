use data_loader::extract_last_id;
use diesel_async::{AsyncConnection, AsyncMysqlConnection};
use std::time::UNIX_EPOCH;
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let shop_url = std::env::var("SHOP_DATABASE_URL").expect("to read SHOP_DATABASE_URL");
    let stats_url = std::env::var("STATS_DATABASE_URL").expect("to read STATS_DATABASE_URL");

    log::info!("Exporting the snapshot tables into data/");

    let mut handles: Vec<JoinHandle<anyhow::Result<()>>> = vec![];

    let start = UNIX_EPOCH.elapsed()?.as_millis();

    let conn_url = shop_url.clone();
    handles.push(tokio::task::spawn(async move {
        let mut conn = AsyncMysqlConnection::establish(&conn_url).await?;
        let rows = data_loader::load_products(&mut conn).await?;
        data_loader::write_to_csv_file(&rows, "data/products.csv", false)?;

        let end = UNIX_EPOCH.elapsed()?.as_millis();
        println!(
            "Fetched and saved {} product rows in {}ms",
            rows.len(),
            end - start
        );
        Ok(())
    }));

    let conn_url = shop_url.clone();
    handles.push(tokio::task::spawn(async move {
        let mut conn = AsyncMysqlConnection::establish(&conn_url).await?;
        let rows = data_loader::load_categories(&mut conn).await?;
        data_loader::write_to_csv_file(&rows, "data/categories.csv", false)?;

        let end = UNIX_EPOCH.elapsed()?.as_millis();
        println!(
            "Fetched and saved {} category rows in {}ms",
            rows.len(),
            end - start
        );
        Ok(())
    }));

    let conn_url = shop_url.clone();
    handles.push(tokio::task::spawn(async move {
        let mut conn = AsyncMysqlConnection::establish(&conn_url).await?;
        let rows = data_loader::load_brands(&mut conn).await?;
        data_loader::write_to_csv_file(&rows, "data/brands.csv", false)?;

        let end = UNIX_EPOCH.elapsed()?.as_millis();
        println!(
            "Fetched and saved {} brand rows in {}ms",
            rows.len(),
            end - start
        );
        Ok(())
    }));

    let conn_url = shop_url;
    handles.push(tokio::task::spawn(async move {
        let mut conn = AsyncMysqlConnection::establish(&conn_url).await?;
        let rows = data_loader::load_clients(&mut conn).await?;
        data_loader::write_to_csv_file(&rows, "data/clients.csv", false)?;

        let end = UNIX_EPOCH.elapsed()?.as_millis();
        println!(
            "Fetched and saved {} client rows in {}ms",
            rows.len(),
            end - start
        );
        Ok(())
    }));

    handles.push(tokio::task::spawn(async move {
        let mut conn = AsyncMysqlConnection::establish(&stats_url).await?;

        // The event stream only grows, so resume from the last exported row
        let file_path = "data/events.csv";
        let last_id = extract_last_id(file_path);

        let rows = data_loader::load_events(&mut conn, last_id).await?;
        data_loader::write_to_csv_file(&rows, file_path, last_id.is_some())?;

        let end = UNIX_EPOCH.elapsed()?.as_millis();
        println!(
            "Fetched and saved {} event rows in {}ms",
            rows.len(),
            end - start
        );
        Ok(())
    }));

    for handle in handles {
        handle.await.ok();
    }

    Ok(())
}
