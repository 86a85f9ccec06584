use chrono::Utc;

use model::Dataset;

use crate::aggregate::filter_purchases;
use crate::model::{Brand, Category, Client, Event, Product};
use crate::views::{event_distribution, top_brands, top_clients, top_products, DEFAULT_TOP_N};

mod aggregate;
mod data;
mod model;
mod views;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let start = Utc::now();

    let mut args = std::env::args().skip(1);
    let data_dir = args.next().unwrap_or_else(|| "data".to_string());
    let category = args.next();

    log::info!("Loading snapshot tables from {}", data_dir);
    if let Some(name) = &category {
        log::info!("Limiting the product ranking to category {}", name);
    }

    // For each snapshot csv file, we spawn a new thread
    let events_path = format!("{}/events.csv", data_dir);
    let events_handle = std::thread::spawn(move || {
        data::read_csv_file::<Event>(&events_path).expect("to read events csv")
    });
    let products_path = format!("{}/products.csv", data_dir);
    let products_handle = std::thread::spawn(move || {
        data::read_csv_file::<Product>(&products_path).expect("to read products csv")
    });
    let categories_path = format!("{}/categories.csv", data_dir);
    let categories_handle = std::thread::spawn(move || {
        data::read_csv_file::<Category>(&categories_path).expect("to read categories csv")
    });
    let brands_path = format!("{}/brands.csv", data_dir);
    let brands_handle = std::thread::spawn(move || {
        data::read_csv_file::<Brand>(&brands_path).expect("to read brands csv")
    });
    let clients_path = format!("{}/clients.csv", data_dir);
    let clients_handle = std::thread::spawn(move || {
        data::read_csv_file::<Client>(&clients_path).expect("to read clients csv")
    });

    // Wait for the threads to finish parsing...
    let dataset = Dataset {
        events: events_handle.join().expect("to load events"),
        products: products_handle.join().expect("to load products"),
        categories: categories_handle.join().expect("to load categories"),
        brands: brands_handle.join().expect("to load brands"),
        clients: clients_handle.join().expect("to load clients"),
    };

    let purchases = filter_purchases(&dataset.events);
    log::info!(
        "{} events ({} purchase rows), {} products, {} categories, {} brands, {} clients",
        dataset.events.len(),
        purchases.len(),
        dataset.products.len(),
        dataset.categories.len(),
        dataset.brands.len(),
        dataset.clients.len()
    );

    match top_products(
        &purchases,
        &dataset.products,
        &dataset.categories,
        category.as_deref(),
        DEFAULT_TOP_N,
    ) {
        Some(products) => {
            data::write_report(&format!("{}/top_products.csv", data_dir), &products)
                .expect("to write the product report");
        }
        None => log::warn!("no purchases recorded, skipping the product ranking"),
    }

    let brands = top_brands(&purchases, &dataset.products, &dataset.brands, DEFAULT_TOP_N);
    data::write_report(&format!("{}/top_brands.csv", data_dir), &brands)
        .expect("to write the brand report");

    let clients = top_clients(&purchases, &dataset.clients, DEFAULT_TOP_N);
    data::write_report(&format!("{}/top_clients.csv", data_dir), &clients)
        .expect("to write the client report");

    let distribution = event_distribution(&dataset.events);
    data::write_report(&format!("{}/event_distribution.csv", data_dir), &distribution)
        .expect("to write the event distribution report");

    println!("Done in {}ms", (Utc::now() - start).num_milliseconds());
}
