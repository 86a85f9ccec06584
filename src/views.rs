use std::collections::HashMap;

use crate::aggregate::{left_join, outer_join, rank_by};
use crate::model::{
    Brand, BrandSales, Category, Client, ClientPurchases, Event, EventKind, EventTally, Product,
    ProductSales,
};

pub const DEFAULT_TOP_N: usize = 10;

/// Category name to id lookup, built fresh from the category table.
pub fn category_ids_by_name(categories: &[Category]) -> HashMap<&str, u64> {
    categories.iter().map(|c| (c.name.as_str(), c.id)).collect()
}

/// Best-selling products by distinct transaction count, optionally limited
/// to one category. The category filter is applied before ranking, so a
/// narrow category still fills up to `top_n` rows.
///
/// Returns `None` when there are no purchases at all, letting the caller
/// report "no data" instead of an empty table.
pub fn top_products(
    purchases: &[Event],
    products: &[Product],
    categories: &[Category],
    category: Option<&str>,
    top_n: usize,
) -> Option<Vec<ProductSales>> {
    if purchases.is_empty() {
        return None;
    }

    let joined = left_join(purchases, products, |e| Some(e.item_id), |p| Some(p.id));
    let rows: Vec<(&Event, Option<&Product>)> = match category {
        None => joined,
        Some(name) => {
            let Some(category_id) = category_ids_by_name(categories).get(name).copied() else {
                // Unknown category: nothing can match
                return Some(Vec::new());
            };
            joined
                .into_iter()
                .filter(|(_, product)| product.and_then(|p| p.category_id) == Some(category_id))
                .collect()
        }
    };

    let ranked = rank_by(
        &rows,
        |(event, _)| Some(event.item_id),
        |(event, _)| event.transaction_id,
        top_n,
    );

    let mut names: HashMap<u64, &str> = HashMap::new();
    for product in products {
        names.entry(product.id).or_insert(product.name.as_str());
    }

    Some(
        ranked
            .into_iter()
            .map(|(item_id, purchases)| ProductSales {
                item_id,
                name: names.get(&item_id).map(|name| (*name).to_string()),
                purchases,
            })
            .collect(),
    )
}

/// Best-selling brands by distinct transaction count. Purchases that cannot
/// be traced to a brand (unknown item, product without a brand) stay out of
/// the ranking.
pub fn top_brands(
    purchases: &[Event],
    products: &[Product],
    brands: &[Brand],
    top_n: usize,
) -> Vec<BrandSales> {
    let product_brands = left_join(products, brands, |p| p.brand_id, |b| Some(b.id));
    let rows = left_join(
        purchases,
        &product_brands,
        |e| Some(e.item_id),
        |(product, _)| Some(product.id),
    );

    rank_by(
        &rows,
        |(_, hit)| hit.and_then(|(_, brand)| brand.map(|b| b.name.clone())),
        |(event, _)| event.transaction_id,
        top_n,
    )
    .into_iter()
    .map(|(brand, purchases)| BrandSales { brand, purchases })
    .collect()
}

/// Purchase counts per client, full-outer semantics: clients without a
/// single purchase rank with count 0, and purchasing visitors without a
/// client record keep empty name fields.
pub fn top_clients(purchases: &[Event], clients: &[Client], top_n: usize) -> Vec<ClientPurchases> {
    let counts = rank_by(
        purchases,
        |e| Some(e.visitor_id),
        |e| e.transaction_id,
        usize::MAX,
    );
    let joined = outer_join(
        &counts,
        clients,
        |(visitor_id, _)| Some(*visitor_id),
        |c| Some(c.id),
    );

    let mut ranked: Vec<ClientPurchases> = joined
        .into_iter()
        .map(|(count, client)| ClientPurchases {
            first_name: client.map(|c| c.first_name.clone()),
            last_name: client.map(|c| c.last_name.clone()),
            purchases: count.map_or(0, |(_, n)| *n),
        })
        .collect();
    ranked.sort_by(|a, b| b.purchases.cmp(&a.purchases));
    ranked.truncate(top_n);

    ranked
}

/// Row counts per event kind over the whole event table, descending. Every
/// row counts (a visitor can view the same item many times), so the counts
/// always sum to `events.len()`.
pub fn event_distribution(events: &[Event]) -> Vec<EventTally> {
    let mut first_seen: Vec<EventKind> = Vec::new();
    let mut counts: HashMap<EventKind, u64> = HashMap::new();

    for event in events {
        if !counts.contains_key(&event.event) {
            first_seen.push(event.event);
        }
        *counts.entry(event.event).or_default() += 1;
    }

    let mut tallies: Vec<EventTally> = first_seen
        .into_iter()
        .map(|kind| EventTally {
            event: kind,
            count: counts[&kind],
        })
        .collect();
    tallies.sort_by(|a, b| b.count.cmp(&a.count));

    tallies
}
