use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::model::{Event, EventKind};

/// Keep only completed purchases.
pub fn filter_purchases(events: &[Event]) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.event == EventKind::Transaction)
        .copied()
        .collect()
}

/// Group `rows` by `group_key`, count the distinct `count_key` values within
/// each group and return the `top_n` largest groups, descending.
///
/// Rows where either extractor returns `None` are skipped, so malformed
/// purchase rows and unresolved join results never create or inflate a
/// group. Ties keep the order in which the group first appeared in `rows`.
pub fn rank_by<R, K, C>(
    rows: &[R],
    group_key: impl Fn(&R) -> Option<K>,
    count_key: impl Fn(&R) -> Option<C>,
    top_n: usize,
) -> Vec<(K, u64)>
where
    K: Eq + Hash + Clone,
    C: Eq + Hash,
{
    let mut first_seen: Vec<K> = Vec::new();
    let mut groups: HashMap<K, HashSet<C>> = HashMap::new();

    for row in rows {
        let (Some(key), Some(value)) = (group_key(row), count_key(row)) else {
            continue;
        };
        if !groups.contains_key(&key) {
            first_seen.push(key.clone());
        }
        groups.entry(key).or_default().insert(value);
    }

    let mut ranked: Vec<(K, u64)> = first_seen
        .into_iter()
        .map(|key| {
            let count = groups[&key].len() as u64;
            (key, count)
        })
        .collect();
    // Stable sort, equal counts keep their first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);

    ranked
}

/// Left-outer join: every row of `left` yields exactly one output row, with
/// `None` on the right when no key matches. Duplicate right keys resolve to
/// the first occurrence, never to extra rows.
pub fn left_join<'a, L, R, K>(
    left: &'a [L],
    right: &'a [R],
    left_key: impl Fn(&L) -> Option<K>,
    right_key: impl Fn(&R) -> Option<K>,
) -> Vec<(&'a L, Option<&'a R>)>
where
    K: Eq + Hash,
{
    let lookup = key_index(right, &right_key);

    left.iter()
        .map(|row| {
            let matched = left_key(row).and_then(|key| lookup.get(&key).copied());
            (row, matched)
        })
        .collect()
}

/// Full-outer join: the left-join rows, followed by one row for every right
/// entry that no left row matched. A duplicated right key is represented by
/// its first occurrence only.
pub fn outer_join<'a, L, R, K>(
    left: &'a [L],
    right: &'a [R],
    left_key: impl Fn(&L) -> Option<K>,
    right_key: impl Fn(&R) -> Option<K>,
) -> Vec<(Option<&'a L>, Option<&'a R>)>
where
    K: Eq + Hash + Clone,
{
    let lookup = key_index(right, &right_key);
    let mut matched: HashSet<K> = HashSet::new();
    let mut joined: Vec<(Option<&L>, Option<&R>)> = Vec::with_capacity(left.len());

    for row in left {
        let hit = left_key(row).and_then(|key| {
            let hit = lookup.get(&key).copied();
            if hit.is_some() {
                matched.insert(key);
            }
            hit
        });
        joined.push((Some(row), hit));
    }

    let mut appended: HashSet<K> = HashSet::new();
    for row in right {
        match right_key(row) {
            Some(key) => {
                if !matched.contains(&key) && appended.insert(key) {
                    joined.push((None, Some(row)));
                }
            }
            // Keyless right rows can never match but are still preserved
            None => joined.push((None, Some(row))),
        }
    }

    joined
}

// First-match-wins key index over `rows`
fn key_index<'a, R, K>(rows: &'a [R], key: &impl Fn(&R) -> Option<K>) -> HashMap<K, &'a R>
where
    K: Eq + Hash,
{
    let mut index: HashMap<K, &R> = HashMap::new();
    for row in rows {
        if let Some(key) = key(row) {
            index.entry(key).or_insert(row);
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Client, Product};

    fn purchase(visitor_id: u64, transaction_id: u64, item_id: u64) -> Event {
        Event {
            visitor_id,
            event: EventKind::Transaction,
            item_id,
            transaction_id: Some(transaction_id),
        }
    }

    fn view(visitor_id: u64, item_id: u64) -> Event {
        Event {
            visitor_id,
            event: EventKind::View,
            item_id,
            transaction_id: None,
        }
    }

    fn product(id: u64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            category_id: None,
            brand_id: None,
        }
    }

    #[test]
    fn filter_purchases_keeps_only_transactions() {
        let events = vec![view(1, 7), purchase(1, 100, 7), view(2, 8)];

        let purchases = filter_purchases(&events);
        assert_eq!(purchases, vec![purchase(1, 100, 7)]);
        // Filtering again changes nothing
        assert_eq!(filter_purchases(&purchases), purchases);
    }

    #[test]
    fn rank_by_counts_distinct_values_once() {
        // The same (visitor, transaction) appearing on two rows counts once
        let rows = vec![purchase(1, 100, 7), purchase(1, 100, 7), purchase(1, 101, 7)];

        let ranked = rank_by(&rows, |e| Some(e.item_id), |e| e.transaction_id, 10);
        assert_eq!(ranked, vec![(7, 2)]);
    }

    #[test]
    fn rank_by_orders_descending_with_stable_ties() {
        let rows = vec![
            purchase(1, 100, 7),
            purchase(2, 200, 8),
            purchase(3, 300, 9),
            purchase(3, 301, 9),
        ];

        let ranked = rank_by(&rows, |e| Some(e.item_id), |e| e.transaction_id, 10);
        // Item 9 has two transactions; 7 and 8 tie and keep input order
        assert_eq!(ranked, vec![(9, 2), (7, 1), (8, 1)]);
    }

    #[test]
    fn rank_by_truncates_to_top_n() {
        let rows = vec![purchase(1, 100, 7), purchase(2, 200, 8), purchase(3, 300, 9)];

        assert_eq!(rank_by(&rows, |e| Some(e.item_id), |e| e.transaction_id, 2).len(), 2);
        assert!(rank_by(&rows, |e| Some(e.item_id), |e| e.transaction_id, 0).is_empty());
        // Fewer groups than top_n returns them all
        assert_eq!(rank_by(&rows, |e| Some(e.item_id), |e| e.transaction_id, 10).len(), 3);
    }

    #[test]
    fn rank_by_skips_rows_without_keys() {
        let mut malformed = purchase(1, 100, 7);
        malformed.transaction_id = None;
        let rows = vec![malformed, purchase(2, 200, 8)];

        let ranked = rank_by(&rows, |e| Some(e.item_id), |e| e.transaction_id, 10);
        assert_eq!(ranked, vec![(8, 1)]);

        let empty: Vec<Event> = Vec::new();
        assert!(rank_by(&empty, |e| Some(e.item_id), |e| e.transaction_id, 10).is_empty());
    }

    #[test]
    fn left_join_keeps_every_left_row() {
        let purchases = vec![purchase(1, 100, 7), purchase(2, 200, 99)];
        let products = vec![product(7, "kettle")];

        let joined = left_join(&purchases, &products, |e| Some(e.item_id), |p| Some(p.id));
        assert_eq!(joined.len(), purchases.len());
        assert_eq!(joined[0].1.map(|p| p.id), Some(7));
        assert!(joined[1].1.is_none());
    }

    #[test]
    fn left_join_resolves_duplicate_right_keys_to_first_match() {
        let purchases = vec![purchase(1, 100, 7)];
        let products = vec![product(7, "kettle"), product(7, "toaster")];

        let joined = left_join(&purchases, &products, |e| Some(e.item_id), |p| Some(p.id));
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].1.map(|p| p.name.as_str()), Some("kettle"));
    }

    #[test]
    fn outer_join_appends_unmatched_right_rows_once() {
        let counts = vec![(1u64, 3u64)];
        let clients = vec![
            Client {
                id: 1,
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
            Client {
                id: 2,
                first_name: "Alan".to_string(),
                last_name: "Turing".to_string(),
            },
            Client {
                id: 2,
                first_name: "Alan".to_string(),
                last_name: "Shadowed".to_string(),
            },
        ];

        let joined = outer_join(&counts, &clients, |(id, _)| Some(*id), |c| Some(c.id));
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].0, Some(&(1, 3)));
        assert_eq!(joined[0].1.map(|c| c.id), Some(1));
        // The duplicated id 2 appears exactly once, through its first row
        assert_eq!(joined[1].0, None);
        assert_eq!(joined[1].1.map(|c| c.last_name.as_str()), Some("Turing"));
    }
}
