use chrono::NaiveDateTime;
use diesel::sql_types::{BigInt, Nullable, Text, Timestamp};
use diesel::QueryableByName;
use serde::{Serialize, Serializer};

fn serialize_naive_date_time<S: Serializer>(
    naive_date_time: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    naive_date_time
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
        .serialize(serializer)
}

#[derive(Debug, Serialize, QueryableByName)]
pub struct EventRow {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = BigInt)]
    pub visitor_id: i64,
    #[diesel(sql_type = Text)]
    pub event: String,
    #[diesel(sql_type = BigInt)]
    pub item_id: i64,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub transaction_id: Option<i64>,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_naive_date_time")]
    pub date_insert: NaiveDateTime,
}

#[derive(Debug, Serialize, QueryableByName)]
pub struct ProductRow {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub category_id: Option<i64>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub brand_id: Option<i64>,
}

#[derive(Debug, Serialize, QueryableByName)]
pub struct CategoryRow {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Text)]
    pub name: String,
}

#[derive(Debug, Serialize, QueryableByName)]
pub struct BrandRow {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Text)]
    pub name: String,
}

#[derive(Debug, Serialize, QueryableByName)]
pub struct ClientRow {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Text)]
    pub first_name: String,
    #[diesel(sql_type = Text)]
    pub last_name: String,
}
