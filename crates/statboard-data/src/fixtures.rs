//! Canned rows and response bodies for tests, examples, and demo screens.

use serde_json::{json, Value};
use time::{Date, Month};

use crate::models::Record;

/// Builds a record from a `json!` object literal.
///
/// # Panics
///
/// Panics when the value is not a JSON object; fixture rows always are.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => Record(map),
        other => panic!("fixture rows must be JSON objects, got {other}"),
    }
}

/// Serialized `{ data, meta }` body the statistics API would send.
pub fn page_body(records: &[Record], last_page: u32, total: u64) -> String {
    json!({
        "data": records,
        "meta": { "last_page": last_page, "total": total },
    })
    .to_string()
}

/// Three order rows: distinct brands, a null brand, and a numeric value
/// encoded as a string, which is how the upstream API actually mixes them.
pub fn sample_order_records() -> Vec<Record> {
    vec![
        record(json!({
            "date": "2024-03-02T10:15:00",
            "supplier_article": "TSH-001-BLK",
            "warehouse_name": "Koledino",
            "brand": "Nike",
            "discount_percent": 15,
            "total_price": "2790.00",
        })),
        record(json!({
            "date": "2024-03-03T08:40:00",
            "supplier_article": "SNK-774-WHT",
            "warehouse_name": "Elektrostal",
            "brand": "Adidas",
            "discount_percent": 5,
            "total_price": "6450.00",
        })),
        record(json!({
            "date": "2024-03-03T21:02:00",
            "supplier_article": "HDD-310-GRY",
            "warehouse_name": "Koledino",
            "brand": null,
            "discount_percent": "20",
            "total_price": "1980.00",
        })),
    ]
}

/// Stock rows for a single snapshot day, including a zero quantity and an
/// empty warehouse name.
pub fn sample_stock_records() -> Vec<Record> {
    vec![
        record(json!({
            "last_change_date": "2024-03-15",
            "supplier_article": "TSH-001-BLK",
            "warehouse_name": "Tula",
            "brand": "Nike",
            "quantity": 120,
            "in_way_to_client": 4,
        })),
        record(json!({
            "last_change_date": "2024-03-15",
            "supplier_article": "SNK-774-WHT",
            "warehouse_name": "Tula",
            "brand": "Adidas",
            "quantity": 0,
            "in_way_to_client": 0,
        })),
        record(json!({
            "last_change_date": "2024-03-15",
            "supplier_article": "BAG-204-NVY",
            "warehouse_name": "",
            "brand": "Grizzly",
            "quantity": "35",
            "in_way_to_client": 1,
        })),
    ]
}

/// Parses the `YYYY-MM-DD` strings the date filters carry.
///
/// # Panics
///
/// Panics on anything that is not a valid calendar date.
pub fn parse_iso(text: &str) -> Date {
    let parts: Vec<&str> = text.split('-').collect();
    assert!(parts.len() == 3, "expected YYYY-MM-DD, got {text}");
    let year: i32 = parts[0].parse().expect("year");
    let month = Month::try_from(parts[1].parse::<u8>().expect("month number")).expect("month");
    let day: u8 = parts[2].parse().expect("day");
    Date::from_calendar_date(year, month, day).expect("calendar date")
}
