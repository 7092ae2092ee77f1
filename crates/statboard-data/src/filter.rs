use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Record;
use crate::resource::{ColumnKind, ResourceDescriptor};

/// Current filter text per column, keyed by column name. An empty string
/// means the filter is inactive, matching the cleared-input contract of the
/// dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilters {
    values: BTreeMap<String, String>,
}

impl ColumnFilters {
    pub(crate) fn for_descriptor(descriptor: &ResourceDescriptor) -> Self {
        Self {
            values: descriptor
                .columns
                .iter()
                .map(|column| (column.name.to_string(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Sets a column's filter text. Returns false and leaves everything
    /// untouched when the column is not filterable for this resource.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(column) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => {
                tracing::warn!(column, "ignoring filter for unknown column");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }

    /// True when `record` passes every active filter (logical AND).
    ///
    /// Text filters are case-insensitive substring matches; a record whose
    /// column is missing or non-string fails an active text filter. Threshold
    /// filters pass when the record value parses as a number >= the filter
    /// value; unparseable filter text or record values fail.
    pub fn matches(&self, descriptor: &ResourceDescriptor, record: &Record) -> bool {
        for spec in descriptor.columns {
            let Some(filter) = self.values.get(spec.name) else {
                continue;
            };
            if filter.is_empty() {
                continue;
            }
            let passed = match spec.kind {
                ColumnKind::Text => record
                    .get_str(spec.name)
                    .map(|value| value.to_lowercase().contains(&filter.to_lowercase()))
                    .unwrap_or(false),
                ColumnKind::Threshold => {
                    match (filter.trim().parse::<f64>(), record.get_f64(spec.name)) {
                        (Ok(min), Some(value)) => value >= min,
                        _ => false,
                    }
                }
            };
            if !passed {
                return false;
            }
        }
        true
    }
}

/// Distinct values per text column, rebuilt from the currently loaded page.
/// Feeds the dropdown suggestions next to each filter input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueValueIndex {
    sets: BTreeMap<String, BTreeSet<String>>,
}

impl UniqueValueIndex {
    pub(crate) fn for_descriptor(descriptor: &ResourceDescriptor) -> Self {
        Self {
            sets: descriptor
                .text_columns()
                .map(|name| (name.to_string(), BTreeSet::new()))
                .collect(),
        }
    }

    /// Rebuilds every tracked set from `records`. `None` (a response without
    /// a data array) leaves the previous values in place; an empty slice
    /// clears them.
    pub(crate) fn update(&mut self, records: Option<&[Record]>) {
        let Some(records) = records else {
            return;
        };
        for (column, set) in self.sets.iter_mut() {
            set.clear();
            for record in records {
                if let Some(value) = truthy_string(record.get(column)) {
                    set.insert(value);
                }
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.sets.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.sets.iter().map(|(column, set)| (column.as_str(), set))
    }
}

/// Renders a field for the unique-value index, dropping everything the
/// dropdowns never show: `null`, `false`, zero, and empty strings. A genuine
/// zero value therefore stays out of the index.
fn truthy_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(number) => {
            if number.as_f64() == Some(0.0) {
                None
            } else {
                Some(number.to_string())
            }
        }
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{INCOMES, ORDERS, STOCKS};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_filters_match_everything() {
        let filters = ColumnFilters::for_descriptor(&ORDERS);
        assert!(filters.is_empty());
        assert!(filters.matches(&ORDERS, &record(json!({"brand": "Nike"}))));
        assert!(filters.matches(&ORDERS, &record(json!({}))));
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let mut filters = ColumnFilters::for_descriptor(&ORDERS);
        filters.set("supplier_article", "abc");
        assert!(filters.matches(&ORDERS, &record(json!({"supplier_article": "XX-ABC-1"}))));
        assert!(!filters.matches(&ORDERS, &record(json!({"supplier_article": "XYZ"}))));
    }

    #[test]
    fn active_text_filter_rejects_null_and_missing_columns() {
        let mut filters = ColumnFilters::for_descriptor(&ORDERS);
        filters.set("brand", "nike");
        assert!(!filters.matches(&ORDERS, &record(json!({"brand": null}))));
        assert!(!filters.matches(&ORDERS, &record(json!({}))));
        assert!(!filters.matches(&ORDERS, &record(json!({"brand": 7}))));
    }

    #[test]
    fn threshold_keeps_values_at_or_above_the_floor() {
        let mut filters = ColumnFilters::for_descriptor(&INCOMES);
        filters.set("quantity", "5");
        let quantities = [json!(3), json!(5), json!(7), json!("abc")];
        let kept: Vec<_> = quantities
            .iter()
            .filter(|q| filters.matches(&INCOMES, &record(json!({ "quantity": q }))))
            .collect();
        assert_eq!(kept, vec![&json!(5), &json!(7)]);
    }

    #[test]
    fn threshold_accepts_numeric_strings_on_both_sides() {
        let mut filters = ColumnFilters::for_descriptor(&INCOMES);
        filters.set("quantity", " 5 ");
        assert!(filters.matches(&INCOMES, &record(json!({"quantity": "6"}))));
        assert!(!filters.matches(&INCOMES, &record(json!({"quantity": "4"}))));
    }

    #[test]
    fn unparseable_threshold_text_matches_nothing() {
        let mut filters = ColumnFilters::for_descriptor(&INCOMES);
        filters.set("quantity", "lots");
        assert!(!filters.matches(&INCOMES, &record(json!({"quantity": 10}))));
    }

    #[test]
    fn filters_combine_with_and() {
        let mut filters = ColumnFilters::for_descriptor(&ORDERS);
        filters.set("brand", "nike");
        filters.set("discount_percent", "10");
        assert!(filters.matches(
            &ORDERS,
            &record(json!({"brand": "Nike", "discount_percent": 15}))
        ));
        assert!(!filters.matches(
            &ORDERS,
            &record(json!({"brand": "Nike", "discount_percent": 5}))
        ));
    }

    #[test]
    fn unknown_column_is_rejected_without_side_effects() {
        let mut filters = ColumnFilters::for_descriptor(&INCOMES);
        assert!(!filters.set("brand", "nike"));
        assert!(filters.is_empty());
    }

    #[test]
    fn clear_resets_every_value_but_keeps_the_columns() {
        let mut filters = ColumnFilters::for_descriptor(&ORDERS);
        filters.set("brand", "nike");
        filters.clear();
        assert!(filters.is_empty());
        assert_eq!(filters.get("brand"), Some(""));
    }

    #[test]
    fn iter_walks_every_seeded_column_in_order() {
        let mut filters = ColumnFilters::for_descriptor(&ORDERS);
        filters.set("brand", "nike");
        let pairs: Vec<_> = filters.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("brand", "nike"),
                ("discount_percent", ""),
                ("supplier_article", ""),
                ("warehouse_name", ""),
            ]
        );
    }

    #[test]
    fn unique_values_keep_distinct_truthy_strings() {
        let mut index = UniqueValueIndex::for_descriptor(&ORDERS);
        let records = vec![
            record(json!({"brand": "A", "warehouse_name": "Koledino"})),
            record(json!({"brand": "", "warehouse_name": "Koledino"})),
            record(json!({"brand": "B", "warehouse_name": null})),
            record(json!({"brand": "A"})),
        ];
        index.update(Some(&records));
        let brands: Vec<_> = index.get("brand").unwrap().iter().cloned().collect();
        assert_eq!(brands, vec!["A", "B"]);
        let warehouses: Vec<_> = index
            .get("warehouse_name")
            .unwrap()
            .iter()
            .cloned()
            .collect();
        assert_eq!(warehouses, vec!["Koledino"]);
    }

    #[test]
    fn unique_values_drop_zero_and_false() {
        let mut index = UniqueValueIndex::for_descriptor(&ORDERS);
        let records = vec![
            record(json!({"brand": 0})),
            record(json!({"brand": false})),
            record(json!({"brand": 42})),
        ];
        index.update(Some(&records));
        let brands: Vec<_> = index.get("brand").unwrap().iter().cloned().collect();
        assert_eq!(brands, vec!["42"]);
    }

    #[test]
    fn update_without_records_is_a_no_op() {
        let mut index = UniqueValueIndex::for_descriptor(&ORDERS);
        index.update(Some(&[record(json!({"brand": "A"}))]));
        index.update(None);
        assert_eq!(index.get("brand").unwrap().len(), 1);
    }

    #[test]
    fn update_with_empty_page_clears_the_sets() {
        let mut index = UniqueValueIndex::for_descriptor(&ORDERS);
        index.update(Some(&[record(json!({"brand": "A"}))]));
        index.update(Some(&[]));
        assert!(index.get("brand").unwrap().is_empty());
    }

    #[test]
    fn index_tracks_only_text_columns() {
        let index = UniqueValueIndex::for_descriptor(&STOCKS);
        let columns: Vec<_> = index.iter().map(|(column, _)| column).collect();
        assert_eq!(columns, vec!["brand", "supplier_article", "warehouse_name"]);
        assert!(index.get("quantity").is_none());
    }
}
