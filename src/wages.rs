use crate::calendar::DisplayedMonth;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, alias = "amount", deserialize_with = "lenient_wage")]
    pub wage: f64,
}

impl WageRecord {
    pub fn new(date: impl Into<String>, wage: f64) -> Self {
        Self {
            date: date.into(),
            wage,
        }
    }

    /// Year and 1-based month from the leading `YYYY-MM` of the date, if both parse.
    pub fn year_month(&self) -> Option<(i32, u32)> {
        let mut parts = self.date.split('-');
        let year = parts.next()?.trim().parse().ok()?;
        let month = parts.next()?.trim().parse().ok()?;
        Some((year, month))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WageDataset {
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_name: String,
    #[serde(default, deserialize_with = "lenient_records")]
    pub records: Vec<WageRecord>,
}

impl WageDataset {
    pub fn new(user_name: impl Into<String>, records: Vec<WageRecord>) -> Self {
        Self {
            user_name: user_name.into(),
            records,
        }
    }
}

/// Strings pass through, anything else becomes empty and so never matches a
/// calendar cell.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        _ => Ok(String::new()),
    }
}

/// Entries that are not objects are dropped; a non-array list is empty.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<WageRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Numbers pass through, numeric strings are parsed, anything else is zero.
fn lenient_wage<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_wage(&value))
}

pub fn coerce_wage(value: &Value) -> f64 {
    let wage = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                0.0
            } else {
                text.parse().unwrap_or(0.0)
            }
        }
        _ => 0.0,
    };

    if wage.is_finite() { wage } else { 0.0 }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WageIndex {
    pub by_date: HashMap<String, f64>,
    pub monthly_total: f64,
}

impl WageIndex {
    pub fn wage_on(&self, date_key: &str) -> f64 {
        self.by_date.get(date_key).copied().unwrap_or(0.0)
    }
}

/// Indexes every record by its date string and totals the ones in `month`.
/// A later record with the same date replaces the earlier one in the index.
pub fn build_wage_index(records: &[WageRecord], month: DisplayedMonth) -> WageIndex {
    let mut index = WageIndex {
        by_date: HashMap::with_capacity(records.len()),
        monthly_total: 0.0,
    };

    for record in records {
        index.by_date.insert(record.date.clone(), record.wage);
        if let Some((year, month_number)) = record.year_month() {
            if month.contains(year, month_number) {
                index.monthly_total += record.wage;
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn december_2023() -> DisplayedMonth {
        DisplayedMonth { year: 2023, month: 11 }
    }

    #[test]
    fn total_only_counts_displayed_month() {
        let records = vec![
            WageRecord::new("2023-12-01", 350.0),
            WageRecord::new("2023-12-25", 800.0),
            WageRecord::new("2023-11-30", 120.0),
            WageRecord::new("2024-12-01", 75.0),
        ];

        let index = build_wage_index(&records, december_2023());
        assert_eq!(index.monthly_total, 1150.0);
        assert_eq!(index.by_date.len(), 4);
        assert_eq!(index.wage_on("2023-11-30"), 120.0);
        assert_eq!(index.wage_on("2023-12-02"), 0.0);
    }

    #[test]
    fn empty_records_give_zero_total() {
        let index = build_wage_index(&[], december_2023());
        assert_eq!(index.monthly_total, 0.0);
        assert!(index.by_date.is_empty());
    }

    #[test]
    fn malformed_dates_are_indexed_but_never_totalled() {
        let records = vec![
            WageRecord::new("not-a-date", 500.0),
            WageRecord::new("", 10.0),
            WageRecord::new("2023-12-07", 40.0),
        ];

        let index = build_wage_index(&records, december_2023());
        assert_eq!(index.monthly_total, 40.0);
        assert_eq!(index.wage_on("not-a-date"), 500.0);
    }

    #[test]
    fn duplicate_dates_keep_the_last_value() {
        let records = vec![
            WageRecord::new("2023-12-05", 100.0),
            WageRecord::new("2023-12-05", 250.0),
        ];

        let index = build_wage_index(&records, december_2023());
        assert_eq!(index.wage_on("2023-12-05"), 250.0);
        assert_eq!(index.monthly_total, 350.0);
    }

    #[test]
    fn non_numeric_wages_become_zero() {
        let dataset: WageDataset = serde_json::from_value(json!({
            "userName": "Li Si",
            "records": [
                { "date": "2023-12-01", "wage": null },
                { "date": "2023-12-02" },
                { "date": "2023-12-03", "wage": "abc" },
                { "date": "2023-12-04", "wage": { "value": 3 } },
                { "date": "2023-12-05", "wage": true },
                { "date": "2023-12-06", "wage": "42.5" },
                { "date": "2023-12-07", "amount": 300 }
            ]
        }))
        .expect("lenient dataset");

        let wages: Vec<f64> = dataset.records.iter().map(|record| record.wage).collect();
        assert_eq!(wages, vec![0.0, 0.0, 0.0, 0.0, 0.0, 42.5, 300.0]);

        let index = build_wage_index(&dataset.records, december_2023());
        assert_eq!(index.monthly_total, 342.5);
        assert!(!index.monthly_total.is_nan());
    }

    #[test]
    fn malformed_fields_do_not_discard_the_dataset() {
        let dataset: WageDataset = serde_json::from_value(json!({
            "userName": "Real Worker",
            "records": [
                { "date": "2023-12-01", "wage": 999 },
                { "date": null, "wage": 5 },
                { "date": 20231202, "wage": 7 },
                null,
                "2023-12-03"
            ]
        }))
        .expect("lenient dataset");

        assert_eq!(dataset.user_name, "Real Worker");
        assert_eq!(
            dataset.records,
            vec![
                WageRecord::new("2023-12-01", 999.0),
                WageRecord::new("", 5.0),
                WageRecord::new("", 7.0),
            ]
        );

        let index = build_wage_index(&dataset.records, december_2023());
        assert_eq!(index.monthly_total, 999.0);
        assert_eq!(index.wage_on("2023-12-01"), 999.0);
    }

    #[test]
    fn null_name_and_records_give_an_empty_dataset() {
        let dataset: WageDataset =
            serde_json::from_value(json!({ "userName": null, "records": null })).expect("lenient dataset");
        assert_eq!(dataset, WageDataset::default());
    }

    #[test]
    fn coerce_rejects_non_finite_text() {
        assert_eq!(coerce_wage(&json!("inf")), 0.0);
        assert_eq!(coerce_wage(&json!("NaN")), 0.0);
        assert_eq!(coerce_wage(&json!(" 12 ")), 12.0);
    }
}
