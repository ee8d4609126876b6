//! Immutable in-memory record store.
//!
//! The store is built once from already-typed rows and never mutated after
//! that. It only offers two primitives, order-preserving `filter` and
//! first-occurrence-ordered `group_by`; every ordering a view needs is applied
//! explicitly by the aggregation engine.

use std::hash::Hash;

use hashlink::LinkedHashMap;
use serde::Serialize;

use crate::domain::SalesRecord;
use crate::error::DataFormatError;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<SalesRecord>,
}

/// Summary stats about the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub records: usize,
    pub recession_records: usize,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    /// Distinct vehicle types in first-seen order.
    pub vehicle_types: Vec<String>,
}

impl RecordStore {
    /// Build a store from rows in dataset order.
    ///
    /// Rows are checked for values the aggregations cannot accept (negative or
    /// non-finite sales/expenditure, non-finite unemployment rate, empty
    /// vehicle type). Failures name the 0-based row index.
    pub fn load(rows: Vec<SalesRecord>) -> Result<Self, DataFormatError> {
        for (row, record) in rows.iter().enumerate() {
            check_record(record).map_err(|rejected| DataFormatError::InvalidRow {
                row,
                column: rejected.column,
                value: rejected.value,
                expected: rejected.expected,
            })?;
        }
        Ok(Self { records: rows })
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matching records, relative order preserved.
    pub fn filter<P>(&self, predicate: P) -> Vec<&SalesRecord>
    where
        P: Fn(&SalesRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Group all records by `key_fn`; keys iterate in first-occurrence order.
    pub fn group_by<K, F>(&self, key_fn: F) -> LinkedHashMap<K, Vec<&SalesRecord>>
    where
        K: Hash + Eq,
        F: Fn(&SalesRecord) -> K,
    {
        group_records(self.records.iter(), key_fn)
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn summary(&self) -> StoreSummary {
        let years = self.years();
        StoreSummary {
            records: self.records.len(),
            recession_records: self.records.iter().filter(|r| r.is_recession).count(),
            year_min: years.first().copied(),
            year_max: years.last().copied(),
            vehicle_types: self
                .group_by(|r| r.vehicle_type.clone())
                .into_iter()
                .map(|(vt, _)| vt)
                .collect(),
        }
    }
}

/// Group an already-filtered record sequence, keeping first-occurrence key order.
pub fn group_records<'a, K, F, I>(records: I, key_fn: F) -> LinkedHashMap<K, Vec<&'a SalesRecord>>
where
    K: Hash + Eq,
    F: Fn(&SalesRecord) -> K,
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut groups: LinkedHashMap<K, Vec<&'a SalesRecord>> = LinkedHashMap::new();
    for record in records {
        let key = key_fn(record);
        match groups.get_mut(&key) {
            Some(members) => members.push(record),
            None => {
                groups.insert(key, vec![record]);
            }
        }
    }
    groups
}

/// A typed value the aggregations cannot accept.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RejectedValue {
    pub column: &'static str,
    pub value: String,
    pub expected: &'static str,
}

pub(crate) fn check_record(record: &SalesRecord) -> Result<(), RejectedValue> {
    if record.vehicle_type.trim().is_empty() {
        return Err(RejectedValue {
            column: "Vehicle_Type",
            value: record.vehicle_type.clone(),
            expected: "a non-empty label",
        });
    }
    check_non_negative(record.automobile_sales, "Automobile_Sales")?;
    check_non_negative(record.advertising_expenditure, "Advertising_Expenditure")?;
    if !record.unemployment_rate.is_finite() {
        return Err(RejectedValue {
            column: "unemployment_rate",
            value: record.unemployment_rate.to_string(),
            expected: "a finite number",
        });
    }
    Ok(())
}

fn check_non_negative(value: f64, column: &'static str) -> Result<(), RejectedValue> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(RejectedValue {
        column,
        value: value.to_string(),
        expected: "a finite, non-negative number",
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{Month, SalesRecord};

    pub fn record(
        year: i32,
        month: Month,
        vehicle_type: &str,
        sales: f64,
        advertising: f64,
        unemployment: f64,
        recession: bool,
    ) -> SalesRecord {
        SalesRecord {
            year,
            month,
            vehicle_type: vehicle_type.to_string(),
            automobile_sales: sales,
            advertising_expenditure: advertising,
            unemployment_rate: unemployment,
            is_recession: recession,
        }
    }

    /// The three-row dataset used throughout the worked examples.
    pub fn worked_example() -> Vec<SalesRecord> {
        vec![
            record(2009, Month::Jan, "SUV", 100.0, 50.0, 8.0, true),
            record(2009, Month::Feb, "SUV", 120.0, 60.0, 8.0, true),
            record(2010, Month::Jan, "SUV", 200.0, 80.0, 5.0, false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{record, worked_example};
    use super::*;
    use crate::domain::Month;

    #[test]
    fn filter_preserves_relative_order() {
        let store = RecordStore::load(vec![
            record(2001, Month::Mar, "SUV", 1.0, 0.0, 5.0, false),
            record(1999, Month::Jan, "Sports", 2.0, 0.0, 5.0, true),
            record(2000, Month::Feb, "SUV", 3.0, 0.0, 5.0, true),
        ])
        .unwrap();

        let hits = store.filter(|r| r.is_recession);
        let sales: Vec<f64> = hits.iter().map(|r| r.automobile_sales).collect();
        assert_eq!(sales, vec![2.0, 3.0]);
    }

    #[test]
    fn group_by_uses_first_occurrence_order() {
        let store = RecordStore::load(vec![
            record(2001, Month::Jan, "Sports", 1.0, 0.0, 5.0, false),
            record(2001, Month::Jan, "SUV", 2.0, 0.0, 5.0, false),
            record(2001, Month::Jan, "Sports", 3.0, 0.0, 5.0, false),
        ])
        .unwrap();

        let groups = store.group_by(|r| r.vehicle_type.clone());
        let keys: Vec<&String> = groups.keys().collect();
        assert_eq!(keys, vec!["Sports", "SUV"]);
        assert_eq!(groups.get("Sports").map(Vec::len), Some(2));
    }

    #[test]
    fn load_rejects_negative_sales_by_row_index() {
        let err = RecordStore::load(vec![
            record(2001, Month::Jan, "SUV", 1.0, 0.0, 5.0, false),
            record(2001, Month::Feb, "SUV", -4.0, 0.0, 5.0, false),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            DataFormatError::InvalidRow { row: 1, column: "Automobile_Sales", .. }
        ));
        assert!(err.to_string().starts_with("row 1: invalid `Automobile_Sales` value '-4'"));
    }

    #[test]
    fn summary_reports_ranges_and_types() {
        let store = RecordStore::load(worked_example()).unwrap();
        let summary = store.summary();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.recession_records, 2);
        assert_eq!(summary.year_min, Some(2009));
        assert_eq!(summary.year_max, Some(2010));
        assert_eq!(summary.vehicle_types, vec!["SUV".to_string()]);
    }

    #[test]
    fn empty_store_is_valid() {
        let store = RecordStore::load(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.summary().year_min, None);
    }
}
