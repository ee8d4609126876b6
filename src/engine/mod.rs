//! Selection-dependent aggregation.
//!
//! `compute` is a pure function of the store contents and a ready selection.
//! It always returns four views in a fixed order:
//!
//! - recession branch: everything is computed over recession-flagged records
//! - yearly branch: views 1–2 use the whole dataset, views 3–4 only the
//!   selected year
//!
//! Row order is explicit for every view (ascending year, calendar month,
//! first-seen vehicle type) and never depends on hash or group iteration.

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::SalesRecord;
use crate::selection::ReadySelection;
use crate::store::{RecordStore, group_records};

pub mod cache;
pub mod table;

pub use cache::ViewCache;
pub use table::*;

/// Compute the four views for a ready selection.
pub fn compute(store: &RecordStore, selection: ReadySelection) -> Vec<DerivedView> {
    match selection {
        ReadySelection::Recession => recession_views(store),
        ReadySelection::Yearly { year } => yearly_views(store, year),
    }
}

fn recession_views(store: &RecordStore) -> Vec<DerivedView> {
    let rec = store.filter(|r| r.is_recession);

    vec![
        DerivedView {
            title: "Average Automobile Sales During Recession Periods".to_string(),
            kind: ChartKind::Line,
            encoding: line_encoding(COL_YEAR),
            table: average_sales_by(&rec, COL_YEAR, |r| r.year, Cell::Year),
        },
        DerivedView {
            title: "Average Sales by Vehicle Type During Recession Periods".to_string(),
            kind: ChartKind::GroupedBar,
            encoding: bar_encoding(COL_YEAR),
            table: average_sales_by_period_and_type(&rec, COL_YEAR, |r| r.year, Cell::Year),
        },
        DerivedView {
            title: "Advertising Expenditure Share by Vehicle Type During Recessions".to_string(),
            kind: ChartKind::Pie,
            encoding: pie_encoding(),
            table: advertising_by_type(&rec),
        },
        DerivedView {
            title: "Unemployment Rate vs Automobile Sales by Vehicle Type".to_string(),
            kind: ChartKind::BubbleScatter,
            encoding: ChartEncoding {
                x: COL_UNEMPLOYMENT,
                y: COL_SALES,
                series: Some(COL_VEHICLE_TYPE),
                size: Some(COL_SALES),
            },
            table: unemployment_vs_sales(&rec),
        },
    ]
}

fn yearly_views(store: &RecordStore, year: i32) -> Vec<DerivedView> {
    let all: Vec<&SalesRecord> = store.records().iter().collect();
    let selected = store.filter(|r| r.year == year);

    vec![
        DerivedView {
            title: "Average Yearly Automobile Sales (All Years)".to_string(),
            kind: ChartKind::Line,
            encoding: line_encoding(COL_YEAR),
            table: average_sales_by(&all, COL_YEAR, |r| r.year, Cell::Year),
        },
        DerivedView {
            title: "Average Monthly Automobile Sales (All Years)".to_string(),
            kind: ChartKind::Line,
            encoding: line_encoding(COL_MONTH),
            table: average_sales_by(&all, COL_MONTH, |r| r.month, Cell::Month),
        },
        DerivedView {
            title: format!("Average Sales by Vehicle Type in {year}"),
            kind: ChartKind::GroupedBar,
            encoding: bar_encoding(COL_MONTH),
            table: average_sales_by_period_and_type(&selected, COL_MONTH, |r| r.month, Cell::Month),
        },
        DerivedView {
            title: format!("Advertising Expenditure Share by Vehicle Type in {year}"),
            kind: ChartKind::Pie,
            encoding: pie_encoding(),
            table: advertising_by_type(&selected),
        },
    ]
}

fn line_encoding(x: &'static str) -> ChartEncoding {
    ChartEncoding {
        x,
        y: COL_SALES,
        series: None,
        size: None,
    }
}

fn bar_encoding(x: &'static str) -> ChartEncoding {
    ChartEncoding {
        x,
        y: COL_SALES,
        series: Some(COL_VEHICLE_TYPE),
        size: None,
    }
}

fn pie_encoding() -> ChartEncoding {
    ChartEncoding {
        x: COL_VEHICLE_TYPE,
        y: COL_ADVERTISING,
        series: None,
        size: None,
    }
}

/// Mean sales per period key, rows ascending by key.
fn average_sales_by<K, F, C>(records: &[&SalesRecord], column: &'static str, key: F, cell: C) -> ViewTable
where
    K: Ord + Hash + Copy,
    F: Fn(&SalesRecord) -> K,
    C: Fn(K) -> Cell,
{
    let groups = group_records(records.iter().copied(), key);
    let mut rows: Vec<(K, f64)> = groups
        .iter()
        .map(|(k, members)| (*k, mean(members, |r| r.automobile_sales)))
        .collect();
    rows.sort_by_key(|(k, _)| *k);

    let mut table = ViewTable::new(vec![column, COL_SALES]);
    table.rows = rows
        .into_iter()
        .map(|(k, avg)| vec![cell(k), Cell::Number(avg)])
        .collect();
    table
}

/// Mean sales per (period, vehicle type); rows ascending by period, then by
/// the order in which each vehicle type first appears in `records`.
fn average_sales_by_period_and_type<K, F, C>(
    records: &[&SalesRecord],
    column: &'static str,
    key: F,
    cell: C,
) -> ViewTable
where
    K: Ord + Hash + Copy,
    F: Fn(&SalesRecord) -> K,
    C: Fn(K) -> Cell,
{
    let rank = first_seen_rank(records);
    let groups = group_records(records.iter().copied(), |r| (key(r), r.vehicle_type.clone()));

    let mut rows: Vec<(K, usize, String, f64)> = groups
        .iter()
        .map(|((k, vt), members)| {
            let order = rank.get(vt.as_str()).copied().unwrap_or(usize::MAX);
            (*k, order, vt.clone(), mean(members, |r| r.automobile_sales))
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut table = ViewTable::new(vec![column, COL_VEHICLE_TYPE, COL_SALES]);
    table.rows = rows
        .into_iter()
        .map(|(k, _, vt, avg)| vec![cell(k), Cell::Label(vt), Cell::Number(avg)])
        .collect();
    table
}

/// Total advertising expenditure per vehicle type, first-seen order.
/// Zero totals are kept.
fn advertising_by_type(records: &[&SalesRecord]) -> ViewTable {
    let groups = group_records(records.iter().copied(), |r| r.vehicle_type.clone());

    let mut table = ViewTable::new(vec![COL_VEHICLE_TYPE, COL_ADVERTISING]);
    table.rows = groups
        .iter()
        .map(|(vt, members)| {
            let total: f64 = members.iter().map(|r| r.advertising_expenditure).sum();
            vec![Cell::Label(vt.clone()), Cell::Number(total)]
        })
        .collect();
    table
}

/// Mean unemployment rate and mean sales per vehicle type, first-seen order.
fn unemployment_vs_sales(records: &[&SalesRecord]) -> ViewTable {
    let groups = group_records(records.iter().copied(), |r| r.vehicle_type.clone());

    let mut table = ViewTable::new(vec![COL_VEHICLE_TYPE, COL_UNEMPLOYMENT, COL_SALES]);
    table.rows = groups
        .iter()
        .map(|(vt, members)| {
            vec![
                Cell::Label(vt.clone()),
                Cell::Number(mean(members, |r| r.unemployment_rate)),
                Cell::Number(mean(members, |r| r.automobile_sales)),
            ]
        })
        .collect();
    table
}

fn first_seen_rank<'a>(records: &[&'a SalesRecord]) -> HashMap<&'a str, usize> {
    let mut rank = HashMap::new();
    for r in records {
        let next = rank.len();
        rank.entry(r.vehicle_type.as_str()).or_insert(next);
    }
    rank
}

/// Groups are only built for keys with at least one member, so `len > 0`.
fn mean(members: &[&SalesRecord], value: impl Fn(&SalesRecord) -> f64) -> f64 {
    let sum: f64 = members.iter().map(|r| value(r)).sum();
    sum / members.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Month;
    use crate::store::fixtures::{record, worked_example};

    fn store(rows: Vec<SalesRecord>) -> RecordStore {
        RecordStore::load(rows).unwrap()
    }

    fn yearly(year: i32) -> ReadySelection {
        ReadySelection::Yearly { year }
    }

    #[test]
    fn recession_view_excludes_non_recession_years() {
        let views = compute(&store(worked_example()), ReadySelection::Recession);
        assert_eq!(views.len(), 4);
        assert_eq!(views[0].kind, ChartKind::Line);
        assert_eq!(views[0].table.rows, vec![vec![Cell::Year(2009), Cell::Number(110.0)]]);
    }

    #[test]
    fn recession_views_ignore_non_recession_records() {
        let base = worked_example();
        let mut noisy = base.clone();
        noisy.push(record(2009, Month::Mar, "SUV", 9_999.0, 9_999.0, 99.0, false));
        noisy.push(record(2009, Month::Apr, "Sports", 9_999.0, 9_999.0, 99.0, false));

        let a = compute(&store(base), ReadySelection::Recession);
        let b = compute(&store(noisy), ReadySelection::Recession);
        assert_eq!(a, b);
    }

    #[test]
    fn yearly_worked_example() {
        let views = compute(&store(worked_example()), yearly(2009));

        assert_eq!(
            views[0].table.rows,
            vec![
                vec![Cell::Year(2009), Cell::Number(110.0)],
                vec![Cell::Year(2010), Cell::Number(200.0)],
            ]
        );
        assert_eq!(
            views[2].table.rows,
            vec![
                vec![Cell::Month(Month::Jan), Cell::Label("SUV".into()), Cell::Number(100.0)],
                vec![Cell::Month(Month::Feb), Cell::Label("SUV".into()), Cell::Number(120.0)],
            ]
        );
        assert_eq!(views[2].title, "Average Sales by Vehicle Type in 2009");
        assert_eq!(views[3].title, "Advertising Expenditure Share by Vehicle Type in 2009");
    }

    #[test]
    fn overview_views_do_not_depend_on_selected_year() {
        let s = store(worked_example());
        let a = compute(&s, yearly(2009));
        let b = compute(&s, yearly(2010));
        assert_eq!(a[0], b[0]);
        assert_eq!(a[1], b[1]);
        assert_ne!(a[2], b[2]);
    }

    #[test]
    fn monthly_rows_follow_calendar_order() {
        let s = store(vec![
            record(2000, Month::Dec, "SUV", 12.0, 0.0, 5.0, false),
            record(2000, Month::Mar, "SUV", 3.0, 0.0, 5.0, false),
            record(2001, Month::Jan, "SUV", 1.0, 0.0, 5.0, false),
            record(2001, Month::Mar, "SUV", 5.0, 0.0, 5.0, false),
        ]);
        let views = compute(&s, yearly(2000));
        let months: Vec<String> = views[1].table.column(COL_MONTH).iter().map(|c| c.label()).collect();
        assert_eq!(months, vec!["Jan", "Mar", "Dec"]);
        assert_eq!(views[1].table.numbers(COL_SALES), vec![1.0, 4.0, 12.0]);
    }

    #[test]
    fn yearly_grouped_bar_sorts_by_month_then_first_seen_type() {
        let s = store(vec![
            record(2004, Month::Jan, "SUV", 99.0, 0.0, 5.0, false),
            record(2005, Month::Dec, "Sports", 1.0, 0.0, 5.0, false),
            record(2005, Month::Mar, "SUV", 2.0, 0.0, 5.0, false),
            record(2005, Month::Jan, "SUV", 3.0, 0.0, 5.0, false),
            record(2005, Month::Jan, "Sports", 4.0, 0.0, 5.0, false),
            record(2005, Month::Dec, "SUV", 5.0, 0.0, 5.0, false),
        ]);
        let views = compute(&s, yearly(2005));
        let labels: Vec<String> = views[2]
            .table
            .rows
            .iter()
            .map(|row| format!("{}/{}", row[0].label(), row[1].label()))
            .collect();
        assert_eq!(
            labels,
            vec!["Jan/Sports", "Jan/SUV", "Mar/SUV", "Dec/Sports", "Dec/SUV"]
        );
        assert_eq!(views[2].table.numbers(COL_SALES), vec![4.0, 3.0, 2.0, 1.0, 5.0]);
    }

    #[test]
    fn grouped_bar_orders_types_by_first_appearance() {
        let s = store(vec![
            record(2001, Month::Jan, "Sports", 10.0, 0.0, 5.0, true),
            record(2000, Month::Jan, "SUV", 20.0, 0.0, 5.0, true),
            record(2000, Month::Feb, "Sports", 30.0, 0.0, 5.0, true),
            record(2001, Month::Feb, "SUV", 40.0, 0.0, 5.0, true),
        ]);
        let views = compute(&s, ReadySelection::Recession);
        let labels: Vec<String> = views[1]
            .table
            .rows
            .iter()
            .map(|row| format!("{}/{}", row[0].label(), row[1].label()))
            .collect();
        assert_eq!(labels, vec!["2000/Sports", "2000/SUV", "2001/Sports", "2001/SUV"]);
    }

    #[test]
    fn advertising_share_sums_to_total_and_keeps_zero_groups() {
        let s = store(vec![
            record(2008, Month::Jan, "SUV", 10.0, 120.5, 6.0, true),
            record(2008, Month::Feb, "Sports", 10.0, 0.0, 6.0, true),
            record(2008, Month::Mar, "SUV", 10.0, 79.5, 6.0, true),
            record(2008, Month::Apr, "Trucks", 10.0, 300.0, 6.0, false),
        ]);
        let views = compute(&s, ReadySelection::Recession);
        let pie = &views[2];
        assert_eq!(pie.kind, ChartKind::Pie);
        assert_eq!(
            pie.table.rows,
            vec![
                vec![Cell::Label("SUV".into()), Cell::Number(200.0)],
                vec![Cell::Label("Sports".into()), Cell::Number(0.0)],
            ]
        );

        let yearly_views = compute(&s, yearly(2008));
        let total: f64 = yearly_views[3].table.numbers(COL_ADVERTISING).iter().sum();
        assert_eq!(total, 500.0);
    }

    #[test]
    fn bubble_view_uses_group_means() {
        let s = store(vec![
            record(2008, Month::Jan, "SUV", 100.0, 0.0, 6.0, true),
            record(2008, Month::Feb, "SUV", 300.0, 0.0, 8.0, true),
            record(2009, Month::Jan, "Sports", 50.0, 0.0, 9.0, true),
        ]);
        let views = compute(&s, ReadySelection::Recession);
        let bubble = &views[3];
        assert_eq!(bubble.kind, ChartKind::BubbleScatter);
        assert_eq!(bubble.encoding.size, Some(COL_SALES));
        assert_eq!(
            bubble.table.rows[0],
            vec![Cell::Label("SUV".into()), Cell::Number(7.0), Cell::Number(200.0)]
        );
    }

    #[test]
    fn absent_year_yields_empty_tables_not_missing_views() {
        let views = compute(&store(worked_example()), yearly(1985));
        assert_eq!(views.len(), 4);
        assert!(views[2].table.is_empty());
        assert!(views[3].table.is_empty());
        assert!(!views[0].table.is_empty());
    }

    #[test]
    fn recession_views_empty_without_recession_rows() {
        let s = store(vec![record(2010, Month::Jan, "SUV", 200.0, 80.0, 5.0, false)]);
        let views = compute(&s, ReadySelection::Recession);
        assert_eq!(views.len(), 4);
        assert!(views.iter().all(|v| v.table.is_empty()));
    }

    #[test]
    fn compute_is_idempotent() {
        let s = store(worked_example());
        assert_eq!(compute(&s, yearly(2009)), compute(&s, yearly(2009)));
        assert_eq!(compute(&s, ReadySelection::Recession), compute(&s, ReadySelection::Recession));
    }
}
