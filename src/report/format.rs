//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays free of presentation concerns
//! - output changes are localized (the tests below are golden snapshots)

use crate::compose::{Panel, PresentationBundle};
use crate::engine::{Cell, ChartKind, DerivedView};
use crate::store::StoreSummary;

/// Format the dataset summary shown before any report.
pub fn format_store_summary(summary: &StoreSummary, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== autodash - Automobile Sales Statistics ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Records: n={} | recession={}\n",
        summary.records, summary.recession_records
    ));
    match (summary.year_min, summary.year_max) {
        (Some(min), Some(max)) => out.push_str(&format!("Years: {min}-{max}\n")),
        _ => out.push_str("Years: -\n"),
    }
    out.push_str(&format!("Vehicle types: {}\n", summary.vehicle_types.join(", ")));

    out
}

/// Format a bundle: the placeholder message, or every panel as a table.
pub fn format_bundle(bundle: &PresentationBundle) -> String {
    match bundle {
        PresentationBundle::Placeholder { message } => format!("{message}\n"),
        PresentationBundle::Views { heading, panels } => {
            let mut out = format!("=== {heading} ===\n");
            for (idx, panel) in panels.iter().enumerate() {
                out.push('\n');
                out.push_str(&format_panel(idx + 1, panel));
            }
            out
        }
    }
}

fn format_panel(number: usize, panel: &Panel) -> String {
    let view = &panel.view;
    let mut out = format!("[{number}] {} ({})\n", view.title, view.kind.display_name());
    if view.table.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }
    out.push_str(&format_table(view));
    out
}

fn format_table(view: &DerivedView) -> String {
    let mut headers: Vec<String> = view.table.columns.iter().map(|c| c.to_string()).collect();
    let mut rows: Vec<Vec<(String, bool)>> = view
        .table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| (cell.label(), is_numeric(cell))).collect())
        .collect();

    // Pie views get a share column so the text output carries the slice sizes.
    if view.kind == ChartKind::Pie {
        let values = view.table.numbers(view.encoding.y);
        let total: f64 = values.iter().sum();
        headers.push("share".to_string());
        for (row, value) in rows.iter_mut().zip(values) {
            let share = if total > 0.0 {
                format!("{:.1}%", value / total * 100.0)
            } else {
                "-".to_string()
            };
            row.push((share, true));
        }
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|(text, _)| text.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{h:<w$}"))
        .collect();
    out.push_str(header_line.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((text, numeric), &w)| {
                if *numeric {
                    format!("{text:>w$}")
                } else {
                    format!("{:<w$}", truncate(text, w))
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}

fn is_numeric(cell: &Cell) -> bool {
    matches!(cell, Cell::Number(_) | Cell::Year(_))
}

/// Vehicle type labels are free text; keep table rows on one line.
const MAX_LABEL: usize = 24;

fn truncate(s: &str, max: usize) -> String {
    let max = max.min(MAX_LABEL);
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

/// Distinct series names of a grouped view, first-seen order.
pub fn series_labels(view: &DerivedView) -> Vec<String> {
    let Some(series) = view.encoding.series else {
        return Vec::new();
    };
    let mut seen: Vec<String> = Vec::new();
    for cell in view.table.column(series) {
        let label = cell.label();
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::domain::Month;
    use crate::engine::compute;
    use crate::selection::ReadySelection;
    use crate::store::RecordStore;
    use crate::store::fixtures::{record, worked_example};

    #[test]
    fn placeholder_prints_message_only() {
        assert_eq!(
            format_bundle(&compose(None, None)),
            "Please select a report type and year (if applicable).\n"
        );
    }

    #[test]
    fn recession_bundle_golden_snapshot() {
        let store = RecordStore::load(worked_example()).unwrap();
        let views = compute(&store, ReadySelection::Recession);
        let txt = format_bundle(&compose(Some(ReadySelection::Recession), Some(views.as_slice())));

        let expected = concat!(
            "=== Recession Period Statistics ===\n",
            "\n",
            "[1] Average Automobile Sales During Recession Periods (line)\n",
            "year  automobile_sales\n",
            "----  ----------------\n",
            "2009            110.00\n",
            "\n",
            "[2] Average Sales by Vehicle Type During Recession Periods (grouped bar)\n",
            "year  vehicle_type  automobile_sales\n",
            "----  ------------  ----------------\n",
            "2009  SUV                     110.00\n",
            "\n",
            "[3] Advertising Expenditure Share by Vehicle Type During Recessions (pie)\n",
            "vehicle_type  advertising_expenditure  share\n",
            "------------  -----------------------  ------\n",
            "SUV                            110.00  100.0%\n",
            "\n",
            "[4] Unemployment Rate vs Automobile Sales by Vehicle Type (bubble scatter)\n",
            "vehicle_type  unemployment_rate  automobile_sales\n",
            "------------  -----------------  ----------------\n",
            "SUV                        8.00            110.00\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_view_prints_no_data() {
        let store = RecordStore::load(worked_example()).unwrap();
        let sel = ReadySelection::Yearly { year: 1985 };
        let views = compute(&store, sel);
        let txt = format_bundle(&compose(Some(sel), Some(views.as_slice())));
        assert!(txt.contains("[3] Average Sales by Vehicle Type in 1985 (grouped bar)\n(no data)\n"));
    }

    #[test]
    fn series_labels_are_first_seen_unique() {
        let store = RecordStore::load(vec![
            record(2000, Month::Jan, "Sports", 1.0, 0.0, 5.0, true),
            record(2000, Month::Jan, "SUV", 1.0, 0.0, 5.0, true),
            record(2001, Month::Jan, "Sports", 1.0, 0.0, 5.0, true),
        ])
        .unwrap();
        let views = compute(&store, ReadySelection::Recession);
        assert_eq!(series_labels(&views[1]), vec!["Sports", "SUV"]);
        assert!(series_labels(&views[0]).is_empty());
    }
}
