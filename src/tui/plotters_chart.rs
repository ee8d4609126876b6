//! Plotters-powered chart widget for one dashboard panel.
//!
//! Line, grouped bar and bubble views are drawn with Plotters and rendered
//! into the Ratatui buffer using `plotters-ratatui-backend`. Pie views are
//! drawn as share bars by the caller.
//!
//! All series and bounds are prepared in `ChartData::from_view`, outside the
//! render call, so the data prep is testable without a terminal.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::engine::{ChartKind, DerivedView};
use crate::report::series_labels;

/// High-contrast palette, indexed by series.
const PALETTE: [(u8, u8, u8); 7] = [
    (0, 255, 255),
    (0, 255, 0),
    (255, 80, 80),
    (255, 255, 0),
    (255, 0, 255),
    (100, 149, 237),
    (255, 165, 0),
];

pub fn series_rgb(idx: usize) -> (u8, u8, u8) {
    PALETTE[idx % PALETTE.len()]
}

/// Same palette entry as a Ratatui color, for legends and share bars.
pub fn series_color(idx: usize) -> Color {
    let (r, g, b) = series_rgb(idx);
    Color::Rgb(r, g, b)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub name: String,
    /// `(x, y)` in chart coordinates. Categorical axes use the category index.
    pub points: Vec<(f64, f64)>,
    /// Bubble sizes, parallel to `points`. Empty for other kinds.
    pub sizes: Vec<f64>,
}

/// Render-ready description of a non-pie view.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    /// X tick labels for categorical axes; empty when x is numeric.
    pub categories: Vec<String>,
    pub series: Vec<PlotSeries>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_desc: &'static str,
    pub y_desc: &'static str,
}

impl ChartData {
    /// Returns `None` for pie views and empty tables.
    pub fn from_view(view: &DerivedView) -> Option<Self> {
        if view.table.is_empty() {
            return None;
        }
        let enc = view.encoding;
        let x_cells = view.table.column(enc.x);
        let ys = view.table.numbers(enc.y);

        let (categories, series) = match view.kind {
            ChartKind::Pie => return None,
            ChartKind::Line => {
                let categories: Vec<String> = x_cells.iter().map(|c| c.label()).collect();
                let points = ys.iter().enumerate().map(|(i, &y)| (i as f64, y)).collect();
                let series = vec![PlotSeries {
                    name: enc.y.to_string(),
                    points,
                    sizes: Vec::new(),
                }];
                (categories, series)
            }
            ChartKind::GroupedBar => {
                let mut categories: Vec<String> = Vec::new();
                for cell in &x_cells {
                    let label = cell.label();
                    if !categories.contains(&label) {
                        categories.push(label);
                    }
                }
                let names = series_labels(view);
                let row_series: Vec<String> = enc
                    .series
                    .map(|col| view.table.column(col).iter().map(|c| c.label()).collect())
                    .unwrap_or_default();

                let mut series: Vec<PlotSeries> = names
                    .into_iter()
                    .map(|name| PlotSeries {
                        name,
                        points: Vec::new(),
                        sizes: Vec::new(),
                    })
                    .collect();
                for ((x, name), &y) in x_cells.iter().zip(&row_series).zip(&ys) {
                    let label = x.label();
                    let cat = categories.iter().position(|c| *c == label).unwrap_or(0);
                    if let Some(s) = series.iter_mut().find(|s| s.name == *name) {
                        s.points.push((cat as f64, y));
                    }
                }
                (categories, series)
            }
            ChartKind::BubbleScatter => {
                let xs = view.table.numbers(enc.x);
                let sizes = enc.size.map(|col| view.table.numbers(col)).unwrap_or_default();
                let names: Vec<String> = enc
                    .series
                    .map(|col| view.table.column(col).iter().map(|c| c.label()).collect())
                    .unwrap_or_default();
                let series = xs
                    .iter()
                    .zip(&ys)
                    .enumerate()
                    .map(|(i, (&x, &y))| PlotSeries {
                        name: names.get(i).cloned().unwrap_or_default(),
                        points: vec![(x, y)],
                        sizes: sizes.get(i).copied().into_iter().collect(),
                    })
                    .collect();
                (Vec::new(), series)
            }
        };

        let all_x = series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
        let all_y: Vec<f64> = series.iter().flat_map(|s| s.points.iter().map(|p| p.1)).collect();

        let x_bounds = if categories.is_empty() {
            padded(min_max(all_x), 0.1)
        } else {
            [-0.5, categories.len() as f64 - 0.5]
        };
        let y_bounds = match view.kind {
            // Bars grow from zero.
            ChartKind::GroupedBar => {
                let max = all_y.iter().copied().fold(0.0_f64, f64::max);
                [0.0, if max > 0.0 { max * 1.1 } else { 1.0 }]
            }
            _ => padded(min_max(all_y.into_iter()), 0.05),
        };

        Some(Self {
            kind: view.kind,
            categories,
            series,
            x_bounds,
            y_bounds,
            x_desc: enc.x,
            y_desc: enc.y,
        })
    }

    fn category_label(&self, v: f64) -> String {
        let idx = v.round();
        if (v - idx).abs() > 0.25 || idx < 0.0 {
            return String::new();
        }
        self.categories.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn padded(range: Option<(f64, f64)>, frac: f64) -> [f64; 2] {
    let Some((lo, hi)) = range else {
        return [0.0, 1.0];
    };
    let pad = ((hi - lo).abs() * frac).max(0.5_f64.max(hi.abs() * 0.01));
    [lo - pad, hi + pad]
}

pub struct ViewChart<'a> {
    pub data: &'a ChartData,
}

impl<'a> Widget for ViewChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let data = self.data;
        let [x0, x1] = data.x_bounds;
        let [y0, y1] = data.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            let x_ticks = if data.categories.is_empty() {
                5
            } else {
                data.categories.len().min(12)
            };
            let fmt_x = |v: &f64| {
                if data.categories.is_empty() {
                    format!("{v:.1}")
                } else {
                    data.category_label(*v)
                }
            };

            // Mesh lines are noise at terminal resolution; axes and labels are enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(data.x_desc)
                .y_desc(data.y_desc)
                .x_labels(x_ticks)
                .y_labels(5)
                .x_label_formatter(&fmt_x)
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            match data.kind {
                ChartKind::Line => {
                    for (idx, s) in data.series.iter().enumerate() {
                        let (r, g, b) = series_rgb(idx);
                        let color = RGBColor(r, g, b);
                        chart.draw_series(LineSeries::new(s.points.iter().copied(), &color))?;
                        chart.draw_series(s.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;
                    }
                }
                ChartKind::GroupedBar => {
                    let slot = 0.8 / data.series.len().max(1) as f64;
                    for (idx, s) in data.series.iter().enumerate() {
                        let (r, g, b) = series_rgb(idx);
                        let color = RGBColor(r, g, b);
                        chart.draw_series(s.points.iter().map(|&(x, y)| {
                            let left = x - 0.4 + slot * idx as f64;
                            Rectangle::new([(left, 0.0), (left + slot, y)], color.filled())
                        }))?;
                    }
                }
                ChartKind::BubbleScatter => {
                    // `Circle` radii are mapped incorrectly by the ratatui backend
                    // (pixel radius -> normalized canvas units), so bubbles are
                    // drawn as rectangles sized in data coordinates.
                    let max_size = data
                        .series
                        .iter()
                        .flat_map(|s| s.sizes.iter().copied())
                        .fold(0.0_f64, f64::max);
                    let (dx_max, dy_max) = ((x1 - x0) * 0.04, (y1 - y0) * 0.06);
                    for (idx, s) in data.series.iter().enumerate() {
                        let (r, g, b) = series_rgb(idx);
                        let color = RGBColor(r, g, b);
                        for (i, &(x, y)) in s.points.iter().enumerate() {
                            let rel = match s.sizes.get(i) {
                                Some(&size) if max_size > 0.0 => (size / max_size).max(0.0).sqrt(),
                                _ => 0.5,
                            };
                            let (dx, dy) = (dx_max * rel, dy_max * rel);
                            chart.draw_series(std::iter::once(Rectangle::new(
                                [(x - dx, y - dy), (x + dx, y + dy)],
                                color,
                            )))?;
                            chart.draw_series(std::iter::once(Pixel::new((x, y), color)))?;
                        }
                    }
                }
                ChartKind::Pie => {}
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute;
    use crate::selection::ReadySelection;
    use crate::store::RecordStore;
    use crate::store::fixtures::worked_example;

    fn views(sel: ReadySelection) -> Vec<DerivedView> {
        compute(&RecordStore::load(worked_example()).unwrap(), sel)
    }

    #[test]
    fn line_view_uses_categorical_x() {
        let views = views(ReadySelection::Yearly { year: 2009 });
        let data = ChartData::from_view(&views[0]).unwrap();
        assert_eq!(data.kind, ChartKind::Line);
        assert_eq!(data.categories.len(), data.series[0].points.len());
        assert_eq!(data.x_bounds, [-0.5, data.categories.len() as f64 - 0.5]);
        assert_eq!(data.category_label(0.0), data.categories[0]);
        assert_eq!(data.category_label(0.5), "");
    }

    #[test]
    fn grouped_bars_split_rows_by_series() {
        let views = views(ReadySelection::Yearly { year: 2009 });
        let data = ChartData::from_view(&views[2]).unwrap();
        let total_points: usize = data.series.iter().map(|s| s.points.len()).sum();
        assert_eq!(total_points, views[2].table.rows.len());
        assert_eq!(data.y_bounds[0], 0.0);
        assert!(data.y_bounds[1] > 0.0);
    }

    #[test]
    fn bubble_view_has_one_series_per_vehicle_type() {
        let views = views(ReadySelection::Recession);
        let data = ChartData::from_view(&views[3]).unwrap();
        assert!(data.categories.is_empty());
        assert_eq!(data.series.len(), views[3].table.rows.len());
        assert!(data.series.iter().all(|s| s.sizes.len() == 1));
        assert!(data.x_bounds[0] < data.x_bounds[1]);
    }

    #[test]
    fn pie_and_empty_views_are_not_charted() {
        let views = views(ReadySelection::Yearly { year: 1990 });
        assert!(ChartData::from_view(&views[3]).is_none());
        assert!(ChartData::from_view(&views[2]).is_none());
    }
}
