//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Only line views are plotted. Rows are placed at equal horizontal spacing in
//! table order, which is already the view's canonical x order.
//!
//! Plot elements:
//! - data points: `o`
//! - connecting segments: `-`

use crate::engine::{ChartKind, DerivedView};

/// Render a line view as a fixed-size ASCII plot.
pub fn render_ascii_line(view: &DerivedView, width: usize, height: usize) -> String {
    if view.kind != ChartKind::Line {
        return format!("Plot: {} | {} view (not plotted)\n", view.title, view.kind.display_name());
    }

    let ys = view.table.numbers(view.encoding.y);
    let xs: Vec<String> = view.table.column(view.encoding.x).iter().map(|c| c.label()).collect();
    let (Some(first_x), Some(last_x), Some(&first_y)) = (xs.first(), xs.last(), ys.first()) else {
        return format!("Plot: {} | no data\n", view.title);
    };

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(&ys).unwrap_or((first_y - 1.0, first_y + 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let cells: Vec<(usize, usize)> = ys
        .iter()
        .enumerate()
        .map(|(i, &y)| (map_index(i, ys.len(), width), map_y(y, y_min, y_max, height)))
        .collect();

    // Draw segments first (so points can overlay).
    for pair in cells.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | x=[{first_x}, {last_x}] | y=[{y_min:.2}, {y_max:.2}]\n",
        view.title
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(ys: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &y in ys {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_index(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute;
    use crate::selection::ReadySelection;
    use crate::store::RecordStore;
    use crate::store::fixtures::worked_example;

    #[test]
    fn plot_golden_snapshot_small() {
        let store = RecordStore::load(worked_example()).unwrap();
        let views = compute(&store, ReadySelection::Yearly { year: 2009 });

        let txt = render_ascii_line(&views[0], 10, 5);
        let expected = concat!(
            "Plot: Average Yearly Automobile Sales (All Years) | x=[2009, 2010] | y=[105.50, 204.50]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn non_line_and_empty_views_render_a_notice() {
        let store = RecordStore::load(worked_example()).unwrap();
        let views = compute(&store, ReadySelection::Yearly { year: 1985 });

        assert_eq!(
            render_ascii_line(&views[3], 10, 5),
            "Plot: Advertising Expenditure Share by Vehicle Type in 1985 | pie view (not plotted)\n"
        );

        let empty = compute(&RecordStore::load(Vec::new()).unwrap(), ReadySelection::Recession);
        assert_eq!(
            render_ascii_line(&empty[0], 10, 5),
            "Plot: Average Automobile Sales During Recession Periods | no data\n"
        );
    }
}
