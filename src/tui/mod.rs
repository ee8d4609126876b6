//! Ratatui-based terminal UI.
//!
//! The TUI provides two selectors (report type and year) above a 2x2 grid of
//! panels. Every selector change goes through the session, which recomputes
//! (or reuses) the views and recomposes the bundle.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::info;

use crate::app::session::DashboardSession;
use crate::compose::{Panel, PresentationBundle};
use crate::domain::{ReportCategory, YEAR_MAX, YEAR_MIN};
use crate::engine::{ChartKind, DerivedView};
use crate::error::AppError;
use crate::report::series_labels;
use crate::selection::YearSelector;
use crate::store::{RecordStore, StoreSummary};

mod plotters_chart;

use plotters_chart::{ChartData, ViewChart, series_color};

/// Start the TUI over an already loaded store.
pub fn run(store: Arc<RecordStore>, source: String) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(store, source);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Category,
    Year,
}

struct App {
    session: DashboardSession,
    source: String,
    /// The store never changes, so the header summary is computed once.
    summary: StoreSummary,
    focus: Field,
    year_selector: YearSelector,
    bundle: PresentationBundle,
    status: String,
}

impl App {
    fn new(store: Arc<RecordStore>, source: String) -> Self {
        let mut session = DashboardSession::new(store);
        let bundle = session.bundle();
        let year_selector = session.selection().year_selector();
        let summary = session.store().summary();
        Self {
            session,
            source,
            summary,
            focus: Field::Category,
            year_selector,
            bundle,
            status: "Choose a report type.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        info!("tui closed");
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Field::Category => Field::Year,
                    Field::Year => Field::Category,
                };
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => self.clear_field(),
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.focus {
            Field::Category => {
                let next = cycle_category(self.session.selection().category(), delta);
                self.apply_category(next);
            }
            Field::Year => {
                if !self.year_selector.enabled {
                    self.status = "Year applies to Yearly Statistics only.".to_string();
                    return;
                }
                let next = cycle_year(self.session.selection().stored_year(), delta);
                self.apply_year(next);
            }
        }
    }

    fn clear_field(&mut self) {
        match self.focus {
            Field::Category => self.apply_category(None),
            Field::Year => self.apply_year(None),
        }
    }

    fn apply_category(&mut self, category: Option<ReportCategory>) {
        let update = self.session.set_category(category);
        self.year_selector = update.year_selector;
        self.bundle = update.bundle;
        self.status = match category {
            Some(c) => format!("report: {}", c.display_name()),
            None => "report: -".to_string(),
        };
    }

    fn apply_year(&mut self, year: Option<i32>) {
        let update = self.session.set_year(year);
        self.year_selector = update.year_selector;
        self.bundle = update.bundle;
        self.status = match year {
            Some(y) => format!("year: {y}"),
            None => "year: -".to_string(),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_selectors(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let summary = &self.summary;
        let years = match (summary.year_min, summary.year_max) {
            (Some(min), Some(max)) => format!("{min}-{max}"),
            _ => "-".to_string(),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("autodash", Style::default().fg(Color::Cyan)),
                Span::raw(" | Automobile Sales Statistics Dashboard"),
            ]),
            Line::from(Span::styled(
                format!(
                    "source: {} | n={} | recession={} | years: {years}",
                    self.source, summary.records, summary.recession_records
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_selectors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let selection = self.session.selection();
        let category = selection
            .category()
            .map(|c| c.display_name().to_string())
            .unwrap_or_else(|| "Select a report type".to_string());
        let year = selection
            .stored_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Select a year".to_string());

        let focused = Style::default().fg(Color::Black).bg(Color::White);
        let value_style = |field: Field, enabled: bool| {
            if !enabled {
                Style::default().fg(Color::DarkGray)
            } else if self.focus == field {
                focused
            } else {
                Style::default()
            }
        };
        let marker = |field: Field| if self.focus == field { "» " } else { "  " };

        let year_enabled = self.year_selector.enabled;
        let lines = vec![
            Line::from(vec![
                Span::raw(marker(Field::Category)),
                Span::styled("Report type: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("‹ {category} ›"), value_style(Field::Category, true)),
            ]),
            Line::from(vec![
                Span::raw(marker(Field::Year)),
                Span::styled("Year:        ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("‹ {year} ›"), value_style(Field::Year, year_enabled)),
                Span::styled(
                    if year_enabled { "" } else { "  (disabled)" },
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Selection").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match &self.bundle {
            PresentationBundle::Placeholder { message } => {
                let block = Block::default().borders(Borders::ALL);
                let inner = block.inner(area);
                frame.render_widget(block, area);
                let msg = Paragraph::new(message.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let rect = Rect {
                    y: inner.y + inner.height / 2,
                    height: inner.height.min(1),
                    ..inner
                };
                frame.render_widget(msg, rect);
            }
            PresentationBundle::Views { heading, panels } => {
                let block = Block::default().title(heading.as_str()).borders(Borders::ALL);
                let inner = block.inner(area);
                frame.render_widget(block, area);

                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(inner);
                for (row_idx, row) in rows.iter().enumerate() {
                    let cells = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .split(*row);
                    for (col_idx, cell) in cells.iter().enumerate() {
                        if let Some(panel) = panels.get(row_idx * 2 + col_idx) {
                            draw_panel(frame, *cell, panel);
                        }
                    }
                }
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  x clear  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_panel(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel) {
    let view = &panel.view;
    let block = Block::default().title(view.title.as_str()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if view.table.is_empty() {
        let msg = Paragraph::new("No data for this selection.").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(msg, inner);
        return;
    }

    if view.kind == ChartKind::Pie {
        draw_share_bars(frame, inner, view);
        return;
    }

    let Some(data) = ChartData::from_view(view) else {
        return;
    };

    let legend = series_labels(view);
    let (chart_rect, legend_rect) = if legend.is_empty() || inner.height < 3 {
        (inner, None)
    } else {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        (parts[0], Some(parts[1]))
    };

    frame.render_widget(ViewChart { data: &data }, chart_rect);

    if let Some(rect) = legend_rect {
        let mut spans = Vec::new();
        for (idx, name) in legend.iter().enumerate() {
            spans.push(Span::styled("■ ", Style::default().fg(series_color(idx))));
            spans.push(Span::raw(format!("{name}  ")));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }
}

/// Pie views as one horizontal share bar per slice.
fn draw_share_bars(frame: &mut ratatui::Frame<'_>, area: Rect, view: &DerivedView) {
    let shares = pie_shares(view);
    let label_width = shares.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0).min(16);
    let bar_width = (area.width as usize).saturating_sub(label_width + 10);

    let lines: Vec<Line> = shares
        .iter()
        .enumerate()
        .map(|(idx, (label, share))| {
            let filled = (share * bar_width as f64).round() as usize;
            let label: String = label.chars().take(label_width).collect();
            Line::from(vec![
                Span::raw(format!("{label:<label_width$} ")),
                Span::styled("█".repeat(filled), Style::default().fg(series_color(idx))),
                Span::raw(format!(" {:>5.1}%", share * 100.0)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }), area);
}

/// `(label, share in 0..=1)` per slice; all zero when the total is zero.
fn pie_shares(view: &DerivedView) -> Vec<(String, f64)> {
    let labels = view.table.column(view.encoding.x);
    let values = view.table.numbers(view.encoding.y);
    let total: f64 = values.iter().sum();
    labels
        .iter()
        .zip(values)
        .map(|(label, v)| (label.label(), if total > 0.0 { v / total } else { 0.0 }))
        .collect()
}

/// Cycle through `[none, Yearly, Recession]`, wrapping at both ends.
fn cycle_category(current: Option<ReportCategory>, delta: i32) -> Option<ReportCategory> {
    let options: Vec<Option<ReportCategory>> = std::iter::once(None)
        .chain(ReportCategory::ALL.into_iter().map(Some))
        .collect();
    let idx = options.iter().position(|o| *o == current).unwrap_or(0) as i32;
    let n = options.len() as i32;
    options[(idx + delta).rem_euclid(n) as usize]
}

/// Step through `YEAR_MIN..=YEAR_MAX`; from "no year" go to either end.
/// A stored year outside the range snaps back into it.
fn cycle_year(current: Option<i32>, delta: i32) -> Option<i32> {
    let Some(year) = current else {
        return Some(if delta >= 0 { YEAR_MIN } else { YEAR_MAX });
    };
    Some((year + delta).clamp(YEAR_MIN, YEAR_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute;
    use crate::selection::ReadySelection;
    use crate::store::fixtures::worked_example;

    fn app() -> App {
        let store = Arc::new(RecordStore::load(worked_example()).unwrap());
        App::new(store, "test".to_string())
    }

    #[test]
    fn category_cycle_wraps_through_none() {
        assert_eq!(cycle_category(None, 1), Some(ReportCategory::YearlyStatistics));
        assert_eq!(cycle_category(Some(ReportCategory::YearlyStatistics), 1), Some(ReportCategory::RecessionStatistics));
        assert_eq!(cycle_category(Some(ReportCategory::RecessionStatistics), 1), None);
        assert_eq!(cycle_category(None, -1), Some(ReportCategory::RecessionStatistics));
    }

    #[test]
    fn year_cycle_stays_in_range() {
        assert_eq!(cycle_year(None, 1), Some(YEAR_MIN));
        assert_eq!(cycle_year(None, -1), Some(YEAR_MAX));
        assert_eq!(cycle_year(Some(2009), 1), Some(2010));
        assert_eq!(cycle_year(Some(YEAR_MAX), 1), Some(YEAR_MAX));
        assert_eq!(cycle_year(Some(YEAR_MIN), -1), Some(YEAR_MIN));
    }

    #[test]
    fn keys_drive_selection_to_yearly_views() {
        let mut app = app();
        assert!(app.bundle.is_placeholder());

        app.handle_key(KeyCode::Right);
        assert!(app.year_selector.enabled);
        assert!(app.bundle.is_placeholder());

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.session.selection().stored_year(), Some(YEAR_MIN));
        assert_eq!(app.bundle.panels().len(), 4);

        app.handle_key(KeyCode::Char('x'));
        assert!(app.bundle.is_placeholder());
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn year_keys_are_ignored_while_disabled() {
        let mut app = app();
        app.handle_key(KeyCode::Left);
        assert!(!app.year_selector.enabled);
        assert_eq!(app.bundle.panels().len(), 4);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.session.selection().stored_year(), None);
        assert_eq!(app.status, "Year applies to Yearly Statistics only.");
    }

    #[test]
    fn header_summary_is_computed_once_from_the_store() {
        let app = app();
        assert_eq!(app.summary, app.session.store().summary());
        assert_eq!(app.summary.records, 3);
        assert_eq!(app.summary.year_min, Some(2009));
    }

    #[test]
    fn pie_shares_sum_to_one() {
        let store = RecordStore::load(worked_example()).unwrap();
        let views = compute(&store, ReadySelection::Yearly { year: 2009 });
        let shares = pie_shares(&views[3]);
        let total: f64 = shares.iter().map(|(_, s)| s).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(shares[0].0, "SUV");
    }
}
