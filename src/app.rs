//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - resolves and loads the dataset
//! - drives a dashboard session for the report or the TUI

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::cli::{Command, ReportArgs, SourceArgs};
use crate::data::DataSource;
use crate::error::AppError;
use crate::logging::{LogTarget, default_log_file};
use crate::store::RecordStore;

pub mod session;

use session::DashboardSession;

/// Entry point for the `autodash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `autodash` and `autodash --data x.csv` to behave like `autodash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    crate::logging::init(LogTarget::Stderr)?;

    let (source, store) = load_store(&args.source)?;
    let mut session = DashboardSession::new(store);
    session.set_category(args.category.map(Into::into));
    let update = session.set_year(args.year);

    println!(
        "{}",
        crate::report::format_store_summary(&session.store().summary(), &source.describe())
    );
    print!("{}", crate::report::format_bundle(&update.bundle));

    if args.plot {
        for panel in update.bundle.panels() {
            if panel.view.kind == crate::engine::ChartKind::Line {
                println!();
                print!("{}", crate::plot::render_ascii_line(&panel.view, args.width, args.height));
            }
        }
    }

    if let Some(path) = &args.export {
        crate::io::export::write_bundle_json(path, &update.bundle)?;
    }

    Ok(())
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    crate::logging::init(LogTarget::File(default_log_file()))?;

    // Load before entering raw mode so load errors print normally.
    let (source, store) = load_store(&args)?;
    crate::tui::run(store, source.describe())
}

fn load_store(args: &SourceArgs) -> Result<(DataSource, Arc<RecordStore>), AppError> {
    let source = DataSource::resolve(args.data.as_deref(), args.url.as_deref())?;
    info!(source = %source.describe(), "loading dataset");
    let data = source.load()?;
    Ok((source, Arc::new(data.store)))
}

/// Rewrite argv so `autodash` defaults to `autodash tui`.
///
/// Rules:
/// - `autodash`                      -> `autodash tui`
/// - `autodash --data x.csv ...`     -> `autodash tui --data x.csv ...`
/// - `autodash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["autodash"])), argv(&["autodash", "tui"]));
    }

    #[test]
    fn leading_flags_are_tui_flags() {
        assert_eq!(
            rewrite_args(argv(&["autodash", "--data", "x.csv"])),
            argv(&["autodash", "tui", "--data", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        let report = argv(&["autodash", "report", "-c", "recession"]);
        assert_eq!(rewrite_args(report.clone()), report);
        assert_eq!(rewrite_args(argv(&["autodash", "--help"])), argv(&["autodash", "--help"]));
    }
}
