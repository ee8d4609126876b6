//! Packages computed views for the rendering layer.
//!
//! The bundle is either a single placeholder message (selection incomplete)
//! or the four views in engine order, each with a layout hint.

use serde::Serialize;

use crate::engine::DerivedView;
use crate::selection::ReadySelection;

pub const PLACEHOLDER_MESSAGE: &str = "Please select a report type and year (if applicable).";

/// Purely presentational sizing hint for one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutHint {
    HalfWidth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub layout: LayoutHint,
    pub view: DerivedView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationBundle {
    Placeholder { message: String },
    Views { heading: String, panels: Vec<Panel> },
}

impl PresentationBundle {
    pub fn placeholder() -> Self {
        PresentationBundle::Placeholder {
            message: PLACEHOLDER_MESSAGE.to_string(),
        }
    }

    pub fn panels(&self) -> &[Panel] {
        match self {
            PresentationBundle::Placeholder { .. } => &[],
            PresentationBundle::Views { panels, .. } => panels,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PresentationBundle::Placeholder { .. })
    }
}

/// Compose the bundle for a selection.
///
/// `views` is ignored when the selection is not ready; a ready selection with
/// no views (which the engine never produces) also falls back to the
/// placeholder.
pub fn compose(selection: Option<ReadySelection>, views: Option<&[DerivedView]>) -> PresentationBundle {
    let (Some(selection), Some(views)) = (selection, views) else {
        return PresentationBundle::placeholder();
    };

    let heading = match selection {
        ReadySelection::Recession => selection.category().display_name().to_string(),
        ReadySelection::Yearly { year } => format!("{} ({year})", selection.category().display_name()),
    };

    PresentationBundle::Views {
        heading,
        panels: views
            .iter()
            .cloned()
            .map(|view| Panel {
                layout: LayoutHint::HalfWidth,
                view,
            })
            .collect(),
    }
}
