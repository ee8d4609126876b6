//! One dashboard session: selector state, memoized views, composed output.
//!
//! Keeping this in one place lets the CLI and the TUI share the same control
//! flow: event -> selection update -> (compute if ready) -> compose.
//!
//! The store is shared read-only; every session owns its own selection and
//! cache, so sessions never observe each other's choices.

use std::sync::Arc;

use tracing::info;

use crate::compose::{PresentationBundle, compose};
use crate::domain::ReportCategory;
use crate::engine::ViewCache;
use crate::selection::{SelectionEvent, SelectionStateMachine, YearSelector};
use crate::store::RecordStore;

/// What the UI shell needs after every event.
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub year_selector: YearSelector,
    pub bundle: PresentationBundle,
}

#[derive(Debug)]
pub struct DashboardSession {
    store: Arc<RecordStore>,
    selection: SelectionStateMachine,
    cache: ViewCache,
}

impl DashboardSession {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            selection: SelectionStateMachine::new(),
            cache: ViewCache::new(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionStateMachine {
        &self.selection
    }

    /// Apply one selector event and return the refreshed output.
    pub fn handle(&mut self, event: SelectionEvent) -> SessionUpdate {
        let year_selector = self.selection.handle(event);
        info!(?event, state = ?self.selection.state(), "selection event");
        SessionUpdate {
            year_selector,
            bundle: self.bundle(),
        }
    }

    pub fn set_category(&mut self, category: Option<ReportCategory>) -> SessionUpdate {
        self.handle(SelectionEvent::Category(category))
    }

    pub fn set_year(&mut self, year: Option<i32>) -> SessionUpdate {
        self.handle(SelectionEvent::Year(year))
    }

    /// Compose the bundle for the current selection.
    pub fn bundle(&mut self) -> PresentationBundle {
        let Some(ready) = self.selection.ready() else {
            return compose(None, None);
        };
        let views = self.cache.get_or_compute(&self.store, ready);
        compose(Some(ready), Some(&*views))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::PLACEHOLDER_MESSAGE;
    use crate::engine::{COL_SALES, Cell};
    use crate::store::fixtures::worked_example;

    fn session() -> DashboardSession {
        DashboardSession::new(Arc::new(RecordStore::load(worked_example()).unwrap()))
    }

    #[test]
    fn no_category_yields_placeholder() {
        let mut s = session();
        let update = s.set_year(Some(2009));
        assert!(!update.year_selector.enabled);
        assert_eq!(
            update.bundle,
            PresentationBundle::Placeholder {
                message: PLACEHOLDER_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn yearly_without_year_enables_selector_but_shows_placeholder() {
        let mut s = session();
        let update = s.set_category(Some(ReportCategory::YearlyStatistics));
        assert!(update.year_selector.enabled);
        assert!(update.bundle.is_placeholder());

        let update = s.set_year(Some(2009));
        assert_eq!(update.bundle.panels().len(), 4);
    }

    #[test]
    fn stale_year_does_not_change_recession_output() {
        let mut fresh = session();
        let clean = fresh.set_category(Some(ReportCategory::RecessionStatistics)).bundle;

        let mut stale = session();
        stale.set_category(Some(ReportCategory::YearlyStatistics));
        stale.set_year(Some(2010));
        stale.set_category(Some(ReportCategory::RecessionStatistics));
        let after_switch = stale.set_year(Some(2010));

        assert!(!after_switch.year_selector.enabled);
        assert_eq!(after_switch.bundle, clean);
    }

    #[test]
    fn sessions_share_store_but_not_selection() {
        let store = Arc::new(RecordStore::load(worked_example()).unwrap());
        let mut a = DashboardSession::new(Arc::clone(&store));
        let mut b = DashboardSession::new(Arc::clone(&store));

        a.set_category(Some(ReportCategory::RecessionStatistics));
        assert!(a.bundle().panels().len() == 4);
        assert!(b.bundle().is_placeholder());

        let rows = a.bundle().panels()[0].view.table.numbers(COL_SALES);
        assert_eq!(rows, vec![110.0]);
        assert_eq!(a.bundle().panels()[0].view.table.rows[0][0], Cell::Year(2009));
    }
}
