//! Per-session memo of computed views.
//!
//! `compute` is pure, so its result for a given ready selection can be reused
//! for as long as the store stays the same. A cache belongs to exactly one
//! store; build a fresh one if the store is ever replaced.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::engine::{DerivedView, compute};
use crate::selection::ReadySelection;
use crate::store::RecordStore;

#[derive(Debug, Default)]
pub struct ViewCache {
    entries: HashMap<ReadySelection, Arc<[DerivedView]>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, store: &RecordStore, selection: ReadySelection) -> Arc<[DerivedView]> {
        if let Some(views) = self.entries.get(&selection) {
            debug!(?selection, "view cache hit");
            return Arc::clone(views);
        }

        debug!(?selection, "view cache miss");
        let views: Arc<[DerivedView]> = compute(store, selection).into();
        self.entries.insert(selection, Arc::clone(&views));
        views
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
