//! Active-control selector
//!
//! Exactly one control receives keyboard adjustments at a time. Next and
//! previous walk the store in insertion order, wrap around, and skip
//! disabled controls.

use super::store::ParameterStore;
use crate::errors::LabError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSelector {
    index: usize,
}

impl ActiveSelector {
    /// Start on the first enabled control
    pub fn new(store: &ParameterStore) -> Self {
        let mut selector = ActiveSelector { index: 0 };
        selector.reconcile(store);
        selector
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Id of the active control
    pub fn active_id<'a>(&self, store: &'a ParameterStore) -> Option<&'a str> {
        store.at(self.index).map(|c| c.id())
    }

    /// Advance with wraparound. No-op when only one control is selectable.
    pub fn select_next(&mut self, store: &ParameterStore) {
        let len = store.len();
        if let Some(idx) = (1..len)
            .map(|offset| (self.index + offset) % len)
            .find(|&idx| is_enabled(store, idx))
        {
            self.index = idx;
        }
    }

    /// Retreat with wraparound. No-op when only one control is selectable.
    pub fn select_previous(&mut self, store: &ParameterStore) {
        let len = store.len();
        if let Some(idx) = (1..len)
            .map(|offset| (self.index + len - offset) % len)
            .find(|&idx| is_enabled(store, idx))
        {
            self.index = idx;
        }
    }

    /// Jump straight to a control, as clicking its label does
    pub fn select_by_id(&mut self, store: &ParameterStore, id: &str) -> Result<(), LabError> {
        let idx = store.index_of(id)?;
        if !is_enabled(store, idx) {
            return Err(LabError::ControlDisabled { id: id.to_string() });
        }
        self.index = idx;
        Ok(())
    }

    /// Move off a control that has been disabled since it was selected.
    /// Returns true if the selection changed.
    pub fn reconcile(&mut self, store: &ParameterStore) -> bool {
        if self.index >= store.len() {
            self.index = 0;
        }
        if is_enabled(store, self.index) {
            return false;
        }
        let before = self.index;
        self.select_next(store);
        self.index != before
    }
}

fn is_enabled(store: &ParameterStore, idx: usize) -> bool {
    store.at(idx).is_some_and(|c| c.is_enabled())
}
