//! Parameter store: the authoritative values of one lab instance

use super::control::{Control, ControlSpec, Direction};
use crate::errors::LabError;
use rustc_hash::FxHashMap;

/// Ordered set of controls with bounded values
///
/// Insertion order is significant: it is the order the selector cycles in.
/// Every mutation bumps [`ParameterStore::revision`], which the on-change
/// render mode uses to decide whether a repaint is due.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    controls: Vec<Control>,
    index: FxHashMap<String, usize>,
    revision: u64,
}

impl ParameterStore {
    /// Build a store from a lab's declarations.
    ///
    /// Fails on an empty set, duplicate ids or an invalid control, and when
    /// every declared control starts disabled.
    pub fn new(specs: Vec<ControlSpec>) -> Result<Self, LabError> {
        if specs.is_empty() {
            return Err(LabError::EmptyControlSet);
        }

        let mut controls = Vec::with_capacity(specs.len());
        let mut index = FxHashMap::default();
        for spec in specs {
            if index.contains_key(&spec.id) {
                return Err(LabError::DuplicateControl { id: spec.id });
            }
            let control = Control::from_spec(spec)?;
            index.insert(control.id().to_string(), controls.len());
            controls.push(control);
        }

        if !controls.iter().any(Control::is_enabled) {
            return Err(LabError::LastEnabledControl {
                id: controls[0].id().to_string(),
            });
        }

        Ok(ParameterStore {
            controls,
            index,
            revision: 0,
        })
    }

    /// Current value of a control
    pub fn get(&self, id: &str) -> Result<f64, LabError> {
        self.control(id).map(Control::value)
    }

    /// Store `value` clamped to the control's bounds and rounded to its step.
    /// Returns the value actually stored. Clamping is silent.
    pub fn set(&mut self, id: &str, value: f64) -> Result<f64, LabError> {
        let idx = self.index_of(id)?;
        Ok(self.set_at(idx, value))
    }

    /// Move a control one step; equivalent to `set(id, get(id) + sign * step)`
    pub fn adjust(&mut self, id: &str, direction: Direction) -> Result<f64, LabError> {
        let idx = self.index_of(id)?;
        Ok(self.adjust_at(idx, direction))
    }

    pub(crate) fn set_at(&mut self, idx: usize, value: f64) -> f64 {
        let control = &mut self.controls[idx];
        let before = control.value();
        let stored = control.assign(value);
        if stored != before {
            self.revision += 1;
        }
        stored
    }

    pub(crate) fn adjust_at(&mut self, idx: usize, direction: Direction) -> f64 {
        let control = &self.controls[idx];
        let target = control.value() + direction.sign() * control.step();
        self.set_at(idx, target)
    }

    /// Enable or disable a control. Disabled controls are skipped by the
    /// selector; at least one control must stay enabled.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<(), LabError> {
        let idx = self.index_of(id)?;
        if self.controls[idx].is_enabled() == enabled {
            return Ok(());
        }
        if !enabled && self.enabled_count() == 1 {
            return Err(LabError::LastEnabledControl { id: id.to_string() });
        }
        self.controls[idx].set_enabled_flag(enabled);
        self.revision += 1;
        Ok(())
    }

    pub fn control(&self, id: &str) -> Result<&Control, LabError> {
        let idx = self.index_of(id)?;
        Ok(&self.controls[idx])
    }

    pub fn index_of(&self, id: &str) -> Result<usize, LabError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| LabError::unknown(id))
    }

    /// Control at a position in cycle order
    pub fn at(&self, idx: usize) -> Option<&Control> {
        self.controls.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Always false for a successfully built store
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.controls.iter().filter(|c| c.is_enabled()).count()
    }

    /// Monotonic change counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Display string for a control's value
    pub fn display_value(&self, id: &str) -> Result<String, LabError> {
        self.control(id).map(Control::display)
    }

    /// Value lookup for labs that declared the id themselves.
    ///
    /// Falls back to NaN for an unknown id so that a wiring mistake shows up
    /// as a skipped frame rather than a panic.
    pub fn value(&self, id: &str) -> f64 {
        self.get(id).unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radiation() -> ParameterStore {
        ParameterStore::new(vec![
            ControlSpec::new("energy", "Energy")
                .range(0.2, 1.0)
                .step(0.02)
                .default(0.5),
            ControlSpec::new("gold", "Gold thickness")
                .range(1.0, 1.5)
                .step(0.05)
                .default(1.0),
            ControlSpec::new("em", "EM field")
                .range(4.0, 8.0)
                .step(0.05)
                .default(4.0)
                .disabled(),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_and_duplicate_sets_rejected() {
        assert_eq!(
            ParameterStore::new(Vec::new()).unwrap_err(),
            LabError::EmptyControlSet
        );

        let err = ParameterStore::new(vec![
            ControlSpec::new("a", "A"),
            ControlSpec::new("a", "Again"),
        ])
        .unwrap_err();
        assert_eq!(err, LabError::DuplicateControl { id: "a".into() });
    }

    #[test]
    fn test_all_disabled_rejected() {
        let err = ParameterStore::new(vec![ControlSpec::new("a", "A").disabled()]).unwrap_err();
        assert!(matches!(err, LabError::LastEnabledControl { .. }));
    }

    #[test]
    fn test_unknown_control() {
        let mut store = radiation();
        assert_eq!(store.get("mass").unwrap_err(), LabError::unknown("mass"));
        assert!(store.set("mass", 1.0).is_err());
        assert!(store.adjust("mass", Direction::Increase).is_err());
        assert!(store.value("mass").is_nan());
    }

    #[test]
    fn test_adjust_clamps_silently() {
        let mut store = radiation();
        for _ in 0..40 {
            store.adjust("gold", Direction::Increase).unwrap();
        }
        assert_eq!(store.get("gold").unwrap(), 1.5);
        for _ in 0..40 {
            store.adjust("gold", Direction::Decrease).unwrap();
        }
        assert_eq!(store.get("gold").unwrap(), 1.0);
    }

    #[test]
    fn test_revision_tracks_changes_only() {
        let mut store = radiation();
        let start = store.revision();
        store.set("energy", 0.5).unwrap();
        assert_eq!(store.revision(), start);
        store.set("energy", 0.6).unwrap();
        assert_eq!(store.revision(), start + 1);
        store.adjust("gold", Direction::Decrease).unwrap();
        assert_eq!(store.revision(), start + 1);
        store.set_enabled("em", true).unwrap();
        assert_eq!(store.revision(), start + 2);
    }

    #[test]
    fn test_cannot_disable_last_enabled() {
        let mut store = radiation();
        store.set_enabled("gold", false).unwrap();
        let err = store.set_enabled("energy", false).unwrap_err();
        assert_eq!(
            err,
            LabError::LastEnabledControl {
                id: "energy".into()
            }
        );
        assert!(store.control("energy").unwrap().is_enabled());
    }

    #[test]
    fn test_display_value() {
        let store = radiation();
        assert_eq!(store.display_value("em").unwrap(), "4.00");
        assert_eq!(store.display_value("energy").unwrap(), "0.50");
    }
}
