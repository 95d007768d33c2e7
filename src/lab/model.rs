//! The interface every lab implements

use crate::controls::{ControlSpec, ParameterStore};
use crate::errors::ModelError;
use crate::render::{Clock, RenderMode, Scene};
use crossterm::event::KeyCode;

/// Mutable access a lab gets while handling one of its own keys
pub struct LabContext<'a> {
    pub controls: &'a mut ParameterStore,
    pub clock: &'a mut Clock,
}

/// A lab's physics and drawing.
///
/// The substrate owns the controls, the clock and the render loop; the model
/// only declares its controls and turns their values into a [`Scene`].
pub trait SimulationModel {
    /// Short identifier, used in logs
    fn name(&self) -> &'static str;

    /// Heading shown above the canvas
    fn title(&self) -> &'static str;

    /// Controls in selection order, with their defaults
    fn controls(&self) -> Vec<ControlSpec>;

    fn mode(&self) -> RenderMode {
        RenderMode::Continuous
    }

    /// Build this frame's scene
    fn frame(&mut self, controls: &ParameterStore, clock: &Clock) -> Result<Scene, ModelError>;

    /// A key the router does not handle. Return true if the lab used it.
    fn on_key(&mut self, _key: KeyCode, _ctx: &mut LabContext<'_>) -> bool {
        false
    }

    /// The active control changed (also called once at mount)
    fn on_select(&mut self, _active: Option<&str>) {}

    /// Whether the lab is animating, for the status badge
    fn is_running(&self, clock: &Clock) -> bool {
        clock.is_running()
    }

    /// Derived quantities for the readout pane
    fn readout(&self, _controls: &ParameterStore) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Lab-specific key hints for the status bar, as (key, description)
    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }
}
