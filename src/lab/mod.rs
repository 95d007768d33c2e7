//! Lab lifecycle
//!
//! - [`model`]: the [`SimulationModel`] trait each lab implements
//! - [`instance`]: mounting a model on a [`crate::host::Host`] and tearing it down

pub mod instance;
pub mod model;

pub use instance::{ControlView, LabHandle, LabInstance, LabSnapshot, LabState};
pub use model::{LabContext, SimulationModel};
