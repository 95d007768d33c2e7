//! Error types for the lab substrate
//!
//! [`LabError`] covers control-set wiring mistakes and lookups of unknown
//! controls. Neither is fatal to the process: the lab logs a warning and keeps
//! running. Render-time failures are split into [`ModelError`] (raised by a
//! simulation model) and [`SurfaceError`] (raised by a drawing surface); the
//! render loop logs both and skips the frame.
//!
//! Clamping a value against its bounds is not an error and has no variant here.

use thiserror::Error;

/// Errors raised by the parameter store, the selector and lab wiring
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabError {
    /// A control id was referenced that the lab never declared
    #[error("unknown control `{id}`")]
    UnknownControl { id: String },

    /// A control exists but is currently disabled
    #[error("control `{id}` is disabled")]
    ControlDisabled { id: String },

    /// Two controls in one set share an id
    #[error("duplicate control id `{id}`")]
    DuplicateControl { id: String },

    /// A lab declared no controls at all
    #[error("control set is empty")]
    EmptyControlSet,

    /// min > max, or a bound is not finite
    #[error("control `{id}` has invalid bounds [{min}, {max}]")]
    InvalidBounds { id: String, min: f64, max: f64 },

    /// step must be finite and strictly positive
    #[error("control `{id}` has invalid step {step}")]
    InvalidStep { id: String, step: f64 },

    /// Disabling this control would leave nothing selectable
    #[error("cannot disable `{id}`: it is the last enabled control")]
    LastEnabledControl { id: String },
}

impl LabError {
    pub fn unknown(id: impl Into<String>) -> Self {
        LabError::UnknownControl { id: id.into() }
    }
}

/// A simulation model failed to produce a scene for this frame
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{lab}: {message}")]
pub struct ModelError {
    pub lab: &'static str,
    pub message: String,
}

impl ModelError {
    pub fn new(lab: &'static str, message: impl Into<String>) -> Self {
        ModelError {
            lab,
            message: message.into(),
        }
    }
}

/// A drawing surface refused a scene
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// The scene contained NaN or infinite coordinates
    #[error("scene shape {index} has non-finite coordinates")]
    NonFinite { index: usize },

    /// The surface has been torn down
    #[error("drawing surface is detached")]
    Detached,
}

/// Any failure that causes the render loop to skip a frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderFailure {
    #[error("model failed: {0}")]
    Model(#[from] ModelError),

    #[error("surface failed: {0}")]
    Surface(#[from] SurfaceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_control() {
        let err = LabError::unknown("energy");
        assert_eq!(err.to_string(), "unknown control `energy`");

        let err = LabError::InvalidBounds {
            id: "mass".into(),
            min: 5.0,
            max: 1.0,
        };
        assert!(err.to_string().contains("[5, 1]"));
    }

    #[test]
    fn test_render_failure_wraps_sources() {
        let failure: RenderFailure = ModelError::new("wave", "phase diverged").into();
        assert_eq!(failure.to_string(), "model failed: wave: phase diverged");

        let failure: RenderFailure = SurfaceError::NonFinite { index: 3 }.into();
        assert!(failure.to_string().contains("shape 3"));
    }
}
