//! Render loop: recompute the scene from current state and present it

use super::clock::Clock;
use super::surface::DrawSurface;
use crate::controls::ParameterStore;
use crate::errors::RenderFailure;
use crate::lab::SimulationModel;
use tracing::warn;

/// How often a lab repaints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Every display frame, with the clock advancing
    Continuous,
    /// Only when a control value (or the lab's own state) changes
    OnChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Painted,
    /// On-change mode with nothing changed
    Unchanged,
    /// The model or surface failed; the previous scene stays up
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    pub painted: u64,
    pub skipped: u64,
    /// Cleared by the next painted frame
    pub last_failure: Option<String>,
}

pub struct RenderLoop {
    mode: RenderMode,
    surface: Box<dyn DrawSurface>,
    /// Store revision of the last successful paint
    painted_revision: Option<u64>,
    stats: RenderStats,
}

impl RenderLoop {
    pub fn new(mode: RenderMode, surface: Box<dyn DrawSurface>) -> Self {
        RenderLoop {
            mode,
            surface,
            painted_revision: None,
            stats: RenderStats::default(),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Force the next on-change render to repaint
    pub fn invalidate(&mut self) {
        self.painted_revision = None;
    }

    /// Render one frame.
    ///
    /// A failing model or surface never stops the loop: the failure is
    /// logged, counted, and the frame is skipped.
    pub fn render(
        &mut self,
        model: &mut dyn SimulationModel,
        store: &ParameterStore,
        clock: &Clock,
    ) -> FrameOutcome {
        if self.mode == RenderMode::OnChange && self.painted_revision == Some(store.revision()) {
            return FrameOutcome::Unchanged;
        }

        let result = model
            .frame(store, clock)
            .map_err(RenderFailure::from)
            .and_then(|scene| self.surface.present(scene).map_err(RenderFailure::from));

        match result {
            Ok(()) => {
                self.painted_revision = Some(store.revision());
                self.stats.painted += 1;
                self.stats.last_failure = None;
                FrameOutcome::Painted
            }
            Err(failure) => {
                warn!(lab = model.name(), %failure, "frame skipped");
                self.stats.skipped += 1;
                self.stats.last_failure = Some(failure.to_string());
                FrameOutcome::Skipped
            }
        }
    }
}
