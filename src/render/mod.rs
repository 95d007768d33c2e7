//! Scene description and the render loop that repaints it
//!
//! - [`scene`]: display-list primitives (line, arc, rect, text, gradient)
//! - [`clock`]: per-lab simulation time
//! - [`surface`]: the [`surface::DrawSurface`] trait and the shared [`surface::SceneBuffer`]
//! - [`render_loop`]: continuous and on-change repainting with frame-skip on failure

pub mod clock;
pub mod render_loop;
pub mod scene;
pub mod surface;

pub use clock::Clock;
pub use render_loop::{FrameOutcome, RenderLoop, RenderMode, RenderStats};
pub use scene::{GradientAxis, Point, Rgb, Scene, Shape};
pub use surface::{DrawSurface, SceneBuffer};
