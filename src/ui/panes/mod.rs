//! TUI pane rendering modules
//!
//! Each pane is a stateless render function over a [`crate::lab::LabSnapshot`]
//! (or a piece of one):
//!
//! - [`canvas`]: the lab's latest scene, rasterized with braille dots
//! - [`controls`]: one slider row per control, active row highlighted
//! - [`readout`]: derived quantities reported by the lab
//! - [`prompt`]: the value prompt used to type an exact control value
//! - [`status`]: status bar with keybindings and run state

pub mod canvas;
pub mod controls;
pub mod prompt;
pub mod readout;
pub mod status;

pub use canvas::render_canvas_pane;
pub use controls::{control_rows, render_controls_pane};
pub use prompt::{render_prompt, ValuePrompt};
pub use readout::render_readout_pane;
pub use status::render_status_bar;
