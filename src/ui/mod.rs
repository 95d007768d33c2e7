//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: owns the [`Host`] and the mounted lab, pumps terminal
//!   events into the host keyboard and drives one host frame per tick
//! - **[`panes`]**: stateless render functions for each visible pane (canvas,
//!   controls, readout, value prompt, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point is [`App`]: construct it with a model and a
//! [`LabConfig`] and call [`App::run`] to start the event loop.
//!
//! [`Host`]: crate::host::Host
//! [`LabConfig`]: crate::config::LabConfig
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
