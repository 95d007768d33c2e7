//! # Introduction
//!
//! labbench runs small interactive physics labs in the terminal. Each lab is
//! a [`lab::SimulationModel`]: it declares a handful of bounded, stepped
//! controls and turns their current values into a [`render::Scene`] every
//! frame. Everything else is shared substrate.
//!
//! ## Pipeline
//!
//! ```text
//! Key events → InputRouter → ParameterStore → SimulationModel → Scene → Canvas
//!                                  ↑                                  ↑
//!                            FrameScheduler ────── RenderLoop ────────┘
//! ```
//!
//! 1. [`host`]: the keyboard event source and the per-frame scheduler a lab
//!    mounts against. Both hand out guards that release on drop.
//! 2. [`controls`]: the parameter store. Values are clamped to their range,
//!    snapped to their step and rounded to the step's precision.
//! 3. [`input`]: the key map and router (select with `q`/`e`, adjust with
//!    `a`/`d` or the arrows, hold to repeat, release to spring back).
//! 4. [`render`]: display-list scenes, the lab clock and the render loop.
//!    A failing frame is logged and skipped.
//! 5. [`lab`]: mounting a model on a host and unmounting it cleanly.
//! 6. [`labs`]: the bundled labs.
//! 7. [`ui`]: ratatui front end; not part of the stable library API.

pub mod config;
pub mod controls;
pub mod errors;
pub mod host;
pub mod input;
pub mod lab;
pub mod labs;
pub mod render;
pub mod ui;
