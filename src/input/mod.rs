//! Keyboard input routing
//!
//! [`keymap`] maps keys to [`keymap::Action`]s; [`router`] applies them to a
//! lab's parameter store and selector, ignoring text-entry events and
//! delegating anything unbound to the lab.

pub mod keymap;
pub mod router;

pub use keymap::{Action, KeyMap};
pub use router::{InputRouter, Routed};
