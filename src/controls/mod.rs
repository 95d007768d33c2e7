//! Parameter store and active-control selection
//!
//! - [`control`]: a single bounded, stepped control and its declaration
//! - [`store`]: the ordered control set of one lab instance
//! - [`selector`]: which control currently receives adjustments

pub mod control;
pub mod selector;
pub mod store;

pub use control::{Control, ControlSpec, Direction, HoldBehavior};
pub use selector::ActiveSelector;
pub use store::ParameterStore;
