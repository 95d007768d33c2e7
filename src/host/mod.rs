//! Host primitives a lab mounts against
//!
//! - [`keyboard`]: the global key event source with scoped subscriptions
//! - [`frames`]: the per-display-frame scheduler with cancellable tasks
//!
//! Both are single-threaded and hand out RAII guards; dropping the guard is
//! the only way to release the registration.

pub mod frames;
pub mod keyboard;

pub use frames::{FrameHandle, FrameScheduler, FrameTick};
pub use keyboard::{
    EventTarget, KeyInput, KeyListener, KeyPhase, KeySubscription, KeyboardSurface,
};

/// The pair of host services a lab instance needs
#[derive(Clone, Default)]
pub struct Host {
    pub keyboard: KeyboardSurface,
    pub frames: FrameScheduler,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }
}
