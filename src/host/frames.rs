//! Per-display-frame task scheduling
//!
//! The event loop calls [`FrameScheduler::run_frame`] once per display frame;
//! every registered task runs once per call until its [`FrameHandle`] is
//! dropped. Tasks repeat without rescheduling themselves.

use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Passed to every task on every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Frame number since the scheduler was created
    pub index: u64,
    /// Wall time since the previous frame
    pub dt: Duration,
}

type FrameTask = Box<dyn FnMut(FrameTick)>;

#[derive(Default)]
struct FrameRegistry {
    next_id: u64,
    tasks: Vec<(u64, FrameTask)>,
    /// Tasks cancelled while `run_frame` had them checked out
    cancelled: FxHashSet<u64>,
    running: bool,
    frames: u64,
    invocations: u64,
}

#[derive(Clone, Default)]
pub struct FrameScheduler {
    registry: Rc<RefCell<FrameRegistry>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` on every frame until the handle is dropped
    pub fn every_frame(&self, task: impl FnMut(FrameTick) + 'static) -> FrameHandle {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.tasks.push((id, Box::new(task)));
        FrameHandle {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Run one display frame. Returns how many tasks ran.
    pub fn run_frame(&self, dt: Duration) -> usize {
        let (tick, mut tasks) = {
            let mut registry = self.registry.borrow_mut();
            let tick = FrameTick {
                index: registry.frames,
                dt,
            };
            registry.frames += 1;
            registry.running = true;
            (tick, std::mem::take(&mut registry.tasks))
        };

        let mut ran = 0;
        for (id, task) in tasks.iter_mut() {
            if self.registry.borrow().cancelled.contains(id) {
                continue;
            }
            task(tick);
            ran += 1;
        }

        let dropped = {
            let mut registry = self.registry.borrow_mut();
            registry.running = false;
            registry.invocations += ran as u64;
            let cancelled = std::mem::take(&mut registry.cancelled);
            let (keep, dropped): (Vec<_>, Vec<_>) = tasks
                .into_iter()
                .partition(|(id, _)| !cancelled.contains(id));
            // tasks registered during this frame run from the next one
            let added = std::mem::take(&mut registry.tasks);
            registry.tasks = keep;
            registry.tasks.extend(added);
            dropped
        };
        drop(dropped);
        ran
    }

    /// Number of live tasks
    pub fn pending(&self) -> usize {
        self.registry.borrow().tasks.len()
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.registry.borrow().frames
    }

    /// Task invocations across all frames
    pub fn invocations(&self) -> u64 {
        self.registry.borrow().invocations
    }
}

fn cancel_in(registry: &RefCell<FrameRegistry>, id: u64) {
    let removed = {
        let mut registry = registry.borrow_mut();
        match registry.tasks.iter().position(|(task, _)| *task == id) {
            Some(pos) => Some(registry.tasks.remove(pos)),
            None => {
                if registry.running {
                    registry.cancelled.insert(id);
                }
                None
            }
        }
    };
    // the closure may own state whose drop touches the scheduler again
    drop(removed);
}

/// Cancellable handle to a repeating frame task; dropping it cancels the task
#[must_use = "dropping the handle cancels the frame task immediately"]
pub struct FrameHandle {
    registry: Weak<RefCell<FrameRegistry>>,
    id: u64,
}

impl FrameHandle {
    pub fn is_scheduled(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            let registry = registry.borrow();
            registry.tasks.iter().any(|(task, _)| *task == self.id)
                || (registry.running && !registry.cancelled.contains(&self.id))
        })
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            cancel_in(&registry, self.id);
        }
    }
}
