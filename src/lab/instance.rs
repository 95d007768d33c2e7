//! A mounted lab: model, controls, router, clock and render loop tied to the
//! lifetime of one widget

use super::model::{LabContext, SimulationModel};
use crate::config::LabConfig;
use crate::controls::{ActiveSelector, Direction, ParameterStore};
use crate::errors::LabError;
use crate::host::{FrameHandle, FrameTick, Host, KeyInput, KeyListener, KeySubscription};
use crate::input::{InputRouter, Routed};
use crate::render::{Clock, DrawSurface, RenderLoop, RenderMode, RenderStats};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};

/// All mutable state of one lab instance
pub struct LabState {
    model: Box<dyn SimulationModel>,
    store: ParameterStore,
    selector: ActiveSelector,
    router: InputRouter,
    clock: Clock,
    render: RenderLoop,
    last_warning: Option<String>,
}

impl LabState {
    fn handle_key(&mut self, input: &KeyInput) {
        let before = self.store.revision();

        match self.router.route(input, &mut self.store, &mut self.selector) {
            Routed::Delegated(code) => {
                let mut ctx = LabContext {
                    controls: &mut self.store,
                    clock: &mut self.clock,
                };
                if self.model.on_key(code, &mut ctx) {
                    self.selector.reconcile(&self.store);
                    self.notify_selection();
                    // lab-owned state may have changed without touching a control
                    self.render.invalidate();
                    self.repaint_if_static();
                }
            }
            Routed::Selected { .. } => {
                self.last_warning = None;
                self.notify_selection();
            }
            Routed::Adjusted { .. } | Routed::Held(_) => self.last_warning = None,
            Routed::Ignored => return,
            Routed::Released => {}
        }

        if self.store.revision() != before {
            self.repaint_if_static();
        }
    }

    fn tick(&mut self, tick: FrameTick) {
        self.router.apply_holds(&mut self.store, &self.selector);
        self.clock.advance(tick.dt);
        self.render
            .render(self.model.as_mut(), &self.store, &self.clock);
    }

    fn repaint_if_static(&mut self) {
        if self.render.mode() == RenderMode::OnChange {
            self.render
                .render(self.model.as_mut(), &self.store, &self.clock);
        }
    }

    /// Tell the model which control a/d now moves
    fn notify_selection(&mut self) {
        let active = self.selector.active_id(&self.store);
        self.model.on_select(active);
    }

    fn warn(&mut self, err: &LabError) {
        warn!(lab = self.model.name(), %err, "control wiring error");
        self.last_warning = Some(err.to_string());
    }

    pub fn get(&self, id: &str) -> Result<f64, LabError> {
        self.store.get(id)
    }

    /// Set a control directly, as dragging its slider would
    pub fn set(&mut self, id: &str, value: f64) -> Result<f64, LabError> {
        match self.store.set(id, value) {
            Ok(stored) => {
                self.last_warning = None;
                self.repaint_if_static();
                Ok(stored)
            }
            Err(err) => {
                self.warn(&err);
                Err(err)
            }
        }
    }

    /// Make a control active, as clicking its label would
    pub fn select_by_id(&mut self, id: &str) -> Result<(), LabError> {
        match self.selector.select_by_id(&self.store, id) {
            Ok(()) => {
                self.last_warning = None;
                self.notify_selection();
                Ok(())
            }
            Err(err) => {
                self.warn(&err);
                Err(err)
            }
        }
    }

    /// Drop the last wiring warning once the UI has shown something newer
    pub fn dismiss_warning(&mut self) {
        self.last_warning = None;
    }

    pub fn active_id(&self) -> Option<&str> {
        self.selector.active_id(&self.store)
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn render_stats(&self) -> &RenderStats {
        self.render.stats()
    }

    pub fn snapshot(&self) -> LabSnapshot {
        let active = self.selector.index();
        let controls = self
            .store
            .iter()
            .enumerate()
            .map(|(idx, c)| ControlView {
                id: c.id().to_string(),
                label: c.label().to_string(),
                display: c.display(),
                normalized: c.normalized(),
                enabled: c.is_enabled(),
                active: idx == active,
                momentary: c.is_momentary(),
            })
            .collect();

        LabSnapshot {
            name: self.model.name(),
            title: self.model.title(),
            mode: self.render.mode(),
            controls,
            active_id: self.active_id().map(str::to_string),
            seconds: self.clock.seconds(),
            running: self.model.is_running(&self.clock),
            held: self.router.held(),
            stats: self.render.stats().clone(),
            last_warning: self.last_warning.clone(),
            readout: self.model.readout(&self.store),
            key_hints: self.model.key_hints(),
        }
    }
}

impl KeyListener for LabState {
    fn on_key(&mut self, input: &KeyInput) {
        self.handle_key(input);
    }
}

/// Read-only view of one control for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct ControlView {
    pub id: String,
    pub label: String,
    pub display: String,
    pub normalized: f64,
    pub enabled: bool,
    pub active: bool,
    pub momentary: bool,
}

/// Read-only view of a lab instance, taken between frames
#[derive(Debug, Clone, PartialEq)]
pub struct LabSnapshot {
    pub name: &'static str,
    pub title: &'static str,
    pub mode: RenderMode,
    pub controls: Vec<ControlView>,
    pub active_id: Option<String>,
    pub seconds: f64,
    pub running: bool,
    pub held: Option<Direction>,
    pub stats: RenderStats,
    pub last_warning: Option<String>,
    pub readout: Vec<(String, String)>,
    pub key_hints: Vec<(&'static str, &'static str)>,
}

/// Shared handle to a lab's state that outlives the instance.
///
/// Holding one does not keep the key listener or frame task alive.
#[derive(Clone)]
pub struct LabHandle {
    state: Rc<RefCell<LabState>>,
}

impl LabHandle {
    pub fn get(&self, id: &str) -> Result<f64, LabError> {
        self.state.borrow().get(id)
    }

    pub fn snapshot(&self) -> LabSnapshot {
        self.state.borrow().snapshot()
    }
}

/// A lab mounted on a host.
///
/// Mounting subscribes to the keyboard and, for continuous labs, registers
/// a frame task. Both registrations are guards owned here, so dropping the
/// instance releases them no matter how it is torn down.
pub struct LabInstance {
    state: Rc<RefCell<LabState>>,
    keys: KeySubscription,
    frame_task: Option<FrameHandle>,
}

impl LabInstance {
    pub fn mount(
        model: Box<dyn SimulationModel>,
        host: &Host,
        surface: Box<dyn DrawSurface>,
        config: &LabConfig,
    ) -> Result<Self, LabError> {
        let store = ParameterStore::new(model.controls())?;
        let selector = ActiveSelector::new(&store);
        let mode = model.mode();
        let name = model.name();

        let mut state = LabState {
            model,
            store,
            selector,
            router: InputRouter::new(config.keymap.clone(), config.hold_frames),
            clock: Clock::new(),
            render: RenderLoop::new(mode, surface),
            last_warning: None,
        };
        state.notify_selection();
        // first paint happens at mount in both modes
        state
            .render
            .render(state.model.as_mut(), &state.store, &state.clock);

        let state = Rc::new(RefCell::new(state));
        let keys = host.keyboard.subscribe(state.clone());

        let frame_task = match mode {
            RenderMode::Continuous => {
                let weak = Rc::downgrade(&state);
                Some(host.frames.every_frame(move |tick| {
                    if let Some(state) = weak.upgrade() {
                        state.borrow_mut().tick(tick);
                    }
                }))
            }
            RenderMode::OnChange => None,
        };

        info!(
            lab = name,
            ?mode,
            controls = state.borrow().store.len(),
            "lab mounted"
        );

        Ok(LabInstance {
            state,
            keys,
            frame_task,
        })
    }

    pub fn handle(&self) -> LabHandle {
        LabHandle {
            state: self.state.clone(),
        }
    }

    pub fn snapshot(&self) -> LabSnapshot {
        self.state.borrow().snapshot()
    }

    pub fn get(&self, id: &str) -> Result<f64, LabError> {
        self.state.borrow().get(id)
    }

    pub fn set(&self, id: &str, value: f64) -> Result<f64, LabError> {
        self.state.borrow_mut().set(id, value)
    }

    pub fn select_by_id(&self, id: &str) -> Result<(), LabError> {
        self.state.borrow_mut().select_by_id(id)
    }

    pub fn active_id(&self) -> Option<String> {
        self.state.borrow().active_id().map(str::to_string)
    }

    pub fn dismiss_warning(&self) {
        self.state.borrow_mut().dismiss_warning();
    }

    pub fn is_listening(&self) -> bool {
        self.keys.is_active()
    }

    pub fn is_animating(&self) -> bool {
        self.frame_task
            .as_ref()
            .is_some_and(FrameHandle::is_scheduled)
    }

    /// Tear down explicitly; equivalent to dropping
    pub fn unmount(self) {}
}

impl Drop for LabInstance {
    fn drop(&mut self) {
        let name = self
            .state
            .try_borrow()
            .map(|state| state.model.name())
            .unwrap_or("?");
        info!(lab = name, "lab unmounted");
    }
}
