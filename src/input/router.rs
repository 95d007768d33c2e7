//! Input router: turns key events into store and selector calls

use super::keymap::{Action, KeyMap};
use crate::controls::{ActiveSelector, Direction, ParameterStore};
use crate::host::{EventTarget, KeyInput, KeyPhase};
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::debug;

/// What the router did with one event
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// A stepped control moved (or was already at its bound)
    Adjusted { id: String, value: f64 },
    /// The active control changed (or stayed, for a single control)
    Selected { id: String },
    /// A momentary control is now held in this direction
    Held(Direction),
    /// A held key went up
    Released,
    /// Not a router key; the lab may handle it
    Delegated(KeyCode),
    /// Event was not meant for the lab
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hold {
    direction: Direction,
    frames_left: u32,
}

#[derive(Debug, Clone)]
pub struct InputRouter {
    keymap: KeyMap,
    hold: Option<Hold>,
    /// Frames a hold survives without a fresh press or repeat
    hold_frames: u32,
}

impl InputRouter {
    pub fn new(keymap: KeyMap, hold_frames: u32) -> Self {
        InputRouter {
            keymap,
            hold: None,
            hold_frames: hold_frames.max(1),
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn held(&self) -> Option<Direction> {
        self.hold.map(|h| h.direction)
    }

    /// Route one event. Each press or repeat yields at most one step.
    pub fn route(
        &mut self,
        input: &KeyInput,
        store: &mut ParameterStore,
        selector: &mut ActiveSelector,
    ) -> Routed {
        if input.target == EventTarget::TextEntry
            || input
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Routed::Ignored;
        }

        let action = self.keymap.action(input.code);

        if input.phase == KeyPhase::Release {
            return match (action, self.hold) {
                (Some(Action::Adjust(dir)), Some(hold)) if hold.direction == dir => {
                    self.hold = None;
                    Routed::Released
                }
                _ => Routed::Ignored,
            };
        }

        let routed = match action {
            None if input.phase == KeyPhase::Press => Routed::Delegated(input.code),
            None => Routed::Ignored,
            Some(Action::SelectNext) => {
                self.hold = None;
                selector.select_next(store);
                self.selected(store, selector)
            }
            Some(Action::SelectPrevious) => {
                self.hold = None;
                selector.select_previous(store);
                self.selected(store, selector)
            }
            Some(Action::Adjust(direction)) => self.adjust(direction, store, selector),
        };
        debug!(key = ?input.code, phase = ?input.phase, ?routed, "key routed");
        routed
    }

    fn selected(&self, store: &ParameterStore, selector: &ActiveSelector) -> Routed {
        Routed::Selected {
            id: selector.active_id(store).unwrap_or_default().to_string(),
        }
    }

    fn adjust(
        &mut self,
        direction: Direction,
        store: &mut ParameterStore,
        selector: &ActiveSelector,
    ) -> Routed {
        let idx = selector.index();
        let Some(control) = store.at(idx) else {
            return Routed::Ignored;
        };
        if !control.is_enabled() {
            return Routed::Ignored;
        }
        if control.is_momentary() {
            self.hold = Some(Hold {
                direction,
                frames_left: self.hold_frames,
            });
            return Routed::Held(direction);
        }
        let id = control.id().to_string();
        let value = store.adjust_at(idx, direction);
        Routed::Adjusted { id, value }
    }

    /// Per-frame update for momentary controls.
    ///
    /// The active control follows the held direction one step per frame;
    /// every other momentary control (and the active one once released)
    /// returns toward its rest value.
    pub fn apply_holds(&mut self, store: &mut ParameterStore, selector: &ActiveSelector) {
        let active = selector.index();
        let active_is_momentary = store.at(active).is_some_and(|c| c.is_momentary());
        let held = match self.hold {
            Some(mut hold) if active_is_momentary => {
                hold.frames_left = hold.frames_left.saturating_sub(1);
                self.hold = (hold.frames_left > 0).then_some(hold);
                Some(hold.direction)
            }
            _ => {
                self.hold = None;
                None
            }
        };

        for idx in 0..store.len() {
            let Some(control) = store.at(idx) else {
                continue;
            };
            let Some(behavior) = control.hold() else {
                continue;
            };
            if idx == active {
                if let Some(direction) = held {
                    store.adjust_at(idx, direction);
                    continue;
                }
            }

            let value = control.value();
            let delta = behavior.return_step.max(control.step());
            if value > behavior.rest {
                store.set_at(idx, (value - delta).max(behavior.rest));
            } else if value < behavior.rest {
                store.set_at(idx, (value + delta).min(behavior.rest));
            }
        }
    }
}
