//! Global keyboard surface
//!
//! Stands in for the application window: every mounted lab subscribes here
//! and receives all key events until its [`KeySubscription`] is dropped.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::warn;

/// Key-down, auto-repeat, or key-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Press,
    Repeat,
    Release,
}

/// What had input focus when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// The lab itself (no text field focused)
    Surface,
    /// A text-entry field; labs must not react to these keys
    TextEntry,
}

/// A key event as delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub phase: KeyPhase,
    pub target: EventTarget,
}

impl KeyInput {
    pub fn press(code: KeyCode) -> Self {
        KeyInput {
            code,
            modifiers: KeyModifiers::NONE,
            phase: KeyPhase::Press,
            target: EventTarget::Surface,
        }
    }

    pub fn repeat(code: KeyCode) -> Self {
        KeyInput {
            phase: KeyPhase::Repeat,
            ..KeyInput::press(code)
        }
    }

    pub fn release(code: KeyCode) -> Self {
        KeyInput {
            phase: KeyPhase::Release,
            ..KeyInput::press(code)
        }
    }

    /// Shorthand for a character key press
    pub fn char(c: char) -> Self {
        KeyInput::press(KeyCode::Char(c))
    }

    pub fn in_text_entry(mut self) -> Self {
        self.target = EventTarget::TextEntry;
        self
    }

    /// Translate a crossterm event
    pub fn from_event(event: KeyEvent, target: EventTarget) -> Self {
        let phase = match event.kind {
            KeyEventKind::Press => KeyPhase::Press,
            KeyEventKind::Repeat => KeyPhase::Repeat,
            KeyEventKind::Release => KeyPhase::Release,
        };
        KeyInput {
            code: event.code,
            modifiers: event.modifiers,
            phase,
            target,
        }
    }
}

/// Receiver of key events
pub trait KeyListener {
    fn on_key(&mut self, input: &KeyInput);
}

pub type SharedListener = Rc<RefCell<dyn KeyListener>>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(u64, SharedListener)>,
}

impl ListenerTable {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    fn remove(&mut self, id: u64) -> Option<SharedListener> {
        let pos = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(pos).1)
    }
}

/// The window-level key event source
#[derive(Clone, Default)]
pub struct KeyboardSurface {
    table: Rc<RefCell<ListenerTable>>,
}

impl KeyboardSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered exactly as long as the
    /// returned subscription is alive.
    pub fn subscribe(&self, listener: SharedListener) -> KeySubscription {
        let mut table = self.table.borrow_mut();
        let id = table.next_id;
        table.next_id += 1;
        table.entries.push((id, listener));
        KeySubscription {
            table: Rc::downgrade(&self.table),
            id,
        }
    }

    /// Deliver an event to every live listener in subscription order.
    /// Returns the number of listeners that received it.
    pub fn dispatch(&self, input: &KeyInput) -> usize {
        // Listeners may unsubscribe themselves (or each other) mid-dispatch, so
        // iterate over a snapshot and re-check membership before each call.
        let snapshot: Vec<(u64, SharedListener)> = self.table.borrow().entries.clone();
        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.table.borrow().contains(id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut listener) => {
                    listener.on_key(input);
                    delivered += 1;
                }
                Err(_) => warn!(listener = id, "key listener busy, event dropped"),
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.table.borrow().entries.len()
    }
}

/// Scoped registration on a [`KeyboardSurface`]; dropping it unsubscribes
#[must_use = "dropping the subscription unsubscribes the listener immediately"]
pub struct KeySubscription {
    table: Weak<RefCell<ListenerTable>>,
    id: u64,
}

impl KeySubscription {
    pub fn is_active(&self) -> bool {
        self.table
            .upgrade()
            .is_some_and(|table| table.borrow().contains(self.id))
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            let removed = table.borrow_mut().remove(self.id);
            // released outside the table borrow; the listener may own other guards
            drop(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        presses: usize,
    }

    impl KeyListener for Counter {
        fn on_key(&mut self, input: &KeyInput) {
            if input.phase == KeyPhase::Press {
                self.presses += 1;
            }
        }
    }

    #[test]
    fn test_subscription_scopes_delivery() {
        let surface = KeyboardSurface::new();
        let counter = Rc::new(RefCell::new(Counter::default()));

        let sub = surface.subscribe(counter.clone());
        assert!(sub.is_active());
        assert_eq!(surface.dispatch(&KeyInput::char('a')), 1);

        drop(sub);
        assert_eq!(surface.listener_count(), 0);
        assert_eq!(surface.dispatch(&KeyInput::char('a')), 0);
        assert_eq!(counter.borrow().presses, 1);
    }

    struct SelfRemoving {
        sub: Option<KeySubscription>,
        seen: usize,
    }

    impl KeyListener for SelfRemoving {
        fn on_key(&mut self, _input: &KeyInput) {
            self.seen += 1;
            self.sub.take();
        }
    }

    #[test]
    fn test_listener_may_unsubscribe_during_dispatch() {
        let surface = KeyboardSurface::new();
        let listener = Rc::new(RefCell::new(SelfRemoving { sub: None, seen: 0 }));
        let sub = surface.subscribe(listener.clone());
        listener.borrow_mut().sub = Some(sub);

        surface.dispatch(&KeyInput::char('x'));
        surface.dispatch(&KeyInput::char('x'));
        assert_eq!(listener.borrow().seen, 1);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn test_from_event_maps_phase() {
        let event = KeyEvent::new_with_kind(
            KeyCode::Char('d'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        let input = KeyInput::from_event(event, EventTarget::Surface);
        assert_eq!(input.phase, KeyPhase::Release);
        assert_eq!(input.code, KeyCode::Char('d'));
    }
}
