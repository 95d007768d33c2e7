//! Key bindings for control selection and adjustment

use crate::controls::Direction;
use crossterm::event::KeyCode;
use rustc_hash::FxHashMap;

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Adjust(Direction),
    SelectPrevious,
    SelectNext,
}

#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: FxHashMap<KeyCode, Action>,
}

impl KeyMap {
    /// Only the four canonical letters, both cases
    pub fn canonical() -> Self {
        let mut map = KeyMap {
            bindings: FxHashMap::default(),
        };
        for (c, action) in [
            ('a', Action::Adjust(Direction::Decrease)),
            ('d', Action::Adjust(Direction::Increase)),
            ('q', Action::SelectPrevious),
            ('e', Action::SelectNext),
        ] {
            map.bind(KeyCode::Char(c), action);
            map.bind(KeyCode::Char(c.to_ascii_uppercase()), action);
        }
        map
    }

    pub fn bind(&mut self, code: KeyCode, action: Action) -> &mut Self {
        self.bindings.insert(code, action);
        self
    }

    pub fn unbind(&mut self, code: KeyCode) -> Option<Action> {
        self.bindings.remove(&code)
    }

    #[inline]
    pub fn action(&self, code: KeyCode) -> Option<Action> {
        self.bindings.get(&code).copied()
    }

    /// Keys bound to an action
    pub fn keys_for(&self, action: Action) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(code, _)| *code)
            .collect();
        keys.sort_by_key(|code| format!("{:?}", code));
        keys
    }
}

impl Default for KeyMap {
    /// Canonical letters plus arrow and tab aliases
    fn default() -> Self {
        let mut map = KeyMap::canonical();
        map.bind(KeyCode::Left, Action::Adjust(Direction::Decrease))
            .bind(KeyCode::Right, Action::Adjust(Direction::Increase))
            .bind(KeyCode::BackTab, Action::SelectPrevious)
            .bind(KeyCode::Tab, Action::SelectNext);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bindings_are_case_insensitive() {
        let map = KeyMap::canonical();
        for c in ['a', 'A'] {
            assert_eq!(
                map.action(KeyCode::Char(c)),
                Some(Action::Adjust(Direction::Decrease))
            );
        }
        assert_eq!(map.action(KeyCode::Char('E')), Some(Action::SelectNext));
        assert_eq!(map.action(KeyCode::Char('Q')), Some(Action::SelectPrevious));
        assert_eq!(map.action(KeyCode::Char(' ')), None);
        assert_eq!(map.action(KeyCode::Left), None);
    }

    #[test]
    fn test_default_adds_aliases() {
        let map = KeyMap::default();
        assert_eq!(
            map.action(KeyCode::Right),
            Some(Action::Adjust(Direction::Increase))
        );
        assert_eq!(map.action(KeyCode::Tab), Some(Action::SelectNext));
        assert_eq!(map.keys_for(Action::SelectNext).len(), 3);
    }

    #[test]
    fn test_unbind() {
        let mut map = KeyMap::canonical();
        assert_eq!(map.unbind(KeyCode::Char('q')), Some(Action::SelectPrevious));
        assert_eq!(map.action(KeyCode::Char('q')), None);
    }
}
