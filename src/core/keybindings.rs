//! Container navigation keybindings.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::core::input::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    Next,
    Previous,
    /// Click the selected child's active mouse target.
    Confirm,
}

pub type KeyId = String;

#[derive(Debug, Clone)]
pub enum KeyBinding {
    Single(KeyId),
    Multiple(Vec<KeyId>),
}

impl From<&str> for KeyBinding {
    fn from(value: &str) -> Self {
        KeyBinding::Single(value.to_string())
    }
}

impl From<String> for KeyBinding {
    fn from(value: String) -> Self {
        KeyBinding::Single(value)
    }
}

impl From<Vec<&str>> for KeyBinding {
    fn from(value: Vec<&str>) -> Self {
        KeyBinding::Multiple(value.into_iter().map(|item| item.to_string()).collect())
    }
}

impl From<Vec<String>> for KeyBinding {
    fn from(value: Vec<String>) -> Self {
        KeyBinding::Multiple(value)
    }
}

impl KeyBinding {
    fn into_keys(self) -> Vec<KeyId> {
        match self {
            KeyBinding::Single(key) => vec![key],
            KeyBinding::Multiple(keys) => keys,
        }
    }
}

pub static DEFAULT_NAV_KEYS: LazyLock<HashMap<NavAction, Vec<KeyId>>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert(
        NavAction::Next,
        vec![keys::DOWN.to_string(), keys::CTRL_N.to_string(), "j".to_string()],
    );
    map.insert(
        NavAction::Previous,
        vec![keys::UP.to_string(), keys::CTRL_P.to_string(), "k".to_string()],
    );
    map.insert(NavAction::Confirm, vec![keys::ENTER.to_string()]);
    map
});

/// Per-container copy of the navigation key sets.
#[derive(Debug, Clone)]
pub struct ContainerKeys {
    action_to_keys: HashMap<NavAction, Vec<KeyId>>,
}

impl Default for ContainerKeys {
    fn default() -> Self {
        Self {
            action_to_keys: DEFAULT_NAV_KEYS.clone(),
        }
    }
}

impl ContainerKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the keys of one action.
    pub fn set<K: Into<KeyBinding>>(&mut self, action: NavAction, keys: K) {
        self.action_to_keys.insert(action, keys.into().into_keys());
    }

    pub fn matches(&self, key: &str, action: NavAction) -> bool {
        self.action_to_keys
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|candidate| candidate == key))
    }

    /// Whether `key` moves the selection.
    pub fn is_nav(&self, key: &str) -> bool {
        self.matches(key, NavAction::Next) || self.matches(key, NavAction::Previous)
    }

    pub fn get_keys(&self, action: NavAction) -> Vec<KeyId> {
        self.action_to_keys.get(&action).cloned().unwrap_or_default()
    }
}
