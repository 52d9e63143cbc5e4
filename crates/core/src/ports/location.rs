//! URL fragment port

use std::cell::RefCell;
use std::rc::Rc;

/// Callback fired after the fragment changed
pub type ChangeListener = Rc<dyn Fn()>;

/// Access to the URL fragment (the part after `#`)
pub trait Location {
    /// Current fragment without the leading `#`
    fn fragment(&self) -> String;
    /// Navigate to `fragment`, pushing a history entry
    fn assign(&self, fragment: &str);
    /// Navigate to `fragment`, replacing the current history entry
    fn replace(&self, fragment: &str);
    /// Register a callback fired whenever the fragment changes
    fn on_change(&self, listener: ChangeListener);
}

/// In-memory location with a history stack.
///
/// Listeners fire synchronously, and only when the fragment actually changes,
/// the same way `hashchange` only fires for a different hash.
#[derive(Default)]
pub struct MemoryLocation {
    history: RefCell<Vec<String>>,
    listeners: RefCell<Vec<ChangeListener>>,
}

impl MemoryLocation {
    /// Start with an empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `fragment`
    pub fn with_fragment(fragment: &str) -> Self {
        let location = Self::new();
        location
            .history
            .borrow_mut()
            .push(strip_hash(fragment).to_string());
        location
    }

    /// Every history entry, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    fn notify(&self) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    fn navigate(&self, fragment: &str, replace: bool) {
        let fragment = strip_hash(fragment);
        {
            let mut history = self.history.borrow_mut();
            if history.last().map(String::as_str) == Some(fragment) {
                return;
            }
            if replace {
                history.pop();
            }
            history.push(fragment.to_string());
        }
        self.notify();
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        self.history.borrow().last().cloned().unwrap_or_default()
    }

    fn assign(&self, fragment: &str) {
        self.navigate(fragment, false);
    }

    fn replace(&self, fragment: &str) {
        self.navigate(fragment, true);
    }

    fn on_change(&self, listener: ChangeListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

fn strip_hash(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}
