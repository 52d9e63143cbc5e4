//! `window.location.hash` backed location

use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;
use viewo_core::ports::{ChangeListener, Location};
use web_sys::Window;

/// Reads and writes the URL fragment and relays `hashchange` events
pub struct BrowserLocation {
    location: web_sys::Location,
    listeners: Rc<RefCell<Vec<ChangeListener>>>,
    _hashchange: EventListener,
}

impl BrowserLocation {
    pub fn new(window: &Window) -> Self {
        let listeners: Rc<RefCell<Vec<ChangeListener>>> = Rc::default();
        let relay = Rc::clone(&listeners);
        let hashchange = EventListener::new(window, "hashchange", move |_| {
            let listeners = relay.borrow().clone();
            for listener in listeners {
                listener();
            }
        });

        Self {
            location: window.location(),
            listeners,
            _hashchange: hashchange,
        }
    }
}

impl Location for BrowserLocation {
    fn fragment(&self) -> String {
        let hash = self.location.hash().unwrap_or_default();
        match hash.strip_prefix('#') {
            Some(fragment) => fragment.to_string(),
            None => hash,
        }
    }

    fn assign(&self, fragment: &str) {
        if let Err(e) = self.location.set_hash(fragment) {
            warn!(fragment, "Failed to set location hash: {e:?}");
        }
    }

    fn replace(&self, fragment: &str) {
        if let Err(e) = self.location.replace(&format!("#{fragment}")) {
            warn!(fragment, "Failed to replace location: {e:?}");
        }
    }

    fn on_change(&self, listener: ChangeListener) {
        self.listeners.borrow_mut().push(listener);
    }
}
