//! Viewo admin console in the browser
//!
//! Browser implementations of the console ports (localStorage, timers,
//! `location.hash`, the page DOM) and the [`AdminConsole`] handle exported to
//! page scripts.

pub mod console;
pub mod dom;
pub mod fetch;
pub mod location;
pub mod logging;
pub mod scheduler;
pub mod storage;

pub use console::AdminConsole;
pub use dom::{DomRenderer, ToastNotifier};
pub use location::BrowserLocation;
pub use scheduler::BrowserScheduler;
pub use storage::BrowserStorage;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}
