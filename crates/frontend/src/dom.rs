//! Page DOM hooks
//!
//! The console page ships the markup; these only toggle it. Page-defined
//! `showPage(route)` and `showToast(message, kind)` functions are called when
//! present and skipped otherwise.

use js_sys::{Array, Function, Reflect};
use tracing::{debug, warn};
use viewo_core::UserProfile;
use viewo_core::ports::{Notifier, PageRenderer, ToastKind};
use viewo_core::router::Route;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

const LOGIN_PAGE_ID: &str = "loginPage";
const DASHBOARD_ID: &str = "dashboard";
const USER_AVATAR_ID: &str = "userAvatar";
const USER_NAME_ID: &str = "userName";
const NAV_ITEM_SELECTOR: &str = ".nav-item";
const VISIBLE_CLASS: &str = "show";
const ACTIVE_CLASS: &str = "active";

/// Call `window[name](...args)` if the page defines it
fn call_page_hook(name: &str, args: &Array) {
    let hook = match Reflect::get(&js_sys::global(), &JsValue::from_str(name)) {
        Ok(value) => value,
        Err(e) => {
            warn!(hook = name, "Failed to look up page hook: {e:?}");
            return;
        }
    };
    let Some(hook) = hook.dyn_ref::<Function>() else {
        debug!(hook = name, "Page hook not defined");
        return;
    };
    if let Err(e) = hook.apply(&JsValue::NULL, args) {
        warn!(hook = name, "Page hook threw: {e:?}");
    }
}

fn report(result: Result<(), JsValue>, action: &str) {
    if let Err(e) = result {
        warn!("Failed to {action}: {e:?}");
    }
}

/// Shows the login or dashboard section of the console page
pub struct DomRenderer {
    document: Document,
}

impl DomRenderer {
    pub fn new(window: &Window) -> Option<Self> {
        window.document().map(|document| Self { document })
    }

    fn html_element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn set_login_visible(&self, visible: bool) {
        if let Some(login) = self.html_element(LOGIN_PAGE_ID) {
            let display = if visible { "flex" } else { "none" };
            report(
                login.style().set_property("display", display),
                "toggle the login page",
            );
        }
        if let Some(dashboard) = self.document.get_element_by_id(DASHBOARD_ID) {
            report(
                dashboard
                    .class_list()
                    .toggle_with_force(VISIBLE_CLASS, !visible)
                    .map(|_| ()),
                "toggle the dashboard",
            );
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.document.get_element_by_id(id) {
            element.set_text_content(Some(text));
        }
    }
}

impl PageRenderer for DomRenderer {
    fn show_login(&self) {
        self.set_login_visible(true);
    }

    fn show_app(&self, route: Route, user: Option<&UserProfile>) {
        self.set_login_visible(false);

        if let Some(user) = user {
            self.set_text(USER_AVATAR_ID, &user.avatar_initial().to_string());
            self.set_text(USER_NAME_ID, user.display_name());
        }

        call_page_hook("showPage", &Array::of1(&JsValue::from_str(route.as_str())));
    }

    fn highlight_nav(&self, route: Route) {
        let items = match self.document.query_selector_all(NAV_ITEM_SELECTOR) {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to query nav items: {e:?}");
                return;
            }
        };

        for index in 0..items.length() {
            let Some(item) = items
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let active = item.get_attribute("data-page").as_deref() == Some(route.as_str());
            report(
                item.class_list()
                    .toggle_with_force(ACTIVE_CLASS, active)
                    .map(|_| ()),
                "toggle a nav item",
            );
        }
    }
}

/// Forwards notifications to the page's `showToast`
#[derive(Debug, Clone, Copy, Default)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        call_page_hook(
            "showToast",
            &Array::of2(&JsValue::from_str(message), &JsValue::from_str(kind.as_str())),
        );
    }
}
