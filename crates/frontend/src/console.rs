//! `AdminConsole`, the handle page scripts drive the console through

use crate::dom::{DomRenderer, ToastNotifier};
use crate::fetch::{FetchInit, FetchReply};
use crate::location::BrowserLocation;
use crate::logging;
use crate::scheduler::BrowserScheduler;
use crate::storage::BrowserStorage;
use js_sys::Promise;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use viewo_core::router::Route;
use viewo_core::{ConsoleContext, ConsolePorts, LoginOutcome, SessionConfig, UserProfile};
use viewo_http::ReqwestTransport;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// Options accepted by `new AdminConsole(options)`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConsoleOptions {
    #[serde(flatten)]
    session: SessionConfig,
    /// `EnvFilter` directives for the browser console
    log_level: Option<String>,
}

#[derive(Serialize)]
struct LoginReply<'a> {
    success: bool,
    user: Option<&'a UserProfile>,
    message: Option<&'a str>,
}

impl<'a> From<&'a LoginOutcome> for LoginReply<'a> {
    fn from(outcome: &'a LoginOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            user: outcome.user(),
            message: outcome.message(),
        }
    }
}

/// Plain JS objects rather than `Map`s for the flattened profile fields
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsError::new(&error.to_string()).into()
}

#[wasm_bindgen]
pub struct AdminConsole {
    context: ConsoleContext,
}

#[wasm_bindgen]
impl AdminConsole {
    /// Build the console from an options object (`api_base`, `storage_keys`,
    /// timing overrides, `log_level`); every field is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<AdminConsole, JsValue> {
        let options: ConsoleOptions = if options.is_undefined() || options.is_null() {
            ConsoleOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        logging::init(options.log_level.as_deref());

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let origin = window.location().origin()?;

        let transport = ReqwestTransport::builder()
            .base_url(origin)
            .build()
            .map_err(js_error)?;
        let storage = BrowserStorage::new(&window).map_err(js_error)?;
        let renderer = DomRenderer::new(&window).ok_or_else(|| js_error("no document"))?;

        let ports = ConsolePorts::new(
            Rc::new(storage),
            Rc::new(transport),
            Rc::new(BrowserScheduler::new()),
            Rc::new(BrowserLocation::new(&window)),
        )
        .with_notifier(Rc::new(ToastNotifier))
        .with_renderer(Rc::new(renderer));

        let context = ConsoleContext::new(options.session, ports).map_err(js_error)?;
        tracing::debug!(api_base = %context.session().config().api_base, "Admin console created");
        Ok(Self { context })
    }

    /// Restore the stored session, then route the current fragment
    pub fn start(&self) -> Promise {
        let context = self.context.clone();
        future_to_promise(async move {
            context.start().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Resolves to `{success, user, message}`; never rejects
    pub fn login(&self, username: String, password: String) -> Promise {
        let session = self.context.session().clone();
        future_to_promise(async move {
            let outcome = session.login(&username, &password).await;
            to_js(&LoginReply::from(&outcome))
        })
    }

    pub fn logout(&self) -> Promise {
        let session = self.context.session().clone();
        future_to_promise(async move {
            session.logout().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = logoutAll)]
    pub fn logout_all(&self) -> Promise {
        let session = self.context.session().clone();
        future_to_promise(async move {
            session.logout_all().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Authenticated request. Resolves to `{status, ok, body}`; rejects when
    /// the session could not be renewed.
    #[wasm_bindgen(js_name = authFetch)]
    pub fn auth_fetch(&self, url: String, init: JsValue) -> Promise {
        let session = self.context.session().clone();
        future_to_promise(async move {
            let init: FetchInit = if init.is_undefined() || init.is_null() {
                FetchInit::default()
            } else {
                serde_wasm_bindgen::from_value(init)?
            };
            let request = init.into_request(url).map_err(js_error)?;
            let response = session.auth_fetch(request).await.map_err(js_error)?;
            to_js(&FetchReply::from(&response))
        })
    }

    /// Reload the profile from the server. Resolves to the user.
    #[wasm_bindgen(js_name = refreshUser)]
    pub fn refresh_user(&self) -> Promise {
        let session = self.context.session().clone();
        future_to_promise(async move {
            let user = session.fetch_current_user().await.map_err(js_error)?;
            to_js(&user)
        })
    }

    pub fn navigate(&self, route: &str, replace: bool) -> Result<(), JsValue> {
        let route: Route = route.parse().map_err(js_error)?;
        self.context.router().navigate(route, replace);
        Ok(())
    }

    #[wasm_bindgen(js_name = isLoggedIn)]
    pub fn is_logged_in(&self) -> bool {
        self.context.session().is_logged_in()
    }

    /// Stored profile, or `null`
    pub fn user(&self) -> Result<JsValue, JsValue> {
        match self.context.session().user() {
            Some(user) => to_js(&user),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = currentRoute)]
    pub fn current_route(&self) -> Option<String> {
        self.context
            .router()
            .current_route()
            .map(|route| route.as_str().to_string())
    }
}
