//! Hash router gating console pages behind the session

mod resolve;
mod route;

pub use resolve::{Resolution, RouterState, resolve, route_name};
pub use route::{Route, UnknownRoute};

use crate::ports::{Location, PageRenderer};
use crate::session::SessionStore;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

struct Inner {
    session: SessionStore,
    location: Rc<dyn Location>,
    renderer: Rc<dyn PageRenderer>,
    state: Cell<RouterState>,
}

/// Maps the URL fragment to a page. Cheap to clone.
#[derive(Clone)]
pub struct Router {
    inner: Rc<Inner>,
}

impl Router {
    pub fn new(
        session: SessionStore,
        location: Rc<dyn Location>,
        renderer: Rc<dyn PageRenderer>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                session,
                location,
                renderer,
                state: Cell::new(RouterState::Unresolved),
            }),
        }
    }

    /// Follow fragment changes and resolve the current fragment
    pub fn init(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.location.on_change(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.handle_route();
            }
        }));
        self.handle_route();
    }

    pub fn state(&self) -> RouterState {
        self.inner.state.get()
    }

    /// Route currently shown
    pub fn current_route(&self) -> Option<Route> {
        self.state().route()
    }

    /// Resolve the current fragment and either redirect or render
    pub fn handle_route(&self) {
        let fragment = self.inner.location.fragment();
        let logged_in = self.inner.session.is_logged_in();

        match resolve(&fragment, logged_in) {
            Resolution::Redirect(target) => {
                debug!(%fragment, %target, logged_in, "Redirecting");
                self.navigate(target, true);
            }
            Resolution::Render(route) => self.render(route),
        }
    }

    fn render(&self, route: Route) {
        let renderer = &self.inner.renderer;
        if route == Route::Login {
            self.inner.state.set(RouterState::Login);
            renderer.show_login();
        } else {
            self.inner.state.set(RouterState::AppPage(route));
            let user = self.inner.session.user();
            renderer.show_app(route, user.as_ref());
        }
        renderer.highlight_nav(route);
    }

    /// Go to `route`; `replace` overwrites the current history entry
    pub fn navigate(&self, route: Route, replace: bool) {
        if replace {
            self.inner.location.replace(route.as_str());
        } else {
            self.inner.location.assign(route.as_str());
        }
    }
}
