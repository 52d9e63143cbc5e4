//! Fragment resolution
//!
//! Redirects are single-hop: the redirect target is always renderable for
//! the same auth state, so resolving it again ends in `Render`.

use super::route::Route;

/// Where the router ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterState {
    /// No fragment has been handled yet
    #[default]
    Unresolved,
    Login,
    AppPage(Route),
}

impl RouterState {
    /// The route being shown, if any
    pub const fn route(self) -> Option<Route> {
        match self {
            Self::Unresolved => None,
            Self::Login => Some(Route::Login),
            Self::AppPage(route) => Some(route),
        }
    }
}

/// Outcome of resolving a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Show this page
    Render(Route),
    /// Replace the fragment with this route
    Redirect(Route),
}

/// Route name carried by a fragment: leading `#` and query suffix dropped,
/// empty meaning the home page
pub fn route_name(fragment: &str) -> &str {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let name = fragment.split('?').next().unwrap_or_default();
    if name.is_empty() {
        Route::HOME.as_str()
    } else {
        name
    }
}

/// Decide what to do with `fragment` for the given auth state
pub fn resolve(fragment: &str, logged_in: bool) -> Resolution {
    let name = route_name(fragment);
    let route = name.parse::<Route>().ok();

    if !route.is_some_and(Route::is_public) && !logged_in {
        return Resolution::Redirect(Route::Login);
    }

    match route {
        Some(Route::Login) if logged_in => Resolution::Redirect(Route::HOME),
        Some(route) => Resolution::Render(route),
        None if logged_in => Resolution::Redirect(Route::HOME),
        None => Resolution::Redirect(Route::Login),
    }
}
