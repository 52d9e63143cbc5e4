use super::Harness;
use crate::ports::{KeyValueStore, Location};
use crate::ports::transport::mock::MockTransport;
use crate::router::{Route, RouterState};
use crate::testing::RenderCall;

fn logged_in_at(fragment: &str) -> Harness {
    let harness = Harness::at_fragment(fragment);
    harness.seed_session(&harness.clock.token_expiring_in(1800), "refresh-1");
    harness
}

fn app(route: Route) -> RenderCall {
    RenderCall::App {
        route,
        display_name: Some("Admin".to_string()),
    }
}

#[test]
fn test_logged_out_deep_link_replaces_with_login() {
    let harness = Harness::at_fragment("#settings?x=1");
    let context = harness.context(MockTransport::new());
    context.router().init();

    assert_eq!(harness.location.history(), vec!["login"]);
    assert_eq!(context.router().state(), RouterState::Login);
    assert_eq!(
        harness.renderer.calls(),
        vec![RenderCall::Login, RenderCall::Highlight(Route::Login)]
    );
}

#[test]
fn test_login_page_while_logged_in_goes_home() {
    let harness = logged_in_at("login");
    let context = harness.context(MockTransport::new());
    context.router().init();

    assert_eq!(harness.location.history(), vec!["dashboard"]);
    assert_eq!(context.router().current_route(), Some(Route::Dashboard));
    assert_eq!(
        harness.renderer.calls(),
        vec![app(Route::Dashboard), RenderCall::Highlight(Route::Dashboard)]
    );
}

#[test]
fn test_empty_fragment_renders_dashboard_in_place() {
    let harness = logged_in_at("");
    let context = harness.context(MockTransport::new());
    context.router().init();

    assert_eq!(harness.location.history(), vec![""]);
    assert_eq!(harness.renderer.last_page(), Some(Route::Dashboard));
}

#[test]
fn test_unknown_page_logged_in_goes_home() {
    let harness = logged_in_at("reports");
    let context = harness.context(MockTransport::new());
    context.router().init();

    assert_eq!(harness.location.history(), vec!["dashboard"]);
    assert_eq!(harness.renderer.last_page(), Some(Route::Dashboard));
}

#[test]
fn test_unknown_page_logged_out_goes_to_login() {
    let harness = Harness::at_fragment("reports");
    let context = harness.context(MockTransport::new());
    context.router().init();

    assert_eq!(harness.location.history(), vec!["login"]);
    assert_eq!(harness.renderer.last_page(), Some(Route::Login));
}

#[test]
fn test_query_is_ignored_for_known_page() {
    let harness = logged_in_at("floor-plan?building=3");
    let context = harness.context(MockTransport::new());
    context.router().init();

    assert_eq!(harness.location.fragment(), "floor-plan?building=3");
    assert_eq!(context.router().current_route(), Some(Route::FloorPlan));
}

#[test]
fn test_navigate_pushes_and_renders() {
    let harness = logged_in_at("dashboard");
    let context = harness.context(MockTransport::new());
    context.router().init();
    harness.renderer.clear();

    context.router().navigate(Route::Departments, false);

    assert_eq!(harness.location.history(), vec!["dashboard", "departments"]);
    assert_eq!(
        harness.renderer.calls(),
        vec![app(Route::Departments), RenderCall::Highlight(Route::Departments)]
    );
}

#[test]
fn test_fragment_change_after_logout_is_gated() {
    let harness = logged_in_at("buildings");
    let context = harness.context(MockTransport::new());
    context.router().init();

    context.session().clear_auth();
    harness.location.assign("clients");

    assert_eq!(harness.location.history(), vec!["buildings", "login"]);
    assert_eq!(context.router().state(), RouterState::Login);
}

#[test]
fn test_forced_logout_shows_login() {
    let harness = logged_in_at("slides");
    let context = harness.context(MockTransport::new());
    context.router().init();

    context.session().handle_auth_error();

    assert_eq!(harness.location.history(), vec!["slides", "login"]);
    assert_eq!(harness.renderer.last_page(), Some(Route::Login));
}

#[test]
fn test_app_page_without_stored_user() {
    let harness = Harness::at_fragment("settings");
    let keys = Harness::config().storage_keys;
    harness
        .storage
        .set(&keys.access_token, &harness.clock.token_expiring_in(1800))
        .unwrap();

    let context = harness.context(MockTransport::new());
    context.router().init();

    assert_eq!(
        harness.renderer.calls()[0],
        RenderCall::App {
            route: Route::Settings,
            display_name: None
        }
    );
}

#[test]
fn test_router_state_before_init() {
    let harness = Harness::new();
    let context = harness.context(MockTransport::new());
    assert_eq!(context.router().state(), RouterState::Unresolved);
    assert!(harness.renderer.calls().is_empty());
}
