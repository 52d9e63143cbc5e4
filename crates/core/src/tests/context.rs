use super::{Harness, is_call, ok_json};
use crate::api::{LOGIN_PATH, REFRESH_PATH};
use crate::ports::transport::mock::MockTransport;
use crate::ports::{ApiResponse, ToastKind};
use crate::router::Route;
use crate::session::SESSION_EXPIRED_MESSAGE;
use crate::testing::RenderCall;
use http::StatusCode;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_start_restores_expired_session() {
    let harness = Harness::at_fragment("clients");
    harness.seed_session(&harness.clock.token_expiring_in(-120), "refresh-1");

    let mut transport = MockTransport::new();
    let new_token = harness.clock.token_expiring_in(1800);
    transport
        .expect_send()
        .withf(|request| is_call(request, REFRESH_PATH))
        .times(1)
        .returning(move |_| Ok(ok_json(&json!({"success": true, "access_token": new_token}))));

    let context = harness.context(transport);
    context.start().await;

    assert_eq!(context.router().current_route(), Some(Route::Clients));
    assert_eq!(harness.scheduler.pending(), vec![Duration::from_secs(1680)]);
    assert!(harness.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_start_with_dead_session_lands_on_login_once() {
    let harness = Harness::at_fragment("clients");
    harness.seed_session(&harness.clock.token_expiring_in(-120), "refresh-1");

    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(|_| {
        Ok(ApiResponse::json_value(
            StatusCode::UNAUTHORIZED,
            &json!({"detail": "refresh token revoked"}),
        ))
    });

    let context = harness.context(transport);
    context.start().await;

    assert_eq!(harness.location.history(), vec!["clients", "login"]);
    assert_eq!(
        harness.renderer.calls(),
        vec![RenderCall::Login, RenderCall::Highlight(Route::Login)]
    );
    assert_eq!(
        harness.notifier.messages(),
        vec![(SESSION_EXPIRED_MESSAGE.to_string(), ToastKind::Error)]
    );
}

#[tokio::test]
async fn test_login_then_go_home() {
    let harness = Harness::at_fragment("login");
    let access_token = harness.clock.token_expiring_in(3600);

    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .withf(|request| is_call(request, LOGIN_PATH))
        .times(1)
        .returning(move |_| {
            Ok(ok_json(&json!({
                "success": true,
                "access_token": access_token,
                "refresh_token": "refresh-1",
                "user": {"id": 7, "username": "ops", "name": "Operations"}
            })))
        });

    let context = harness.context(transport);
    context.start().await;
    assert_eq!(context.router().current_route(), Some(Route::Login));

    let outcome = context.session().login("ops", "secret").await;
    assert!(outcome.is_success());
    context.router().navigate(Route::HOME, false);

    assert_eq!(harness.location.history(), vec!["login", "dashboard"]);
    assert_eq!(
        harness.renderer.calls()[2],
        RenderCall::App {
            route: Route::Dashboard,
            display_name: Some("Operations".to_string()),
        }
    );
    assert_eq!(harness.scheduler.pending(), vec![Duration::from_secs(3480)]);
}
