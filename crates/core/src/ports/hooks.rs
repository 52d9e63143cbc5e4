//! Capabilities provided by the host UI layer

use crate::router::Route;
use crate::user::UserProfile;
use std::fmt;

/// Severity of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shows short user-facing notifications
pub trait Notifier {
    fn notify(&self, message: &str, kind: ToastKind);
}

/// Switches between the login screen and the application shell
pub trait PageRenderer {
    fn show_login(&self);
    fn show_app(&self, route: Route, user: Option<&UserProfile>);
    /// Mark the nav entry for `route` active and clear every other one
    fn highlight_nav(&self, route: Route);
}

/// Notifier that drops every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _message: &str, _kind: ToastKind) {}
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl PageRenderer for NoopRenderer {
    fn show_login(&self) {}

    fn show_app(&self, _route: Route, _user: Option<&UserProfile>) {}

    fn highlight_nav(&self, _route: Route) {}
}
