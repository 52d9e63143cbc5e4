//! Session store: persisted tokens, expiry tracking and silent refresh

use crate::api::{
    LOGIN_PATH, LOGOUT_ALL_PATH, LOGOUT_PATH, LoginRequest, LoginResponse, ME_PATH, MeResponse,
    REFRESH_PATH, RefreshResponse, RefreshTokenRequest,
};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::ports::{
    ApiRequest, ApiResponse, Clock, HttpTransport, KeyValueStore, Location, NoopNotifier,
    Notifier, Scheduler, SystemClock, TimerHandle, ToastKind,
};
use crate::router::Route;
use crate::token::{self, TokenClaims};
use crate::user::UserProfile;
use futures::FutureExt;
use http::StatusCode;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Shown when the server rejects a login without saying why
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed.";
/// Shown when the login request never got an answer
pub const CONNECTION_ERROR_MESSAGE: &str = "Unable to connect to the server.";
/// Shown after a forced logout
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    LoggedIn(UserProfile),
    /// User-facing reason
    Rejected(String),
}

impl LoginOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }

    pub const fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::LoggedIn(user) => Some(user),
            Self::Rejected(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::LoggedIn(_) => None,
            Self::Rejected(message) => Some(message),
        }
    }
}

struct Inner {
    config: SessionConfig,
    storage: Rc<dyn KeyValueStore>,
    transport: Rc<dyn HttpTransport>,
    scheduler: Rc<dyn Scheduler>,
    clock: Rc<dyn Clock>,
    location: Rc<dyn Location>,
    notifier: Rc<dyn Notifier>,
    /// The only live refresh timer
    refresh_timer: Cell<Option<TimerHandle>>,
}

/// Owns the persisted session and the refresh timer.
///
/// Cloning is cheap and every clone drives the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl SessionStore {
    /// Create a new builder
    pub fn builder(config: SessionConfig) -> SessionStoreBuilder {
        SessionStoreBuilder::new(config)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn access_token(&self) -> Option<String> {
        self.stored(&self.inner.config.storage_keys.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.stored(&self.inner.config.storage_keys.refresh_token)
    }

    /// Stored profile; `None` when absent or not valid JSON
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.stored(&self.inner.config.storage_keys.user)?;
        serde_json::from_str(&raw)
            .inspect_err(|e| debug!("Ignoring unreadable stored user: {e}"))
            .ok()
    }

    /// Decoded payload of the stored access token
    pub fn token_claims(&self) -> Option<TokenClaims> {
        token::decode_claims(&self.access_token()?)
    }

    /// A stored access token is the only logged-in signal; expiry is not checked
    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some()
    }

    /// Whether `token` is undecodable, has no `exp`, or expires within the skew
    pub fn is_token_expired(&self, token: &str) -> bool {
        token::is_expired(
            token,
            self.inner.clock.now_millis(),
            self.inner.config.expiry_skew_millis(),
        )
    }

    /// Whether a refresh timer is armed
    pub fn has_pending_refresh(&self) -> bool {
        self.inner.refresh_timer.get().is_some()
    }

    /// Restore a persisted session on startup
    pub async fn init(&self) {
        let Some(token) = self.access_token() else {
            debug!("No stored session");
            return;
        };

        if self.is_token_expired(&token) {
            info!("Stored access token is expired, refreshing");
            if self.refresh_access_token().await.is_err() {
                debug!("Stored session could not be restored");
            }
        } else {
            self.schedule_token_refresh();
        }
    }

    /// Log in with credentials. Failures are returned, never raised.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        let response = match self.post_login(username, password).await {
            Ok(response) => response,
            Err(e) => {
                error!("Login request failed: {e}");
                return LoginOutcome::Rejected(CONNECTION_ERROR_MESSAGE.to_string());
            }
        };

        if !response.success {
            let message = response
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string());
            info!(username, "Login rejected: {message}");
            return LoginOutcome::Rejected(message);
        }

        let Some(access_token) = response.access_token.filter(|token| !token.is_empty()) else {
            warn!("Login succeeded without an access token");
            return LoginOutcome::Rejected(LOGIN_FAILED_MESSAGE.to_string());
        };
        let user = response
            .user
            .unwrap_or_else(|| UserProfile::new(username));

        let keys = &self.inner.config.storage_keys;
        self.store(&keys.access_token, &access_token);
        match response.refresh_token {
            Some(refresh_token) => self.store(&keys.refresh_token, &refresh_token),
            None => self.inner.storage.remove(&keys.refresh_token),
        }
        match serde_json::to_string(&user) {
            Ok(serialized) => self.store(&keys.user, &serialized),
            Err(e) => warn!("Failed to serialize user profile: {e}"),
        }

        info!(username = %user.username, "Logged in");
        self.schedule_token_refresh();
        LoginOutcome::LoggedIn(user)
    }

    async fn post_login(&self, username: &str, password: &str) -> SessionResult<LoginResponse> {
        let request = ApiRequest::post(self.inner.config.endpoint(LOGIN_PATH))
            .json(&LoginRequest { username, password })?;
        let response = self.inner.transport.send(request).await?;
        Ok(response.json()?)
    }

    /// Revoke the refresh token server-side (best effort), then clear the session
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.refresh_token() {
            let request = ApiRequest::post(self.inner.config.endpoint(LOGOUT_PATH))
                .json(&RefreshTokenRequest {
                    refresh_token: &refresh_token,
                });
            match request {
                Ok(request) => self.send_revocation(request).await,
                Err(e) => warn!("Failed to encode logout request: {e}"),
            }
        }

        self.clear_auth();
        info!("Logged out");
    }

    /// Revoke every refresh token of the user (best effort), then clear the session
    pub async fn logout_all(&self) {
        if let Some(access_token) = self.access_token() {
            let request =
                ApiRequest::post(self.inner.config.endpoint(LOGOUT_ALL_PATH)).bearer(&access_token);
            self.send_revocation(request).await;
        }

        self.clear_auth();
        info!("Logged out from all devices");
    }

    async fn send_revocation(&self, request: ApiRequest) {
        match self.inner.transport.send(request).await {
            Ok(response) if !response.is_success() => {
                debug!(status = %response.status, "Logout request was not accepted");
            }
            Ok(_) => {}
            Err(e) => warn!("Logout request failed: {e}"),
        }
    }

    /// Remove all three session entries and cancel the refresh timer
    pub fn clear_auth(&self) {
        for key in self.inner.config.storage_keys.all() {
            self.inner.storage.remove(key);
        }
        self.cancel_refresh_timer();
    }

    /// Forced logout: clear the session, go to login, tell the user
    pub fn handle_auth_error(&self) {
        error!("Session could not be renewed, logging out");
        self.clear_auth();
        self.inner.location.assign(Route::Login.as_str());
        self.inner
            .notifier
            .notify(SESSION_EXPIRED_MESSAGE, ToastKind::Error);
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Any failure ends the session through [`Self::handle_auth_error`].
    pub async fn refresh_access_token(&self) -> SessionResult<()> {
        match self.exchange_refresh_token().await {
            Ok(access_token) => {
                self.store(&self.inner.config.storage_keys.access_token, &access_token);
                info!("Access token refreshed");
                self.schedule_token_refresh();
                Ok(())
            }
            Err(e) => {
                warn!("Token refresh failed: {e}");
                self.handle_auth_error();
                Err(e)
            }
        }
    }

    async fn exchange_refresh_token(&self) -> SessionResult<String> {
        let refresh_token = self
            .refresh_token()
            .ok_or(SessionError::MissingRefreshToken)?;
        let request = ApiRequest::post(self.inner.config.endpoint(REFRESH_PATH)).json(
            &RefreshTokenRequest {
                refresh_token: &refresh_token,
            },
        )?;

        let response: RefreshResponse = self.inner.transport.send(request).await?.json()?;
        let reason = response.reason();
        response
            .issued_token()
            .ok_or(SessionError::RefreshRejected(reason))
    }

    /// Arm the refresh timer for the stored access token.
    ///
    /// Fires `refresh_lead_secs` before expiry. When that moment passed less
    /// than `immediate_refresh_window_secs` ago the refresh runs right away;
    /// staler tokens are left to the reactive refresh in [`Self::auth_fetch`].
    /// Any previously armed timer is cancelled first.
    pub fn schedule_token_refresh(&self) {
        self.cancel_refresh_timer();

        let Some(access_token) = self.access_token() else {
            return;
        };
        let Some(expires_at) = token::expires_at_millis(&access_token) else {
            debug!("Access token carries no expiry, not scheduling a refresh");
            return;
        };

        let config = &self.inner.config;
        let delay = expires_at
            .saturating_sub(self.inner.clock.now_millis())
            .saturating_sub(config.refresh_lead_millis());

        if delay > 0 {
            let delay = Duration::from_millis(delay.unsigned_abs());
            debug!(?delay, "Scheduling token refresh");
            self.arm_refresh(delay);
        } else if delay > -config.immediate_refresh_window_millis() {
            debug!("Access token is about to expire, refreshing now");
            self.arm_refresh(Duration::ZERO);
        } else {
            debug!("Access token is too stale for a scheduled refresh");
        }
    }

    fn arm_refresh(&self, delay: Duration) {
        let weak = Rc::downgrade(&self.inner);
        let own_handle: Rc<Cell<Option<TimerHandle>>> = Rc::new(Cell::new(None));
        let task_handle = own_handle.clone();

        let task = async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // A replaced timer that fires anyway must not refresh
            if inner.refresh_timer.get() != task_handle.get() {
                return;
            }
            inner.refresh_timer.set(None);
            let session = Self { inner };
            if session.refresh_access_token().await.is_err() {
                debug!("Scheduled token refresh ended the session");
            }
        }
        .boxed_local();

        let handle = self.inner.scheduler.schedule(delay, task);
        own_handle.set(Some(handle));
        self.inner.refresh_timer.set(Some(handle));
    }

    fn cancel_refresh_timer(&self) {
        if let Some(handle) = self.inner.refresh_timer.take() {
            self.inner.scheduler.cancel(handle);
        }
    }

    /// Send `request` with the bearer token, renewing the session when needed.
    ///
    /// An expired token is refreshed before sending. A 401 triggers exactly
    /// one refresh and one retry; the retried response is returned whatever
    /// its status. When a refresh fails the session is already cleared and
    /// [`SessionError::AuthExpired`] is returned.
    pub async fn auth_fetch(&self, request: ApiRequest) -> SessionResult<ApiResponse> {
        let expired = self
            .access_token()
            .is_some_and(|token| self.is_token_expired(&token));
        if expired {
            debug!("Access token expired before request, refreshing");
            self.refresh_access_token()
                .await
                .map_err(|_| SessionError::AuthExpired)?;
        }

        let response = self
            .inner
            .transport
            .send(self.authorize(request.clone()))
            .await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(url = %request.url, "Request rejected with 401, refreshing and retrying once");
        self.refresh_access_token()
            .await
            .map_err(|_| SessionError::AuthExpired)?;

        Ok(self.inner.transport.send(self.authorize(request)).await?)
    }

    fn authorize(&self, request: ApiRequest) -> ApiRequest {
        match self.access_token() {
            Some(token) => request.bearer(&token),
            None => request,
        }
    }

    /// Reload the profile from `/auth/me` and store it
    pub async fn fetch_current_user(&self) -> SessionResult<UserProfile> {
        let request = ApiRequest::get(self.inner.config.endpoint(ME_PATH));
        let response = self.auth_fetch(request).await?;
        if !response.is_success() {
            return Err(SessionError::UnexpectedStatus {
                status: response.status.as_u16(),
                message: response.text(),
            });
        }

        let MeResponse { user } = response.json()?;
        match serde_json::to_string(&user) {
            Ok(serialized) => self.store(&self.inner.config.storage_keys.user, &serialized),
            Err(e) => warn!("Failed to serialize user profile: {e}"),
        }
        Ok(user)
    }

    fn stored(&self, key: &str) -> Option<String> {
        self.inner.storage.get(key).filter(|value| !value.is_empty())
    }

    fn store(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.storage.set(key, value) {
            warn!("Failed to persist session entry: {e}");
        }
    }
}

/// Builder for [`SessionStore`]
pub struct SessionStoreBuilder {
    config: SessionConfig,
    storage: Option<Rc<dyn KeyValueStore>>,
    transport: Option<Rc<dyn HttpTransport>>,
    scheduler: Option<Rc<dyn Scheduler>>,
    location: Option<Rc<dyn Location>>,
    clock: Rc<dyn Clock>,
    notifier: Rc<dyn Notifier>,
}

impl SessionStoreBuilder {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            storage: None,
            transport: None,
            scheduler: None,
            location: None,
            clock: Rc::new(SystemClock),
            notifier: Rc::new(NoopNotifier),
        }
    }

    #[must_use]
    pub fn storage(mut self, storage: Rc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Rc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Location used to send the user to the login page after a forced logout
    #[must_use]
    pub fn location(mut self, location: Rc<dyn Location>) -> Self {
        self.location = Some(location);
        self
    }

    /// Defaults to [`SystemClock`]
    #[must_use]
    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Defaults to [`NoopNotifier`]
    #[must_use]
    pub fn notifier(mut self, notifier: Rc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Build the store
    pub fn build(self) -> SessionResult<SessionStore> {
        let missing = |port: &str| SessionError::Configuration(format!("{port} is required"));

        Ok(SessionStore {
            inner: Rc::new(Inner {
                config: self.config,
                storage: self.storage.ok_or_else(|| missing("storage"))?,
                transport: self.transport.ok_or_else(|| missing("transport"))?,
                scheduler: self.scheduler.ok_or_else(|| missing("scheduler"))?,
                location: self.location.ok_or_else(|| missing("location"))?,
                clock: self.clock,
                notifier: self.notifier,
                refresh_timer: Cell::new(None),
            }),
        })
    }
}
