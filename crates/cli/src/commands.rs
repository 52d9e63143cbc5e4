//! CLI commands

use crate::console::Console;
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::io::Write;
use tracing::info;
use viewo_core::ports::{ApiRequest, Location};
use viewo_core::{LoginOutcome, RouterState, SessionStore, UserProfile};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,

        /// Password, read from VIEWO_PASSWORD when omitted
        #[arg(short, long, env = "VIEWO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Revoke the stored session and forget it
    Logout {
        /// Revoke the sessions of every device
        #[arg(long)]
        all: bool,
    },

    /// Show the stored session
    Status,

    /// Reload the current user from the server
    Whoami,

    /// Authenticated GET of a path below the API base
    Get {
        /// e.g. /buildings
        path: String,
    },

    /// Show where the router takes a fragment
    Route {
        /// e.g. settings?x=1
        fragment: String,
    },
}

impl Commands {
    /// Run against an already started console, printing results to `out`
    pub async fn execute(self, console: &Console, out: &mut dyn Write) -> Result<()> {
        let session = console.context.session();

        match self {
            Self::Login { username, password } => {
                match session.login(&username, &password).await {
                    LoginOutcome::LoggedIn(user) => {
                        writeln!(out, "Logged in as {}", describe_user(&user))?;
                        Ok(())
                    }
                    LoginOutcome::Rejected(message) => bail!(message),
                }
            }
            Self::Logout { all } => {
                if all {
                    session.logout_all().await;
                    writeln!(out, "Logged out from all devices")?;
                } else {
                    session.logout().await;
                    writeln!(out, "Logged out")?;
                }
                Ok(())
            }
            Self::Status => write_status(session, out),
            Self::Whoami => {
                if !session.is_logged_in() {
                    bail!("Not logged in");
                }
                let user = session.fetch_current_user().await?;
                writeln!(out, "{}", describe_user(&user))?;
                if let Some(email) = &user.email {
                    writeln!(out, "Email: {email}")?;
                }
                if let Some(role) = &user.role {
                    writeln!(out, "Role: {role}")?;
                }
                Ok(())
            }
            Self::Get { path } => get(session, &path, out).await,
            Self::Route { fragment } => {
                let fragment = fragment.strip_prefix('#').unwrap_or(&fragment).to_string();
                console.location.assign(&fragment);
                writeln!(
                    out,
                    "#{fragment} -> #{} ({})",
                    console.location.fragment(),
                    describe_state(console.context.router().state())
                )?;
                Ok(())
            }
        }
    }
}

fn describe_user(user: &UserProfile) -> String {
    match &user.name {
        Some(name) if !name.is_empty() && *name != user.username => {
            format!("{name} ({})", user.username)
        }
        _ => user.username.clone(),
    }
}

fn describe_state(state: RouterState) -> String {
    match state {
        RouterState::Unresolved => "unresolved".to_string(),
        RouterState::Login => "login page".to_string(),
        RouterState::AppPage(route) => format!("{route} page"),
    }
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis).map_or_else(
        || format!("{millis} ms"),
        |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn write_status(session: &SessionStore, out: &mut dyn Write) -> Result<()> {
    let Some(access_token) = session.access_token() else {
        writeln!(out, "Not logged in")?;
        return Ok(());
    };

    match session.user() {
        Some(user) => writeln!(out, "Logged in as {}", describe_user(&user))?,
        None => writeln!(out, "Logged in")?,
    }

    let claims = session.token_claims();
    if let Some(role) = claims.as_ref().and_then(|claims| claims.role.as_deref()) {
        writeln!(out, "Role: {role}")?;
    }
    match claims.and_then(|claims| claims.expires_at_millis()) {
        Some(expires_at) => {
            let state = if session.is_token_expired(&access_token) {
                "expired"
            } else {
                "valid"
            };
            writeln!(out, "Access token: {state}, expires {}", format_millis(expires_at))?;
        }
        None => writeln!(out, "Access token: no expiry, treated as expired")?,
    }

    let refresh = if session.refresh_token().is_some() {
        "stored"
    } else {
        "missing"
    };
    writeln!(out, "Refresh token: {refresh}")?;
    Ok(())
}

async fn get(session: &SessionStore, path: &str, out: &mut dyn Write) -> Result<()> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    let response = session
        .auth_fetch(ApiRequest::get(session.config().endpoint(&path)))
        .await?;
    info!(%path, status = %response.status, "Fetched");

    match response.json::<serde_json::Value>() {
        Ok(body) => writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?,
        Err(_) => writeln!(out, "{}", response.text())?,
    }

    if !response.is_success() {
        bail!("Request failed with status {}", response.status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http::StatusCode;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use viewo_core::ports::{
        ApiResponse, HttpTransport, KeyValueStore, MemoryLocation, MemoryStore,
    };
    use viewo_core::testing::{FixedClock, ManualScheduler};
    use viewo_core::{ConsoleContext, ConsolePorts, SessionConfig, TransportError};

    /// Replays canned responses in order and records request URLs
    #[derive(Default)]
    struct ScriptedTransport {
        responses: RefCell<VecDeque<ApiResponse>>,
        urls: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.urls.borrow_mut().push(request.url);
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| TransportError::Network("no scripted response".to_string()))
        }
    }

    struct Fixture {
        console: Console,
        storage: Rc<MemoryStore>,
        transport: Rc<ScriptedTransport>,
        clock: Rc<FixedClock>,
    }

    fn fixture(responses: Vec<ApiResponse>) -> Fixture {
        let storage = Rc::new(MemoryStore::new());
        let transport = Rc::new(ScriptedTransport {
            responses: RefCell::new(responses.into()),
            ..ScriptedTransport::default()
        });
        let clock = Rc::new(FixedClock::default());
        let location = Rc::new(MemoryLocation::new());

        let ports = ConsolePorts::new(
            storage.clone(),
            transport.clone(),
            Rc::new(ManualScheduler::new()),
            location.clone(),
        )
        .with_clock(clock.clone());
        let context =
            ConsoleContext::new(SessionConfig::new("http://admin.test/api/v1"), ports).unwrap();

        Fixture {
            console: Console::new(context, location),
            storage,
            transport,
            clock,
        }
    }

    fn seed(fixture: &Fixture, access_token: &str) {
        let keys = &fixture.console.context.session().config().storage_keys;
        fixture.storage.set(&keys.access_token, access_token).unwrap();
        fixture.storage.set(&keys.refresh_token, "refresh-1").unwrap();
        fixture
            .storage
            .set(&keys.user, r#"{"username":"admin","name":"Site Admin"}"#)
            .unwrap();
    }

    async fn run(fixture: &Fixture, command: Commands) -> (Result<()>, String) {
        fixture.console.context.start().await;
        let mut out = Vec::new();
        let result = command.execute(&fixture.console, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_login_prints_user() {
        let fixture = fixture(vec![ApiResponse::json_value(
            StatusCode::OK,
            &json!({
                "success": true,
                "access_token": "a.b.c",
                "refresh_token": "r",
                "user": {"username": "admin", "name": "Site Admin"}
            }),
        )]);

        let (result, out) = run(
            &fixture,
            Commands::Login {
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
        )
        .await;

        result.unwrap();
        assert_eq!(out, "Logged in as Site Admin (admin)\n");
        assert_eq!(
            fixture.transport.urls.borrow().as_slice(),
            ["http://admin.test/api/v1/auth/login"]
        );
    }

    #[tokio::test]
    async fn test_login_rejection_is_an_error() {
        let fixture = fixture(vec![ApiResponse::json_value(
            StatusCode::OK,
            &json!({"success": false, "message": "Invalid credentials"}),
        )]);

        let (result, _) = run(
            &fixture,
            Commands::Login {
                username: "admin".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await;
        assert_eq!(result.unwrap_err().to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_status_logged_out() {
        let fixture = fixture(Vec::new());
        let (result, out) = run(&fixture, Commands::Status).await;
        result.unwrap();
        assert_eq!(out, "Not logged in\n");
    }

    #[tokio::test]
    async fn test_status_logged_in() {
        let fixture = fixture(Vec::new());
        seed(&fixture, &fixture.clock.token_expiring_in(1800));

        let (result, out) = run(&fixture, Commands::Status).await;
        result.unwrap();
        assert_eq!(
            out,
            "Logged in as Site Admin (admin)\n\
             Role: admin\n\
             Access token: valid, expires 2023-11-14 22:43:20 UTC\n\
             Refresh token: stored\n"
        );
    }

    #[tokio::test]
    async fn test_route_logged_out_goes_to_login() {
        let fixture = fixture(Vec::new());
        let (result, out) = run(
            &fixture,
            Commands::Route {
                fragment: "#settings?x=1".to_string(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(out, "#settings?x=1 -> #login (login page)\n");
    }

    #[tokio::test]
    async fn test_route_logged_in() {
        let fixture = fixture(Vec::new());
        seed(&fixture, &fixture.clock.token_expiring_in(1800));

        let (result, out) = run(
            &fixture,
            Commands::Route {
                fragment: "floor-plan".to_string(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(out, "#floor-plan -> #floor-plan (floor-plan page)\n");
    }

    #[tokio::test]
    async fn test_get_prints_json_and_fails_on_error_status() {
        let fixture = fixture(vec![ApiResponse::json_value(
            StatusCode::NOT_FOUND,
            &json!({"detail": "Building not found"}),
        )]);
        seed(&fixture, &fixture.clock.token_expiring_in(1800));

        let (result, out) = run(
            &fixture,
            Commands::Get {
                path: "buildings/9".to_string(),
            },
        )
        .await;

        assert!(result.unwrap_err().to_string().contains("404"));
        assert_eq!(out, "{\n  \"detail\": \"Building not found\"\n}\n");
        assert_eq!(
            fixture.transport.urls.borrow().as_slice(),
            ["http://admin.test/api/v1/buildings/9"]
        );
    }

    #[tokio::test]
    async fn test_logout_all() {
        let fixture = fixture(vec![ApiResponse::json_value(
            StatusCode::OK,
            &json!({"success": true}),
        )]);
        seed(&fixture, &fixture.clock.token_expiring_in(1800));

        let (result, out) = run(&fixture, Commands::Logout { all: true }).await;
        result.unwrap();
        assert_eq!(out, "Logged out from all devices\n");
        assert!(fixture.storage.is_empty());
        assert_eq!(
            fixture.transport.urls.borrow().as_slice(),
            ["http://admin.test/api/v1/auth/logout-all"]
        );
    }

    #[tokio::test]
    async fn test_whoami_requires_session() {
        let fixture = fixture(Vec::new());
        let (result, _) = run(&fixture, Commands::Whoami).await;
        assert_eq!(result.unwrap_err().to_string(), "Not logged in");
    }
}
