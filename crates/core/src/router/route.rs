//! Route table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pages of the admin console, addressed as `#<name>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Login,
    Dashboard,
    Slides,
    Buildings,
    FloorPlan,
    Clients,
    Settings,
    Departments,
}

impl Route {
    /// Every route, in sidebar order
    pub const ALL: [Self; 8] = [
        Self::Login,
        Self::Dashboard,
        Self::Slides,
        Self::Buildings,
        Self::FloorPlan,
        Self::Clients,
        Self::Settings,
        Self::Departments,
    ];

    /// Landing page for a logged-in user
    pub const HOME: Self = Self::Dashboard;

    /// Fragment name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::Slides => "slides",
            Self::Buildings => "buildings",
            Self::FloorPlan => "floor-plan",
            Self::Clients => "clients",
            Self::Settings => "settings",
            Self::Departments => "departments",
        }
    }

    /// Reachable without a session
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fragment does not name a known page
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown route: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.as_str() == name)
            .ok_or_else(|| UnknownRoute(name.to_string()))
    }
}
