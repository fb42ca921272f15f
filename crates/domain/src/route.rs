//! Page routing and the role-based route guard.
//!
//! The route table maps URL paths to pages. [`Router::guard`] decides, for a
//! path and the current session, whether the page may be shown or where the
//! user should be sent instead. Authorization failures never produce an
//! error: they redirect.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::auth::Session;
use crate::user::Role;

/// Who may open a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Only signed-out visitors (login, signup); signed-in users are sent to
    /// their dashboard.
    Guest,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in users holding one of the roles.
    Roles(&'static [Role]),
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path pattern; `:name` segments capture parameters.
    pub pattern: &'static str,
    /// Page identifier rendered for this route.
    pub page: &'static str,
    /// Access requirement.
    pub access: Access,
}

/// A matched route with its captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The matched route.
    pub route: &'a Route,
    /// Values of `:name` segments.
    pub params: BTreeMap<&'static str, String>,
}

/// Outcome of the route guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GuardDecision {
    /// Render the page.
    Allow {
        /// Page identifier.
        page: &'static str,
        /// Captured path parameters.
        params: BTreeMap<&'static str, String>,
    },
    /// Not signed in; go to the login page and come back afterwards.
    RedirectToLogin {
        /// Path to return to after login.
        return_to: String,
    },
    /// Signed in but not allowed here; go to this path instead.
    Redirect(&'static str),
    /// No route matches.
    NotFound,
}

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

const ADMIN: &[Role] = &[Role::Admin];
const STAFF: &[Role] = &[Role::Operator, Role::Admin];
const CUSTOMER: &[Role] = &[Role::Customer];

/// The route table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::terminal()
    }
}

impl Router {
    /// Creates a router over a custom table.
    #[must_use]
    pub const fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The terminal application's route table.
    #[must_use]
    pub fn terminal() -> Self {
        let route = |pattern: &'static str, page: &'static str, access: Access| Route {
            pattern,
            page,
            access,
        };
        Self::new(vec![
            route(LOGIN_PATH, "login", Access::Guest),
            route("/signup", "signup", Access::Guest),
            route("/verify-otp", "verify-otp", Access::Guest),
            route("/forgot-password", "forgot-password", Access::Guest),
            route("/reset-password", "reset-password", Access::Guest),
            route("/oauth/callback", "oauth-callback", Access::Guest),
            route("/unauthorized", "unauthorized", Access::Public),
            route("/profile", "profile", Access::Authenticated),
            route("/admin/dashboard", "admin-dashboard", Access::Roles(ADMIN)),
            route("/admin/users", "user-list", Access::Roles(ADMIN)),
            route("/admin/users/:id", "user-detail", Access::Roles(ADMIN)),
            route("/admin/audit-logs", "audit-logs", Access::Roles(ADMIN)),
            route("/admin/shipping-lines", "shipping-lines", Access::Roles(ADMIN)),
            route("/admin/yard-blocks", "yard-blocks", Access::Roles(ADMIN)),
            route("/admin/vehicles", "vehicle-registry", Access::Roles(ADMIN)),
            route("/admin/equipment", "equipment-registry", Access::Roles(ADMIN)),
            route("/operator/dashboard", "operator-dashboard", Access::Roles(STAFF)),
            route("/operator/gate-in", "gate-in", Access::Roles(STAFF)),
            route("/operator/gate-out", "gate-out", Access::Roles(STAFF)),
            route("/operator/gate-operations", "gate-operations", Access::Roles(STAFF)),
            route("/operator/containers", "container-list", Access::Roles(STAFF)),
            route("/operator/containers/:id", "container-detail", Access::Roles(STAFF)),
            route("/operator/yard", "yard-overview", Access::Roles(STAFF)),
            route("/operator/vehicles", "vehicle-list", Access::Roles(STAFF)),
            route("/operator/equipment", "equipment-list", Access::Roles(STAFF)),
            route("/customer/dashboard", "customer-dashboard", Access::Roles(CUSTOMER)),
            route("/customer/containers", "my-containers", Access::Roles(CUSTOMER)),
            route("/customer/containers/:id", "my-container-detail", Access::Roles(CUSTOMER)),
        ])
    }

    /// Finds the route for a path, ignoring query string and trailing slash.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.routes.iter().find_map(|route| {
            let pattern: Vec<&'static str> =
                route.pattern.split('/').filter(|s| !s.is_empty()).collect();
            if pattern.len() != segments.len() {
                return None;
            }
            let mut params = BTreeMap::new();
            for (want, have) in pattern.iter().copied().zip(segments.iter().copied()) {
                if let Some(name) = want.strip_prefix(':') {
                    params.insert(name, have.to_string());
                } else if want != have {
                    return None;
                }
            }
            Some(RouteMatch { route, params })
        })
    }

    /// Decides what to show for `path` given the current session.
    ///
    /// `/` sends signed-in users to their dashboard and everyone else to
    /// the login page.
    #[must_use]
    pub fn guard(&self, path: &str, session: &Session) -> GuardDecision {
        let role = session.is_authenticated().then(|| session.role()).flatten();

        if path.trim_matches('/').is_empty() {
            return role.map_or(GuardDecision::Redirect(LOGIN_PATH), |r| {
                GuardDecision::Redirect(r.dashboard_path())
            });
        }

        let Some(matched) = self.resolve(path) else {
            return GuardDecision::NotFound;
        };
        let allow = GuardDecision::Allow {
            page: matched.route.page,
            params: matched.params,
        };

        match (matched.route.access, role) {
            (Access::Public, _) | (Access::Guest, None) => allow,
            (Access::Guest, Some(role)) => GuardDecision::Redirect(role.dashboard_path()),
            (Access::Authenticated | Access::Roles(_), None) => GuardDecision::RedirectToLogin {
                return_to: path.to_string(),
            },
            (Access::Authenticated, Some(_)) => allow,
            (Access::Roles(roles), Some(role)) if roles.contains(&role) => allow,
            (Access::Roles(_), Some(role)) => GuardDecision::Redirect(role.dashboard_path()),
        }
    }
}
