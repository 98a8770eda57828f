//! Navigation guard.
//!
//! Every page transition is checked against the current session before it is
//! allowed. [`evaluate`] is the whole policy; [`RouteTable`] supplies the
//! route metadata it needs.

use serde::{Deserialize, Serialize};

/// Name of the login/signup route.
pub const AUTH_ROUTE: &str = "auth";
/// Where signed-in users are sent when they open the auth route.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Where anonymous users are sent when a route needs a session.
pub const LOGIN_PATH: &str = "/auth/login";

/// A route declared by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub name: &'static str,
    /// Path pattern. `:param` matches one segment; a trailing `?` makes it optional.
    pub pattern: &'static str,
    pub requires_auth: bool,
}

/// The destination of a navigation, as the guard sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    /// Route name, `None` when no declared route matched.
    pub name: Option<String>,
    pub requires_auth: bool,
    /// Path including query string and fragment.
    pub full_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Redirect {
    fn to(path: &str) -> Self {
        Self {
            path: path.to_string(),
            query: Vec::new(),
        }
    }

    /// Path with the query form-urlencoded, suitable for a `Location` header.
    pub fn location(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{}", self.path, query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

/// Decide whether a navigation may proceed. First matching rule wins:
/// signed-in users skip the auth route, anonymous users are sent to login
/// (remembering where they were going), everything else passes.
pub fn evaluate(session_active: bool, target: &NavigationTarget) -> GuardDecision {
    if session_active && target.name.as_deref() == Some(AUTH_ROUTE) {
        return GuardDecision::Redirect(Redirect::to(DASHBOARD_PATH));
    }
    if target.requires_auth && !session_active {
        return GuardDecision::Redirect(Redirect {
            path: LOGIN_PATH.to_string(),
            query: vec![("redirect".to_string(), target.full_path.clone())],
        });
    }
    GuardDecision::Allow
}

/// The application's declared routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            RouteDef {
                name: "home",
                pattern: "/",
                requires_auth: false,
            },
            RouteDef {
                name: AUTH_ROUTE,
                pattern: "/auth/:initialMode?",
                requires_auth: false,
            },
            RouteDef {
                name: "dashboard",
                pattern: DASHBOARD_PATH,
                requires_auth: true,
            },
            RouteDef {
                name: "tickets",
                pattern: "/dashboard/tickets",
                requires_auth: true,
            },
        ])
    }
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self { routes }
    }

    /// Build the guard's view of `full_path`. Only the path portion takes
    /// part in matching, ignoring ASCII case; unknown paths need no session.
    pub fn resolve(&self, full_path: &str) -> NavigationTarget {
        let path = full_path.split(['?', '#']).next().unwrap_or_default();
        let matched = self.routes.iter().find(|r| pattern_matches(r.pattern, path));
        NavigationTarget {
            name: matched.map(|r| r.name.to_string()),
            requires_auth: matched.is_some_and(|r| r.requires_auth),
            full_path: full_path.to_string(),
        }
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut wanted = segments(pattern);
    let mut given = segments(path);
    loop {
        match (wanted.next(), given.next()) {
            (None, None) => return true,
            (Some(p), None) => {
                return p.starts_with(':') && p.ends_with('?') && wanted.next().is_none()
            }
            (None, Some(_)) => return false,
            (Some(p), Some(_)) if p.starts_with(':') => {}
            (Some(p), Some(s)) if p.eq_ignore_ascii_case(s) => {}
            _ => return false,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(path: &str) -> NavigationTarget {
        RouteTable::default().resolve(path)
    }

    #[test]
    fn anonymous_user_is_sent_to_login_with_redirect() {
        let decision = evaluate(false, &target("/dashboard/tickets"));
        let GuardDecision::Redirect(redirect) = decision else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.path, "/auth/login");
        assert_eq!(
            redirect.query,
            vec![("redirect".to_string(), "/dashboard/tickets".to_string())]
        );
        assert_eq!(
            redirect.location(),
            "/auth/login?redirect=%2Fdashboard%2Ftickets"
        );
    }

    #[test]
    fn signed_in_user_skips_auth_route() {
        for path in ["/auth", "/auth/login", "/auth/signup"] {
            assert_eq!(
                evaluate(true, &target(path)),
                GuardDecision::Redirect(Redirect::to("/dashboard")),
                "{path}"
            );
        }
    }

    #[test]
    fn public_routes_are_allowed() {
        assert_eq!(evaluate(false, &target("/")), GuardDecision::Allow);
        assert_eq!(evaluate(false, &target("/auth/login")), GuardDecision::Allow);
        assert_eq!(evaluate(true, &target("/")), GuardDecision::Allow);
    }

    #[test]
    fn protected_routes_are_allowed_with_session() {
        assert_eq!(evaluate(true, &target("/dashboard")), GuardDecision::Allow);
        assert_eq!(evaluate(true, &target("/dashboard/tickets")), GuardDecision::Allow);
    }

    #[test]
    fn redirect_keeps_query_of_original_path() {
        let decision = evaluate(false, &target("/dashboard?tab=open"));
        let GuardDecision::Redirect(redirect) = decision else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.query[0].1, "/dashboard?tab=open");
    }

    #[test]
    fn route_matching_ignores_case() {
        for path in ["/Dashboard/Tickets", "/DASHBOARD", "/dashboard/TICKETS?x=1"] {
            let target = target(path);
            assert!(target.requires_auth, "{path}");
            assert!(
                matches!(evaluate(false, &target), GuardDecision::Redirect(_)),
                "{path}"
            );
        }

        assert_eq!(target("/Auth/login").name.as_deref(), Some("auth"));
        assert_eq!(
            evaluate(true, &target("/Auth/login")),
            GuardDecision::Redirect(Redirect::to("/dashboard"))
        );
    }

    #[test]
    fn resolve_matches_patterns() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/").name.as_deref(), Some("home"));
        assert_eq!(table.resolve("/auth").name.as_deref(), Some("auth"));
        assert_eq!(table.resolve("/auth/signup?x=1").name.as_deref(), Some("auth"));
        assert_eq!(table.resolve("/auth/a/b").name, None);
        assert_eq!(table.resolve("/dashboard/").name.as_deref(), Some("dashboard"));
        assert_eq!(table.resolve("/dashboard/tickets").name.as_deref(), Some("tickets"));

        let unknown = table.resolve("/nowhere");
        assert_eq!(unknown.name, None);
        assert!(!unknown.requires_auth);
    }
}
