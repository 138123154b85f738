use std::collections::HashMap;
use tracing::debug;

use crate::constants::{
    ADMIN_ROUTE, HOME_ROUTE, LOGIN_ROUTE, PROTECTED_ROUTES, REGISTER_ROUTE, ROLE_COOKIE,
    SESSION_COOKIE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

/// Cookie-based route gating, evaluated before a page renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn decide(&self, path: &str, cookies: &HashMap<String, String>) -> RouteDecision {
        let authenticated = cookies
            .get(SESSION_COOKIE)
            .is_some_and(|token| !token.is_empty());
        let is_admin = cookies.get(ROLE_COOKIE).is_some_and(|role| role == "admin");

        let decision = if matches_route(path, LOGIN_ROUTE) || matches_route(path, REGISTER_ROUTE) {
            if authenticated {
                RouteDecision::Redirect(HOME_ROUTE.to_string())
            } else {
                RouteDecision::Allow
            }
        } else if !PROTECTED_ROUTES.iter().any(|route| matches_route(path, route)) {
            RouteDecision::Allow
        } else if !authenticated {
            RouteDecision::Redirect(LOGIN_ROUTE.to_string())
        } else if matches_route(path, ADMIN_ROUTE) && !is_admin {
            RouteDecision::Redirect(HOME_ROUTE.to_string())
        } else {
            RouteDecision::Allow
        };

        if let RouteDecision::Redirect(target) = &decision {
            debug!("Redirecting {} to {}", path, target);
        }
        decision
    }
}

/// Parse a `Cookie:` header value into name/value pairs.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// `/movies` matches `/movies` and `/movies/42` but not `/movies-archive`.
fn matches_route(path: &str, route: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path == route
        || path
            .strip_prefix(route)
            .is_some_and(|rest| rest.starts_with('/'))
}
