//! Route Classification Table
//!
//! Static lookup from a pathname to a [`RouteClass`]. The prefix lists are
//! configuration data; [`RouteTable::default`] carries the production lists.
//!
//! A path matches a rule if it equals the rule or starts with `rule + "/"`.
//! Precedence, highest first: no-layout, admin prefix, auth-guarded, default.

use serde::{Deserialize, Serialize};

use crate::domain::route_class::RouteClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    /// Pages that never carry the authenticated layout
    pub no_layout: Vec<String>,
    /// Pages that embed their own guard
    pub auth_guarded: Vec<String>,
    /// Plain prefix; every path starting with it is admin
    pub admin_prefix: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        let owned = |paths: &[&str]| paths.iter().map(|p| p.to_string()).collect();
        Self {
            no_layout: owned(&[
                "/",
                "/login",
                "/signup",
                "/forgot-password",
                "/reset-password",
                "/verify-email",
                "/landing",
            ]),
            auth_guarded: owned(&[
                "/dashboard",
                "/footprintlog",
                "/marketplace",
                "/projects",
                "/community",
                "/settings",
                "/admin",
                "/payment",
                "/user-details",
            ]),
            admin_prefix: "/admin".to_string(),
        }
    }
}

impl RouteTable {
    /// Classify a pathname
    pub fn classify(&self, pathname: &str) -> RouteClass {
        if self.no_layout.iter().any(|rule| matches_rule(pathname, rule)) {
            RouteClass::NoLayout
        } else if pathname.starts_with(self.admin_prefix.as_str()) {
            RouteClass::Admin
        } else if self.auth_guarded.iter().any(|rule| matches_rule(pathname, rule)) {
            RouteClass::AuthGuarded
        } else {
            RouteClass::Default
        }
    }

    /// Whether the page behind `pathname` runs an auth guard
    pub fn requires_guard(&self, pathname: &str) -> bool {
        self.classify(pathname).is_guarded()
    }
}

fn matches_rule(pathname: &str, rule: &str) -> bool {
    pathname == rule
        || pathname
            .strip_prefix(rule)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_layout_paths() {
        let table = RouteTable::default();
        for path in [
            "/",
            "/login",
            "/signup",
            "/forgot-password",
            "/reset-password/token123",
            "/verify-email",
            "/landing",
        ] {
            assert_eq!(table.classify(path), RouteClass::NoLayout, "{path}");
        }
    }

    #[test]
    fn test_admin_prefix_beats_guarded_list() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/admin"), RouteClass::Admin);
        assert_eq!(table.classify("/admin/users"), RouteClass::Admin);
        assert_eq!(table.classify("/administrator"), RouteClass::Admin);
    }

    #[test]
    fn test_guarded_paths() {
        let table = RouteTable::default();
        for path in [
            "/dashboard",
            "/footprintlog",
            "/marketplace/listing/42",
            "/projects",
            "/community",
            "/settings",
            "/payment",
            "/user-details",
        ] {
            assert_eq!(table.classify(path), RouteClass::AuthGuarded, "{path}");
            assert!(table.requires_guard(path));
        }
    }

    #[test]
    fn test_prefix_requires_segment_boundary() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/dashboards"), RouteClass::Default);
        assert_eq!(table.classify("/loginx"), RouteClass::Default);
        assert_eq!(table.classify("/about"), RouteClass::Default);
    }

    #[test]
    fn test_root_rule_matches_only_root() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/"), RouteClass::NoLayout);
        assert_ne!(table.classify("/reports"), RouteClass::NoLayout);
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{"noLayout":["/"],"authGuarded":["/vault"],"adminPrefix":"/ops"}"#;
        let table: RouteTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.classify("/vault/x"), RouteClass::AuthGuarded);
        assert_eq!(table.classify("/ops"), RouteClass::Admin);
        assert_eq!(table.classify("/dashboard"), RouteClass::Default);
    }
}
