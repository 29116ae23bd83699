//! Auth Layout Gate
//!
//! Pure per-navigation decision: given a pathname and the latest session
//! snapshot, pick exactly one render branch. Recomputed on every pathname
//! or session change; holds no state beyond its configuration.

use crate::application::route_table::RouteTable;
use crate::domain::route_class::RouteClass;
use crate::domain::session_state::SessionState;

const ROOT_PATH: &str = "/";

/// Render branch chosen by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutDecision {
    /// Render the page as-is
    Unwrapped,
    /// Full-page loading indicator
    Loading,
    /// Page wrapped in the authenticated navigation chrome
    WithLayout,
    /// Root visited by a signed-in user: no chrome, go to `to`
    RedirectHome { to: String },
}

impl LayoutDecision {
    /// Whether navigation chrome is drawn
    pub fn renders_layout(&self) -> bool {
        matches!(self, LayoutDecision::WithLayout)
    }
}

/// Layout gate over a route table
#[derive(Debug, Clone)]
pub struct LayoutGate {
    table: RouteTable,
    home_path: String,
}

impl LayoutGate {
    pub fn new(table: RouteTable, home_path: impl Into<String>) -> Self {
        Self {
            table,
            home_path: home_path.into(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn decide(&self, pathname: &str, session: &SessionState) -> LayoutDecision {
        // Root never carries the layout: it is either landing content or a
        // transitional state before the home redirect.
        if pathname == ROOT_PATH {
            return match (&session.user, session.is_loading) {
                (_, true) => LayoutDecision::Loading,
                (None, false) => LayoutDecision::Unwrapped,
                (Some(_), false) => LayoutDecision::RedirectHome {
                    to: self.home_path.clone(),
                },
            };
        }

        match self.table.classify(pathname) {
            RouteClass::NoLayout | RouteClass::Admin | RouteClass::AuthGuarded => {
                LayoutDecision::Unwrapped
            }
            RouteClass::Default => {
                if session.is_loading || session.user.is_none() {
                    LayoutDecision::Unwrapped
                } else {
                    LayoutDecision::WithLayout
                }
            }
        }
    }
}

impl Default for LayoutGate {
    fn default() -> Self {
        Self::new(RouteTable::default(), "/dashboard")
    }
}
