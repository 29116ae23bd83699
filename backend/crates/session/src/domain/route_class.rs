//! Route Class
//!
//! Tag assigned to a pathname by the route table.

use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RouteClass {
    /// Rendered without any chrome, whatever the session says
    #[display("no_layout")]
    NoLayout,
    /// Page embeds its own guard
    #[display("auth_guarded")]
    AuthGuarded,
    /// Admin area, guarded by the page
    #[display("admin")]
    Admin,
    /// Layout-eligible page
    #[display("default")]
    Default,
}

impl RouteClass {
    /// Whether the page runs its own auth guard
    #[inline]
    pub const fn is_guarded(&self) -> bool {
        matches!(self, Self::AuthGuarded | Self::Admin)
    }
}
