//! Role-Based View Gating
//!
//! Decides which view a user may see: unauthenticated users land on the
//! login view, authenticated users on the dashboard matching their role.
//! This is UI convenience only - the backend API is the actual
//! authorization boundary, and nothing here must be treated as a security
//! control.

use crate::shared::messaging::{Role, UserInfo};

/// The views the app can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login screen
    Login,
    /// Renter dashboard
    ClientDashboard,
    /// Car-owner dashboard
    OwnerDashboard,
    /// Administrator dashboard
    AdminDashboard,
    /// Messaging view
    Messages,
}

/// Home dashboard for a role
pub fn home_for(role: Role) -> Route {
    match role {
        Role::Client => Route::ClientDashboard,
        Role::Owner => Route::OwnerDashboard,
        Role::Admin => Route::AdminDashboard,
    }
}

/// Role a dashboard route is reserved for; `None` for shared routes
fn required_role(route: Route) -> Option<Role> {
    match route {
        Route::ClientDashboard => Some(Role::Client),
        Route::OwnerDashboard => Some(Role::Owner),
        Route::AdminDashboard => Some(Role::Admin),
        Route::Login | Route::Messages => None,
    }
}

/// Resolve the route actually shown: unauthenticated users are redirected
/// to login, authenticated users away from login, and role-mismatched
/// dashboards to the user's own home.
pub fn guard(requested: Route, user: Option<&UserInfo>) -> Route {
    let Some(user) = user else {
        return Route::Login;
    };
    if requested == Route::Login {
        return home_for(user.role);
    }
    match required_role(requested) {
        Some(role) if role != user.role => home_for(user.role),
        _ => requested,
    }
}
