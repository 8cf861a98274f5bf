//! User Data Structures
//!
//! Marketplace users as seen by the client, including the role used for
//! dashboard gating.

use serde::{Deserialize, Serialize};

/// Marketplace role of a user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Renter looking for cars
    Client,
    /// Car owner listing vehicles
    Owner,
    /// Marketplace administrator
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// Avatar image path, resolved against the public API URL
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authentication response from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer token for subsequent requests
    pub token: String,
    pub user: UserInfo,
}

/// Response for `GET /users/search?query=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersResponse {
    pub users: Vec<UserInfo>,
}
