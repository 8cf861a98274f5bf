/**
 * Authentication Endpoints
 *
 * Login, logout and private-channel broadcasting auth.
 */
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::messaging::{AuthResponse, LoginRequest};

/// Request body for `POST /broadcasting/auth`
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastAuthRequest {
    pub socket_id: String,
    pub channel_name: String,
}

/// Response from `POST /broadcasting/auth`
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastAuthResponse {
    /// Signature the broadcaster expects in the subscribe frame
    pub auth: String,
}

impl ApiClient {
    /// Log in and install the returned credential into the session.
    pub async fn login(&self, email: String, password: String) -> Result<AuthResponse, ClientError> {
        let url = self.url("/login");
        let request = LoginRequest { email, password };

        let response = self.http().post(&url).json(&request).send().await?;
        let response = Self::check(response).await?;
        let auth: AuthResponse = response.json().await?;

        self.session().set(auth.token.clone(), auth.user.clone());
        tracing::info!("[api] logged in as user {} ({:?})", auth.user.id, auth.user.role);
        Ok(auth)
    }

    /// Log out. The local credential is destroyed even if the backend call
    /// fails - worst case the server-side token lingers until it expires.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = self.url("/logout");
        let result = match self.authorized(self.http().post(&url)) {
            Ok(request) => match request.send().await {
                Ok(response) => Self::check(response).await.map(|_| ()),
                Err(e) => Err(e.into()),
            },
            Err(e) => Err(e),
        };

        self.session().clear();
        if let Err(ref e) = result {
            tracing::warn!("[api] logout request failed (credential cleared anyway): {}", e);
        }
        result
    }

    /// Authenticate a private-channel subscription with the backend.
    pub async fn broadcast_auth(
        &self,
        socket_id: &str,
        channel_name: &str,
    ) -> Result<String, ClientError> {
        let url = self.url("/broadcasting/auth");
        let request = BroadcastAuthRequest {
            socket_id: socket_id.to_string(),
            channel_name: channel_name.to_string(),
        };

        let response = self
            .authorized(self.http().post(&url))?
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let auth: BroadcastAuthResponse = response.json().await?;
        Ok(auth.auth)
    }
}
