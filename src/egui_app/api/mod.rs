//! Backend API Client
//!
//! Thin client over the marketplace REST API. Every authenticated call sends
//! the session bearer token in the `Authorization` header; a 401/419 answer
//! maps to `ClientError::Unauthorized`, which the UI turns into a login
//! prompt. Backend failures never mutate local state - errors are translated
//! into user-facing messages at the call site nearest the UI.

mod auth;
mod conversations;
mod messages;
mod users;

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};

use crate::egui_app::config::Config;
use crate::egui_app::session::Session;
use crate::shared::error::ClientError;

/// Client for the marketplace backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    session: Arc<Session>,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config, session: Arc<Session>) -> Self {
        Self {
            config,
            session,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Current bearer token, or `Unauthorized` when no session is active
    fn bearer(&self) -> Result<String, ClientError> {
        self.session.token().ok_or(ClientError::Unauthorized)
    }

    /// Attach the `Authorization` header to a request
    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.bearer()?;
        Ok(request.header("Authorization", format!("Bearer {}", token)))
    }

    /// Map a non-success response into the error taxonomy
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 401 || status.as_u16() == 419 {
            return Err(ClientError::Unauthorized);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::api(status.as_u16(), message))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        self.config.api_url(path)
    }
}
