/**
 * User Endpoints
 */
use super::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::messaging::{SearchUsersResponse, UserInfo};

impl ApiClient {
    /// Search users by name or email (`GET /users/search?query=`)
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserInfo>, ClientError> {
        let url = self.url("/users/search");
        let response = self
            .authorized(self.http().get(&url))?
            .query(&[("query", query)])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let list: SearchUsersResponse = response.json().await?;
        Ok(list.users)
    }
}
