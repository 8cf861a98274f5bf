/**
 * Conversation Endpoints
 */
use super::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::messaging::{
    Conversation, CreateConversationRequest, ListConversationsResponse,
};

impl ApiClient {
    /// Fetch the current user's conversations (`GET /conversations`)
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        let url = self.url("/conversations");
        let response = self.authorized(self.http().get(&url))?.send().await?;
        let response = Self::check(response).await?;
        let list: ListConversationsResponse = response.json().await?;
        Ok(list.conversations)
    }

    /// Create a conversation (`POST /conversations`)
    pub async fn create_conversation(
        &self,
        request: CreateConversationRequest,
    ) -> Result<Conversation, ClientError> {
        let url = self.url("/conversations");
        let response = self
            .authorized(self.http().post(&url))?
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}
